//! Command-line interface.
//!
//! `medadmin` drives the same services an admin UI would: every protected
//! command first verifies the stored session and is refused unless an
//! administrator is signed in.

pub mod commands;
pub mod interactive;
pub mod output;
pub mod prompts;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use medadmin_models::Role;

pub use commands::run;

#[derive(Parser, Debug)]
#[command(name = "medadmin")]
#[command(about = "medadmin - Administrative client for the healthcare directory", long_about = None)]
pub struct Cli {
    /// Backend API base URL
    #[arg(long, env = "MEDADMIN_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Rows per page for list commands
    #[arg(long, env = "MEDADMIN_PAGE_SIZE", global = true)]
    pub page_size: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in as an administrator
    Login {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in administrator
    Whoami,
    /// Show record counts
    Dashboard,
    /// Manage doctors
    #[command(subcommand)]
    Doctors(DoctorCommand),
    /// Manage doctor categories
    #[command(subcommand)]
    Categories(CategoryCommand),
    /// Manage pharmacies
    #[command(subcommand)]
    Pharmacies(PharmacyCommand),
    /// Manage user accounts
    #[command(subcommand)]
    Users(UserCommand),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Page to show
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Free-text search
    #[arg(short = 's', long)]
    pub search: Option<String>,

    /// Browse with next/previous/filter/delete actions
    #[arg(short = 'i', long)]
    pub interactive: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DeleteArgs {
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum DoctorCommand {
    /// List doctors
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only doctors in this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one doctor
    Show { id: String },
    /// Create a doctor profile
    Create(DoctorArgs),
    /// Update a doctor profile; only the given fields change
    Update {
        id: String,

        #[command(flatten)]
        fields: DoctorArgs,
    },
    /// Delete a doctor profile
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct DoctorArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    /// Category id
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub specialization: Option<String>,

    #[arg(long)]
    pub years_experience: Option<u32>,

    #[arg(long)]
    pub rating: Option<f64>,

    #[arg(long)]
    pub reviews_count: Option<u32>,

    #[arg(long)]
    pub bio: Option<String>,

    /// Spoken language (repeatable)
    #[arg(long = "language")]
    pub languages: Vec<String>,

    #[arg(long)]
    pub consultation_fee: Option<f64>,

    #[arg(long)]
    pub contact_email: Option<String>,

    #[arg(long)]
    pub contact_phone: Option<String>,

    #[arg(long)]
    pub clinic_address: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// Available slot as an RFC 3339 timestamp (repeatable)
    #[arg(long = "slot")]
    pub slots: Vec<String>,

    /// Profile photo (png, jpeg or webp, at most 5 MiB)
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// List categories
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only children of this category
        #[arg(long)]
        parent: Option<String>,
    },
    /// Create a category
    Create(CategoryArgs),
    /// Update a category; only the given fields change
    Update {
        id: String,

        #[command(flatten)]
        fields: CategoryArgs,
    },
    /// Delete a category
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct CategoryArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Parent category id
    #[arg(long)]
    pub parent: Option<String>,

    /// Icon (png, jpeg, webp or svg, at most 5 MiB)
    #[arg(long)]
    pub icon: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum PharmacyCommand {
    /// List pharmacies
    List {
        #[command(flatten)]
        list: ListArgs,

        #[arg(long)]
        city: Option<String>,
    },
    /// Show one pharmacy
    Show { id: String },
    /// Create a pharmacy
    Create(PharmacyArgs),
    /// Update a pharmacy; only the given fields change
    Update {
        id: String,

        #[command(flatten)]
        fields: PharmacyArgs,
    },
    /// Delete a pharmacy
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct PharmacyArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub contact_phone: Option<String>,

    #[arg(long)]
    pub contact_email: Option<String>,

    /// Opening hours, e.g. 9:00-18:00
    #[arg(long)]
    pub opening_hours: Option<String>,

    /// Open around the clock
    #[arg(long)]
    pub is_24h: Option<bool>,

    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// List user accounts
    List {
        #[command(flatten)]
        list: ListArgs,

        /// admin, doctor or user
        #[arg(long)]
        role: Option<Role>,
    },
    /// Show one account
    Show { id: String },
    /// Create an account
    Create {
        #[arg(long)]
        name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        #[arg(long)]
        role: Option<Role>,
    },
    /// Update an account; only the given fields change
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        /// New password; leave out to keep the current one
        #[arg(short = 'p', long)]
        password: Option<String>,

        #[arg(long)]
        role: Option<Role>,
    },
    /// Delete an account
    Delete(DeleteArgs),
    /// Create a doctor profile for an existing account
    AssignDoctor {
        /// Account to promote
        user_id: String,
    },
}
