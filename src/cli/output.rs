//! Terminal rendering for command results.

use medadmin_core::{ApiError, PageResult};
use medadmin_models::{Category, Doctor, Pharmacy, User};

use crate::modules::DashboardCounts;
use crate::utils::ListView;

/// One-line rendering of a list row.
pub trait Row {
    fn id(&self) -> String;
    fn row(&self) -> String;
}

impl Row for Doctor {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn row(&self) -> String {
        format!(
            "{:<28} {:<22} {:<18} {}",
            self.full_name(),
            self.specialization,
            self.category_label().unwrap_or("-"),
            self.rating.map(|r| format!("★ {:.1}", r)).unwrap_or_default()
        )
    }
}

impl Row for Category {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn row(&self) -> String {
        format!(
            "{:<28} {}",
            self.name,
            self.description.as_deref().unwrap_or("")
        )
    }
}

impl Row for Pharmacy {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn row(&self) -> String {
        let hours = if self.is_24h {
            "24h".to_string()
        } else {
            self.opening_hours.clone()
        };
        format!(
            "{:<28} {:<18} {:<14} {}",
            self.name,
            self.city.as_deref().unwrap_or("-"),
            hours,
            self.contact_phone
        )
    }
}

impl Row for User {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn row(&self) -> String {
        format!("{:<24} {:<32} {}", self.name, self.email, self.role.label())
    }
}

pub fn success(message: &str) {
    println!("\n✅ {}", message);
}

pub fn failure(message: &str) {
    eprintln!("\n❌ {}", message);
}

/// Message shown for a failed call.
pub fn describe_error(error: &ApiError) -> String {
    match error {
        ApiError::Auth { .. } => "Your session has expired. Please sign in again.".to_string(),
        ApiError::Network(_) => "Unable to reach the server. Please try again.".to_string(),
        ApiError::Server { .. } => "The server failed to process the request.".to_string(),
        other => other.to_string(),
    }
}

pub fn print_page<T: Row>(page: &PageResult<T>) {
    if page.items.is_empty() {
        println!("No records found.");
    }
    for item in &page.items {
        println!("{:<38} {}", item.id(), item.row());
    }
    println!(
        "\nPage {} of {} · {} total",
        page.page,
        page.total_pages().max(1),
        page.total_count
    );
}

pub fn print_view<T: Row>(view: &ListView<T>) {
    if let Some(page) = view.result() {
        print_page(page);
    }
    if let Some(error) = view.last_error() {
        failure(&describe_error(error));
    }
}

pub fn print_doctor(doctor: &Doctor) {
    println!("{}", doctor.full_name());
    println!("   ID: {}", doctor.id);
    println!("   Specialization: {}", doctor.specialization);
    if let Some(category) = doctor.category_label() {
        println!("   Category: {}", category);
    }
    if let Some(years) = doctor.years_experience {
        println!("   Experience: {} years", years);
    }
    if let Some(rating) = doctor.rating {
        println!(
            "   Rating: {:.1} ({} reviews)",
            rating,
            doctor.reviews_count.unwrap_or(0)
        );
    }
    if let Some(fee) = doctor.consultation_fee {
        println!("   Consultation fee: {:.2}", fee);
    }
    if !doctor.languages.is_empty() {
        println!("   Languages: {}", doctor.languages.join(", "));
    }
    for (label, value) in [
        ("Email", &doctor.contact_email),
        ("Phone", &doctor.contact_phone),
        ("Clinic", &doctor.clinic_address),
        ("Photo", &doctor.photo_url),
    ] {
        if let Some(value) = value {
            println!("   {}: {}", label, value);
        }
    }
    if let Some(location) = doctor.location {
        println!("   Location: {}", location);
    }
    if !doctor.available_slots.is_empty() {
        println!("   Available slots:");
        for slot in &doctor.available_slots {
            println!("     - {}", slot.to_rfc3339());
        }
    }
    if !doctor.bio.is_empty() {
        println!("\n{}", doctor.bio);
    }
}

pub fn print_pharmacy(pharmacy: &Pharmacy) {
    println!("{}", pharmacy.name);
    println!("   ID: {}", pharmacy.id);
    println!("   Address: {}", pharmacy.address);
    if let Some(city) = &pharmacy.city {
        println!("   City: {}", city);
    }
    println!("   Phone: {}", pharmacy.contact_phone);
    println!("   Email: {}", pharmacy.contact_email);
    if pharmacy.is_24h {
        println!("   Open 24 hours");
    } else {
        println!("   Opening hours: {}", pharmacy.opening_hours);
    }
    if let Some(location) = pharmacy.location {
        println!("   Location: {}", location);
    }
}

pub fn print_user(user: &User) {
    println!("{}", user.name);
    println!("   ID: {}", user.id);
    println!("   Email: {}", user.email);
    println!("   Role: {}", user.role.label());
    if let Some(created_at) = user.created_at {
        println!("   Created: {}", created_at.format("%Y-%m-%d %H:%M"));
    }
}

pub fn print_dashboard(counts: &DashboardCounts) {
    println!("Dashboard");
    println!("   Doctors:    {}", counts.doctors);
    println!("   Pharmacies: {}", counts.pharmacies);
    println!("   Categories: {}", counts.categories);
    println!("   Users:      {}", counts.users);
}
