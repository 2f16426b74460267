use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use medadmin_auth::peek_claims;
use medadmin_config::{ApiConfig, SessionConfig};
use medadmin_core::{ApiError, FileUpload, PageRequest, UploadPolicy};
use medadmin_models::{
    AssignDoctorDto, Category, CategoryFilters, CategoryId, CreateUserDto, Doctor, DoctorFilters,
    DoctorId, GeoPoint, Identity, Pharmacy, PharmacyFilters, PharmacyId, PharmacyPayload, Role,
    UpdateUserDto, User, UserFilters, UserId,
};
use tracing::debug;

use crate::cli::interactive::browse;
use crate::cli::output::{self, Row};
use crate::cli::prompts;
use crate::cli::{
    CategoryArgs, CategoryCommand, Cli, Commands, DeleteArgs, DoctorArgs, DoctorCommand, ListArgs,
    PharmacyArgs, PharmacyCommand, UserCommand,
};
use crate::modules::{CategoryForm, DoctorForm, SessionGuard};
use crate::router::{Gate, Navigator, Route, gate};
use crate::state::{AppState, init_app_state};
use crate::utils::{ListController, ListView, PageSource};

/// Navigation in a terminal: tell the user where to go next.
pub struct CliNavigator;

impl Navigator for CliNavigator {
    fn navigate(&self, route: Route) {
        match route {
            Route::Login => println!("→ Sign in with `medadmin login`."),
            other => debug!(route = %other, "Navigate"),
        }
    }
}

fn api_failure(error: ApiError) -> anyhow::Error {
    anyhow::anyhow!(output::describe_error(&error))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut api_config = ApiConfig::from_env();
    if let Some(api_url) = cli.api_url {
        api_config = api_config.with_base_url(api_url);
    }
    if let Some(page_size) = cli.page_size {
        api_config.default_page_size = page_size.max(1);
    }

    let state = init_app_state(api_config, &SessionConfig::from_env())
        .context("Failed to initialize client")?;
    let guard = state.session_guard(Arc::new(CliNavigator));

    match cli.command {
        Commands::Login { email, password } => handle_login(&guard, email, password).await,
        Commands::Logout => {
            guard.logout().await;
            output::success("Signed out");
            Ok(())
        }
        Commands::Whoami => handle_whoami(&state, &guard).await,
        Commands::Dashboard => {
            require_admin(&guard, Route::Dashboard).await?;
            let counts = state.dashboard().counts().await.map_err(api_failure)?;
            output::print_dashboard(&counts);
            Ok(())
        }
        Commands::Doctors(command) => handle_doctors(&state, &guard, command).await,
        Commands::Categories(command) => handle_categories(&state, &guard, command).await,
        Commands::Pharmacies(command) => handle_pharmacies(&state, &guard, command).await,
        Commands::Users(command) => handle_users(&state, &guard, command).await,
    }
}

/// Verifies the stored session and applies route gating for `route`.
async fn require_admin(guard: &SessionGuard, route: Route) -> anyhow::Result<Identity> {
    let auth_state = guard.initialize().await;
    match gate(&route, &auth_state) {
        Gate::Render => auth_state
            .identity()
            .cloned()
            .context("Session resolved without an identity"),
        Gate::Redirect(_) | Gate::Loading => {
            bail!("Not signed in as an administrator. Run `medadmin login` first.")
        }
    }
}

async fn handle_login(
    guard: &SessionGuard,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let auth_state = guard.initialize().await;
    if let Gate::Redirect(_) = gate(&Route::Login, &auth_state) {
        if let Some(identity) = auth_state.identity() {
            println!("Already signed in as {}", identity.email);
            return Ok(());
        }
    }

    let email = prompts::text_or_prompt(email, "Email address")?;
    let password = prompts::password_or_prompt(password, false)?;

    let identity = guard.login(&email, &password).await?;
    output::success(&format!("Signed in as {}", identity.email));
    Ok(())
}

async fn handle_whoami(state: &AppState, guard: &SessionGuard) -> anyhow::Result<()> {
    let identity = require_admin(guard, Route::Dashboard).await?;
    println!("{}", identity.name.as_deref().unwrap_or(&identity.email));
    println!("   ID: {}", identity.id);
    println!("   Email: {}", identity.email);
    println!("   Role: {}", identity.role.label());

    if let Some(token) = state.session.access_token() {
        match peek_claims(&token) {
            Ok(claims) => {
                if let Some(expires_at) = claims.expires_at() {
                    println!("   Token expires: {}", expires_at.format("%Y-%m-%d %H:%M UTC"));
                }
            }
            Err(e) => debug!(error = %e, "Access token is not a readable JWT"),
        }
    }
    Ok(())
}

fn page_request(state: &AppState, list: &ListArgs, filters: medadmin_core::Filters) -> PageRequest {
    PageRequest::new(list.page, state.api_config.default_page_size).with_filters(filters)
}

async fn list_or_browse<T, S, D, Fut>(
    state: &AppState,
    source: S,
    list: &ListArgs,
    filters: medadmin_core::Filters,
    delete: D,
) -> anyhow::Result<()>
where
    T: Row + Clone + Send,
    S: PageSource<T>,
    D: Fn(String) -> Fut,
    Fut: std::future::Future<Output = Result<(), ApiError>>,
{
    if list.interactive {
        let view = ListView::new(state.api_config.default_page_size)
            .with_filters(filters)
            .at_page(list.page);
        let controller = ListController::with_view_state(source, view);
        return browse(&controller, delete).await;
    }

    let request = page_request(state, list, filters);
    let page = source.fetch_page(&request).await.map_err(api_failure)?;
    output::print_page(&page);
    Ok(())
}

fn confirm_delete(args: &DeleteArgs, what: &str) -> anyhow::Result<bool> {
    if args.yes {
        return Ok(true);
    }
    prompts::confirm(&format!("Delete {} {}? This cannot be undone", what, args.id))
}

async fn load_upload(path: Option<&Path>, policy: UploadPolicy) -> anyhow::Result<Option<FileUpload>> {
    match path {
        Some(path) => {
            let upload = FileUpload::from_path(path, &policy)
                .await
                .with_context(|| format!("Cannot use {}", path.display()))?;
            Ok(Some(upload))
        }
        None => Ok(None),
    }
}

async fn handle_doctors(
    state: &AppState,
    guard: &SessionGuard,
    command: DoctorCommand,
) -> anyhow::Result<()> {
    let service = state.doctors();

    match command {
        DoctorCommand::List { list, category } => {
            require_admin(guard, Route::Doctors).await?;
            let filters = DoctorFilters {
                search: list.search.clone(),
                category_id: category.map(CategoryId::new),
            }
            .into_filters();
            let deleter = service.clone();
            list_or_browse::<Doctor, _, _, _>(state, service, &list, filters, |id| {
                let deleter = deleter.clone();
                async move { deleter.delete(&DoctorId::new(id)).await }
            })
            .await
        }
        DoctorCommand::Show { id } => {
            let id = DoctorId::new(id);
            require_admin(guard, Route::DoctorDetails(id.clone())).await?;
            match service.get(&id).await.map_err(api_failure)? {
                Some(doctor) => {
                    output::print_doctor(&doctor);
                    Ok(())
                }
                None => bail!("Doctor not found"),
            }
        }
        DoctorCommand::Create(args) => {
            require_admin(guard, Route::Doctors).await?;
            let mut form = DoctorForm::default();
            apply_doctor_args(&mut form, args).await?;

            if form.first_name.trim().is_empty() {
                form.first_name = prompts::text_or_prompt(None, "First name")?;
            }
            if form.last_name.trim().is_empty() {
                form.last_name = prompts::text_or_prompt(None, "Last name")?;
            }
            if form.specialization.trim().is_empty() {
                form.specialization = prompts::text_or_prompt(None, "Specialization")?;
            }
            if form.category_id.trim().is_empty() {
                let categories = state.categories().options().await.map_err(api_failure)?;
                form.category_id = prompts::category(&categories, None)?.unwrap_or_default();
            }

            let doctor = service.create(form).await.map_err(api_failure)?;
            output::success(&format!("Doctor created: {} ({})", doctor.full_name(), doctor.id));
            Ok(())
        }
        DoctorCommand::Update { id, fields } => {
            let id = DoctorId::new(id);
            require_admin(guard, Route::DoctorDetails(id.clone())).await?;
            let Some(existing) = service.get(&id).await.map_err(api_failure)? else {
                bail!("Doctor not found");
            };

            let mut form = DoctorForm::from_doctor(&existing);
            apply_doctor_args(&mut form, fields).await?;
            let doctor = service.update(&id, form).await.map_err(api_failure)?;
            output::success(&format!("Doctor updated: {}", doctor.full_name()));
            Ok(())
        }
        DoctorCommand::Delete(args) => {
            require_admin(guard, Route::Doctors).await?;
            if !confirm_delete(&args, "doctor")? {
                return Ok(());
            }
            service
                .delete(&DoctorId::new(args.id.clone()))
                .await
                .map_err(api_failure)?;
            output::success("Doctor deleted");
            Ok(())
        }
    }
}

async fn apply_doctor_args(form: &mut DoctorForm, args: DoctorArgs) -> anyhow::Result<()> {
    if let Some(first_name) = args.first_name {
        form.first_name = first_name;
    }
    if let Some(last_name) = args.last_name {
        form.last_name = last_name;
    }
    if let Some(category) = args.category {
        form.category_id = category;
    }
    if let Some(specialization) = args.specialization {
        form.specialization = specialization;
    }
    if args.years_experience.is_some() {
        form.years_experience = args.years_experience;
    }
    if args.rating.is_some() {
        form.rating = args.rating;
    }
    if args.reviews_count.is_some() {
        form.reviews_count = args.reviews_count;
    }
    if let Some(bio) = args.bio {
        form.bio = bio;
    }
    if !args.languages.is_empty() {
        form.languages.clear();
        for language in &args.languages {
            form.add_language(language);
        }
    }
    if args.consultation_fee.is_some() {
        form.consultation_fee = args.consultation_fee;
    }
    if args.contact_email.is_some() {
        form.contact_email = args.contact_email;
    }
    if args.contact_phone.is_some() {
        form.contact_phone = args.contact_phone;
    }
    if args.clinic_address.is_some() {
        form.clinic_address = args.clinic_address;
    }
    if args.latitude.is_some() {
        form.latitude = args.latitude;
    }
    if args.longitude.is_some() {
        form.longitude = args.longitude;
    }
    if !args.slots.is_empty() {
        form.available_slots.clear();
        for raw in &args.slots {
            form.add_slot(prompts::parse_slot(raw)?);
        }
    }
    form.photo = load_upload(args.photo.as_deref(), UploadPolicy::images()).await?;
    Ok(())
}

async fn handle_categories(
    state: &AppState,
    guard: &SessionGuard,
    command: CategoryCommand,
) -> anyhow::Result<()> {
    require_admin(guard, Route::Categories).await?;
    let service = state.categories();

    match command {
        CategoryCommand::List { list, parent } => {
            let filters = CategoryFilters {
                search: list.search.clone(),
                parent_id: parent.map(CategoryId::new),
            }
            .into_filters();
            let deleter = service.clone();
            list_or_browse::<Category, _, _, _>(state, service, &list, filters, |id| {
                let deleter = deleter.clone();
                async move { deleter.delete(&CategoryId::new(id)).await }
            })
            .await
        }
        CategoryCommand::Create(args) => {
            let name = prompts::text_or_prompt(args.name, "Name")?;
            let form = CategoryForm {
                name,
                description: args.description,
                parent_id: args.parent,
                icon: load_upload(args.icon.as_deref(), UploadPolicy::icons()).await?,
            };
            let category = service.create(form).await.map_err(api_failure)?;
            output::success(&format!("Category created: {} ({})", category.name, category.id));
            Ok(())
        }
        CategoryCommand::Update { id, fields } => {
            let id = CategoryId::new(id);
            let Some(existing) = service.get(&id).await.map_err(api_failure)? else {
                bail!("Category not found");
            };

            let mut form = CategoryForm::from_category(&existing);
            apply_category_args(&mut form, fields).await?;
            let category = service.update(&id, form).await.map_err(api_failure)?;
            output::success(&format!("Category updated: {}", category.name));
            Ok(())
        }
        CategoryCommand::Delete(args) => {
            if !confirm_delete(&args, "category")? {
                return Ok(());
            }
            service
                .delete(&CategoryId::new(args.id.clone()))
                .await
                .map_err(api_failure)?;
            output::success("Category deleted");
            Ok(())
        }
    }
}

async fn apply_category_args(form: &mut CategoryForm, args: CategoryArgs) -> anyhow::Result<()> {
    if let Some(name) = args.name {
        form.name = name;
    }
    if args.description.is_some() {
        form.description = args.description;
    }
    if args.parent.is_some() {
        form.parent_id = args.parent;
    }
    form.icon = load_upload(args.icon.as_deref(), UploadPolicy::icons()).await?;
    Ok(())
}

async fn handle_pharmacies(
    state: &AppState,
    guard: &SessionGuard,
    command: PharmacyCommand,
) -> anyhow::Result<()> {
    require_admin(guard, Route::Pharmacies).await?;
    let service = state.pharmacies();

    match command {
        PharmacyCommand::List { list, city } => {
            let filters = PharmacyFilters {
                search: list.search.clone(),
                city,
            }
            .into_filters();
            let deleter = service.clone();
            list_or_browse::<Pharmacy, _, _, _>(state, service, &list, filters, |id| {
                let deleter = deleter.clone();
                async move { deleter.delete(&PharmacyId::new(id)).await }
            })
            .await
        }
        PharmacyCommand::Show { id } => match service
            .get(&PharmacyId::new(id))
            .await
            .map_err(api_failure)?
        {
            Some(pharmacy) => {
                output::print_pharmacy(&pharmacy);
                Ok(())
            }
            None => bail!("Pharmacy not found"),
        },
        PharmacyCommand::Create(args) => {
            let mut payload = PharmacyPayload::default();
            apply_pharmacy_args(&mut payload, args);

            if payload.name.trim().is_empty() {
                payload.name = prompts::text_or_prompt(None, "Name")?;
            }
            if payload.address.trim().is_empty() {
                payload.address = prompts::text_or_prompt(None, "Address")?;
            }
            if payload.contact_phone.trim().is_empty() {
                payload.contact_phone = prompts::text_or_prompt(None, "Contact phone")?;
            }
            if payload.contact_email.trim().is_empty() {
                payload.contact_email = prompts::text_or_prompt(None, "Contact email")?;
            }

            let pharmacy = service.create(payload).await.map_err(api_failure)?;
            output::success(&format!("Pharmacy created: {} ({})", pharmacy.name, pharmacy.id));
            Ok(())
        }
        PharmacyCommand::Update { id, fields } => {
            let id = PharmacyId::new(id);
            let Some(existing) = service.get(&id).await.map_err(api_failure)? else {
                bail!("Pharmacy not found");
            };

            let mut payload = PharmacyPayload::from_pharmacy(&existing);
            apply_pharmacy_args(&mut payload, fields);
            let pharmacy = service.update(&id, payload).await.map_err(api_failure)?;
            output::success(&format!("Pharmacy updated: {}", pharmacy.name));
            Ok(())
        }
        PharmacyCommand::Delete(args) => {
            if !confirm_delete(&args, "pharmacy")? {
                return Ok(());
            }
            service
                .delete(&PharmacyId::new(args.id.clone()))
                .await
                .map_err(api_failure)?;
            output::success("Pharmacy deleted");
            Ok(())
        }
    }
}

fn apply_pharmacy_args(payload: &mut PharmacyPayload, args: PharmacyArgs) {
    if let Some(name) = args.name {
        payload.name = name;
    }
    if let Some(address) = args.address {
        payload.address = address;
    }
    if args.city.is_some() {
        payload.city = args.city;
    }
    if let Some(phone) = args.contact_phone {
        payload.contact_phone = phone;
    }
    if let Some(email) = args.contact_email {
        payload.contact_email = email;
    }
    if let Some(hours) = args.opening_hours {
        payload.opening_hours = hours;
    }
    if let Some(is_24h) = args.is_24h {
        payload.is_24h = is_24h;
    }
    if let Some(latitude) = args.latitude {
        payload.latitude = latitude;
    }
    if let Some(longitude) = args.longitude {
        payload.longitude = longitude;
    }
}

async fn handle_users(
    state: &AppState,
    guard: &SessionGuard,
    command: UserCommand,
) -> anyhow::Result<()> {
    require_admin(guard, Route::Users).await?;
    let service = state.users();

    match command {
        UserCommand::List { list, role } => {
            let filters = UserFilters {
                search: list.search.clone(),
                role,
            }
            .into_filters();
            let deleter = service.clone();
            list_or_browse::<User, _, _, _>(state, service, &list, filters, |id| {
                let deleter = deleter.clone();
                async move { deleter.delete(&UserId::new(id)).await }
            })
            .await
        }
        UserCommand::Show { id } => match service
            .get(&UserId::new(id))
            .await
            .map_err(api_failure)?
        {
            Some(user) => {
                output::print_user(&user);
                Ok(())
            }
            None => bail!("User not found"),
        },
        UserCommand::Create {
            name,
            email,
            password,
            role,
        } => {
            let dto = CreateUserDto {
                name: prompts::text_or_prompt(name, "Name")?,
                email: prompts::text_or_prompt(email, "Email address")?,
                password: prompts::password_or_prompt(password, true)?,
                role: match role {
                    Some(role) => role,
                    None => prompts::role(Role::User)?,
                },
            };
            let user = service.create(dto).await.map_err(api_failure)?;
            output::success(&format!("User created: {} ({})", user.email, user.id));
            Ok(())
        }
        UserCommand::Update {
            id,
            name,
            email,
            password,
            role,
        } => {
            let dto = UpdateUserDto {
                name,
                email,
                password: None,
                role,
            }
            .with_password(password.as_deref().unwrap_or(""));
            let user = service
                .update(&UserId::new(id), dto)
                .await
                .map_err(api_failure)?;
            output::success(&format!("User updated: {}", user.email));
            Ok(())
        }
        UserCommand::Delete(args) => {
            if !confirm_delete(&args, "user")? {
                return Ok(());
            }
            service
                .delete(&UserId::new(args.id.clone()))
                .await
                .map_err(api_failure)?;
            output::success("User deleted");
            Ok(())
        }
        UserCommand::AssignDoctor { user_id } => handle_assign_doctor(state, user_id).await,
    }
}

/// Guided form that promotes an account to a doctor profile.
async fn handle_assign_doctor(state: &AppState, user_id: String) -> anyhow::Result<()> {
    let user_id = UserId::new(user_id);
    let Some(user) = state.users().get(&user_id).await.map_err(api_failure)? else {
        bail!("User not found");
    };
    let categories = state.categories().options().await.map_err(api_failure)?;
    if categories.is_empty() {
        bail!("No categories available. Create one with `medadmin categories create` first.");
    }

    println!("Creating a doctor profile for {} <{}>", user.name, user.email);

    let mut dto = AssignDoctorDto::for_user(user.id);
    dto.specialization = prompts::text_or_prompt(None, "Specialization")?;
    dto.category_id = prompts::category(&categories, None)?.unwrap_or_default();
    dto.years_experience = prompts::number("Years of experience", 0u32)?;
    dto.consultation_fee = prompts::number("Consultation fee", 0.0f64)?;
    dto.bio = prompts::optional_text("Bio", None)?.unwrap_or_default();
    dto.photo_url = prompts::optional_text("Photo URL", None)?;
    dto.languages = prompts::list("Language")?;
    dto.contact_phone = prompts::optional_text("Contact phone", None)?.unwrap_or_default();
    dto.clinic_address = prompts::optional_text("Clinic address", None)?.unwrap_or_default();

    let latitude = prompts::number("Latitude", 0.0f64)?;
    let longitude = prompts::number("Longitude", 0.0f64)?;
    dto.location = GeoPoint::new(latitude, longitude)?;
    dto.available_slots = prompts::slots()?;

    let doctor = state
        .doctors()
        .assign_to_user(&dto)
        .await
        .map_err(api_failure)?;
    output::success(&format!(
        "{} is now listed as a doctor ({})",
        user.email, doctor.id
    ));
    Ok(())
}
