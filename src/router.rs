//! Admin routes and session gating.
//!
//! Every route except [`Route::Login`] is protected. [`gate`] decides what a
//! view should do given the current [`AuthState`]:
//!
//! | State            | Protected route          | Login route                   |
//! |------------------|--------------------------|-------------------------------|
//! | Unresolved       | `Loading`                | `Loading`                     |
//! | Authenticated    | `Render`                 | `Redirect(Dashboard)`         |
//! | Unauthenticated  | `Redirect(Login)`        | `Render`                      |

use std::fmt;

use medadmin_auth::AuthState;
use medadmin_models::DoctorId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Doctors,
    DoctorDetails(DoctorId),
    Pharmacies,
    Categories,
    Users,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/admin".to_string(),
            Route::Doctors => "/admin/doctors".to_string(),
            Route::DoctorDetails(id) => format!("/admin/doctors/{}", id),
            Route::Pharmacies => "/admin/pharmacies".to_string(),
            Route::Categories => "/admin/categories".to_string(),
            Route::Users => "/admin/users".to_string(),
        }
    }

    /// Resolves a path. `/` and unknown paths fall back to the dashboard.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["login"] => Route::Login,
            ["admin", "doctors"] => Route::Doctors,
            ["admin", "doctors", id] => Route::DoctorDetails(DoctorId::new(*id)),
            ["admin", "pharmacies"] => Route::Pharmacies,
            ["admin", "categories"] => Route::Categories,
            ["admin", "users"] => Route::Users,
            _ => Route::Dashboard,
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What a view should do for the current session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Loading,
    Render,
    Redirect(Route),
}

pub fn gate(route: &Route, state: &AuthState) -> Gate {
    match (state, route.is_protected()) {
        (AuthState::Unresolved, _) => Gate::Loading,
        (AuthState::Authenticated(_), true) => Gate::Render,
        (AuthState::Authenticated(_), false) => Gate::Redirect(Route::Dashboard),
        (AuthState::Unauthenticated, true) => Gate::Redirect(Route::Login),
        (AuthState::Unauthenticated, false) => Gate::Render,
    }
}

/// Moves the user to another route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
