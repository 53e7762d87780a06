use leptos::prelude::*;
use leptos_router::NavigateOptions;

mod dashboard;
mod login;
mod protected;
mod register;
mod unauthorized;

pub(crate) use dashboard::DashboardPage;
pub(crate) use login::LoginPage;
pub(crate) use protected::Protected;
pub(crate) use register::RegisterPage;
pub(crate) use unauthorized::UnauthorizedPage;

/// Shown for authentication failures; the backend's reason is only logged.
pub(crate) const LOGIN_FAILED: &str = "Invalid email or password";
/// Shown for any other failed request.
pub(crate) const OPERATION_FAILED: &str = "Operation failed. Please try again.";

/// Navigate through a page-owned navigator. Returns `false` (and does nothing)
/// once the page has been torn down, e.g. from a late response or timer.
pub(crate) fn navigate_if_mounted<F>(navigate: StoredValue<F>, path: &str) -> bool
where
    F: Fn(&str, NavigateOptions) + Send + Sync + 'static,
{
    navigate
        .try_with_value(|nav| nav(path, NavigateOptions::default()))
        .is_some()
}
