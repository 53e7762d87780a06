//! Route admission and role-gated affordances.
//!
//! Nothing here is cached: callers evaluate against the current session
//! snapshot on every navigation (or, in the view layer, reactively).

use crate::session::{Role, SessionSnapshot};
use std::collections::HashSet;

pub const ENTRY_PATH: &str = "/";
pub const REGISTER_PATH: &str = "/register";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Pages where the navbar hides session controls.
pub fn is_auth_page(path: &str) -> bool {
    path == ENTRY_PATH || path == REGISTER_PATH
}

/// Set of roles allowed through. Empty means any authenticated user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    roles: HashSet<Role>,
}

impl Capabilities {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    pub fn admin() -> Self {
        Self::roles([Role::Admin])
    }

    pub fn is_unrestricted(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn permits(&self, role: Option<&Role>) -> bool {
        self.is_unrestricted() || role.is_some_and(|r| self.roles.contains(r))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Admitted,
    RedirectUnauthenticated,
    RedirectForbidden,
}

impl GuardOutcome {
    pub fn redirect_path(self) -> Option<&'static str> {
        match self {
            Self::Admitted => None,
            Self::RedirectUnauthenticated => Some(ENTRY_PATH),
            Self::RedirectForbidden => Some(UNAUTHORIZED_PATH),
        }
    }
}

/// A missing token wins over any capability check.
pub fn evaluate(required: &Capabilities, token: Option<&str>, role: Option<&Role>) -> GuardOutcome {
    if token.is_none() {
        return GuardOutcome::RedirectUnauthenticated;
    }
    if !required.permits(role) {
        return GuardOutcome::RedirectForbidden;
    }
    GuardOutcome::Admitted
}

pub fn evaluate_session(required: &Capabilities, session: &SessionSnapshot) -> GuardOutcome {
    evaluate(required, session.token(), session.role())
}

/// Controls the dashboard only renders for sufficiently privileged sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Affordance {
    CreateFolder,
    DeleteFolder,
    UploadNote,
    DeleteNote,
}

impl Affordance {
    pub fn required(self) -> Capabilities {
        match self {
            Self::CreateFolder | Self::DeleteFolder | Self::UploadNote | Self::DeleteNote => {
                Capabilities::admin()
            }
        }
    }
}

pub fn allows(session: &SessionSnapshot, affordance: Affordance) -> bool {
    evaluate_session(&affordance.required(), session) == GuardOutcome::Admitted
}
