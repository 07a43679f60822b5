//! Headless controllers behind the console's pages.
//!
//! Each controller owns the state a page renders and the actions it
//! triggers; rendering itself is left to the embedding UI.

mod branches;
mod dashboard;
mod login;

pub use branches::{
    BranchForm, BranchFormErrors, BranchStats, BranchesView, SaveError, filter_locales,
};
pub use dashboard::DashboardView;
pub use login::{LoginAlert, LoginView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Transient message shown after an action (snackbar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}
