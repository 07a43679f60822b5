//! Access gate in front of protected views.

use crate::navigation::Navigation;
use crate::session::SessionSnapshot;

/// What to show for a protected view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving: show only a neutral loading indicator.
    Loading,
    /// Not signed in: go to the login view, replacing the current entry.
    Redirect(Navigation),
    /// Render the requested view unchanged.
    Render,
}

/// Decide from the session's `(is_authenticated, is_loading)` pair.
///
/// Loading always wins, so a transient state never redirects.
#[must_use]
pub fn decide(is_authenticated: bool, is_loading: bool) -> GuardDecision {
    if is_loading {
        GuardDecision::Loading
    } else if !is_authenticated {
        GuardDecision::Redirect(Navigation::replace_to_login())
    } else {
        GuardDecision::Render
    }
}

#[must_use]
pub fn decide_for(snapshot: &SessionSnapshot) -> GuardDecision {
    decide(snapshot.is_authenticated(), snapshot.is_loading())
}
