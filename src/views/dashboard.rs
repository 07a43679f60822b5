use std::future::Future;
use std::sync::Arc;

use crate::provider::IdentityProvider;
use crate::session::SessionManager;
use crate::types::DEFAULT_DISPLAY_NAME;

/// Landing page at `/` plus the sidebar's user block.
pub struct DashboardView<P> {
    session: Arc<SessionManager<P>>,
}

impl<P: IdentityProvider> DashboardView<P> {
    #[must_use]
    pub fn new(session: Arc<SessionManager<P>>) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        self.session
            .identity()
            .map_or_else(|| DEFAULT_DISPLAY_NAME.to_owned(), |i| i.name)
    }

    #[must_use]
    pub fn email(&self) -> Option<String> {
        self.session.identity().map(|i| i.email)
    }

    #[must_use]
    pub fn greeting(&self) -> String {
        format!("Welcome, {}!", self.display_name())
    }

    /// Avatar letter: first character of the display name.
    #[must_use]
    pub fn initial(&self) -> char {
        self.display_name()
            .chars()
            .next()
            .map_or('U', |c| c.to_ascii_uppercase())
    }

    /// Logout button. Local sign-out has happened by the time this returns.
    pub fn logout(&self) -> impl Future<Output = ()> + Send + '_ {
        self.session.logout()
    }
}
