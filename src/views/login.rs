use std::sync::Arc;

use crate::navigation::{HOME_PATH, Navigation, Navigator};
use crate::provider::IdentityProvider;
use crate::session::{SessionError, SessionManager};

/// Alert shown when the login button does not get the user in.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct LoginAlert {
    pub message: &'static str,
    #[source]
    pub error: SessionError,
}

impl From<SessionError> for LoginAlert {
    fn from(error: SessionError) -> Self {
        let message = if error.is_cancelled() {
            "Sign-in was cancelled."
        } else {
            "Sign-in failed. Please try again."
        };
        Self { message, error }
    }
}

/// The public `/login` page.
pub struct LoginView<P> {
    session: Arc<SessionManager<P>>,
    navigator: Arc<dyn Navigator>,
}

impl<P: IdentityProvider> LoginView<P> {
    #[must_use]
    pub fn new(session: Arc<SessionManager<P>>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Send an already signed-in user home. Returns whether it navigated.
    pub fn on_mount(&self) -> bool {
        if self.session.is_authenticated() {
            self.navigator
                .navigate(Navigation::Replace(HOME_PATH.to_owned()));
            return true;
        }
        false
    }

    /// Login button handler.
    ///
    /// Clicks while a login is running are ignored. On success the login
    /// page is replaced by the dashboard.
    ///
    /// # Errors
    ///
    /// [`LoginAlert`] when the prompt was cancelled or sign-in failed.
    pub async fn submit(&self) -> Result<(), LoginAlert> {
        if self.session.is_loading() {
            tracing::debug!("login click ignored while loading");
            return Ok(());
        }

        match self.session.login().await {
            Ok(_) => {
                self.navigator
                    .navigate(Navigation::Replace(HOME_PATH.to_owned()));
                Ok(())
            }
            Err(SessionError::LoginInProgress) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    #[must_use]
    pub fn button_disabled(&self) -> bool {
        self.session.is_loading()
    }

    #[must_use]
    pub fn button_label(&self) -> &'static str {
        if self.session.is_loading() {
            "Signing in..."
        } else {
            "Sign in with Microsoft"
        }
    }
}
