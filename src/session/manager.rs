use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use super::error::SessionError;
use super::store::{self, SessionStore};
use crate::provider::IdentityProvider;
use crate::types::{AccessToken, Identity};

/// Coarse session state as seen by views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Point-in-time view of the session.
///
/// Authentication is derived from the identity alone, so the two can never
/// disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    identity: Option<Identity>,
    is_loading: bool,
}

impl SessionSnapshot {
    fn resolving() -> Self {
        Self {
            identity: None,
            is_loading: true,
        }
    }

    fn settled(identity: Option<Identity>) -> Self {
        Self {
            identity,
            is_loading: false,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.is_loading {
            SessionState::Loading
        } else if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }
}

/// Owns "who is logged in" for one application instance.
///
/// Mediates between the [`IdentityProvider`] and the tab's
/// [`SessionStore`]. The store is read once by [`resolve`](Self::resolve)
/// and written on every transition after that.
///
/// ```rust,ignore
/// let session = Arc::new(SessionManager::new(provider, store.clone()));
/// session.resolve();
/// let mut changes = session.subscribe();
/// session.login().await?;
/// ```
pub struct SessionManager<P> {
    provider: P,
    store: Arc<dyn SessionStore>,
    state: watch::Sender<SessionSnapshot>,
    resolved: AtomicBool,
    login_in_flight: AtomicBool,
}

impl<P: IdentityProvider> SessionManager<P> {
    #[must_use]
    pub fn new(provider: P, store: Arc<dyn SessionStore>) -> Self {
        Self {
            provider,
            store,
            state: watch::Sender::new(SessionSnapshot::resolving()),
            resolved: AtomicBool::new(false),
            login_in_flight: AtomicBool::new(false),
        }
    }

    /// The identity provider sessions are opened with.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Current session state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified on every session transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Signed-in user, if any.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// `true` until startup resolution settles and while a login runs.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Settle the startup `Loading` state.
    ///
    /// A provider account wins over the stored record. A stored record that
    /// does not parse is discarded. Only the first call does any work.
    pub fn resolve(&self) -> SessionState {
        if self.resolved.swap(true, Ordering::SeqCst) {
            return self.snapshot().state();
        }

        let identity = match self.provider.accounts().into_iter().next() {
            Some(account) => {
                let identity = Identity::from(&account);
                if let Err(e) = store::write_identity(self.store.as_ref(), &identity) {
                    tracing::error!(error = %e, "Failed to persist provider account");
                }
                tracing::debug!("session restored from identity provider account");
                Some(identity)
            }
            None => match store::read_identity(self.store.as_ref()) {
                Ok(Some(identity)) => {
                    tracing::debug!("session restored from session store");
                    Some(identity)
                }
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable stored session");
                    store::clear_record(self.store.as_ref());
                    None
                }
            },
        };

        self.state.send_replace(SessionSnapshot::settled(identity));
        self.snapshot().state()
    }

    /// Interactive login followed by a silent token request for the same
    /// account.
    ///
    /// On success the identity and token are stored together. On failure
    /// the session ends up signed out and the error is returned to the
    /// caller. A second call while one is running fails with
    /// [`SessionError::LoginInProgress`] without touching the session.
    ///
    /// # Errors
    ///
    /// [`SessionError::Provider`] when the prompt is cancelled or a token
    /// cannot be obtained.
    pub async fn login(&self) -> Result<Identity, SessionError> {
        let _flight = LoginFlight::begin(&self.login_in_flight, &self.state)
            .ok_or(SessionError::LoginInProgress)?;

        self.state.send_modify(|s| s.is_loading = true);

        let outcome = match self.sign_in().await {
            Ok((identity, token)) => {
                store::write_record(self.store.as_ref(), &identity, token.as_str())
                    .map(|()| identity)
                    .map_err(SessionError::from)
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(identity) => {
                self.state
                    .send_replace(SessionSnapshot::settled(Some(identity.clone())));
                tracing::info!("login successful");
                Ok(identity)
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                store::clear_record(self.store.as_ref());
                self.state.send_replace(SessionSnapshot::settled(None));
                Err(e)
            }
        }
    }

    async fn sign_in(&self) -> Result<(Identity, AccessToken), SessionError> {
        let account = self.provider.login().await?;
        let token = self.provider.acquire_token_silent(&account).await?;
        Ok((Identity::from(&account), token))
    }

    /// Sign out.
    ///
    /// Local state is cleared before this returns; the returned future only
    /// performs the provider-side logout, which may navigate on its own.
    /// Provider failures are logged.
    pub fn logout(&self) -> impl Future<Output = ()> + Send + '_ {
        store::clear_record(self.store.as_ref());
        self.state.send_replace(SessionSnapshot::settled(None));
        tracing::info!("signed out");

        async move {
            if let Err(e) = self.provider.logout().await {
                tracing::warn!(error = %e, "Identity provider logout failed");
            }
        }
    }
}

/// Marks a login as running; clears the marker and any leftover loading
/// flag when dropped, including when the login future is dropped early.
struct LoginFlight<'a> {
    in_flight: &'a AtomicBool,
    state: &'a watch::Sender<SessionSnapshot>,
}

impl<'a> LoginFlight<'a> {
    fn begin(in_flight: &'a AtomicBool, state: &'a watch::Sender<SessionSnapshot>) -> Option<Self> {
        in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { in_flight, state })
    }
}

impl Drop for LoginFlight<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| std::mem::replace(&mut s.is_loading, false));
        self.in_flight.store(false, Ordering::SeqCst);
    }
}
