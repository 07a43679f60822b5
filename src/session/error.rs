/// Errors surfaced by [`SessionManager`](super::SessionManager).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Interactive login or silent token acquisition failed.
    #[error("Identity provider error: {0}")]
    Provider(#[from] crate::error::Error),

    /// Another `login()` has not finished yet.
    #[error("Login already in progress")]
    LoginInProgress,

    /// The session record could not be encoded for storage.
    #[error("Session store error: {0}")]
    Store(#[from] serde_json::Error),
}

impl SessionError {
    /// Whether the user backed out of the prompt (as opposed to a failure).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Provider(crate::error::Error::Cancelled { .. }))
    }
}
