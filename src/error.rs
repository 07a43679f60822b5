/// Errors raised by the identity-provider layer and configuration loading.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("OAuth2 error during {operation} (status {status:?}): {detail}")]
    OAuth {
        operation: &'static str,
        status: Option<u16>,
        detail: String,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Token error: {0}")]
    Token(String),
    /// The user closed or denied the interactive prompt.
    #[error("Login cancelled ({code}): {detail}")]
    Cancelled { code: String, detail: String },
    #[error("OAuth state mismatch")]
    StateMismatch,
    /// No usable cached credentials; an interactive login is needed.
    #[error("Interaction required")]
    InteractionRequired,
    #[error("Unknown account: {0}")]
    UnknownAccount(String),
}
