/// Errors returned by [`ApiClient`](super::ApiClient) and the resource services.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 401. The session record has already been cleared and the app sent
    /// to the login view.
    #[error("Not authenticated")]
    Unauthorized,

    /// 403.
    #[error("Permission denied: {detail}")]
    Forbidden { detail: String },

    /// 500.
    #[error("Server error: {detail}")]
    Server { detail: String },

    /// Any other non-success status.
    #[error("Request failed with status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Envelope reported `success: false`.
    #[error("Request rejected: {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        message: Option<String>,
        errors: Vec<String>,
    },

    /// Envelope succeeded but carried no `data`.
    #[error("Response carried no data")]
    MissingData,
}

impl ApiError {
    /// HTTP status behind this error, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Server { .. } => Some(500),
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::Rejected { .. } | Self::MissingData => None,
        }
    }
}
