use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// Response envelope used by every backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default = "none")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, turning `success: false` into an error.
    ///
    /// # Errors
    ///
    /// [`ApiError::Rejected`] when the backend reported failure.
    pub fn into_data(self) -> Result<Option<T>, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected {
                message: self.message,
                errors: self.errors,
            });
        }
        Ok(self.data)
    }

    /// Like [`into_data`](Self::into_data) but a missing payload is an error.
    ///
    /// # Errors
    ///
    /// [`ApiError::Rejected`] or [`ApiError::MissingData`].
    pub fn into_required(self) -> Result<T, ApiError> {
        self.into_data()?.ok_or(ApiError::MissingData)
    }
}
