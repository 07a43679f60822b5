//! REST access to the point-of-sale backend.

mod client;
mod envelope;
mod error;

pub use client::ApiClient;
pub use envelope::ApiResponse;
pub use error::ApiError;
