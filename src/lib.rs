#![doc = include_str!("../README.md")]

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod navigation;
#[cfg(feature = "azure")]
pub mod pkce;
pub mod provider;
pub mod routes;
pub mod services;
pub mod session;
pub mod types;
pub mod views;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use api::{ApiClient, ApiError, ApiResponse};
pub use config::{ApiConfig, AppConfig};
pub use error::Error;
pub use guard::GuardDecision;
pub use models::{Local, LocalCreateDto, LocalUpdateDto};
pub use navigation::{History, Navigation, Navigator};
pub use provider::{IdentityProvider, InteractivePrompt};
#[cfg(feature = "azure")]
pub use provider::{AzureAdConfig, AzureAdProvider};
pub use routes::{Resolution, Route};
pub use services::{LocalRepository, LocalService};
pub use session::{
    MemorySessionStore, SessionError, SessionManager, SessionSnapshot, SessionState, SessionStore,
};
pub use types::{AccessToken, Account, AccountId, Identity, LocalId};
