//! Authentication session lifecycle.
//!
//! [`SessionManager`] is the single source of truth for who is signed in.
//! It starts in `Loading`, settles once via [`SessionManager::resolve`], and
//! moves between `Authenticated` and `Unauthenticated` through `login` and
//! `logout`. The [`SessionStore`] mirrors the session so it survives a page
//! reload within the same tab.

mod error;
mod manager;
pub mod store;

pub use error::SessionError;
pub use manager::{SessionManager, SessionSnapshot, SessionState};
pub use store::{MemorySessionStore, SessionStore};
