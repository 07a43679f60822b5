//! Typed wrappers over backend resources.

mod locales;

pub use locales::{LocalRepository, LocalService};
