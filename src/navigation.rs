use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

/// Login view path.
pub const LOGIN_PATH: &str = "/login";
/// Landing view path.
pub const HOME_PATH: &str = "/";

/// A navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Add a history entry.
    Push(String),
    /// Replace the current history entry, so "back" skips it.
    Replace(String),
    /// Full page load. All in-memory application state is discarded.
    Load(String),
}

impl Navigation {
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Push(path) | Self::Replace(path) | Self::Load(path) => path,
        }
    }

    #[must_use]
    pub fn replace_to_login() -> Self {
        Self::Replace(LOGIN_PATH.to_owned())
    }
}

/// Performs navigation on behalf of guards, views and the REST client.
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, to: Navigation);
}

/// In-memory history stack.
#[derive(Debug)]
pub struct History {
    entries: RwLock<Vec<String>>,
    page_loads: AtomicUsize,
}

impl History {
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: RwLock::new(vec![initial.into()]),
            page_loads: AtomicUsize::new(1),
        }
    }

    #[must_use]
    pub fn current(&self) -> String {
        self.entries.read().last().cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Number of full page loads, including the initial one.
    #[must_use]
    pub fn page_loads(&self) -> usize {
        self.page_loads.load(Ordering::SeqCst)
    }

    /// Go back one entry. Returns the new current path, or `None` when
    /// already at the first entry.
    pub fn back(&self) -> Option<String> {
        let mut entries = self.entries.write();
        if entries.len() < 2 {
            return None;
        }
        entries.pop();
        entries.last().cloned()
    }
}

impl Navigator for History {
    fn navigate(&self, to: Navigation) {
        tracing::debug!(path = to.path(), "navigate");
        let mut entries = self.entries.write();
        match to {
            Navigation::Push(path) => entries.push(path),
            Navigation::Replace(path) => match entries.last_mut() {
                Some(last) => *last = path,
                None => entries.push(path),
            },
            Navigation::Load(path) => {
                self.page_loads.fetch_add(1, Ordering::SeqCst);
                entries.push(path);
            }
        }
    }
}
