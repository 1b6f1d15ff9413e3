//! Navigation seam.
//!
//! A browser UI would read `window.location` and write history. Here the
//! guard, the HTTP layer and the managers take a [`Navigator`] instead.

use std::sync::{Mutex, PoisonError};

use crate::routes::ROOT_ROUTE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMode {
    /// New history entry.
    Push,
    /// Replace the current entry; no back-navigation to it.
    Replace,
    /// Full navigation that drops all in-memory view state.
    Reload,
}

pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, to: &str, mode: NavMode);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub path: String,
    pub mode: NavMode,
}

/// In-memory history stack.
#[derive(Debug)]
pub struct MemoryNavigator {
    history: Mutex<Vec<NavEntry>>,
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::at(ROOT_ROUTE)
    }
}

impl MemoryNavigator {
    #[must_use]
    pub fn at(path: &str) -> Self {
        let entry = NavEntry { path: path.to_string(), mode: NavMode::Push };
        Self { history: Mutex::new(vec![entry]) }
    }

    /// Every navigation so far, the starting location first.
    #[must_use]
    pub fn history(&self) -> Vec<NavEntry> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Go back one entry. `Replace` entries overwrote their predecessor, so
    /// they are never revisited.
    pub fn back(&self) -> Option<String> {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        if history.len() < 2 {
            return None;
        }
        history.pop();
        history.last().map(|e| e.path.clone())
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map_or_else(|| ROOT_ROUTE.to_string(), |e| e.path.clone())
    }

    fn navigate(&self, to: &str, mode: NavMode) {
        tracing::debug!(to, ?mode, "navigate");
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = NavEntry { path: to.to_string(), mode };
        match mode {
            NavMode::Push => history.push(entry),
            NavMode::Replace => {
                history.pop();
                history.push(entry);
            }
            NavMode::Reload => {
                history.clear();
                history.push(entry);
            }
        }
    }
}

#[cfg(test)]
#[path = "nav_test.rs"]
mod tests;
