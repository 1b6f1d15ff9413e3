//! Dismissible user notifications shared by every manager.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Default)]
struct Queue {
    next_id: u64,
    items: Vec<Notice>,
}

/// Cloneable handle to one notification queue.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    inner: Arc<Mutex<Queue>>,
}

impl Notices {
    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a notice and return its id.
    pub fn push(&self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        let mut queue = self.lock();
        queue.next_id += 1;
        let id = queue.next_id;
        queue.items.push(Notice { id, level, message: message.into() });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Success, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Error, message)
    }

    /// Remove one notice. `false` if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut queue = self.lock();
        let before = queue.items.len();
        queue.items.retain(|n| n.id != id);
        queue.items.len() != before
    }

    #[must_use]
    pub fn current(&self) -> Vec<Notice> {
        self.lock().items.clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<Notice> {
        self.lock().items.last().cloned()
    }

    /// Take every pending notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut self.lock().items)
    }
}

#[cfg(test)]
#[path = "notice_test.rs"]
mod tests;
