//! Stateful data managers over the services.
//!
//! DESIGN
//! ======
//! Each manager owns a clone of the `ApiClient`, a handle to the shared
//! [`Notices`] queue, and the load/error/loading state of one resource.
//! Managers never return service errors to the caller: a failure becomes
//! an error string on the manager plus an error notice, and the operation
//! reports `false`.
//!
//! Every fetch takes a [`FetchTicket`] from its [`ResourceState`]. A result
//! is applied only if its ticket is still the latest one issued, so a slow
//! response can never overwrite a newer one.

pub mod appointments;
pub mod auth;
pub mod crud;
pub mod dashboard;
pub mod notice;

pub use appointments::AppointmentsManager;
pub use auth::AuthManager;
pub use crud::{CrudManager, DoctorsManager, SchedulesManager, SpecialtiesManager};
pub use dashboard::DashboardSummary;
pub use notice::{Notice, NoticeLevel, Notices};

/// Identifies one fetch of a [`ResourceState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Items plus loading/error flags for one resource list.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self { items: Vec::new(), loading: false, error: None, generation: 0 }
    }
}

impl<T> ResourceState<T> {
    /// Start a fetch. Any ticket issued earlier becomes stale.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        FetchTicket(self.generation)
    }

    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Apply a fetch result. Returns `false`, leaving state untouched, when
    /// `ticket` is stale. A failed fetch empties the list.
    pub fn finish(&mut self, ticket: FetchTicket, result: Result<Vec<T>, String>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, latest = self.generation, "discarding stale fetch result");
            return false;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(message) => {
                self.items.clear();
                self.error = Some(message);
            }
        }
        true
    }

    /// Drop items and invalidate any fetch in flight.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.items.clear();
        self.loading = false;
        self.error = None;
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
