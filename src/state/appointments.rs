//! Patient appointments: list own appointments, cancel one.

use super::{Notices, ResourceState};
use crate::http::{ApiClient, ApiError};
use crate::messages;
use crate::services::appointments::{self, Appointment};
use crate::services::auth;

pub struct AppointmentsManager {
    api: ApiClient,
    notices: Notices,
    pub state: ResourceState<Appointment>,
}

impl AppointmentsManager {
    #[must_use]
    pub fn new(api: ApiClient, notices: Notices) -> Self {
        Self { api, notices, state: ResourceState::default() }
    }

    #[must_use]
    pub fn items(&self) -> &[Appointment] {
        &self.state.items
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// Appointments still `ACTIVA`.
    #[must_use]
    pub fn active(&self) -> Vec<&Appointment> {
        appointments::active(&self.state.items)
    }

    /// Load the logged-in user's appointments, soonest first. The user id
    /// comes from `/auth/me`, not from the stored session.
    pub async fn load(&mut self) -> bool {
        let ticket = self.state.begin();
        let result = self.fetch().await.map_err(|e| {
            tracing::warn!(error = %e, "appointments load failed");
            e.user_message(messages::APPOINTMENTS_LOAD_ERROR)
        });
        let ok = result.is_ok();
        self.state.finish(ticket, result) && ok
    }

    async fn fetch(&self) -> Result<Vec<Appointment>, ApiError> {
        if self.api.session().token().is_none() {
            return Err(ApiError::MissingSession);
        }
        let me = auth::current_user(&self.api).await?;
        let mut items = appointments::list_by_user(&self.api, me.id_usuario).await?;
        appointments::sort_by_date(&mut items);
        Ok(items)
    }

    /// Cancel and reload. Confirmation is the caller's job.
    pub async fn cancel(&mut self, id: i64) -> bool {
        match appointments::cancel(&self.api, id).await {
            Ok(()) => {
                tracing::info!(id, "appointment cancelled");
                self.notices.success(messages::APPOINTMENT_CANCELLED);
                self.load().await;
                true
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "cancel failed");
                self.notices.error(e.user_message(messages::APPOINTMENT_CANCEL_ERROR));
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "appointments_test.rs"]
mod tests;
