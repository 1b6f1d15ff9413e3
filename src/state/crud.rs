//! Admin CRUD managers (specialties, doctors, schedules).
//!
//! The three admin screens share one lifecycle: load the list, save a draft
//! (create or update), delete by id, and reload after every successful
//! mutation. [`CrudResource`] binds a service module and its texts to that
//! lifecycle.

use std::marker::PhantomData;

use super::{Notices, ResourceState};
use crate::http::{ApiClient, ApiError};
use crate::messages;
use crate::services::doctors::{self, Doctor, DoctorDraft};
use crate::services::schedules::{self, Schedule, ScheduleDraft};
use crate::services::specialties::{self, Specialty, SpecialtyDraft};

#[async_trait::async_trait]
pub trait CrudResource: Send + Sync + 'static {
    type Item: Clone + Send + Sync;
    type Draft: Send + Sync;

    /// Resource name for logs.
    const NAME: &'static str;
    const CREATED: &'static str;
    const UPDATED: &'static str;
    const DELETED: &'static str;
    const SAVE_ERROR: &'static str;
    const DELETE_ERROR: &'static str;

    async fn list(api: &ApiClient) -> Result<Vec<Self::Item>, ApiError>;
    async fn save(api: &ApiClient, id: Option<i64>, draft: &Self::Draft) -> Result<(), ApiError>;
    async fn delete(api: &ApiClient, id: i64) -> Result<(), ApiError>;
}

pub struct CrudManager<R: CrudResource> {
    api: ApiClient,
    notices: Notices,
    pub state: ResourceState<R::Item>,
    _resource: PhantomData<R>,
}

impl<R: CrudResource> CrudManager<R> {
    #[must_use]
    pub fn new(api: ApiClient, notices: Notices) -> Self {
        Self { api, notices, state: ResourceState::default(), _resource: PhantomData }
    }

    #[must_use]
    pub fn items(&self) -> &[R::Item] {
        &self.state.items
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// Fetch the list. Returns `false` on failure or when superseded.
    pub async fn load(&mut self) -> bool {
        let ticket = self.state.begin();
        let result = R::list(&self.api).await.map_err(|e| {
            tracing::warn!(resource = R::NAME, error = %e, "load failed");
            let message = e.user_message(messages::FETCH_ERROR);
            self.notices.error(message.clone());
            message
        });
        let ok = result.is_ok();
        self.state.finish(ticket, result) && ok
    }

    /// Create (`id == None`) or update, then reload.
    pub async fn save(&mut self, id: Option<i64>, draft: &R::Draft) -> bool {
        match R::save(&self.api, id, draft).await {
            Ok(()) => {
                tracing::info!(resource = R::NAME, ?id, "saved");
                self.notices.success(if id.is_some() { R::UPDATED } else { R::CREATED });
                self.load().await;
                true
            }
            Err(e) => {
                self.fail("save", &e, R::SAVE_ERROR);
                false
            }
        }
    }

    pub async fn delete(&mut self, id: i64) -> bool {
        match R::delete(&self.api, id).await {
            Ok(()) => {
                tracing::info!(resource = R::NAME, id, "deleted");
                self.notices.success(R::DELETED);
                self.load().await;
                true
            }
            Err(e) => {
                self.fail("delete", &e, R::DELETE_ERROR);
                false
            }
        }
    }

    fn fail(&mut self, op: &'static str, err: &ApiError, fallback: &str) {
        tracing::warn!(resource = R::NAME, op, error = %err, "mutation failed");
        let message = err.user_message(fallback);
        self.state.error = Some(message.clone());
        self.notices.error(message);
    }
}

// =============================================================================
// RESOURCES
// =============================================================================

pub struct SpecialtyResource;
pub struct DoctorResource;
pub struct ScheduleResource;

pub type SpecialtiesManager = CrudManager<SpecialtyResource>;
pub type DoctorsManager = CrudManager<DoctorResource>;
pub type SchedulesManager = CrudManager<ScheduleResource>;

#[async_trait::async_trait]
impl CrudResource for SpecialtyResource {
    type Item = Specialty;
    type Draft = SpecialtyDraft;

    const NAME: &'static str = "specialty";
    const CREATED: &'static str = messages::SPECIALTY_CREATED;
    const UPDATED: &'static str = messages::SPECIALTY_UPDATED;
    const DELETED: &'static str = messages::SPECIALTY_DELETED;
    const SAVE_ERROR: &'static str = messages::SPECIALTY_SAVE_ERROR;
    const DELETE_ERROR: &'static str = messages::SPECIALTY_DELETE_ERROR;

    async fn list(api: &ApiClient) -> Result<Vec<Specialty>, ApiError> {
        specialties::list(api).await
    }

    async fn save(api: &ApiClient, id: Option<i64>, draft: &SpecialtyDraft) -> Result<(), ApiError> {
        specialties::save(api, id, draft).await
    }

    async fn delete(api: &ApiClient, id: i64) -> Result<(), ApiError> {
        specialties::delete(api, id).await
    }
}

#[async_trait::async_trait]
impl CrudResource for DoctorResource {
    type Item = Doctor;
    type Draft = DoctorDraft;

    const NAME: &'static str = "doctor";
    const CREATED: &'static str = messages::DOCTOR_CREATED;
    const UPDATED: &'static str = messages::DOCTOR_UPDATED;
    const DELETED: &'static str = messages::DOCTOR_DELETED;
    const SAVE_ERROR: &'static str = messages::DOCTOR_SAVE_ERROR;
    const DELETE_ERROR: &'static str = messages::DOCTOR_DELETE_ERROR;

    async fn list(api: &ApiClient) -> Result<Vec<Doctor>, ApiError> {
        doctors::list(api).await
    }

    async fn save(api: &ApiClient, id: Option<i64>, draft: &DoctorDraft) -> Result<(), ApiError> {
        doctors::save(api, id, draft).await
    }

    async fn delete(api: &ApiClient, id: i64) -> Result<(), ApiError> {
        doctors::delete(api, id).await
    }
}

#[async_trait::async_trait]
impl CrudResource for ScheduleResource {
    type Item = Schedule;
    type Draft = ScheduleDraft;

    const NAME: &'static str = "schedule";
    const CREATED: &'static str = messages::SCHEDULE_CREATED;
    const UPDATED: &'static str = messages::SCHEDULE_UPDATED;
    const DELETED: &'static str = messages::SCHEDULE_DELETED;
    const SAVE_ERROR: &'static str = messages::SCHEDULE_SAVE_ERROR;
    const DELETE_ERROR: &'static str = messages::SCHEDULE_DELETE_ERROR;

    async fn list(api: &ApiClient) -> Result<Vec<Schedule>, ApiError> {
        schedules::list(api).await
    }

    async fn save(api: &ApiClient, id: Option<i64>, draft: &ScheduleDraft) -> Result<(), ApiError> {
        schedules::save(api, id, draft).await
    }

    async fn delete(api: &ApiClient, id: i64) -> Result<(), ApiError> {
        schedules::delete(api, id).await
    }
}

#[cfg(test)]
#[path = "crud_test.rs"]
mod tests;
