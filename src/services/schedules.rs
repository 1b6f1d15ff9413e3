//! Schedules service — doctor time slots (`/horarios`).

use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::http::{ApiClient, ApiError, Method, json_body};
use crate::validate::{self, ValidationError};

pub const SCHEDULES_PATH: &str = "/horarios";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRef {
    pub id_doctor: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id_horario: i64,
    pub fecha: String,
    pub hora_inicio: String,
    pub hora_fin: String,
    #[serde(default)]
    pub turno: Option<String>,
    #[serde(default)]
    pub disponible: bool,
    #[serde(default)]
    pub doctor: Option<DoctorRef>,
}

impl Schedule {
    #[must_use]
    pub fn date(&self) -> Option<Date> {
        validate::parse_date(&self.fecha).ok()
    }

    #[must_use]
    pub fn start(&self) -> Option<Time> {
        validate::parse_time(&self.hora_inicio).ok()
    }

    #[must_use]
    pub fn doctor_id(&self) -> Option<i64> {
        self.doctor.as_ref().map(|d| d.id_doctor)
    }

    /// `HH:MM - HH:MM` for display.
    #[must_use]
    pub fn time_range(&self) -> String {
        format!("{} - {}", short_time(&self.hora_inicio), short_time(&self.hora_fin))
    }
}

/// Admin form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub fecha: String,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub turno: String,
    pub disponible: bool,
    pub doctor_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SchedulePayload {
    fecha: String,
    hora_inicio: String,
    hora_fin: String,
    turno: String,
    disponible: bool,
    doctor: DoctorRef,
}

impl ScheduleDraft {
    fn payload(&self) -> Result<SchedulePayload, ValidationError> {
        let (date, start, end) = validate::schedule_form(&self.fecha, &self.hora_inicio, &self.hora_fin)?;
        Ok(SchedulePayload {
            fecha: format_date(date),
            hora_inicio: format_time(start),
            hora_fin: format_time(end),
            turno: self.turno.trim().to_string(),
            disponible: self.disponible,
            doctor: DoctorRef { id_doctor: self.doctor_id, nombre: None },
        })
    }
}

// =============================================================================
// WIRE FORMATS
// =============================================================================

/// `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

/// `HH:MM:SS`.
#[must_use]
pub fn format_time(time: Time) -> String {
    format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())
}

fn short_time(raw: &str) -> &str {
    raw.get(..5).unwrap_or(raw)
}

// =============================================================================
// CALLS
// =============================================================================

fn item_path(id: i64) -> String {
    format!("{SCHEDULES_PATH}/{id}")
}

/// # Errors
///
/// Returns the API error.
pub async fn list(api: &ApiClient) -> Result<Vec<Schedule>, ApiError> {
    api.get_list(SCHEDULES_PATH).await
}

/// # Errors
///
/// Returns the API error.
pub async fn get(api: &ApiClient, id: i64) -> Result<Schedule, ApiError> {
    api.get(&item_path(id)).await
}

/// # Errors
///
/// Returns the API error.
pub async fn list_by_doctor(api: &ApiClient, doctor_id: i64) -> Result<Vec<Schedule>, ApiError> {
    api.get_list(&format!("{SCHEDULES_PATH}/doctor/{doctor_id}")).await
}

/// Create (`id == None`) or update a schedule entry.
///
/// # Errors
///
/// Returns a validation error before any request, or the API error.
pub async fn save(api: &ApiClient, id: Option<i64>, draft: &ScheduleDraft) -> Result<(), ApiError> {
    let body = json_body(&draft.payload()?)?;
    match id {
        Some(id) => api.send(Method::Put, &item_path(id), body).await,
        None => api.send(Method::Post, SCHEDULES_PATH, body).await,
    }
    .map(|_| ())
}

/// # Errors
///
/// Returns the API error.
pub async fn delete(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    api.delete(&item_path(id)).await
}

/// Bookable slots of `doctor_id` on `date`, earliest first. Entries that
/// name a different doctor are dropped; entries without a doctor are kept,
/// since they came from that doctor's own listing.
#[must_use]
pub fn available_on(schedules: &[Schedule], doctor_id: i64, date: Date) -> Vec<Schedule> {
    let day = format_date(date);
    let mut slots: Vec<Schedule> = schedules
        .iter()
        .filter(|s| s.disponible && s.fecha == day)
        .filter(|s| s.doctor_id().is_none_or(|id| id == doctor_id))
        .cloned()
        .collect();
    slots.sort_by(|a, b| a.start().cmp(&b.start()));
    slots
}

#[cfg(test)]
#[path = "schedules_test.rs"]
mod tests;
