//! Appointments service (`/citas`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::{ApiClient, ApiError, Body, Method};

pub const APPOINTMENTS_PATH: &str = "/citas";
pub const ACTIVE_STATUS: &str = "ACTIVA";

/// An appointment as the backend reports it. Listing endpoints and the
/// create endpoint disagree on field names, so the date/time fields accept
/// both spellings and the doctor may be a name or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id_cita: i64,
    #[serde(default)]
    pub estado: String,
    #[serde(default, alias = "fechaCita")]
    pub fecha: Option<String>,
    #[serde(default, alias = "horaCita")]
    pub hora: Option<String>,
    #[serde(default)]
    pub doctor: Option<Value>,
    #[serde(default)]
    pub especialidad: Option<String>,
    #[serde(default)]
    pub paciente: Option<String>,
    #[serde(default, alias = "motivo")]
    pub descripcion: Option<String>,
}

impl Appointment {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.estado == ACTIVE_STATUS
    }

    /// Doctor display name, whether sent as a string or as `{nombre}`.
    #[must_use]
    pub fn doctor_name(&self) -> Option<&str> {
        match self.doctor.as_ref()? {
            Value::String(name) => Some(name),
            Value::Object(map) => map.get("nombre").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Booking payload for `POST /citas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub doctor_id: i64,
    /// `YYYY-MM-DDTHH:MM:SS`
    pub date: String,
    pub description: String,
}

fn item_path(id: i64) -> String {
    format!("{APPOINTMENTS_PATH}/{id}")
}

/// # Errors
///
/// Returns the API error.
pub async fn list(api: &ApiClient) -> Result<Vec<Appointment>, ApiError> {
    api.get_list(APPOINTMENTS_PATH).await
}

/// # Errors
///
/// Returns the API error.
pub async fn list_by_user(api: &ApiClient, user_id: i64) -> Result<Vec<Appointment>, ApiError> {
    api.get_list(&format!("{APPOINTMENTS_PATH}/usuario/{user_id}")).await
}

/// # Errors
///
/// Returns the API error.
pub async fn get(api: &ApiClient, id: i64) -> Result<Appointment, ApiError> {
    api.get(&item_path(id)).await
}

/// # Errors
///
/// Returns the API error, including the server's conflict statuses.
pub async fn create(api: &ApiClient, request: &BookingRequest) -> Result<Appointment, ApiError> {
    api.post(APPOINTMENTS_PATH, request).await
}

/// # Errors
///
/// Returns the API error.
pub async fn cancel(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    api.send(Method::Put, &format!("{}/cancelar", item_path(id)), Body::Empty)
        .await
        .map(|_| ())
}

/// Appointments with status `ACTIVA`.
#[must_use]
pub fn active(appointments: &[Appointment]) -> Vec<&Appointment> {
    appointments.iter().filter(|a| a.is_active()).collect()
}

/// Sort by date then time, ascending. Undated entries go last.
pub fn sort_by_date(appointments: &mut [Appointment]) {
    appointments.sort_by_cached_key(|a| (a.fecha.is_none(), a.fecha.clone(), a.hora.clone()));
}

#[cfg(test)]
#[path = "appointments_test.rs"]
mod tests;
