//! Doctors service. Create and update are always multipart.

use serde::{Deserialize, Serialize};

use super::uploads::ImageInput;
use crate::http::{ApiClient, ApiError, Body, FormPart, ImageKind, Method};
use crate::validate;

pub const DOCTORS_PATH: &str = "/doctores";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id_doctor: i64,
    pub nombre: String,
    #[serde(default)]
    pub especialidad: String,
    #[serde(default)]
    pub cupo_pacientes: Option<u32>,
    #[serde(default)]
    pub imagen: Option<String>,
}

impl Doctor {
    /// Photo URL, if the doctor has one.
    #[must_use]
    pub fn image_url(&self, api: &ApiClient) -> Option<String> {
        self.imagen
            .as_deref()
            .and_then(|name| api.image_url(ImageKind::Doctor, name))
    }
}

/// Admin form input. `cupo_pacientes` is the raw text typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorDraft {
    pub nombre: String,
    pub especialidad: String,
    pub cupo_pacientes: String,
    pub imagen: ImageInput,
}

impl DoctorDraft {
    /// Validate and build the multipart form. Only a newly selected file is
    /// sent; an unchanged image is left to the backend.
    ///
    /// # Errors
    ///
    /// Returns the first failing form rule.
    pub fn to_parts(&self) -> Result<Vec<FormPart>, validate::ValidationError> {
        let cupo = validate::doctor_form(&self.nombre, &self.especialidad, &self.cupo_pacientes)?;
        let mut parts = vec![
            FormPart::text("nombre", self.nombre.trim()),
            FormPart::text("especialidad", self.especialidad.trim()),
            FormPart::text("cupoPacientes", cupo.to_string()),
        ];
        if let ImageInput::Upload(_) = &self.imagen {
            parts.extend(self.imagen.to_part("imagen")?);
        }
        Ok(parts)
    }
}

fn item_path(id: i64) -> String {
    format!("{DOCTORS_PATH}/{id}")
}

/// # Errors
///
/// Returns the API error.
pub async fn list(api: &ApiClient) -> Result<Vec<Doctor>, ApiError> {
    api.get_list(DOCTORS_PATH).await
}

/// # Errors
///
/// Returns the API error.
pub async fn get(api: &ApiClient, id: i64) -> Result<Doctor, ApiError> {
    api.get(&item_path(id)).await
}

/// Create (`id == None`) or update a doctor.
///
/// # Errors
///
/// Returns a validation error before any request, or the API error.
pub async fn save(api: &ApiClient, id: Option<i64>, draft: &DoctorDraft) -> Result<(), ApiError> {
    let parts = draft.to_parts()?;
    let body = Body::Multipart(parts);
    match id {
        Some(id) => api.send(Method::Put, &item_path(id), body).await,
        None => api.send(Method::Post, DOCTORS_PATH, body).await,
    }
    .map(|_| ())
}

/// # Errors
///
/// Returns the API error.
pub async fn delete(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    api.delete(&item_path(id)).await
}

/// Doctors whose specialty equals `specialty`, ignoring case and
/// surrounding whitespace.
#[must_use]
pub fn filter_by_specialty<'a>(doctors: &'a [Doctor], specialty: &str) -> Vec<&'a Doctor> {
    let wanted = specialty.trim().to_lowercase();
    doctors
        .iter()
        .filter(|d| d.especialidad.trim().to_lowercase() == wanted)
        .collect()
}

/// Fetch all doctors and keep those in `specialty`.
///
/// # Errors
///
/// Returns the API error.
pub async fn list_by_specialty(api: &ApiClient, specialty: &str) -> Result<Vec<Doctor>, ApiError> {
    let all = list(api).await?;
    Ok(filter_by_specialty(&all, specialty).into_iter().cloned().collect())
}

#[cfg(test)]
#[path = "doctors_test.rs"]
mod tests;
