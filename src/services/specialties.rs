//! Specialties service.
//!
//! Saves go out as JSON unless an image is attached; then the whole form is
//! sent multipart so the backend stores the file alongside the record.

use serde::{Deserialize, Serialize};

use super::uploads::ImageInput;
use crate::http::{ApiClient, ApiError, Body, FormPart, Method, json_body};
use crate::validate;

pub const SPECIALTIES_PATH: &str = "/especialidades";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specialty {
    pub id_especialidad: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub imagen: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialtyDraft {
    pub nombre: String,
    pub descripcion: String,
    pub imagen: ImageInput,
}

#[derive(Serialize)]
struct SpecialtyJson<'a> {
    nombre: &'a str,
    descripcion: Option<&'a str>,
}

fn item_path(id: i64) -> String {
    format!("{SPECIALTIES_PATH}/{id}")
}

/// # Errors
///
/// Returns the API error.
pub async fn list(api: &ApiClient) -> Result<Vec<Specialty>, ApiError> {
    api.get_list(SPECIALTIES_PATH).await
}

/// # Errors
///
/// Returns the API error.
pub async fn get(api: &ApiClient, id: i64) -> Result<Specialty, ApiError> {
    api.get(&item_path(id)).await
}

/// Create (`id == None`) or update a specialty.
///
/// # Errors
///
/// Returns a validation error before any request, or the API error.
pub async fn save(api: &ApiClient, id: Option<i64>, draft: &SpecialtyDraft) -> Result<(), ApiError> {
    validate::specialty_form(&draft.nombre)?;
    let nombre = draft.nombre.trim();
    let descripcion = draft.descripcion.trim();

    let body = match draft.imagen.to_part("imagen")? {
        Some(image) => Body::Multipart(vec![
            FormPart::text("nombre", nombre),
            FormPart::text("descripcion", descripcion),
            image,
        ]),
        None => json_body(&SpecialtyJson {
            nombre,
            descripcion: if descripcion.is_empty() { None } else { Some(descripcion) },
        })?,
    };

    match id {
        Some(id) => api.send(Method::Put, &item_path(id), body).await?,
        None => api.send(Method::Post, SPECIALTIES_PATH, body).await?,
    };
    Ok(())
}

/// # Errors
///
/// Returns the API error.
pub async fn delete(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    api.delete(&item_path(id)).await
}

#[cfg(test)]
#[path = "specialties_test.rs"]
mod tests;
