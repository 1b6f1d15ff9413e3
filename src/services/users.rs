//! Users service (`/usuarios`).

use serde::{Deserialize, Serialize};

use crate::http::{ApiClient, ApiError};
use crate::session::{Role, SessionUser};

pub const USERS_PATH: &str = "/usuarios";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(alias = "id")]
    pub id_usuario: i64,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub dni: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub rol: Option<String>,
}

impl UserProfile {
    /// Session user reflecting this profile. The role comes from `fallback`
    /// when the profile carries none, so an edit never drops it.
    #[must_use]
    pub fn to_session_user(&self, fallback: &Role) -> SessionUser {
        let role = self
            .rol
            .clone()
            .filter(|r| !r.trim().is_empty())
            .map_or_else(|| fallback.clone(), Role::from);
        SessionUser {
            id: Some(self.id_usuario),
            name: self.nombre.clone().unwrap_or_else(|| self.email.clone()),
            email: self.email.clone(),
            role,
        }
    }
}

/// Editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub nombre: String,
    pub email: String,
    pub dni: String,
    pub telefono: String,
}

/// # Errors
///
/// Returns the API error.
pub async fn get(api: &ApiClient, id: i64) -> Result<UserProfile, ApiError> {
    api.get(&format!("{USERS_PATH}/{id}")).await
}

/// # Errors
///
/// Returns the API error.
pub async fn update(api: &ApiClient, id: i64, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
    api.put(&format!("{USERS_PATH}/{id}"), update).await
}

/// # Errors
///
/// Returns the API error.
pub async fn list(api: &ApiClient) -> Result<Vec<UserProfile>, ApiError> {
    api.get_list(USERS_PATH).await
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
