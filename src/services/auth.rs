//! Auth service — login, registration, current user, password change.

use serde::{Deserialize, Serialize};

use super::users::UserProfile;
use crate::http::{ApiClient, ApiError, Method, json_body};
use crate::session::{Role, Session, SessionUser};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const ME_PATH: &str = "/auth/me";
pub const CHANGE_PASSWORD_PATH: &str = "/auth/cambiar-contrasena";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub dni: String,
    pub telefono: String,
}

/// Body of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub id_usuario: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub rol: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange<'a> {
    pub password_actual: &'a str,
    pub password_nueva: &'a str,
    pub password_confirmar: &'a str,
}

impl Session {
    /// Session described by an auth response. `None` when the server sent
    /// no token or no role. The display name falls back to the email.
    #[must_use]
    pub fn from_auth_response(resp: &AuthResponse) -> Option<Self> {
        let token = resp.token.as_deref().filter(|t| !t.trim().is_empty())?;
        let role = resp.rol.clone().filter(|r| !r.trim().is_empty())?;
        let name = resp
            .nombre
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| resp.email.clone());
        Some(Self {
            token: token.to_string(),
            user: SessionUser { id: resp.id_usuario, name, email: resp.email.clone(), role: Role::from(role) },
        })
    }
}

// =============================================================================
// CALLS
// =============================================================================

/// # Errors
///
/// Returns the API error; bad credentials surface as a 401 or 400 status.
pub async fn login(api: &ApiClient, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
    api.post(LOGIN_PATH, &Credentials { email: email.trim(), password }).await
}

/// # Errors
///
/// Returns the API error.
pub async fn register(api: &ApiClient, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
    api.post(REGISTER_PATH, request).await
}

/// Profile of the user the bearer token belongs to.
///
/// # Errors
///
/// Returns the API error.
pub async fn current_user(api: &ApiClient) -> Result<UserProfile, ApiError> {
    api.get(ME_PATH).await
}

/// # Errors
///
/// Returns the API error.
pub async fn change_password(api: &ApiClient, change: &PasswordChange<'_>) -> Result<(), ApiError> {
    api.send(Method::Post, CHANGE_PASSWORD_PATH, json_body(change)?)
        .await
        .map(|_| ())
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
