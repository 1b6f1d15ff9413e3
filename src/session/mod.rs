//! Session — who is logged in, and as whom.
//!
//! DESIGN
//! ======
//! The session lives in a key/value store shared by the whole client, shaped
//! like a browser's `localStorage`. Consumers never touch the raw keys: they
//! go through [`SessionStore`], which owns the validity rule.
//!
//! A session is valid only when both `token` and `usuario` are present and
//! `usuario` parses. A present-but-unparseable `usuario` is reported as
//! [`SessionState::Corrupt`] so the caller can clean up.
//!
//! The legacy standalone `rol` key is cleared on logout but never read; the
//! role always comes from `usuario.rol`.

pub mod store;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use store::{FileStore, KeyValueStore, MemoryStore};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "usuario";
pub const LEGACY_ROLE_KEY: &str = "rol";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

// =============================================================================
// ROLE
// =============================================================================

/// Role carried by the stored user. Unknown wire values are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Paciente,
    Other(String),
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "ADMIN",
            Self::Paciente => "PACIENTE",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ADMIN" => Self::Admin,
            "PACIENTE" => Self::Paciente,
            _ => Self::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// User profile as persisted under the `usuario` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "idUsuario", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "rol")]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

impl Session {
    #[must_use]
    pub fn role(&self) -> &Role {
        &self.user.role
    }
}

/// Result of reading the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Active(Session),
    Absent,
    /// `usuario` is present but does not parse.
    Corrupt,
}

// =============================================================================
// STORE
// =============================================================================

/// Read/write/clear API over the persisted session keys.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Store backed by a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    /// Read token and user and classify the result. Never mutates the store.
    #[must_use]
    pub fn load(&self) -> SessionState {
        let user = match self.kv.get(USER_KEY) {
            None => None,
            Some(raw) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "stored user is not well-formed");
                    return SessionState::Corrupt;
                }
            },
        };
        match (self.token(), user) {
            (Some(token), Some(user)) => SessionState::Active(Session { token, user }),
            _ => SessionState::Absent,
        }
    }

    /// Raw bearer token. Does not look at the stored user.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.kv.get(TOKEN_KEY).filter(|t| !t.trim().is_empty())
    }

    /// Stored user when it parses; corruption reads as `None`.
    #[must_use]
    pub fn user(&self) -> Option<SessionUser> {
        self.kv
            .get(USER_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    /// Persist a freshly authenticated session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        self.kv.set(TOKEN_KEY, &session.token)?;
        self.kv.set(USER_KEY, &serde_json::to_string(&session.user)?)?;
        tracing::info!(role = %session.user.role, "session saved");
        Ok(())
    }

    /// Replace the stored user after a profile edit. The token is untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn update_user(&self, user: &SessionUser) -> Result<(), SessionError> {
        self.kv.set(USER_KEY, &serde_json::to_string(user)?)
    }

    /// Remove every session key. All removals are attempted; the first
    /// failure is reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut first_err = None;
        for key in [TOKEN_KEY, USER_KEY, LEGACY_ROLE_KEY] {
            if let Err(e) = self.kv.remove(key) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// `clear()` for paths that cannot surface an error (guard, interceptor).
    pub fn invalidate(&self) {
        if let Err(e) = self.clear() {
            tracing::error!(error = %e, "failed to clear session storage");
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
