//! HTTP layer — one configured client shared by every service.
//!
//! ARCHITECTURE
//! ============
//! `ApiClient` = base URL + [`Transport`] + [`SessionStore`] + [`Navigator`].
//! Every call runs two interceptors around the transport:
//!
//! - request: attach `Authorization: Bearer <token>` when the store holds a
//!   token. A corrupt stored user does not block this.
//! - response: a 401 while the user is on a protected page clears the
//!   session and forces a full navigation to `/login`. On a public page the
//!   401 is left for the page to show. No status is ever retried.

pub mod error;
pub mod transport;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use error::{ApiError, ErrorCategory, extract_message};
pub use transport::{
    ApiRequest, Body, FormPart, Method, PartValue, RawResponse, ReqwestTransport, Transport, TransportError,
};

use crate::config::ClientConfig;
use crate::nav::{NavMode, Navigator};
use crate::routes::{self, LOGIN_ROUTE};
use crate::session::SessionStore;

const UNAUTHORIZED: u16 = 401;

/// Which image folder a stored file name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Doctor,
    Specialty,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Client backed by reqwest with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(
        config: &ClientConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let transport =
            ReqwestTransport::new(config.timeouts).map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self::with_transport(&config.base_url, Arc::new(transport), session, navigator))
    }

    #[must_use]
    pub fn with_transport(
        base_url: &str,
        transport: Arc<dyn Transport>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), transport, session, navigator }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Public URL of a stored image; `None` for a blank file name.
    #[must_use]
    pub fn image_url(&self, kind: ImageKind, file_name: &str) -> Option<String> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return None;
        }
        let path = match kind {
            ImageKind::Doctor => format!("/doctores/imagen/{file_name}"),
            ImageKind::Specialty => format!("/images/especialidades/{file_name}"),
        };
        Some(self.url(&path))
    }

    // =========================================================================
    // VERBS
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a body that
    /// does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.send(Method::Get, path, Body::Empty).await?;
        decode(&body)
    }

    /// GET a collection. A body that is not a JSON array reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or array
    /// elements that do not decode as `T`.
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let body = self.send(Method::Get, path, Body::Empty).await?;
        match decode::<Value>(&body)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(|e| ApiError::Decode(e.to_string())))
                .collect(),
            other => {
                tracing::debug!(path, kind = value_kind(&other), "expected a list; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let body = self.send(Method::Post, path, json_body(body)?).await?;
        decode(&body)
    }

    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let body = self.send(Method::Put, path, json_body(body)?).await?;
        decode(&body)
    }

    /// PUT without a request body (state transitions such as cancelling).
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.send(Method::Put, path, Body::Empty).await?;
        decode(&body)
    }

    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status. The response
    /// body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::Delete, path, Body::Empty).await.map(|_| ())
    }

    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, parts: Vec<FormPart>) -> Result<T, ApiError> {
        let body = self.send(Method::Post, path, Body::Multipart(parts)).await?;
        decode(&body)
    }

    // =========================================================================
    // INTERCEPTORS
    // =========================================================================

    /// Run one request through both interceptors and return the raw success
    /// body. For mutations whose response body is not worth decoding.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    pub async fn send(&self, method: Method, path: &str, body: Body) -> Result<String, ApiError> {
        let mut request = ApiRequest::new(method, self.url(path), body);
        self.attach_credentials(&mut request);

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(method = method.as_str(), path, error = %e, "request failed");
                return Err(e.into());
            }
        };
        tracing::debug!(method = method.as_str(), path, status = response.status, "api response");
        self.intercept_response(response)
    }

    fn attach_credentials(&self, request: &mut ApiRequest) {
        if let Some(token) = self.session.token() {
            request.headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
    }

    fn intercept_response(&self, response: RawResponse) -> Result<String, ApiError> {
        if (200..300).contains(&response.status) {
            return Ok(response.body);
        }
        let message = extract_message(&response.body);
        if response.status == UNAUTHORIZED {
            self.handle_unauthorized();
            return Err(ApiError::Unauthorized { message });
        }
        Err(ApiError::Status { status: response.status, message })
    }

    fn handle_unauthorized(&self) {
        let current = self.navigator.current_path();
        if routes::is_public_path(&current) {
            tracing::debug!(path = %current, "401 on public page; leaving session alone");
            return;
        }
        tracing::warn!(path = %current, "session rejected by server; logging out");
        self.session.invalidate();
        self.navigator.navigate(LOGIN_ROUTE, NavMode::Reload);
    }
}

/// Serialize `body` as a JSON request body.
///
/// # Errors
///
/// Returns an error if `body` does not serialize.
pub fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Body, ApiError> {
    serde_json::to_value(body)
        .map(Body::Json)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode a success body. An empty body decodes as JSON `null`, so `()`,
/// `Option<_>` and `Value` targets accept it.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = body.trim();
    let body = if body.is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
