//! Authentication state: who is logged in, and the actions that change it.

use super::Notices;
use crate::http::{ApiClient, ApiError, ErrorCategory};
use crate::messages;
use crate::nav::NavMode;
use crate::routes::{LOGIN_ROUTE, ROOT_ROUTE, home_for};
use crate::services::auth::{self, PasswordChange, RegisterRequest};
use crate::services::users::{self, ProfileUpdate, UserProfile};
use crate::session::{Session, SessionState, SessionUser};
use crate::validate::{self, PasswordChangeForm, RegistrationForm, Validation};

pub struct AuthManager {
    api: ApiClient,
    notices: Notices,
    pub user: Option<SessionUser>,
    pub profile: Option<UserProfile>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthManager {
    #[must_use]
    pub fn new(api: ApiClient, notices: Notices) -> Self {
        Self { api, notices, user: None, profile: None, loading: false, error: None }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Pick up a session persisted by an earlier run. A corrupt one is
    /// removed.
    pub fn restore(&mut self) -> bool {
        self.user = match self.api.session().load() {
            SessionState::Active(session) => Some(session.user),
            SessionState::Absent => None,
            SessionState::Corrupt => {
                self.api.session().invalidate();
                None
            }
        };
        self.user.is_some()
    }

    /// Log in, persist the session and go to the role's home.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        self.start();
        let result = self.try_login(email, password).await;
        self.loading = false;
        match result {
            Ok(session) => {
                let home = home_for(session.role()).unwrap_or(ROOT_ROUTE);
                tracing::info!(role = %session.role(), "logged in");
                self.user = Some(session.user);
                self.notices.success(messages::LOGIN_SUCCESS);
                self.api.navigator().navigate(home, NavMode::Push);
                true
            }
            Err(e) => {
                let message = match e {
                    ApiError::Unauthorized { message: None } => messages::LOGIN_ERROR.to_string(),
                    e => e.user_message(messages::LOGIN_ERROR),
                };
                self.fail(message);
                false
            }
        }
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        validate::required(&[("email", email), ("password", password)])?;
        validate::email(email)?;
        let resp = auth::login(&self.api, email, password).await?;
        let session = Session::from_auth_response(&resp).ok_or_else(|| ApiError::Unauthorized {
            message: resp.message.clone(),
        })?;
        self.api.session().save(&session)?;
        Ok(session)
    }

    /// Register a patient. A response carrying a token logs the user in;
    /// otherwise the user is sent to the login page.
    pub async fn register(&mut self, form: &RegistrationForm) -> bool {
        self.start();
        let result = self.try_register(form).await;
        self.loading = false;
        match result {
            Ok(session) => {
                self.notices.success(messages::REGISTER_SUCCESS);
                let target = match &session {
                    Some(session) => home_for(session.role()).unwrap_or(ROOT_ROUTE),
                    None => LOGIN_ROUTE,
                };
                self.user = session.map(|s| s.user);
                self.api.navigator().navigate(target, NavMode::Push);
                true
            }
            Err(e) => {
                self.fail(e.user_message(messages::REGISTER_ERROR));
                false
            }
        }
    }

    async fn try_register(&self, form: &RegistrationForm) -> Result<Option<Session>, ApiError> {
        form.validate()?;
        let request = RegisterRequest {
            nombre: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            dni: form.dni.trim().to_string(),
            telefono: form.phone.trim().to_string(),
        };
        let resp = auth::register(&self.api, &request).await?;
        let session = Session::from_auth_response(&resp);
        if let Some(session) = &session {
            self.api.session().save(session)?;
        }
        Ok(session)
    }

    pub fn logout(&mut self) {
        self.api.session().invalidate();
        self.user = None;
        self.profile = None;
        self.error = None;
        tracing::info!("logged out");
        self.notices.success(messages::LOGOUT_SUCCESS);
        self.api.navigator().navigate(LOGIN_ROUTE, NavMode::Replace);
    }

    /// Fetch the full profile from `/auth/me`.
    pub async fn load_profile(&mut self) -> bool {
        self.start();
        let result = auth::current_user(&self.api).await;
        self.loading = false;
        match result {
            Ok(profile) => {
                self.profile = Some(profile);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile load failed");
                let message = match e.category() {
                    ErrorCategory::SessionExpired => messages::SESSION_EXPIRED.to_string(),
                    _ => messages::PROFILE_LOAD_ERROR.to_string(),
                };
                self.error = Some(message);
                false
            }
        }
    }

    /// Save profile fields and refresh the stored user. The token and the
    /// role stay as they were.
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> bool {
        self.start();
        let result = self.try_update_profile(update).await;
        self.loading = false;
        match result {
            Ok(profile) => {
                self.notices.success(messages::PROFILE_UPDATED);
                self.profile = Some(profile);
                true
            }
            Err(e) => {
                self.fail(e.user_message(messages::PROFILE_UPDATE_ERROR));
                false
            }
        }
    }

    async fn try_update_profile(&mut self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        validate_profile(update)?;
        let Some(stored) = self.api.session().user() else {
            return Err(ApiError::MissingSession);
        };
        let id = match self.profile.as_ref().map(|p| p.id_usuario).or(stored.id) {
            Some(id) => id,
            None => auth::current_user(&self.api).await?.id_usuario,
        };
        let profile = users::update(&self.api, id, update).await?;
        let user = profile.to_session_user(&stored.role);
        self.api.session().update_user(&user)?;
        self.user = Some(user);
        Ok(profile)
    }

    /// Change the password. On success the whole session is dropped and the
    /// user must log in again.
    pub async fn change_password(&mut self, form: &PasswordChangeForm) -> bool {
        self.start();
        let result = self.try_change_password(form).await;
        self.loading = false;
        match result {
            Ok(()) => {
                self.api.session().invalidate();
                self.user = None;
                self.profile = None;
                self.notices.success(messages::PASSWORD_CHANGED);
                self.api.navigator().navigate(LOGIN_ROUTE, NavMode::Replace);
                true
            }
            Err(e) => {
                self.fail(e.user_message(messages::PASSWORD_CHANGE_ERROR));
                false
            }
        }
    }

    async fn try_change_password(&self, form: &PasswordChangeForm) -> Result<(), ApiError> {
        form.validate()?;
        let change = PasswordChange {
            password_actual: &form.current,
            password_nueva: &form.new,
            password_confirmar: &form.confirm,
        };
        auth::change_password(&self.api, &change).await
    }

    fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn fail(&mut self, message: String) {
        tracing::warn!(error = %message, "auth action failed");
        self.notices.error(message.clone());
        self.error = Some(message);
    }
}

fn validate_profile(update: &ProfileUpdate) -> Validation {
    validate::required(&[("nombre", &update.nombre), ("email", &update.email)])?;
    validate::name(&update.nombre)?;
    validate::email(&update.email)?;
    if !update.dni.trim().is_empty() {
        validate::dni(&update.dni)?;
    }
    if !update.telefono.trim().is_empty() {
        validate::phone(&update.telefono)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
