//! Route guard — render, or redirect, on every navigation to a protected
//! route.
//!
//! DESIGN
//! ======
//! The decision is synchronous and local: it reads the session store and the
//! route table and never calls the network. A token the server no longer
//! accepts passes the guard and is caught later by the HTTP layer's 401
//! handling.
//!
//! Evaluation order (first match wins):
//! 1. Read the session. A corrupt user clears token and user.
//! 2. No token or no user → login, replacing the history entry.
//! 3. Role required and different → that role's home; roles without a home
//!    are denied.
//! 4. Render.

use crate::nav::{NavMode, Navigator};
use crate::routes::{self, Access, LOGIN_ROUTE};
use crate::session::{Role, Session, SessionState, SessionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the protected view for this session.
    Render(Session),
    Redirect { to: &'static str, mode: NavMode },
    /// Valid session whose role has no landing route.
    Denied,
}

/// Outcome of guarding a concrete path (route table lookup included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathDecision {
    Public,
    Guarded(GuardDecision),
    NotFound,
}

/// Decide whether the current session may see a view requiring `required`.
///
/// Side effect: a corrupt stored user clears the session. The guard never
/// creates or modifies a valid session.
#[must_use]
pub fn evaluate(store: &SessionStore, required: Option<&Role>) -> GuardDecision {
    let session = match store.load() {
        SessionState::Active(session) => session,
        SessionState::Corrupt => {
            tracing::warn!("guard found corrupt session; clearing");
            store.invalidate();
            return redirect_to_login();
        }
        SessionState::Absent => {
            tracing::debug!("guard found no session");
            return redirect_to_login();
        }
    };

    if let Some(required) = required {
        if session.role() != required {
            return match routes::home_for(session.role()) {
                Some(home) => {
                    tracing::debug!(role = %session.role(), %required, home, "role mismatch; redirecting home");
                    GuardDecision::Redirect { to: home, mode: NavMode::Replace }
                }
                None => {
                    tracing::warn!(role = %session.role(), %required, "role has no home route; access denied");
                    GuardDecision::Denied
                }
            };
        }
    }

    GuardDecision::Render(session)
}

/// Guard `path` using the route table's required role.
#[must_use]
pub fn check_path(store: &SessionStore, path: &str) -> PathDecision {
    match routes::access_for(path) {
        None => PathDecision::NotFound,
        Some(Access::Public) => PathDecision::Public,
        Some(Access::Role(role)) => PathDecision::Guarded(evaluate(store, Some(&role))),
    }
}

/// Navigate to `path` through the guard and return where the user ended up.
pub fn navigate_guarded(store: &SessionStore, nav: &dyn Navigator, path: &str) -> PathDecision {
    let decision = check_path(store, path);
    match &decision {
        PathDecision::Public | PathDecision::Guarded(GuardDecision::Render(_)) => {
            nav.navigate(path, NavMode::Push);
        }
        PathDecision::Guarded(GuardDecision::Redirect { to, mode }) => nav.navigate(to, *mode),
        PathDecision::Guarded(GuardDecision::Denied) | PathDecision::NotFound => {}
    }
    decision
}

fn redirect_to_login() -> GuardDecision {
    GuardDecision::Redirect { to: LOGIN_ROUTE, mode: NavMode::Replace }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
