//! Route table — which paths exist, who may see them, and where each role
//! lands.
//!
//! Every protected route maps to exactly one role; everything else in the
//! table is public. The role → home mapping is data, not an if/else chain,
//! and has an explicit "no home" answer for roles the client does not know.

use crate::session::Role;

pub const ROOT_ROUTE: &str = "/";
pub const LOGIN_ROUTE: &str = "/login";
pub const REGISTER_ROUTE: &str = "/registrar";
pub const SPECIALTIES_ROUTE: &str = "/especialidades";
pub const SLOTS_ROUTE: &str = "/turnos";
pub const BOOKING_CONFIRMED_ROUTE: &str = "/cita-confirmada";
pub const ADMIN_HOME: &str = "/admin";
pub const PATIENT_HOME: &str = "/cliente";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    Role(Role),
}

impl Access {
    #[must_use]
    pub fn required_role(&self) -> Option<&Role> {
        match self {
            Self::Public => None,
            Self::Role(role) => Some(role),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Public,
    Admin,
    Paciente,
}

impl Owner {
    fn access(self) -> Access {
        match self {
            Self::Public => Access::Public,
            Self::Admin => Access::Role(Role::Admin),
            Self::Paciente => Access::Role(Role::Paciente),
        }
    }
}

const ROUTE_TABLE: &[(&str, Owner)] = &[
    (ROOT_ROUTE, Owner::Public),
    (LOGIN_ROUTE, Owner::Public),
    (REGISTER_ROUTE, Owner::Public),
    (SPECIALTIES_ROUTE, Owner::Public),
    (SLOTS_ROUTE, Owner::Public),
    (BOOKING_CONFIRMED_ROUTE, Owner::Public),
    (ADMIN_HOME, Owner::Admin),
    ("/admin/doctores", Owner::Admin),
    ("/admin/especialidades", Owner::Admin),
    ("/admin/horarios", Owner::Admin),
    (PATIENT_HOME, Owner::Paciente),
    ("/cliente/citas", Owner::Paciente),
    ("/cliente/perfil", Owner::Paciente),
    ("/cliente/turnos", Owner::Paciente),
];

const HOME_TABLE: &[(Owner, &str)] = &[(Owner::Admin, ADMIN_HOME), (Owner::Paciente, PATIENT_HOME)];

/// Paths where a 401 must not force a logout; logged-out users may be there.
const PUBLIC_PREFIXES: &[&str] = &[LOGIN_ROUTE, REGISTER_ROUTE, SPECIALTIES_ROUTE, SLOTS_ROUTE];

/// Landing route for `role`, or `None` for roles without one.
#[must_use]
pub fn home_for(role: &Role) -> Option<&'static str> {
    let owner = match role {
        Role::Admin => Owner::Admin,
        Role::Paciente => Owner::Paciente,
        Role::Other(_) => return None,
    };
    HOME_TABLE
        .iter()
        .find(|(o, _)| *o == owner)
        .map(|(_, home)| *home)
}

/// Resolve `path` against the table by longest segment-boundary prefix, so
/// `/turnos/cardiologia` inherits `/turnos`. The root entry only matches `/`.
#[must_use]
pub fn access_for(path: &str) -> Option<Access> {
    let path = strip_query(path);
    ROUTE_TABLE
        .iter()
        .filter(|(route, _)| matches_route(path, route))
        .max_by_key(|(route, _)| route.len())
        .map(|(_, owner)| owner.access())
}

/// Whether `path` is one where an authentication rejection is left to the
/// page instead of logging the user out.
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    let path = strip_query(path);
    path == ROOT_ROUTE || PUBLIC_PREFIXES.iter().any(|prefix| matches_route(path, prefix))
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn matches_route(path: &str, route: &str) -> bool {
    if route == ROOT_ROUTE {
        return path == ROOT_ROUTE;
    }
    match path.strip_prefix(route) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
