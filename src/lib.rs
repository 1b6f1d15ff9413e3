//! # clinica
//!
//! Client core for the clinic appointment application: patients book
//! appointments with doctors, administrators maintain doctors, specialties
//! and schedules. The backend is an external REST service.
//!
//! ARCHITECTURE
//! ============
//! Every browser-ambient concern is an injected seam so the whole client can
//! run (and be tested) without a browser:
//!
//! - `session`: token + user persisted in a key/value store.
//! - `routes` / `guard`: role-to-route table and the navigation guard.
//! - `nav`: where the user "is" and where they get sent.
//! - `http`: the API client with the auth interceptor pair.
//! - `services`: typed calls per backend resource.
//! - `state`: load/error/loading managers wrapping the services.
//! - `booking`: the doctor → date → slot → confirm wizard.

pub mod booking;
pub mod config;
pub mod guard;
pub mod http;
pub mod messages;
pub mod nav;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
