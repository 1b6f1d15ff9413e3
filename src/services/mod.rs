//! Resource services — typed calls over [`ApiClient`](crate::http::ApiClient).
//!
//! ARCHITECTURE
//! ============
//! One module per backend resource. Functions take the client by reference,
//! unwrap the response body into wire records, and return `ApiError` on any
//! failure. They hold no state; loading/error bookkeeping lives in `state`.

pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod schedules;
pub mod specialties;
pub mod uploads;
pub mod users;
