//! Slot reservation flow: doctor, then date, then slot, then confirmation.
//!
//! DESIGN
//! ======
//! The flow is a plain state machine driven by the caller. Each selection
//! resets everything chosen after it, so a slot picked for one doctor/date
//! can never be submitted under another. Slot fetches are generation-guarded
//! with a [`FetchTicket`]: a late response for an older doctor/date is
//! dropped. Nothing is retried; re-selecting the same doctor or date
//! re-fetches.
//!
//! The server owns slot availability. A booking that races another one
//! fails with the server's message and the flow stays on the confirmation
//! step.

use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, Weekday};

use crate::http::{ApiClient, ApiError};
use crate::messages;
use crate::nav::NavMode;
use crate::routes::BOOKING_CONFIRMED_ROUTE;
use crate::services::appointments::{self, Appointment, BookingRequest};
use crate::services::doctors::{self, Doctor};
use crate::services::schedules::{self, Schedule, format_date, format_time};
use crate::state::{FetchTicket, Notices, ResourceState};

/// How far ahead a patient may book.
pub const BOOKING_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BookingStep {
    SelectingDoctor,
    SelectingDate,
    SelectingSlot,
    Confirming,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("Selecciona un doctor")]
    NoDoctor,
    #[error("Selecciona una fecha")]
    NoDate,
    #[error("Selecciona un horario")]
    NoSlot,
    #[error("Selecciona una fecha entre {} y {}", format_date(*.from), format_date(*.to))]
    DateOutOfRange { from: Date, to: Date },
    #[error("No hay atención los fines de semana")]
    Weekend,
    #[error("{}", messages::BOOKING_CONFLICT)]
    SlotUnavailable,
    #[error("{}", messages::BOOKING_PAST)]
    PastSlot,
    #[error("Horario no válido")]
    InvalidSlot,
    #[error("{}", messages::NO_SESSION)]
    NoSession,
    #[error("no se puede pasar de {from:?} a {to:?}")]
    InvalidStep { from: BookingStep, to: BookingStep },
}

#[derive(Debug)]
pub struct BookingFlow {
    notices: Notices,
    today: Date,
    now: Option<Time>,
    step: BookingStep,
    pub doctors: ResourceState<Doctor>,
    pub slots: ResourceState<Schedule>,
    doctor: Option<Doctor>,
    date: Option<Date>,
    slot: Option<Schedule>,
    description: String,
    pub submitting: bool,
    error: Option<String>,
    confirmed: Option<Appointment>,
}

impl BookingFlow {
    /// Flow for a patient booking on `today`. Slots on `today` are only
    /// rejected as past once a clock time is known; see [`BookingFlow::at`].
    #[must_use]
    pub fn new(today: Date, notices: Notices) -> Self {
        Self {
            notices,
            today,
            now: None,
            step: BookingStep::SelectingDoctor,
            doctors: ResourceState::default(),
            slots: ResourceState::default(),
            doctor: None,
            date: None,
            slot: None,
            description: String::new(),
            submitting: false,
            error: None,
            confirmed: None,
        }
    }

    /// Flow that also rejects slots earlier today than `now`.
    #[must_use]
    pub fn at(now: PrimitiveDateTime, notices: Notices) -> Self {
        Self { now: Some(now.time()), ..Self::new(now.date(), notices) }
    }

    #[must_use]
    pub fn step(&self) -> BookingStep {
        self.step
    }

    #[must_use]
    pub fn doctor(&self) -> Option<&Doctor> {
        self.doctor.as_ref()
    }

    #[must_use]
    pub fn date(&self) -> Option<Date> {
        self.date
    }

    #[must_use]
    pub fn slot(&self) -> Option<&Schedule> {
        self.slot.as_ref()
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Message of the last failed step, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The appointment created by the last successful submit.
    #[must_use]
    pub fn confirmed(&self) -> Option<&Appointment> {
        self.confirmed.as_ref()
    }

    /// Bookable dates: today through today + 30 days.
    #[must_use]
    pub fn date_window(&self) -> (Date, Date) {
        let last = self
            .today
            .checked_add(Duration::days(BOOKING_WINDOW_DAYS))
            .unwrap_or(Date::MAX);
        (self.today, last)
    }

    /// # Errors
    ///
    /// Returns an error if `date` is outside the booking window or falls on
    /// a weekend.
    pub fn check_date(&self, date: Date) -> Result<(), BookingError> {
        let (from, to) = self.date_window();
        if date < from || date > to {
            return Err(BookingError::DateOutOfRange { from, to });
        }
        if matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday) {
            return Err(BookingError::Weekend);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // DOCTORS
    // -------------------------------------------------------------------------

    /// Load the doctors to choose from, optionally limited to a specialty.
    pub async fn load_doctors(&mut self, api: &ApiClient, specialty: Option<&str>) -> bool {
        let ticket = self.doctors.begin();
        let result = match specialty.filter(|s| !s.trim().is_empty()) {
            Some(specialty) => doctors::list_by_specialty(api, specialty).await,
            None => doctors::list(api).await,
        };
        let result = result.map_err(|e| {
            tracing::warn!(error = %e, "doctor list failed");
            e.user_message(messages::DOCTORS_LOAD_ERROR)
        });
        let ok = result.is_ok();
        self.doctors.finish(ticket, result) && ok
    }

    /// Choose a doctor. Clears any date and slot, then fetches the doctor's
    /// open slots.
    pub async fn select_doctor(&mut self, api: &ApiClient, doctor: Doctor) -> bool {
        tracing::debug!(doctor = doctor.id_doctor, "doctor selected");
        self.doctor = Some(doctor);
        self.date = None;
        self.slot = None;
        self.error = None;
        self.step = BookingStep::SelectingDate;
        self.refresh_slots(api).await
    }

    // -------------------------------------------------------------------------
    // DATE / SLOT
    // -------------------------------------------------------------------------

    /// Choose a date. Clears any slot, then re-fetches and keeps the
    /// doctor's available slots on that date.
    pub async fn select_date(&mut self, api: &ApiClient, date: Date) -> bool {
        if let Err(e) = self.doctor.as_ref().ok_or(BookingError::NoDoctor).and(self.check_date(date)) {
            self.error = Some(e.to_string());
            return false;
        }
        self.date = Some(date);
        self.slot = None;
        self.error = None;
        self.step = BookingStep::SelectingSlot;
        self.refresh_slots(api).await
    }

    /// Choose one of the fetched slots and move to confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error, and stays on the current step, if no date is
    /// chosen or `slot_id` is not among the fetched available slots.
    pub fn select_slot(&mut self, slot_id: i64) -> Result<(), BookingError> {
        let result = self.find_slot(slot_id);
        match result {
            Ok(slot) => {
                tracing::debug!(slot = slot.id_horario, "slot selected");
                self.slot = Some(slot);
                self.error = None;
                self.step = BookingStep::Confirming;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn find_slot(&self, slot_id: i64) -> Result<Schedule, BookingError> {
        if self.doctor.is_none() {
            return Err(BookingError::NoDoctor);
        }
        if self.date.is_none() {
            return Err(BookingError::NoDate);
        }
        self.slots
            .items
            .iter()
            .find(|s| s.id_horario == slot_id && s.disponible)
            .cloned()
            .ok_or(BookingError::SlotUnavailable)
    }

    /// Free-text reason sent with the booking. Blank means the default.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Return to an earlier step. Selections are kept until overwritten.
    /// A confirmed booking has no selection left, so it can only start over.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` is not before the current one, or if the
    /// flow is confirmed and `step` is not `SelectingDoctor`.
    pub fn back_to(&mut self, step: BookingStep) -> Result<(), BookingError> {
        let restart_only = self.step == BookingStep::Confirmed && step != BookingStep::SelectingDoctor;
        if step >= self.step || restart_only {
            return Err(BookingError::InvalidStep { from: self.step, to: step });
        }
        self.step = step;
        self.error = None;
        if step == BookingStep::SelectingDoctor {
            self.confirmed = None;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // SLOT FETCH
    // -------------------------------------------------------------------------

    /// Start a slot fetch. Tickets from earlier fetches become stale.
    pub fn begin_slot_fetch(&mut self) -> FetchTicket {
        self.slots.begin()
    }

    /// Apply a slot fetch. A stale `ticket` is ignored and returns `false`.
    pub fn apply_slots(&mut self, ticket: FetchTicket, result: Result<Vec<Schedule>, ApiError>) -> bool {
        let (doctor_id, date) = (self.doctor.as_ref().map(|d| d.id_doctor), self.date);
        let result = result
            .map(|all| match (doctor_id, date) {
                (Some(doctor_id), Some(date)) => schedules::available_on(&all, doctor_id, date),
                _ => open_slots(all),
            })
            .map_err(|e| {
                tracing::warn!(error = %e, "slot fetch failed");
                e.user_message(messages::SLOTS_LOAD_ERROR)
            });
        let ok = result.is_ok();
        self.slots.finish(ticket, result) && ok
    }

    async fn refresh_slots(&mut self, api: &ApiClient) -> bool {
        let Some(doctor_id) = self.doctor.as_ref().map(|d| d.id_doctor) else {
            self.slots.reset();
            return false;
        };
        let ticket = self.begin_slot_fetch();
        let result = schedules::list_by_doctor(api, doctor_id).await;
        self.apply_slots(ticket, result)
    }

    // -------------------------------------------------------------------------
    // SUBMIT
    // -------------------------------------------------------------------------

    /// Send the booking. On success the flow moves to `Confirmed`, exposes
    /// the created appointment, drops the selection and navigates to the
    /// confirmation page. On failure it stays on `Confirming` with the
    /// server's message, or a per-status fallback.
    pub async fn submit(&mut self, api: &ApiClient) -> bool {
        let request = match self.booking_request(api) {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.to_string());
                return false;
            }
        };

        self.submitting = true;
        self.error = None;
        let result = appointments::create(api, &request).await;
        self.submitting = false;

        match result {
            Ok(appointment) => {
                tracing::info!(id = appointment.id_cita, doctor = request.doctor_id, "appointment booked");
                self.confirmed = Some(appointment);
                self.step = BookingStep::Confirmed;
                self.doctor = None;
                self.date = None;
                self.slot = None;
                self.description.clear();
                self.slots.reset();
                self.notices.success(messages::BOOKING_SUCCESS);
                api.navigator().navigate(BOOKING_CONFIRMED_ROUTE, NavMode::Push);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, status = ?e.status(), "booking rejected");
                let message = e.user_message(booking_fallback(e.status()));
                self.notices.error(message.clone());
                self.error = Some(message);
                false
            }
        }
    }

    fn booking_request(&self, api: &ApiClient) -> Result<BookingRequest, BookingError> {
        if self.step != BookingStep::Confirming {
            return Err(BookingError::NoSlot);
        }
        if api.session().token().is_none() {
            return Err(BookingError::NoSession);
        }
        let doctor = self.doctor.as_ref().ok_or(BookingError::NoDoctor)?;
        let slot = self.slot.as_ref().ok_or(BookingError::NoSlot)?;
        let (date, start) = slot.date().zip(slot.start()).ok_or(BookingError::InvalidSlot)?;
        if self.is_past(date, start) {
            return Err(BookingError::PastSlot);
        }
        let description = match self.description.trim() {
            "" => default_description(slot),
            text => text.to_string(),
        };
        Ok(BookingRequest {
            doctor_id: doctor.id_doctor,
            date: format!("{}T{}", format_date(date), format_time(start)),
            description,
        })
    }

    fn is_past(&self, date: Date, start: Time) -> bool {
        date < self.today || (date == self.today && self.now.is_some_and(|now| start <= now))
    }
}

/// Calendar day and clock time as the user sees them, keeping `now`'s own
/// offset instead of converting to UTC.
#[must_use]
pub fn wall_clock(now: OffsetDateTime) -> PrimitiveDateTime {
    PrimitiveDateTime::new(now.date(), now.time())
}

/// Current local wall-clock time, or UTC when the local offset is unknown.
#[must_use]
pub fn local_now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_local().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "local offset unavailable, using UTC");
        OffsetDateTime::now_utc()
    });
    wall_clock(now)
}

fn open_slots(all: Vec<Schedule>) -> Vec<Schedule> {
    let mut open: Vec<Schedule> = all.into_iter().filter(|s| s.disponible).collect();
    open.sort_by(|a, b| (a.date(), a.start()).cmp(&(b.date(), b.start())));
    open
}

fn default_description(slot: &Schedule) -> String {
    match slot.turno.as_deref().map(str::trim) {
        Some(turno) if !turno.is_empty() => format!("Consulta - {turno}"),
        _ => "Consulta".to_string(),
    }
}

/// Text shown when a rejected booking carries no server message.
#[must_use]
pub fn booking_fallback(status: Option<u16>) -> &'static str {
    match status {
        Some(400) => messages::BOOKING_INVALID,
        Some(404) => messages::BOOKING_NOT_FOUND,
        Some(409) => messages::BOOKING_CONFLICT,
        Some(422) => messages::BOOKING_PAST,
        _ => messages::BOOKING_ERROR,
    }
}

#[cfg(test)]
#[path = "booking_test.rs"]
mod tests;
