use serde_json::{Value, json};
use time::macros::{date, datetime};

use super::*;
use crate::http::{Body, Method};
use crate::nav::{NavEntry, Navigator};
use crate::state::NoticeLevel;
use crate::test_helpers::{TestClient, patient_client_at};

const TODAY: Date = date!(2025 - 11 - 20);

fn doctor(id: i64) -> Doctor {
    Doctor { id_doctor: id, nombre: format!("Dr. {id}"), especialidad: "Cardiología".into(), cupo_pacientes: None, imagen: None }
}

fn slot(id: i64, fecha: &str, start: &str, end: &str, disponible: bool) -> Value {
    json!({
        "idHorario": id, "fecha": fecha, "horaInicio": start, "horaFin": end,
        "turno": "Mañana", "disponible": disponible
    })
}

fn doctor_seven_schedule() -> Value {
    json!([
        slot(1, "2025-11-25", "09:30", "10:00", true),
        slot(2, "2025-11-25", "09:00", "09:30", true),
        slot(3, "2025-11-25", "10:00", "10:30", false),
        slot(4, "2025-11-26", "09:00", "09:30", true),
    ])
}

/// Doctor 7 on 2025-11-25 with the 09:00 slot chosen.
async fn confirming(t: &TestClient, flow: &mut BookingFlow) {
    t.transport.push_json(200, &doctor_seven_schedule());
    t.transport.push_json(200, &doctor_seven_schedule());
    assert!(flow.select_doctor(&t.api, doctor(7)).await);
    assert!(flow.select_date(&t.api, date!(2025 - 11 - 25)).await);
    flow.select_slot(2).unwrap();
    assert_eq!(flow.step(), BookingStep::Confirming);
}

#[tokio::test]
async fn selecting_doctor_lists_open_slots() {
    let t = patient_client_at("/turnos");
    t.transport.push_json(200, &doctor_seven_schedule());
    let mut flow = BookingFlow::new(TODAY, Notices::default());

    assert!(flow.select_doctor(&t.api, doctor(7)).await);

    assert_eq!(t.transport.last_request().url, "http://api.test/horarios/doctor/7");
    assert_eq!(flow.step(), BookingStep::SelectingDate);
    let ids: Vec<_> = flow.slots.items.iter().map(|s| s.id_horario).collect();
    assert_eq!(ids, [2, 1, 4]);
}

#[tokio::test]
async fn selecting_date_filters_to_that_day() {
    let t = patient_client_at("/turnos");
    t.transport.push_json(200, &doctor_seven_schedule());
    t.transport.push_json(200, &doctor_seven_schedule());
    let mut flow = BookingFlow::new(TODAY, Notices::default());

    flow.select_doctor(&t.api, doctor(7)).await;
    assert!(flow.select_date(&t.api, date!(2025 - 11 - 25)).await);

    let ids: Vec<_> = flow.slots.items.iter().map(|s| s.id_horario).collect();
    assert_eq!(ids, [2, 1]);
    assert_eq!(flow.step(), BookingStep::SelectingSlot);
}

#[tokio::test]
async fn new_selection_resets_later_choices() {
    let t = patient_client_at("/turnos");
    let mut flow = BookingFlow::new(TODAY, Notices::default());
    confirming(&t, &mut flow).await;

    // new date drops the slot
    t.transport.push_json(200, &doctor_seven_schedule());
    assert!(flow.select_date(&t.api, date!(2025 - 11 - 26)).await);
    assert!(flow.slot().is_none());
    assert_eq!(flow.step(), BookingStep::SelectingSlot);

    // new doctor drops date and slot before fetching
    flow.select_slot(4).unwrap();
    t.transport.push(200, "[]");
    assert!(flow.select_doctor(&t.api, doctor(9)).await);
    assert!(flow.date().is_none());
    assert!(flow.slot().is_none());
    assert_eq!(flow.doctor().map(|d| d.id_doctor), Some(9));
    assert_eq!(t.transport.last_request().url, "http://api.test/horarios/doctor/9");
    assert!(flow.slots.items.is_empty());
}

#[tokio::test]
async fn date_outside_window_or_weekend_is_rejected() {
    let t = patient_client_at("/turnos");
    t.transport.push_json(200, &doctor_seven_schedule());
    let mut flow = BookingFlow::new(TODAY, Notices::default());
    flow.select_doctor(&t.api, doctor(7)).await;
    let sent = t.transport.requests().len();

    assert!(!flow.select_date(&t.api, date!(2025 - 11 - 19)).await);
    assert!(!flow.select_date(&t.api, date!(2025 - 12 - 22)).await);
    assert!(!flow.select_date(&t.api, date!(2025 - 11 - 22)).await);

    assert_eq!(flow.error(), Some("No hay atención los fines de semana"));
    assert_eq!(t.transport.requests().len(), sent);
    assert_eq!(flow.step(), BookingStep::SelectingDate);
}

#[test]
fn window_edges_are_inclusive() {
    let flow = BookingFlow::new(TODAY, Notices::default());
    assert!(flow.check_date(TODAY).is_ok());
    assert!(flow.check_date(date!(2025 - 12 - 19)).is_ok());
    assert!(matches!(flow.check_date(date!(2025 - 12 - 21)), Err(BookingError::DateOutOfRange { .. })));
}

#[tokio::test]
async fn taken_slot_cannot_be_selected() {
    let t = patient_client_at("/turnos");
    t.transport.push_json(200, &doctor_seven_schedule());
    t.transport.push_json(200, &doctor_seven_schedule());
    let mut flow = BookingFlow::new(TODAY, Notices::default());
    flow.select_doctor(&t.api, doctor(7)).await;
    flow.select_date(&t.api, date!(2025 - 11 - 25)).await;

    assert_eq!(flow.select_slot(3), Err(BookingError::SlotUnavailable));
    assert_eq!(flow.step(), BookingStep::SelectingSlot);
}

#[test]
fn stale_slot_fetch_is_discarded() {
    let mut flow = BookingFlow::new(TODAY, Notices::default());
    let older = flow.begin_slot_fetch();
    let newer = flow.begin_slot_fetch();
    let fresh: Vec<Schedule> = serde_json::from_value(json!([slot(8, "2025-11-25", "11:00", "11:30", true)])).unwrap();
    let late: Vec<Schedule> = serde_json::from_value(json!([slot(1, "2025-11-25", "09:00", "09:30", true)])).unwrap();

    assert!(flow.apply_slots(newer, Ok(fresh)));
    assert!(!flow.apply_slots(older, Ok(late)));

    assert_eq!(flow.slots.items[0].id_horario, 8);
    assert!(!flow.slots.loading);
}

#[tokio::test]
async fn failed_slot_fetch_shows_error() {
    let t = patient_client_at("/turnos");
    t.transport.push(500, "");
    let mut flow = BookingFlow::new(TODAY, Notices::default());

    assert!(!flow.select_doctor(&t.api, doctor(7)).await);

    assert_eq!(flow.slots.error.as_deref(), Some(messages::SERVER_ERROR));
    assert_eq!(flow.step(), BookingStep::SelectingDate);
}

#[tokio::test]
async fn happy_path_booking_confirms() {
    let t = patient_client_at("/turnos");
    let notices = Notices::default();
    let mut flow = BookingFlow::new(TODAY, notices.clone());
    confirming(&t, &mut flow).await;
    t.transport.push_json(201, &json!({ "idCita": 55, "estado": "CONFIRMADA" }));

    assert!(flow.submit(&t.api).await);

    let req = t.transport.last_request();
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.url, "http://api.test/citas");
    assert_eq!(
        req.body,
        Body::Json(json!({ "doctorId": 7, "date": "2025-11-25T09:00:00", "description": "Consulta - Mañana" }))
    );
    assert_eq!(flow.step(), BookingStep::Confirmed);
    assert_eq!(flow.confirmed().map(|a| a.id_cita), Some(55));
    assert!(flow.doctor().is_none() && flow.slot().is_none());
    assert_eq!(t.nav.history().last(), Some(&NavEntry { path: "/cita-confirmada".into(), mode: NavMode::Push }));
    let notice = notices.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, messages::BOOKING_SUCCESS);
}

#[tokio::test]
async fn conflict_booking_stays_on_confirmation() {
    let t = patient_client_at("/turnos");
    let notices = Notices::default();
    let mut flow = BookingFlow::new(TODAY, notices.clone());
    confirming(&t, &mut flow).await;
    t.transport.push_json(409, &json!({ "message": "Este horario ya no está disponible" }));

    assert!(!flow.submit(&t.api).await);

    assert_eq!(flow.step(), BookingStep::Confirming);
    assert_eq!(flow.error(), Some("Este horario ya no está disponible"));
    assert_eq!(flow.slot().map(|s| s.id_horario), Some(2));
    assert!(flow.confirmed().is_none());
    assert_eq!(t.nav.current_path(), "/turnos");
    let notice = notices.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Este horario ya no está disponible");
}

#[tokio::test]
async fn rejection_without_message_uses_status_text() {
    let t = patient_client_at("/turnos");
    let mut flow = BookingFlow::new(TODAY, Notices::default());
    confirming(&t, &mut flow).await;
    t.transport.push(422, "");

    assert!(!flow.submit(&t.api).await);
    assert_eq!(flow.error(), Some(messages::BOOKING_PAST));
}

#[tokio::test]
async fn custom_description_is_sent() {
    let t = patient_client_at("/turnos");
    let mut flow = BookingFlow::new(TODAY, Notices::default());
    confirming(&t, &mut flow).await;
    flow.set_description("Dolor de pecho");
    t.transport.push_json(201, &json!({ "idCita": 56 }));

    assert!(flow.submit(&t.api).await);
    let Body::Json(body) = t.transport.last_request().body else { panic!("expected json") };
    assert_eq!(body["description"], "Dolor de pecho");
}

#[tokio::test]
async fn submit_without_session_sends_nothing() {
    let t = patient_client_at("/turnos");
    let mut flow = BookingFlow::new(TODAY, Notices::default());
    confirming(&t, &mut flow).await;
    t.store().clear().unwrap();
    let sent = t.transport.requests().len();

    assert!(!flow.submit(&t.api).await);

    assert_eq!(flow.error(), Some(messages::NO_SESSION));
    assert_eq!(t.transport.requests().len(), sent);
}

#[tokio::test]
async fn slot_earlier_today_is_past() {
    let t = patient_client_at("/turnos");
    let mut flow = BookingFlow::at(datetime!(2025 - 11 - 25 10:00), Notices::default());
    confirming(&t, &mut flow).await;
    let sent = t.transport.requests().len();

    assert!(!flow.submit(&t.api).await);

    assert_eq!(flow.error(), Some(messages::BOOKING_PAST));
    assert_eq!(t.transport.requests().len(), sent);
}

#[tokio::test]
async fn back_only_moves_to_earlier_steps() {
    let t = patient_client_at("/turnos");
    let mut flow = BookingFlow::new(TODAY, Notices::default());
    confirming(&t, &mut flow).await;

    assert!(flow.back_to(BookingStep::Confirmed).is_err());
    flow.back_to(BookingStep::SelectingDate).unwrap();
    assert_eq!(flow.step(), BookingStep::SelectingDate);
    assert!(flow.back_to(BookingStep::SelectingSlot).is_err());
}

#[tokio::test]
async fn confirmed_booking_can_only_start_over() {
    let t = patient_client_at("/turnos");
    let mut flow = BookingFlow::new(TODAY, Notices::default());
    confirming(&t, &mut flow).await;
    t.transport.push_json(201, &json!({ "idCita": 55 }));
    assert!(flow.submit(&t.api).await);

    assert!(flow.back_to(BookingStep::SelectingSlot).is_err());
    assert!(flow.back_to(BookingStep::SelectingDate).is_err());
    assert!(flow.back_to(BookingStep::Confirming).is_err());
    assert_eq!(flow.step(), BookingStep::Confirmed);

    flow.back_to(BookingStep::SelectingDoctor).unwrap();
    assert_eq!(flow.step(), BookingStep::SelectingDoctor);
    assert!(flow.confirmed().is_none());
}

#[test]
fn evening_in_lima_still_books_today() {
    let now = datetime!(2025 - 11 - 24 20:00 -5);
    let flow = BookingFlow::at(wall_clock(now), Notices::default());

    assert_eq!(flow.date_window().0, date!(2025 - 11 - 24));
    assert!(flow.check_date(date!(2025 - 11 - 24)).is_ok());
}

#[test]
fn fallback_text_by_status() {
    assert_eq!(booking_fallback(Some(400)), messages::BOOKING_INVALID);
    assert_eq!(booking_fallback(Some(404)), messages::BOOKING_NOT_FOUND);
    assert_eq!(booking_fallback(Some(409)), messages::BOOKING_CONFLICT);
    assert_eq!(booking_fallback(None), messages::BOOKING_ERROR);
}
