use serde_json::json;

use super::*;
use crate::http::{Method, TransportError};
use crate::services::uploads::ImageInput;
use crate::state::NoticeLevel;
use crate::test_helpers::{TestClient, admin_client_at};

fn specialties_manager(t: &TestClient) -> (SpecialtiesManager, Notices) {
    let notices = Notices::default();
    (SpecialtiesManager::new(t.api.clone(), notices.clone()), notices)
}

fn cardio() -> serde_json::Value {
    json!([{ "idEspecialidad": 1, "nombre": "Cardiología" }])
}

#[tokio::test]
async fn load_fills_items() {
    let t = admin_client_at("/admin/especialidades");
    t.transport.push_json(200, &cardio());
    let (mut mgr, notices) = specialties_manager(&t);

    assert!(mgr.load().await);

    assert_eq!(mgr.items().len(), 1);
    assert!(!mgr.state.loading);
    assert!(notices.current().is_empty());
}

#[tokio::test]
async fn load_failure_sets_error_and_notice() {
    let t = admin_client_at("/admin/especialidades");
    t.transport.push_err(TransportError::Network("refused".into()));
    let (mut mgr, notices) = specialties_manager(&t);

    assert!(!mgr.load().await);

    assert_eq!(mgr.error(), Some(messages::CONNECTION_ERROR));
    assert!(mgr.items().is_empty());
    assert_eq!(notices.last().unwrap().level, NoticeLevel::Error);
}

#[tokio::test]
async fn create_reloads_on_success() {
    let t = admin_client_at("/admin/especialidades");
    t.transport.push_json(201, &json!({ "idEspecialidad": 1, "nombre": "Cardiología" }));
    t.transport.push_json(200, &cardio());
    let (mut mgr, notices) = specialties_manager(&t);

    let draft = SpecialtyDraft { nombre: "Cardiología".into(), descripcion: String::new(), imagen: ImageInput::None };
    assert!(mgr.save(None, &draft).await);

    let reqs = t.transport.requests();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[0].method, Method::Post);
    assert_eq!(reqs[1].method, Method::Get);
    assert_eq!(mgr.items().len(), 1);
    assert_eq!(notices.current()[0].message, messages::SPECIALTY_CREATED);
}

#[tokio::test]
async fn update_uses_updated_text() {
    let t = admin_client_at("/admin/especialidades");
    t.transport.push(200, "");
    t.transport.push_json(200, &cardio());
    let (mut mgr, notices) = specialties_manager(&t);

    let draft = SpecialtyDraft { nombre: "Cardiología".into(), ..SpecialtyDraft::default() };
    assert!(mgr.save(Some(1), &draft).await);

    assert_eq!(notices.current()[0].message, messages::SPECIALTY_UPDATED);
}

#[tokio::test]
async fn failed_mutation_keeps_server_message_and_skips_reload() {
    let t = admin_client_at("/admin/doctores");
    t.transport.push_json(409, &json!({ "message": "El doctor tiene citas activas" }));
    let notices = Notices::default();
    let mut mgr = DoctorsManager::new(t.api.clone(), notices.clone());

    assert!(!mgr.delete(7).await);

    assert_eq!(mgr.error(), Some("El doctor tiene citas activas"));
    assert_eq!(notices.last().unwrap().message, "El doctor tiene citas activas");
    assert_eq!(t.transport.requests().len(), 1);
}

#[tokio::test]
async fn failed_mutation_without_message_uses_fallback() {
    let t = admin_client_at("/admin/horarios");
    t.transport.push(404, "");
    let mut mgr = SchedulesManager::new(t.api.clone(), Notices::default());

    assert!(!mgr.delete(3).await);

    assert_eq!(mgr.error(), Some(messages::SCHEDULE_DELETE_ERROR));
}

#[tokio::test]
async fn validation_failure_is_reported_without_request() {
    let t = admin_client_at("/admin/doctores");
    let mut mgr = DoctorsManager::new(t.api.clone(), Notices::default());

    let draft = DoctorDraft { nombre: "Dr. Ruiz".into(), especialidad: String::new(), ..DoctorDraft::default() };
    assert!(!mgr.save(None, &draft).await);

    assert_eq!(mgr.error(), Some("Debes seleccionar una especialidad"));
    assert!(t.transport.requests().is_empty());
}
