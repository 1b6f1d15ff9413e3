use serde_json::json;

use super::*;
use crate::test_helpers::patient_client_at;

fn cita(id: i64, estado: &str, fecha: Option<&str>, hora: Option<&str>) -> Appointment {
    Appointment {
        id_cita: id,
        estado: estado.into(),
        fecha: fecha.map(Into::into),
        hora: hora.map(Into::into),
        doctor: None,
        especialidad: None,
        paciente: None,
        descripcion: None,
    }
}

#[test]
fn decodes_either_field_spelling() {
    let a: Appointment = serde_json::from_value(json!({
        "idCita": 55, "estado": "CONFIRMADA", "fechaCita": "2025-11-25", "horaCita": "09:00:00",
        "doctor": { "idDoctor": 7, "nombre": "Dr. Ruiz" }, "motivo": "Control"
    }))
    .unwrap();
    assert_eq!(a.fecha.as_deref(), Some("2025-11-25"));
    assert_eq!(a.hora.as_deref(), Some("09:00:00"));
    assert_eq!(a.doctor_name(), Some("Dr. Ruiz"));
    assert_eq!(a.descripcion.as_deref(), Some("Control"));

    let b: Appointment = serde_json::from_value(json!({ "idCita": 1, "doctor": "Dra. Paz" })).unwrap();
    assert_eq!(b.doctor_name(), Some("Dra. Paz"));
    assert_eq!(b.estado, "");
}

#[test]
fn active_means_estado_activa() {
    let all = vec![cita(1, "ACTIVA", None, None), cita(2, "CANCELADA", None, None), cita(3, "activa", None, None)];
    let ids: Vec<_> = active(&all).iter().map(|a| a.id_cita).collect();
    assert_eq!(ids, [1]);
}

#[test]
fn sorts_by_date_then_time_undated_last() {
    let mut all = vec![
        cita(1, "ACTIVA", None, None),
        cita(2, "ACTIVA", Some("2025-11-26"), Some("08:00")),
        cita(3, "ACTIVA", Some("2025-11-25"), Some("10:00")),
        cita(4, "ACTIVA", Some("2025-11-25"), Some("09:00")),
    ];
    sort_by_date(&mut all);
    let ids: Vec<_> = all.iter().map(|a| a.id_cita).collect();
    assert_eq!(ids, [4, 3, 2, 1]);
}

#[tokio::test]
async fn create_posts_booking_payload() {
    let t = patient_client_at("/turnos");
    t.transport.push_json(201, &json!({ "idCita": 55, "estado": "CONFIRMADA" }));

    let req = BookingRequest { doctor_id: 7, date: "2025-11-25T09:00:00".into(), description: "Consulta - MAÑANA".into() };
    let created = create(&t.api, &req).await.unwrap();

    assert_eq!(created.id_cita, 55);
    assert_eq!(
        t.transport.last_request().body,
        Body::Json(json!({ "doctorId": 7, "date": "2025-11-25T09:00:00", "description": "Consulta - MAÑANA" }))
    );
}

#[tokio::test]
async fn cancel_puts_without_body() {
    let t = patient_client_at("/cliente/citas");
    t.transport.push(200, "Cita cancelada");

    cancel(&t.api, 9).await.unwrap();

    let req = t.transport.last_request();
    assert_eq!(req.method, Method::Put);
    assert_eq!(req.url, "http://api.test/citas/9/cancelar");
    assert_eq!(req.body, Body::Empty);
}

#[tokio::test]
async fn list_by_user_path() {
    let t = patient_client_at("/cliente/citas");
    t.transport.push(200, "[]");

    list_by_user(&t.api, 12).await.unwrap();

    assert_eq!(t.transport.last_request().url, "http://api.test/citas/usuario/12");
}

#[tokio::test]
async fn get_reads_doctor_object() {
    let t = patient_client_at("/cliente/citas");
    t.transport.push_json(200, &json!({ "idCita": 9, "estado": "ACTIVA", "doctor": { "nombre": "Dr. Ruiz" } }));

    let cita = get(&t.api, 9).await.unwrap();

    assert_eq!(cita.doctor_name(), Some("Dr. Ruiz"));
    assert_eq!(t.transport.last_request().url, "http://api.test/citas/9");
}
