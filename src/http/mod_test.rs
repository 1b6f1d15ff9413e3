use serde::Deserialize;
use serde_json::json;

use super::*;
use crate::nav::NavMode;
use crate::session::{KeyValueStore, TOKEN_KEY, USER_KEY};
use crate::test_helpers::{BASE_URL, client_at, patient_client_at, patient_session};

#[derive(Debug, Deserialize, PartialEq)]
struct Item {
    id: i64,
}

#[tokio::test]
async fn attaches_bearer_token_when_logged_in() {
    let t = patient_client_at("/cliente");
    t.transport.push(200, "[]");

    let _: Vec<Item> = t.api.get_list("/especialidades").await.unwrap();

    let req = t.transport.last_request();
    assert_eq!(req.method, Method::Get);
    assert_eq!(req.url, format!("{BASE_URL}/especialidades"));
    assert_eq!(req.header("authorization"), Some("Bearer tok-paciente"));
}

#[tokio::test]
async fn no_token_means_no_authorization_header() {
    let t = client_at("/especialidades", None);
    t.transport.push(200, "[]");

    let _: Vec<Item> = t.api.get_list("/especialidades").await.unwrap();

    assert_eq!(t.transport.last_request().header("Authorization"), None);
}

#[tokio::test]
async fn corrupt_user_does_not_block_credentials() {
    let t = client_at("/cliente", None);
    t.kv.set(TOKEN_KEY, "tok-raw").unwrap();
    t.kv.set(USER_KEY, "{broken").unwrap();
    t.transport.push(200, "{\"id\":1}");

    let item: Item = t.api.get("/doctores/1").await.unwrap();

    assert_eq!(item, Item { id: 1 });
    assert_eq!(t.transport.last_request().header("Authorization"), Some("Bearer tok-raw"));
}

#[tokio::test]
async fn unauthorized_on_protected_page_logs_out() {
    let t = patient_client_at("/cliente/citas");
    t.transport.push(401, r#"{"message":"Token expirado"}"#);

    let err = t.api.get::<Value>("/citas/usuario/12").await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { ref message } if message.as_deref() == Some("Token expirado")));
    assert!(t.kv.is_empty());
    assert_eq!(t.nav.current_path(), "/login");
    assert_eq!(t.nav.history().last().unwrap().mode, NavMode::Reload);
}

#[tokio::test]
async fn unauthorized_on_public_page_keeps_session() {
    let t = patient_client_at("/especialidades");
    t.transport.push(401, "");

    let err = t.api.get_list::<Item>("/especialidades").await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { message: None }));
    assert_eq!(t.store().load(), crate::session::SessionState::Active(patient_session()));
    assert_eq!(t.nav.current_path(), "/especialidades");
    assert_eq!(t.nav.history().len(), 1);
}

#[tokio::test]
async fn unauthorized_on_root_keeps_session() {
    let t = patient_client_at("/");
    t.transport.push(401, "");

    let _ = t.api.get::<Value>("/auth/me").await;

    assert!(t.store().token().is_some());
}

#[tokio::test]
async fn other_statuses_pass_through_without_side_effects() {
    let t = patient_client_at("/cliente/turnos");
    t.transport.push(409, r#"{"message":"Este horario ya no está disponible"}"#);
    t.transport.push(403, "Forbidden");

    let conflict = t.api.post::<_, Value>("/citas", &json!({})).await.unwrap_err();
    let forbidden = t.api.get::<Value>("/usuarios").await.unwrap_err();

    assert_eq!(conflict.status(), Some(409));
    assert_eq!(conflict.server_message(), Some("Este horario ya no está disponible"));
    assert_eq!(forbidden.status(), Some(403));
    assert!(t.store().token().is_some());
    assert_eq!(t.nav.current_path(), "/cliente/turnos");
    // One attempt each; nothing retried.
    assert_eq!(t.transport.requests().len(), 2);
}

#[tokio::test]
async fn get_list_treats_non_array_as_empty() {
    let t = client_at("/especialidades", None);
    t.transport.push(200, r#"{"content":[]}"#);
    t.transport.push(200, "");

    assert!(t.api.get_list::<Item>("/especialidades").await.unwrap().is_empty());
    assert!(t.api.get_list::<Item>("/especialidades").await.unwrap().is_empty());
}

#[tokio::test]
async fn get_list_rejects_malformed_elements() {
    let t = client_at("/", None);
    t.transport.push(200, r#"[{"id":"x"}]"#);

    let err = t.api.get_list::<Item>("/doctores").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn json_body_and_empty_responses() {
    let t = patient_client_at("/admin");
    t.transport.push(200, "");
    t.transport.push(204, "");

    t.api.put_empty::<()>("/citas/3/cancelar").await.unwrap();
    t.api.delete("/doctores/9").await.unwrap();

    let reqs = t.transport.requests();
    assert_eq!(reqs[0].method, Method::Put);
    assert_eq!(reqs[0].body, Body::Empty);
    assert_eq!(reqs[1].method, Method::Delete);
    assert_eq!(reqs[1].url, format!("{BASE_URL}/doctores/9"));
}

#[tokio::test]
async fn post_sends_json_body() {
    let t = client_at("/login", None);
    t.transport.push(200, "{\"id\":4}");

    let item: Item = t.api.post("/auth/login", &json!({"email": "a@b.pe"})).await.unwrap();

    assert_eq!(item.id, 4);
    assert_eq!(t.transport.last_request().body, Body::Json(json!({"email": "a@b.pe"})));
}

#[tokio::test]
async fn transport_failures_surface_as_connectivity() {
    let t = patient_client_at("/cliente");
    t.transport.push_err(TransportError::Timeout);

    let err = t.api.get::<Value>("/auth/me").await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout));
    assert_eq!(err.category(), ErrorCategory::Connectivity);
    assert!(t.store().token().is_some());
}

#[test]
fn builds_image_urls() {
    let t = client_at("/", None);
    assert_eq!(
        t.api.image_url(ImageKind::Doctor, "abc.png").as_deref(),
        Some("http://api.test/doctores/imagen/abc.png")
    );
    assert_eq!(
        t.api.image_url(ImageKind::Specialty, "cardio.jpg").as_deref(),
        Some("http://api.test/images/especialidades/cardio.jpg")
    );
    assert_eq!(t.api.image_url(ImageKind::Doctor, "  "), None);
}

#[test]
fn url_joins_relative_paths() {
    let t = client_at("/", None);
    assert_eq!(t.api.url("citas"), "http://api.test/citas");
    assert_eq!(t.api.url("/citas"), "http://api.test/citas");
}
