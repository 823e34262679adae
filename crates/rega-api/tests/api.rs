//! End-to-end tests of the legacy route surface against in-memory
//! collaborators.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use rega_api::state::AppStateInner;
use rega_auth::memory::MemoryIdentity;
use rega_store::DeviceStore;
use rega_store::memory::MemoryStore;

fn test_app() -> (Router, Arc<MemoryStore>, Arc<MemoryIdentity>) {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(MemoryIdentity::new());
    let state = Arc::new(AppStateInner {
        store: store.clone(),
        identity: identity.clone(),
    });
    (rega_api::router(state), store, identity)
}

async fn post(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn register_ana(app: &Router) -> Value {
    let (status, body) = post(
        app,
        "/api/v1/auth/register",
        json!({"email": "a@x.com", "password": "Secret123!", "name": "Ana", "accessToken": "dev-1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

fn report(rg: &str) -> Value {
    json!({
        "userId": "a@x.com", "accessToken": "dev-1",
        "MS": 1, "UA": 2, "TP": 3, "RL": false, "S1": 0, "S2": 0, "RG": rg
    })
}

#[tokio::test]
async fn register_then_login_returns_provisioned_device() {
    let (app, store, _) = test_app();

    let body = register_ana(&app).await;
    assert_eq!(body["message"], "Usuário registrado com sucesso");
    assert_eq!(body["user"]["name"], "Ana");
    let owner = body["user"]["id"].as_str().unwrap();
    assert!(!owner.is_empty());

    let profile = store.user_profile(owner).await.unwrap();
    assert_eq!(profile.name, "Ana");
    assert_eq!(profile.email, "a@x.com");

    let (status, body) = post(
        &app,
        "/api/v1/auth/login",
        json!({"email": "a@x.com", "password": "Secret123!"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login bem-sucedido");

    let devices = body["userData"].as_array().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0]["device"], "dev-1");
    // Fresh device carries the zeroed snapshot.
    assert_eq!(devices[0]["data"]["MS"], json!(0.0));
    assert_eq!(devices[0]["data"]["RG"], json!(false));
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let (app, _, _) = test_app();
    register_ana(&app).await;

    let (status, body) = post(
        &app,
        "/api/v1/auth/login",
        json!({"email": "a@x.com", "password": "nope99"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Credenciais inválidas");
}

#[tokio::test]
async fn login_with_missing_fields_is_400() {
    let (app, _, _) = test_app();
    let (status, body) = post(&app, "/api/v1/auth/login", json!({"email": "a@x.com"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Todos os campos são obrigatórios");
}

#[tokio::test]
async fn duplicate_registration_maps_provider_code_to_message() {
    let (app, _, _) = test_app();
    register_ana(&app).await;

    let (status, body) = post(
        &app,
        "/api/v1/auth/register",
        json!({"email": "a@x.com", "password": "Other123!", "name": "Bia", "accessToken": "dev-2"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Este e-mail já está em uso. Por favor, use outro.");
}

#[tokio::test]
async fn weak_password_registration_is_mapped() {
    let (app, _, _) = test_app();
    let (status, body) = post(
        &app,
        "/api/v1/auth/register",
        json!({"email": "b@x.com", "password": "abc", "name": "Bia", "accessToken": "dev-2"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "A senha fornecida é fraca. Escolha uma senha mais forte.");
}

#[tokio::test]
async fn data_receive_ingests_snapshot_and_records_alert() {
    let (app, store, _) = test_app();
    let registered = register_ana(&app).await;
    let owner = registered["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = post(&app, "/api/v1/realtime/data-receive", report("true")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let devices = store.list_devices(&owner).await.unwrap();
    let snapshot = devices[0].telemetry.clone().unwrap();
    assert_eq!(snapshot.ms, 1.0);
    assert_eq!(snapshot.ua, 2.0);
    assert_eq!(snapshot.tp, 3.0);
    assert!(!snapshot.rl);
    assert!(snapshot.rg);
    assert_eq!(devices[0].alerts.len(), 1);
    assert_eq!(devices[0].alerts[0].message, "Irrigação realizada");
}

#[tokio::test]
async fn data_receive_with_missing_field_mutates_nothing() {
    let (app, _, _) = test_app();
    register_ana(&app).await;

    let mut body = report("true");
    body.as_object_mut().unwrap().remove("TP");
    let (status, reply) = post(&app, "/api/v1/realtime/data-receive", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["error"], "Todos os campos são obrigatórios");

    // The snapshot is still the zeroed one from provisioning and no
    // alert was logged.
    let (_, login) = post(
        &app,
        "/api/v1/auth/login",
        json!({"email": "a@x.com", "password": "Secret123!"}),
    )
    .await;
    assert_eq!(login["userData"][0]["data"]["TP"], json!(0.0));

    let (status, _) = post(
        &app,
        "/api/v1/realtime/alerts",
        json!({"email": "a@x.com", "password": "Secret123!"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn data_receive_for_unknown_user_is_404() {
    let (app, _, _) = test_app();

    let (status, body) = post(&app, "/api/v1/realtime/data-receive", report("false")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Usuário não encontrado");
}

#[tokio::test]
async fn alerts_endpoint_lists_formatted_log_in_insertion_order() {
    let (app, _, _) = test_app();
    register_ana(&app).await;

    post(&app, "/api/v1/realtime/data-receive", report("true")).await;
    post(&app, "/api/v1/realtime/data-receive", report("true")).await;

    let (status, body) = post(
        &app,
        "/api/v1/realtime/alerts",
        json!({"email": "a@x.com", "password": "Secret123!"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login bem-sucedido");

    let devices = body["userData"].as_array().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0]["device"], "dev-1");

    // Two reports with RG set mean two alerts; no deduplication.
    let alerts = devices[0]["alertas"].as_array().unwrap();
    assert_eq!(alerts.len(), 2);
    for alert in alerts {
        assert_eq!(alert["mensagem"], "Irrigação realizada");
        assert!(alert["timestamp"]["day"].as_str().unwrap().contains('/'));
        assert!(alert["timestamp"]["time"].as_str().unwrap().contains(':'));
    }
}

#[tokio::test]
async fn alerts_endpoint_without_alerts_is_404() {
    let (app, _, _) = test_app();
    register_ana(&app).await;

    let (status, body) = post(
        &app,
        "/api/v1/realtime/alerts",
        json!({"email": "a@x.com", "password": "Secret123!"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Dados do usuário não encontrados");
}

#[tokio::test]
async fn reset_password_acks_for_known_email_and_fails_closed_otherwise() {
    let (app, _, _) = test_app();
    register_ana(&app).await;

    let (status, body) = post(&app, "/api/v1/auth/reset-password", json!({"email": "a@x.com"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "E-mail de redefinição de senha enviado com sucesso");

    // Open question preserved: unknown emails surface the provider
    // failure as a generic 500 instead of an enumeration-safe ack.
    let (status, body) = post(&app, "/api/v1/auth/reset-password", json!({"email": "b@x.com"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Erro interno do servidor");
}
