mod support;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use server::routes;
use server::state::ServerState;
use service::auth::{repository::mock::MockCredentialRepository, service::AuthConfig, AuthService};
use service::records::{repository::mock::InMemoryRecordRepository, FormService};
use support::{body_json, body_text, cleanup, get, json_request, send, test_config};

#[tokio::test]
async fn submit_then_list_as_json() -> anyhow::Result<()> {
    let cfg = test_config(false);
    let app = server::startup::build_app(&cfg).await?;

    let resp = send(&app, get("/api/formularios?format=json")?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await?, json!([]));

    let payload = json!({"name": "Ana", "email": "ana@example.com", "message": "hola"});
    let resp = send(&app, json_request("POST", "/api/formulario", &payload)?).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await?, json!({"ok": true, "mensaje": "Formulario recibido con éxito."}));

    let payload = json!({"name": "Bea", "email": "bea@example.com", "message": "adiós", "submittedAt": "1999-01-01T00:00:00Z"});
    let resp = send(&app, json_request("POST", "/api/formulario", &payload)?).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(&app, get("/api/formularios?format=json")?).await?;
    let list = body_json(resp).await?;
    let items = list.as_array().cloned().unwrap_or_default();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Ana");
    assert_eq!(items[1]["name"], "Bea");
    // client-supplied timestamps are ignored
    assert_ne!(items[1]["submittedAt"], "1999-01-01T00:00:00Z");
    assert!(items[0].get("submittedBy").is_none());

    // the file on disk holds the same pretty-printed array
    let raw = tokio::fs::read_to_string(cfg.storage.records_path()).await?;
    assert!(raw.starts_with("[\n"));
    assert!(raw.contains("\"message\": \"adiós\""));
    cleanup(&cfg).await;
    Ok(())
}

#[tokio::test]
async fn missing_fields_are_rejected_without_writing() -> anyhow::Result<()> {
    let cfg = test_config(false);
    let app = server::startup::build_app(&cfg).await?;

    for payload in [
        json!({"email": "a@example.com", "message": "hola"}),
        json!({"name": "Ana", "email": "", "message": "hola"}),
        json!({"name": "Ana", "email": "a@example.com", "message": "   "}),
        json!({}),
    ] {
        let resp = send(&app, json_request("POST", "/api/formulario", &payload)?).await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await?["error"].is_string());
    }

    let resp = send(&app, get("/api/formularios?format=json")?).await?;
    assert_eq!(body_json(resp).await?, json!([]));
    cleanup(&cfg).await;
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_a_json_400() -> anyhow::Result<()> {
    let cfg = test_config(false);
    let app = server::startup::build_app(&cfg).await?;

    let req = Request::builder()
        .method("POST")
        .uri("/api/formulario")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))?;
    let resp = send(&app, req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await?["error"].is_string());
    cleanup(&cfg).await;
    Ok(())
}

#[tokio::test]
async fn urlencoded_spanish_form_is_accepted() -> anyhow::Result<()> {
    let cfg = test_config(false);
    let app = server::startup::build_app(&cfg).await?;

    let req = Request::builder()
        .method("POST")
        .uri("/api/formulario")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("nombre=Ana&email=ana%40example.com&mensaje=hola+mundo"))?;
    let resp = send(&app, req).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(&app, get("/api/formularios?format=json")?).await?;
    let list = body_json(resp).await?;
    assert_eq!(list[0]["name"], "Ana");
    assert_eq!(list[0]["email"], "ana@example.com");
    assert_eq!(list[0]["message"], "hola mundo");
    cleanup(&cfg).await;
    Ok(())
}

#[tokio::test]
async fn listing_defaults_to_escaped_html() -> anyhow::Result<()> {
    let cfg = test_config(false);
    let app = server::startup::build_app(&cfg).await?;

    let payload = json!({"name": "<b>Ana</b>", "email": "ana@example.com", "message": "hola"});
    send(&app, json_request("POST", "/api/formulario", &payload)?).await?;

    let resp = send(&app, get("/api/formularios")?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp.headers().get("content-type").and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
    assert!(ct.starts_with("text/html"));
    let html = body_text(resp).await?;
    assert!(html.contains("&lt;b&gt;Ana&lt;/b&gt;"));
    assert!(html.contains("<table>"));

    // Accept header also selects JSON
    let req = Request::builder().uri("/api/formularios").header("accept", "application/json").body(Body::empty())?;
    let resp = send(&app, req).await?;
    assert_eq!(body_json(resp).await?[0]["name"], "<b>Ana</b>");
    cleanup(&cfg).await;
    Ok(())
}

#[tokio::test]
async fn storage_failure_is_a_500() -> anyhow::Result<()> {
    let state = ServerState {
        forms: Arc::new(FormService::new(Arc::new(InMemoryRecordRepository::failing()), configs::TimestampFormat::Iso)),
        auth: Arc::new(AuthService::new(Arc::new(MockCredentialRepository::default()), AuthConfig::new("test-secret"))),
        auth_required: false,
    };
    let app = routes::build_router(state, routes::build_cors());

    let payload = json!({"name": "Ana", "email": "ana@example.com", "message": "hola"});
    let resp = send(&app, json_request("POST", "/api/formulario", &payload)?).await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await?["error"], "form storage unavailable");
    Ok(())
}

#[tokio::test]
async fn corrupt_records_file_fails_append_and_listing() -> anyhow::Result<()> {
    let cfg = test_config(false);
    let app = server::startup::build_app(&cfg).await?;
    tokio::fs::write(cfg.storage.records_path(), "not json").await?;

    let payload = json!({"name": "Ana", "email": "ana@example.com", "message": "hola"});
    let resp = send(&app, json_request("POST", "/api/formulario", &payload)?).await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(tokio::fs::read_to_string(cfg.storage.records_path()).await?, "not json");

    let resp = send(&app, get("/api/formularios?format=json")?).await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    cleanup(&cfg).await;
    Ok(())
}

#[tokio::test]
async fn landing_health_and_openapi() -> anyhow::Result<()> {
    let cfg = test_config(false);
    let app = server::startup::build_app(&cfg).await?;

    let resp = send(&app, get("/")?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await?.contains("Servidor de formularios activo"));

    let resp = send(&app, get("/health")?).await?;
    assert_eq!(body_json(resp).await?, json!({"status": "ok"}));

    let resp = send(&app, get("/api-docs/openapi.json")?).await?;
    let doc = body_json(resp).await?;
    assert!(doc["paths"]["/api/formulario"].is_object());
    cleanup(&cfg).await;
    Ok(())
}
