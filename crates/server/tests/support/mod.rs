#![allow(dead_code)]
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use configs::AppConfig;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

/// Defaults with an isolated data dir under the system temp dir.
pub fn test_config(auth_required: bool) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.storage.data_dir = std::env::temp_dir()
        .join(format!("form_server_{}", Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();
    cfg.auth.required = auth_required;
    cfg.auth.jwt_secret = "test-secret".into();
    cfg
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?)
}

pub fn get(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().method("GET").uri(uri).body(Body::empty())?)
}

pub async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<Response<Body>> {
    Ok(app.clone().oneshot(req).await?)
}

pub async fn body_text(resp: Response<Body>) -> anyhow::Result<String> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

pub async fn body_json(resp: Response<Body>) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn cleanup(cfg: &AppConfig) {
    let _ = tokio::fs::remove_dir_all(&cfg.storage.data_dir).await;
}
