use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use chrono::Duration;
use configs::AppConfig;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;
use service::{
    auth::{repo::file::JsonFileCredentialRepository, service::AuthConfig, AuthService},
    records::{repo::file::JsonFileRecordRepository, FormService},
    runtime,
};

/// Open both stores and wire the services.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let records = JsonFileRecordRepository::new(cfg.storage.records_path()).await?;
    let credentials = JsonFileCredentialRepository::new(cfg.storage.credentials_path()).await?;

    let token_ttl = i64::try_from(cfg.auth.token_ttl_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| StartupError::InvalidConfig("auth.token_ttl_secs too large".into()))?;
    if cfg.auth.jwt_secret == configs::DEV_JWT_SECRET {
        warn!("using the development JWT secret; set JWT_SECRET in production");
    }
    let auth_cfg = AuthConfig { jwt_secret: cfg.auth.jwt_secret.clone(), token_ttl };

    Ok(ServerState {
        forms: Arc::new(FormService::new(records, cfg.forms.timestamp_format)),
        auth: Arc::new(AuthService::new(credentials, auth_cfg)),
        auth_required: cfg.auth.required,
    })
}

/// Router with state, CORS and tracing layers applied.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let state = build_state(cfg).await?;
    Ok(routes::build_router(state, routes::build_cors()))
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    run_until(cfg, shutdown_signal()).await
}

/// Serve until `shutdown` resolves. In-flight requests, including a store
/// append, are allowed to finish before this returns.
pub async fn run_until<S>(cfg: AppConfig, shutdown: S) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    runtime::ensure_env(&cfg.storage.data_dir, &[cfg.storage.records_file.as_str(), cfg.storage.credentials_file.as_str()]).await?;

    let app = build_app(&cfg).await?;

    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(
        %addr,
        auth_required = cfg.auth.required,
        timestamp_format = ?cfg.forms.timestamp_format,
        records = %cfg.storage.records_path().display(),
        "starting form server"
    );
    serve_until(listener, app, shutdown).await
}

pub async fn serve_until<S>(listener: tokio::net::TcpListener, app: Router, shutdown: S) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server drained and stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl_c handler unavailable; serving until the process is killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, draining connections");
}
