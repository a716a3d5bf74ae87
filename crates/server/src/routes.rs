pub mod auth;
pub mod forms;

use axum::{
    http::{header, Method},
    middleware,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::html::render_index;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn index() -> Html<String> {
    Html(render_index())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Any origin, GET/POST/OPTIONS, `Content-Type` and `Authorization` headers.
pub fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Build the full application router, including public and token-gated routes
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let bearer = || middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state);

    // Public routes (landing page, health, listing, account endpoints)
    let public: Router<ServerState> = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/formularios", get(forms::list))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login));

    // Submission, gated only when auth is required
    let submit: Router<ServerState> = Router::new().route("/api/formulario", post(forms::submit));
    let submit = if state.auth_required { submit.route_layer(bearer()) } else { submit };

    // Session check always needs a token
    let session: Router<ServerState> = Router::new()
        .route("/api/verify-token", get(auth::verify_token))
        .route_layer(bearer());

    public
        .merge(submit)
        .merge(session)
        .with_state(state.clone())
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
