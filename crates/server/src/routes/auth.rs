use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

use service::auth::domain::{LoginInput, RegisterInput, SessionToken};

use crate::errors::ApiError;
use crate::extract::JsonOrForm;
use crate::state::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";

/// Username recovered from a verified bearer token, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

#[derive(Serialize)]
pub struct RegisterOutput { pub ok: bool, pub username: String }

#[derive(Serialize)]
pub struct VerifyOutput { pub valid: bool, pub user: String }

#[utoipa::path(post, path = "/api/register", tag = "auth", request_body = crate::openapi::CredentialsRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Missing fields or username taken")))]
pub async fn register(
    State(state): State<ServerState>,
    JsonOrForm(input): JsonOrForm<RegisterInput>,
) -> Result<(StatusCode, Json<RegisterOutput>), ApiError> {
    let cred = state.auth.register_input(input).await?;
    Ok((StatusCode::CREATED, Json(RegisterOutput { ok: true, username: cred.username })))
}

#[utoipa::path(post, path = "/api/login", tag = "auth", request_body = crate::openapi::CredentialsRequest, responses((status = 200, description = "Logged in", body = crate::openapi::LoginResponse), (status = 401, description = "Invalid credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    JsonOrForm(input): JsonOrForm<LoginInput>,
) -> Result<(CookieJar, Json<SessionToken>), ApiError> {
    let session = state.auth.login(input).await?;

    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(session)))
}

#[utoipa::path(get, path = "/api/verify-token", tag = "auth", responses((status = 200, description = "Token valid"), (status = 401, description = "Missing token"), (status = 403, description = "Invalid or expired token")))]
pub async fn verify_token(Extension(user): Extension<AuthenticatedUser>) -> Json<VerifyOutput> {
    Json(VerifyOutput { valid: true, user: user.0 })
}

/// `Authorization: Bearer <token>`, falling back to the `auth_token` cookie
/// set at login. A non-Bearer Authorization header counts as no token.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    if let Some(h) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return h
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
    }
    CookieJar::from_headers(headers)
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

/// Route middleware: a missing token is 401, an invalid or expired one 403.
/// Expiry is checked here on every call; there is no session table.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    let path = req.uri().path().to_string();

    let Some(token) = bearer_token(req.headers()) else {
        tracing::warn!(%path, "missing bearer token");
        return Err(ApiError::Unauthorized("missing bearer token".into()));
    };

    match state.auth.verify_token(&token) {
        Ok(user) => {
            req.extensions_mut().insert(AuthenticatedUser(user.username));
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(%path, code = e.code(), "token_rejected");
            Err(ApiError::Forbidden("invalid or expired token".into()))
        }
    }
}
