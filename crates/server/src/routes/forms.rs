use axum::{
    extract::{Query, State},
    http::{header::ACCEPT, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use service::records::domain::FormInput;

use crate::errors::ApiError;
use crate::extract::JsonOrForm;
use crate::html::render_records;
use crate::routes::auth::AuthenticatedUser;
use crate::state::ServerState;

/// Acknowledgement text the existing web form displays.
pub const SUBMIT_ACK: &str = "Formulario recibido con éxito.";

#[derive(Serialize)]
pub struct SubmitOutput {
    pub ok: bool,
    #[serde(rename = "mensaje")]
    pub message: &'static str,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// `json` for the raw array, anything else for HTML.
    pub format: Option<String>,
}

#[utoipa::path(post, path = "/api/formulario", tag = "forms", request_body = crate::openapi::FormRequest, responses((status = 201, description = "Stored"), (status = 400, description = "Missing field"), (status = 401, description = "Missing token"), (status = 403, description = "Invalid or expired token"), (status = 500, description = "Storage failure")))]
pub async fn submit(
    State(state): State<ServerState>,
    user: Option<Extension<AuthenticatedUser>>,
    JsonOrForm(input): JsonOrForm<FormInput>,
) -> Result<(StatusCode, Json<SubmitOutput>), ApiError> {
    let submitted_by = if state.auth_required { user.map(|Extension(u)| u.0) } else { None };
    state.forms.submit(input, submitted_by).await?;
    Ok((StatusCode::CREATED, Json(SubmitOutput { ok: true, message: SUBMIT_ACK })))
}

/// JSON when asked for explicitly (`?format=json` or an Accept header
/// preferring it), otherwise the HTML table.
#[utoipa::path(get, path = "/api/formularios", tag = "forms", params(ListParams), responses((status = 200, description = "All submissions, HTML or JSON"), (status = 500, description = "Storage failure")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let records = state.forms.list_all().await?;
    if wants_json(&params, &headers) {
        return Ok(Json(records).into_response());
    }
    Ok(Html(render_records(&records)).into_response())
}

fn wants_json(params: &ListParams, headers: &HeaderMap) -> bool {
    if let Some(format) = params.format.as_deref() {
        return format.eq_ignore_ascii_case("json");
    }
    let accept = headers.get(ACCEPT).and_then(|v| v.to_str().ok()).unwrap_or("");
    accept.contains("application/json") && !accept.contains("text/html")
}
