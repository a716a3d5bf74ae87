use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Submission payload; `nombre` and `mensaje` are accepted as aliases.
#[derive(ToSchema)]
pub struct FormRequest { pub name: String, pub email: String, pub message: String }

#[derive(ToSchema)]
pub struct CredentialsRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct LoginResponse { pub token: String, pub username: String, pub expiresAt: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::forms::submit,
        crate::routes::forms::list,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::verify_token,
    ),
    components(
        schemas(
            HealthResponse,
            FormRequest,
            CredentialsRequest,
            LoginResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "forms"),
        (name = "auth")
    )
)]
pub struct ApiDoc;
