//! OpenAPI document and Swagger UI wiring.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers;
use super::handlers::auth::types::{
    ApiMessage, AuthResponse, ErrorResponse, FieldViolation, Role, SigninRequest, SignupRequest,
    User, ValidationErrorResponse,
};
use super::handlers::health::Health;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "wrapjet",
        description = "User accounts API with role-based request protection"
    ),
    paths(
        handlers::health::health,
        handlers::root::api_status,
        handlers::auth::signup,
        handlers::auth::signin,
        handlers::auth::signout,
    ),
    components(schemas(
        ApiMessage,
        AuthResponse,
        ErrorResponse,
        FieldViolation,
        Health,
        Role,
        SigninRequest,
        SignupRequest,
        User,
        ValidationErrorResponse,
    )),
    tags(
        (name = "auth", description = "Signup, signin and signout"),
        (name = "status", description = "Liveness and service status"),
    )
)]
struct ApiDoc;

/// Swagger UI at `/docs`, spec at `/api-docs/openapi.json`.
pub(super) fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
