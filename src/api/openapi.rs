use utoipa::OpenApi;

use crate::api::handlers::HealthResponse;
use crate::errors::{ErrorPayload, ExceptionDetail, FieldViolation};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "API Template",
        version = "0.1.0",
        description = "Minimal JSON web-service template. Every failure is answered with a JSON error payload.",
    ),
    paths(
        crate::api::handlers::health,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorPayload,
            ExceptionDetail,
            FieldViolation,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
