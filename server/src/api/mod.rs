pub mod auth;
pub mod error;
pub mod extract;
pub mod ingredients;
pub mod pagination;
pub mod recipes;
pub mod tags;
pub mod users;

pub use error::{ApiError, ApiResult};

use crate::AppState;
use axum::Router;
use serde::Serialize;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Request field the error refers to, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            field: None,
        }
    }
}

/// All API routes. Paths are absolute and carry no trailing slash; `main`
/// strips trailing slashes before routing.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(tags::router())
        .merge(ingredients::router())
        .merge(recipes::router())
}

/// OpenAPI document for the whole API: shared components, the token
/// security scheme and every resource module's paths.
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Foodgram API"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut doc = BaseApi::openapi();

    if let Some(components) = doc.components.as_mut() {
        components.add_security_scheme(
            "token_auth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "Token <auth_token>",
            ))),
        );
    }

    for module in [
        auth::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        tags::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
    ] {
        doc.paths.paths.extend(module.paths.paths);
        if let (Some(into), Some(from)) = (doc.components.as_mut(), module.components) {
            into.schemas.extend(from.schemas);
        }
    }

    doc
}
