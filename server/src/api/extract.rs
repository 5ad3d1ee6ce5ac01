//! Request extractors whose rejections render as [`ApiError`] JSON bodies
//! instead of axum's plain-text defaults.

use super::ApiError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation {
            field: None,
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation {
            field: None,
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation {
            field: None,
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::{get, post};
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    #[allow(dead_code)]
    struct Payload {
        name: String,
        cooking_time: i32,
    }

    #[derive(Deserialize)]
    #[allow(dead_code)]
    struct Params {
        limit: Option<i64>,
    }

    fn app() -> Router {
        Router::new()
            .route("/items", post(|ApiJson(_): ApiJson<Payload>| async { "ok" }))
            .route("/items/{id}", get(|ApiPath(_): ApiPath<i32>| async { "ok" }))
            .route("/search", get(|ApiQuery(_): ApiQuery<Params>| async { "ok" }))
    }

    async fn send(request: Request<Body>) -> (StatusCode, String, serde_json::Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, serde_json::from_slice(&body).unwrap())
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::post("/items")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_body_field_is_json_400() {
        let (status, content_type, body) = send(post_json(r#"{"name": "Soup"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type, "application/json");
        assert!(body["error"].as_str().unwrap().contains("cooking_time"));
    }

    #[tokio::test]
    async fn test_out_of_range_number_is_json_400() {
        let (status, content_type, _) =
            send(post_json(r#"{"name": "Soup", "cooking_time": 99999999999}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type, "application/json");
    }

    #[tokio::test]
    async fn test_malformed_json_is_json_400() {
        let (status, content_type, _) = send(post_json("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type, "application/json");
    }

    #[tokio::test]
    async fn test_bad_path_id_is_json_400() {
        let request = Request::get("/items/abc").body(Body::empty()).unwrap();
        let (status, content_type, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type, "application/json");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_bad_query_value_is_json_400() {
        let request = Request::get("/search?limit=lots").body(Body::empty()).unwrap();
        let (status, content_type, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type, "application/json");
    }
}
