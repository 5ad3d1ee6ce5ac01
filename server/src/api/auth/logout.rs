use crate::api::{ApiResult, ErrorResponse};
use crate::auth::{delete_session, token_from_headers, AuthUser};
use crate::db::DbPool;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/token/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn logout(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    // AuthUser already validated the header, so the token is present
    if let Ok(token) = token_from_headers(&headers) {
        delete_session(&mut conn, token)?;
    }
    tracing::info!(user_id = user.id, "user logged out");

    Ok(StatusCode::NO_CONTENT)
}
