use crate::api::extract::ApiPath;
use crate::api::{ApiError, ApiResult, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::permissions::{admin_or_read_only, require};
use crate::schema::tags;
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    tag = "tags",
    params(
        ("id" = i32, Path, description = "Tag ID")
    ),
    responses(
        (status = 204, description = "Tag deleted; recipes lose the tag"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn delete_tag(
    MaybeAuthUser(user): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<impl IntoResponse> {
    require(admin_or_read_only(&Method::DELETE, user.as_ref()), user.as_ref())?;

    let mut conn = pool.get()?;

    let deleted = diesel::delete(tags::table.find(id)).execute(&mut conn)?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Tag not found"));
    }

    tracing::info!(tag_id = id, "tag deleted");

    Ok(StatusCode::NO_CONTENT)
}
