use crate::api::{ApiResult, ErrorResponse};
use crate::db::DbPool;
use crate::models::Tag;
use crate::schema::tags;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "tags",
    responses(
        (status = 200, description = "All tags, unpaginated", body = Vec<Tag>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_tags(State(pool): State<Arc<DbPool>>) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let tags: Vec<Tag> = tags::table
        .select(Tag::as_select())
        .order(tags::id.asc())
        .load(&mut conn)?;

    Ok((StatusCode::OK, Json(tags)))
}
