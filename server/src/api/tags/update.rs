use super::create::{check_unique, duplicate_tag};
use super::payload::UpdateTagRequest;
use crate::api::error::is_unique_violation;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::{ApiError, ApiResult, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::models::Tag;
use crate::permissions::{admin_or_read_only, require};
use crate::schema::tags;
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    patch,
    path = "/api/tags/{id}",
    tag = "tags",
    params(
        ("id" = i32, Path, description = "Tag ID")
    ),
    request_body = UpdateTagRequest,
    responses(
        (status = 200, description = "Tag updated", body = Tag),
        (status = 400, description = "Invalid or duplicate tag", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn update_tag(
    MaybeAuthUser(user): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<UpdateTagRequest>,
) -> ApiResult<impl IntoResponse> {
    require(admin_or_read_only(&Method::PATCH, user.as_ref()), user.as_ref())?;

    let fields = request.validate()?;

    let mut conn = pool.get()?;

    let tag: Tag = tags::table
        .find(id)
        .select(Tag::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Tag not found"))?;

    if fields.is_empty() {
        return Ok((StatusCode::OK, Json(tag)));
    }

    check_unique(&mut conn, &fields, Some(tag.id))?;

    let tag: Tag = match diesel::update(tags::table.find(tag.id))
        .set(&fields.changeset())
        .returning(Tag::as_returning())
        .get_result(&mut conn)
    {
        Ok(tag) => tag,
        Err(e) if is_unique_violation(&e) => return Err(duplicate_tag()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(tag_id = tag.id, "tag updated");

    Ok((StatusCode::OK, Json(tag)))
}
