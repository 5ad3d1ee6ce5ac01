use super::payload::{CreateTagRequest, TagFields};
use crate::api::error::is_unique_violation;
use crate::api::extract::ApiJson;
use crate::api::{ApiError, ApiResult, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::models::{NewTag, Tag};
use crate::permissions::{admin_or_read_only, require};
use crate::schema::tags;
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
    Json,
};
use diesel::dsl::exists;
use diesel::pg::Pg;
use diesel::prelude::*;
use std::sync::Arc;

/// Every tag except `exclude`.
fn other_tags<'a>(exclude: Option<i32>) -> tags::BoxedQuery<'a, Pg> {
    let mut query = tags::table.into_boxed();
    if let Some(id) = exclude {
        query = query.filter(tags::id.ne(id));
    }
    query
}

/// Rejects a name, color or slug already used by another tag.
pub(super) fn check_unique(
    conn: &mut PgConnection,
    fields: &TagFields,
    exclude: Option<i32>,
) -> ApiResult<()> {
    if let Some(name) = &fields.name {
        let taken: bool = diesel::select(exists(other_tags(exclude).filter(tags::name.eq(name))))
            .get_result(conn)?;
        if taken {
            return Err(ApiError::validation("name", "A tag with this name already exists"));
        }
    }
    if let Some(color) = &fields.color {
        let taken: bool =
            diesel::select(exists(other_tags(exclude).filter(tags::color.eq(color))))
                .get_result(conn)?;
        if taken {
            return Err(ApiError::validation("color", "A tag with this color already exists"));
        }
    }
    if let Some(slug) = &fields.slug {
        let taken: bool = diesel::select(exists(other_tags(exclude).filter(tags::slug.eq(slug))))
            .get_result(conn)?;
        if taken {
            return Err(ApiError::validation("slug", "A tag with this slug already exists"));
        }
    }
    Ok(())
}

pub(super) fn duplicate_tag() -> ApiError {
    ApiError::Validation {
        field: None,
        message: "A tag with this name, color or slug already exists".to_string(),
    }
}

#[utoipa::path(
    post,
    path = "/api/tags",
    tag = "tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created successfully", body = Tag),
        (status = 400, description = "Invalid or duplicate tag", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn create_tag(
    MaybeAuthUser(user): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(request): ApiJson<CreateTagRequest>,
) -> ApiResult<impl IntoResponse> {
    require(admin_or_read_only(&Method::POST, user.as_ref()), user.as_ref())?;

    let fields = request.validate()?;
    let (Some(name), Some(color), Some(slug)) = (&fields.name, &fields.color, &fields.slug) else {
        return Err(ApiError::validation("name", "Name, color and slug are required"));
    };

    let mut conn = pool.get()?;
    check_unique(&mut conn, &fields, None)?;

    let tag: Tag = match diesel::insert_into(tags::table)
        .values(NewTag { name, color, slug })
        .returning(Tag::as_returning())
        .get_result(&mut conn)
    {
        Ok(tag) => tag,
        Err(e) if is_unique_violation(&e) => return Err(duplicate_tag()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(tag_id = tag.id, slug = %tag.slug, "tag created");

    Ok((StatusCode::CREATED, Json(tag)))
}
