use crate::api::extract::ApiPath;
use crate::api::{ApiError, ApiResult, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::permissions::{admin_or_read_only, require};
use crate::schema::ingredients;
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(
        ("id" = i32, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 204, description = "Ingredient deleted, along with its recipe rows"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn delete_ingredient(
    MaybeAuthUser(user): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<impl IntoResponse> {
    require(admin_or_read_only(&Method::DELETE, user.as_ref()), user.as_ref())?;

    let mut conn = pool.get()?;

    let deleted = diesel::delete(ingredients::table.find(id)).execute(&mut conn)?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Ingredient not found"));
    }

    tracing::info!(ingredient_id = id, "ingredient deleted");

    Ok(StatusCode::NO_CONTENT)
}
