use super::representation::find_recipe;
use crate::api::extract::ApiPath;
use crate::api::{ApiResult, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::permissions::{author_or_admin_or_read_only, require};
use crate::schema::recipes;
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let recipe = find_recipe(&mut conn, id)?;
    require(
        author_or_admin_or_read_only(&Method::DELETE, Some(&user), recipe.author_id),
        Some(&user),
    )?;

    // Join rows, favorites and cart entries go with it via ON DELETE CASCADE
    diesel::delete(recipes::table.find(recipe.id)).execute(&mut conn)?;

    tracing::info!(recipe_id = recipe.id, "recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}
