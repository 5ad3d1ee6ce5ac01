use super::representation::{find_recipe, recipe_response, RecipeResponse};
use crate::api::extract::ApiPath;
use crate::api::{ApiResult, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    MaybeAuthUser(user): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let recipe = find_recipe(&mut conn, id)?;
    let response = recipe_response(&mut conn, recipe, user.as_ref())?;

    Ok((StatusCode::OK, Json(response)))
}
