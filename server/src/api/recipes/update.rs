use super::create::{check_references, replace_ingredients, replace_tags};
use super::payload::UpdateRecipeRequest;
use super::representation::{find_recipe, recipe_response, RecipeResponse};
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::{ApiError, ApiResult, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::Recipe;
use crate::permissions::{author_or_admin_or_read_only, require};
use crate::schema::recipes;
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
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<UpdateRecipeRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let recipe = find_recipe(&mut conn, id)?;
    require(
        author_or_admin_or_read_only(&Method::PATCH, Some(&user), recipe.author_id),
        Some(&user),
    )?;

    request.validate()?;

    let recipe = conn.transaction::<_, ApiError, _>(|conn| {
        check_references(conn, request.ingredients.as_deref(), request.tags.as_deref())?;

        let changeset = request.changeset();
        let recipe = if changeset.is_empty() {
            recipe
        } else {
            diesel::update(recipes::table.find(recipe.id))
                .set(&changeset)
                .returning(Recipe::as_returning())
                .get_result(conn)?
        };

        if let Some(items) = &request.ingredients {
            replace_ingredients(conn, recipe.id, items)?;
        }
        if let Some(tag_ids) = &request.tags {
            replace_tags(conn, recipe.id, tag_ids)?;
        }

        Ok(recipe)
    })?;

    tracing::info!(recipe_id = recipe.id, "recipe updated");

    let response = recipe_response(&mut conn, recipe, Some(&user))?;
    Ok((StatusCode::OK, Json(response)))
}
