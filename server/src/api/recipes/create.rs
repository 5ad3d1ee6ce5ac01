use super::payload::{CreateRecipeRequest, IngredientAmount};
use super::representation::{recipe_response, RecipeResponse};
use crate::api::extract::ApiJson;
use crate::api::{ApiError, ApiResult, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::{NewRecipe, NewRecipeIngredient, NewRecipeTag, Recipe};
use crate::schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use std::sync::Arc;

/// Fails with 400 when any referenced ingredient or tag id is unknown.
pub(super) fn check_references(
    conn: &mut PgConnection,
    items: Option<&[IngredientAmount]>,
    tag_ids: Option<&[i32]>,
) -> ApiResult<()> {
    if let Some(items) = items {
        let ids: Vec<i32> = items.iter().map(|i| i.id).collect();
        let found: i64 = ingredients::table
            .filter(ingredients::id.eq_any(&ids))
            .count()
            .get_result(conn)?;
        if found != ids.len() as i64 {
            return Err(ApiError::validation(
                "ingredients",
                "Ingredient does not exist",
            ));
        }
    }

    if let Some(tag_ids) = tag_ids {
        if !tag_ids.is_empty() {
            let found: i64 = tags::table
                .filter(tags::id.eq_any(tag_ids))
                .count()
                .get_result(conn)?;
            if found != tag_ids.len() as i64 {
                return Err(ApiError::validation("tags", "Tag does not exist"));
            }
        }
    }

    Ok(())
}

/// Replaces the recipe's ingredient rows with `items`.
pub(super) fn replace_ingredients(
    conn: &mut PgConnection,
    recipe_id: i32,
    items: &[IngredientAmount],
) -> QueryResult<()> {
    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)?;

    let rows: Vec<NewRecipeIngredient> = items
        .iter()
        .map(|item| NewRecipeIngredient {
            recipe_id,
            ingredient_id: item.id,
            amount: item.amount,
        })
        .collect();

    diesel::insert_into(recipe_ingredients::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

/// Replaces the recipe's tag links with `tag_ids`.
pub(super) fn replace_tags(conn: &mut PgConnection, recipe_id: i32, tag_ids: &[i32]) -> QueryResult<()> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id))).execute(conn)?;

    if tag_ids.is_empty() {
        return Ok(());
    }

    let rows: Vec<NewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();

    diesel::insert_into(recipe_tags::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created successfully", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(request): ApiJson<CreateRecipeRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate()?;

    let mut conn = pool.get()?;

    let recipe = conn.transaction::<_, ApiError, _>(|conn| {
        check_references(
            conn,
            Some(request.ingredients.as_slice()),
            Some(request.tags.as_slice()),
        )?;

        let recipe: Recipe = diesel::insert_into(recipes::table)
            .values(NewRecipe {
                author_id: user.id,
                name: request.name.trim(),
                text: &request.text,
                image: request.image.as_deref(),
                cooking_time: request.cooking_time,
            })
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        replace_ingredients(conn, recipe.id, &request.ingredients)?;
        replace_tags(conn, recipe.id, &request.tags)?;

        Ok(recipe)
    })?;

    tracing::info!(recipe_id = recipe.id, author_id = user.id, "recipe created");

    let response = recipe_response(&mut conn, recipe, Some(&user))?;
    Ok((StatusCode::CREATED, Json(response)))
}
