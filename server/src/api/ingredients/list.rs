use crate::api::extract::{ApiPath, ApiQuery};
use crate::api::{ApiError, ApiResult, ErrorResponse};
use crate::db::DbPool;
use crate::models::Ingredient;
use crate::raw_sql::escape_like;
use crate::schema::ingredients;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListIngredientsParams {
    /// Case-insensitive search; names starting with it come first, then other
    /// names containing it
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    params(ListIngredientsParams),
    responses(
        (status = 200, description = "Matching ingredients, unpaginated", body = Vec<Ingredient>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_ingredients(
    State(pool): State<Arc<DbPool>>,
    ApiQuery(params): ApiQuery<ListIngredientsParams>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let search = params
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let results: Vec<Ingredient> = match search {
        Some(search) => {
            let escaped = escape_like(search);
            ingredients::table
                .filter(ingredients::name.ilike(format!("%{escaped}%")))
                .order((
                    ingredients::name.ilike(format!("{escaped}%")).desc(),
                    ingredients::name.asc(),
                    ingredients::id.asc(),
                ))
                .select(Ingredient::as_select())
                .load(&mut conn)?
        }
        None => ingredients::table
            .order((ingredients::name.asc(), ingredients::id.asc()))
            .select(Ingredient::as_select())
            .load(&mut conn)?,
    };

    Ok((StatusCode::OK, Json(results)))
}

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(
        ("id" = i32, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 200, description = "Ingredient", body = Ingredient),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    )
)]
pub async fn get_ingredient(
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let ingredient: Ingredient = ingredients::table
        .find(id)
        .select(Ingredient::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Ingredient not found"))?;

    Ok((StatusCode::OK, Json(ingredient)))
}
