use super::create::duplicate_ingredient;
use super::payload::UpdateIngredientRequest;
use crate::api::error::is_unique_violation;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::{ApiError, ApiResult, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::models::Ingredient;
use crate::permissions::{admin_or_read_only, require};
use crate::schema::ingredients;
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
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(
        ("id" = i32, Path, description = "Ingredient ID")
    ),
    request_body = UpdateIngredientRequest,
    responses(
        (status = 200, description = "Ingredient updated", body = Ingredient),
        (status = 400, description = "Invalid or duplicate ingredient", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn update_ingredient(
    MaybeAuthUser(user): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<UpdateIngredientRequest>,
) -> ApiResult<impl IntoResponse> {
    require(admin_or_read_only(&Method::PATCH, user.as_ref()), user.as_ref())?;

    let changeset = request.validate()?;

    let mut conn = pool.get()?;

    let ingredient: Ingredient = ingredients::table
        .find(id)
        .select(Ingredient::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Ingredient not found"))?;

    if changeset.name.is_none() && changeset.measurement_unit.is_none() {
        return Ok((StatusCode::OK, Json(ingredient)));
    }

    let ingredient: Ingredient = match diesel::update(ingredients::table.find(ingredient.id))
        .set(&changeset)
        .returning(Ingredient::as_returning())
        .get_result(&mut conn)
    {
        Ok(ingredient) => ingredient,
        Err(e) if is_unique_violation(&e) => return Err(duplicate_ingredient()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(ingredient_id = ingredient.id, "ingredient updated");

    Ok((StatusCode::OK, Json(ingredient)))
}
