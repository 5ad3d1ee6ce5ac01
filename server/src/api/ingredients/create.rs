use super::payload::CreateIngredientRequest;
use crate::api::error::is_unique_violation;
use crate::api::extract::ApiJson;
use crate::api::{ApiError, ApiResult, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::models::{Ingredient, NewIngredient};
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

pub(super) fn duplicate_ingredient() -> ApiError {
    ApiError::validation(
        "name",
        "An ingredient with this name and measurement unit already exists",
    )
}

#[utoipa::path(
    post,
    path = "/api/ingredients",
    tag = "ingredients",
    request_body = CreateIngredientRequest,
    responses(
        (status = 201, description = "Ingredient created", body = Ingredient),
        (status = 400, description = "Invalid or duplicate ingredient", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn create_ingredient(
    MaybeAuthUser(user): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(request): ApiJson<CreateIngredientRequest>,
) -> ApiResult<impl IntoResponse> {
    require(admin_or_read_only(&Method::POST, user.as_ref()), user.as_ref())?;

    let (name, measurement_unit) = request.validate()?;

    let mut conn = pool.get()?;

    // The (name, measurement_unit) unique constraint is the only duplicate check
    let ingredient: Ingredient = match diesel::insert_into(ingredients::table)
        .values(NewIngredient {
            name,
            measurement_unit,
        })
        .returning(Ingredient::as_returning())
        .get_result(&mut conn)
    {
        Ok(ingredient) => ingredient,
        Err(e) if is_unique_violation(&e) => return Err(duplicate_ingredient()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(ingredient_id = ingredient.id, "ingredient created");

    Ok((StatusCode::CREATED, Json(ingredient)))
}
