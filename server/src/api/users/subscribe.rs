use super::representation::{subscription_responses, SubscriptionResponse};
use crate::api::error::is_unique_violation;
use crate::api::extract::{ApiPath, ApiQuery};
use crate::api::{ApiError, ApiResult, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::{NewFollow, User};
use crate::schema::{follows, users};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::dsl::exists;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RecipesLimitParams {
    /// Maximum number of recipes to include per author (default: all)
    pub recipes_limit: Option<usize>,
}

const SELF_SUBSCRIBE: &str = "You cannot subscribe to yourself";
const ALREADY_SUBSCRIBED: &str = "You are already subscribed to this author";

/// Rejects following yourself and following the same author twice.
pub fn check_can_subscribe(user_id: i32, author_id: i32, already_subscribed: bool) -> ApiResult<()> {
    if user_id == author_id {
        return Err(ApiError::validation("author", SELF_SUBSCRIBE));
    }
    if already_subscribed {
        return Err(ApiError::validation("author", ALREADY_SUBSCRIBED));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(
        ("id" = i32, Path, description = "Author ID"),
        RecipesLimitParams,
    ),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Self-subscription or already subscribed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(author_id): ApiPath<i32>,
    ApiQuery(params): ApiQuery<RecipesLimitParams>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let author: User = users::table
        .find(author_id)
        .select(User::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("User not found"))?;

    let already_subscribed: bool = diesel::select(exists(
        follows::table
            .filter(follows::user_id.eq(user.id))
            .filter(follows::author_id.eq(author.id)),
    ))
    .get_result(&mut conn)?;

    check_can_subscribe(user.id, author.id, already_subscribed)?;

    match diesel::insert_into(follows::table)
        .values(NewFollow {
            user_id: user.id,
            author_id: author.id,
        })
        .execute(&mut conn)
    {
        Ok(_) => {}
        // Lost a race with an identical request
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::validation("author", ALREADY_SUBSCRIBED))
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = user.id, author_id = author.id, "subscribed");

    let response = subscription_responses(
        &mut conn,
        std::slice::from_ref(&author),
        &user,
        params.recipes_limit,
    )?
    .pop()
    .ok_or(ApiError::NotFound("User not found"))?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not subscribed to this author", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(author_id): ApiPath<i32>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let deleted = diesel::delete(
        follows::table
            .filter(follows::user_id.eq(user.id))
            .filter(follows::author_id.eq(author_id)),
    )
    .execute(&mut conn)?;

    if deleted == 0 {
        return Err(ApiError::NotFound("You are not subscribed to this author"));
    }

    tracing::info!(user_id = user.id, author_id, "unsubscribed");

    Ok(StatusCode::NO_CONTENT)
}
