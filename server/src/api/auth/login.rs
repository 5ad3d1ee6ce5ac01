use crate::api::extract::ApiJson;
use crate::api::{ApiError, ApiResult, ErrorResponse};
use crate::auth::{create_session, verify_password};
use crate::db::DbPool;
use crate::email_matches;
use crate::models::User;
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub auth_token: String,
}

const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials";

#[utoipa::path(
    post,
    path = "/api/auth/token/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "cook@example.com", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let user: Option<User> = users::table
        .filter(email_matches!(req.email.trim()))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    let Some(user) = user else {
        return Err(ApiError::Validation {
            field: None,
            message: INVALID_CREDENTIALS.to_string(),
        });
    };

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Validation {
            field: None,
            message: INVALID_CREDENTIALS.to_string(),
        });
    }

    let auth_token = create_session(&mut conn, user.id)?;
    tracing::info!(user_id = user.id, "user logged in");

    Ok((StatusCode::OK, Json(LoginResponse { auth_token })))
}
