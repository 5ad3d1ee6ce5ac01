use super::UserResponse;
use crate::api::error::is_unique_violation;
use crate::api::extract::ApiJson;
use crate::api::{ApiError, ApiResult, ErrorResponse};
use crate::auth::hash_password;
use crate::db::DbPool;
use crate::email_matches;
use crate::models::{NewUser, User};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::dsl::exists;
use diesel::prelude::*;
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use utoipa::ToSchema;

pub const EMAIL_MAX_LENGTH: usize = 254;
pub const NAME_MAX_LENGTH: usize = 150;
pub const PASSWORD_MIN_LENGTH: usize = 8;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> ApiResult<()> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ApiError::validation("email", "Email is required"));
        }
        if email.chars().count() > EMAIL_MAX_LENGTH || !EMAIL_PATTERN.is_match(email) {
            return Err(ApiError::validation("email", "Enter a valid email address"));
        }

        let username = self.username.trim();
        if username.is_empty() {
            return Err(ApiError::validation("username", "Username is required"));
        }
        if username.chars().count() > NAME_MAX_LENGTH {
            return Err(ApiError::validation(
                "username",
                format!("Username must be at most {NAME_MAX_LENGTH} characters"),
            ));
        }
        if !USERNAME_PATTERN.is_match(username) {
            return Err(ApiError::validation(
                "username",
                "Username may contain only letters, digits and @/./+/-/_",
            ));
        }
        // `/api/users/me` would shadow this user's profile
        if username.eq_ignore_ascii_case("me") {
            return Err(ApiError::validation("username", "Username \"me\" is reserved"));
        }

        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ] {
            let value = value.trim();
            if value.is_empty() {
                return Err(ApiError::validation(field, format!("{field} is required")));
            }
            if value.chars().count() > NAME_MAX_LENGTH {
                return Err(ApiError::validation(
                    field,
                    format!("{field} must be at most {NAME_MAX_LENGTH} characters"),
                ));
            }
        }

        validate_password(&self.password)
    }
}

pub fn validate_password(password: &str) -> ApiResult<()> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(ApiError::validation(
            "password",
            format!("Password must be at least {PASSWORD_MIN_LENGTH} characters"),
        ));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Invalid request or duplicate email/username", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let email = req.email.trim();
    let username = req.username.trim();

    let mut conn = pool.get()?;

    let email_taken: bool =
        diesel::select(exists(users::table.filter(email_matches!(email)))).get_result(&mut conn)?;
    if email_taken {
        return Err(ApiError::validation(
            "email",
            "A user with that email already exists",
        ));
    }

    let username_taken: bool =
        diesel::select(exists(users::table.filter(users::username.eq(username))))
            .get_result(&mut conn)?;
    if username_taken {
        return Err(ApiError::validation(
            "username",
            "A user with that username already exists",
        ));
    }

    let password_hash = hash_password(&req.password)?;

    let new_user = NewUser {
        email,
        username,
        first_name: req.first_name.trim(),
        last_name: req.last_name.trim(),
        password_hash: &password_hash,
        is_staff: false,
        is_superuser: false,
    };

    let user: User = match diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
    {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Validation {
                field: None,
                message: "A user with that email or username already exists".to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, "user signed up");

    Ok((StatusCode::CREATED, Json(UserResponse::new(&user, false))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            email: "vasya@yandex.ru".to_string(),
            username: "vasya.pupkin".to_string(),
            first_name: "Вася".to_string(),
            last_name: "Пупкин".to_string(),
            password: "Qwerty123".to_string(),
        }
    }

    fn error_field(req: &CreateUserRequest) -> Option<&'static str> {
        match req.validate() {
            Err(ApiError::Validation { field, .. }) => field,
            _ => None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_invalid_email() {
        let mut req = request();
        req.email = "not-an-email".to_string();
        assert_eq!(error_field(&req), Some("email"));

        req.email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(error_field(&req), Some("email"));
    }

    #[test]
    fn test_username_pattern() {
        let mut req = request();
        req.username = "bad name!".to_string();
        assert_eq!(error_field(&req), Some("username"));

        req.username = "ok_name+tag@home-1".to_string();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_reserved_username() {
        let mut req = request();
        req.username = "Me".to_string();
        assert_eq!(error_field(&req), Some("username"));
    }

    #[test]
    fn test_blank_names() {
        let mut req = request();
        req.last_name = "   ".to_string();
        assert_eq!(error_field(&req), Some("last_name"));
    }

    #[test]
    fn test_short_password() {
        let mut req = request();
        req.password = "short".to_string();
        assert_eq!(error_field(&req), Some("password"));
    }
}
