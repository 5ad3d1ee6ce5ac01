use super::representation::{subscription_responses, SubscriptionResponse};
use crate::api::extract::ApiQuery;
use crate::api::pagination::{page_total, Page, PageParams};
use crate::api::{ApiResult, ErrorResponse};
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::models::User;
use crate::raw_sql::count_over;
use crate::schema::{follows, users};
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
pub struct SubscriptionsParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Authors per page
    pub limit: Option<i64>,
    /// Maximum number of recipes to include per author (default: all)
    pub recipes_limit: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "users",
    params(SubscriptionsParams),
    responses(
        (status = 200, description = "Authors the user follows, newest subscription first", body = Page<SubscriptionResponse>),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    ApiQuery(params): ApiQuery<SubscriptionsParams>,
) -> ApiResult<impl IntoResponse> {
    let window = PageParams {
        page: params.page,
        limit: params.limit,
    }
    .window(&config)?;

    let mut conn = pool.get()?;

    let rows: Vec<(User, i64)> = follows::table
        .inner_join(users::table)
        .filter(follows::user_id.eq(user.id))
        .select((User::as_select(), count_over()))
        .order((follows::created_at.desc(), follows::id.desc()))
        .limit(window.limit)
        .offset(window.offset)
        .load(&mut conn)?;

    let count = page_total(rows.first().map(|(_, total)| *total), window, || {
        follows::table
            .filter(follows::user_id.eq(user.id))
            .count()
            .get_result(&mut conn)
    })?;
    let authors: Vec<User> = rows.into_iter().map(|(author, _)| author).collect();
    let results = subscription_responses(&mut conn, &authors, &user, params.recipes_limit)?;

    Ok((StatusCode::OK, Json(Page { count, results })))
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestApp;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_count_survives_page_past_the_end() {
        let Some(app) = TestApp::new() else { return };
        let (_, token) = app.user();
        for _ in 0..2 {
            let (author, _) = app.user();
            let uri = format!("/api/users/{}/subscribe", author.id);
            assert_eq!(app.send(Method::POST, &uri, Some(&token)).await.status, StatusCode::CREATED);
        }

        let response = app
            .send(Method::GET, "/api/users/subscriptions?limit=1&page=9", Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        let body = response.json();
        assert!(body["results"].as_array().unwrap().is_empty());
        assert_eq!(body["count"], 2);
    }
}
