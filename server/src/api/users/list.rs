use super::{user_responses, UserResponse};
use crate::api::extract::ApiQuery;
use crate::api::pagination::{page_total, Page, PageParams};
use crate::api::{ApiResult, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::models::User;
use crate::raw_sql::count_over;
use crate::schema::users;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(PageParams),
    responses(
        (status = 200, description = "Page of users", body = Page<UserResponse>),
        (status = 400, description = "Invalid parameters", body = ErrorResponse)
    )
)]
pub async fn list_users(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<impl IntoResponse> {
    let window = params.window(&config)?;
    let mut conn = pool.get()?;

    let rows: Vec<(User, i64)> = users::table
        .select((User::as_select(), count_over()))
        .order(users::id.asc())
        .limit(window.limit)
        .offset(window.offset)
        .load(&mut conn)?;

    let count = page_total(rows.first().map(|(_, total)| *total), window, || {
        users::table.count().get_result(&mut conn)
    })?;
    let users: Vec<User> = rows.into_iter().map(|(user, _)| user).collect();
    let results = user_responses(&mut conn, &users, viewer.as_ref())?;

    Ok((StatusCode::OK, Json(Page { count, results })))
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestApp;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_count_survives_page_past_the_end() {
        let Some(app) = TestApp::new() else { return };
        app.user();

        let first = app.send(Method::GET, "/api/users?limit=1", None).await.json();
        let total = first["count"].as_i64().unwrap();
        assert!(total >= 1);

        let uri = format!("/api/users?limit=1&page={}", total + 1000);
        let response = app.send(Method::GET, &uri, None).await;
        assert_eq!(response.status, StatusCode::OK);
        let body = response.json();
        assert!(body["results"].as_array().unwrap().is_empty());
        assert!(body["count"].as_i64().unwrap() >= total);
    }
}
