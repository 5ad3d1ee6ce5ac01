//! Favorites and shopping-cart toggles. Both are (user, recipe) link tables
//! with identical semantics, so one set of helpers serves both.

use super::representation::{find_recipe, ShortRecipe};
use crate::api::error::is_unique_violation;
use crate::api::extract::ApiPath;
use crate::api::{ApiError, ApiResult, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::{NewCartEntry, NewFavorite, User};
use crate::schema::{favorites, shopping_cart};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::dsl::exists;
use diesel::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeList {
    Favorites,
    ShoppingCart,
}

impl RecipeList {
    fn name(self) -> &'static str {
        match self {
            RecipeList::Favorites => "favorites",
            RecipeList::ShoppingCart => "shopping_cart",
        }
    }

    fn already_present(self) -> &'static str {
        match self {
            RecipeList::Favorites => "Recipe is already in favorites",
            RecipeList::ShoppingCart => "Recipe is already in the shopping cart",
        }
    }

    fn not_present(self) -> &'static str {
        match self {
            RecipeList::Favorites => "Recipe is not in favorites",
            RecipeList::ShoppingCart => "Recipe is not in the shopping cart",
        }
    }

    fn contains(self, conn: &mut PgConnection, user_id: i32, recipe_id: i32) -> QueryResult<bool> {
        match self {
            RecipeList::Favorites => diesel::select(exists(
                favorites::table
                    .filter(favorites::user_id.eq(user_id))
                    .filter(favorites::recipe_id.eq(recipe_id)),
            ))
            .get_result(conn),
            RecipeList::ShoppingCart => diesel::select(exists(
                shopping_cart::table
                    .filter(shopping_cart::user_id.eq(user_id))
                    .filter(shopping_cart::recipe_id.eq(recipe_id)),
            ))
            .get_result(conn),
        }
    }

    fn insert(self, conn: &mut PgConnection, user_id: i32, recipe_id: i32) -> QueryResult<usize> {
        match self {
            RecipeList::Favorites => diesel::insert_into(favorites::table)
                .values(NewFavorite { user_id, recipe_id })
                .execute(conn),
            RecipeList::ShoppingCart => diesel::insert_into(shopping_cart::table)
                .values(NewCartEntry { user_id, recipe_id })
                .execute(conn),
        }
    }

    fn delete(self, conn: &mut PgConnection, user_id: i32, recipe_id: i32) -> QueryResult<usize> {
        match self {
            RecipeList::Favorites => diesel::delete(
                favorites::table
                    .filter(favorites::user_id.eq(user_id))
                    .filter(favorites::recipe_id.eq(recipe_id)),
            )
            .execute(conn),
            RecipeList::ShoppingCart => diesel::delete(
                shopping_cart::table
                    .filter(shopping_cart::user_id.eq(user_id))
                    .filter(shopping_cart::recipe_id.eq(recipe_id)),
            )
            .execute(conn),
        }
    }
}

fn add(list: RecipeList, user: &User, pool: &DbPool, recipe_id: i32) -> ApiResult<Response> {
    let mut conn = pool.get()?;

    let recipe = find_recipe(&mut conn, recipe_id)?;

    if list.contains(&mut conn, user.id, recipe.id)? {
        return Err(ApiError::Conflict(list.already_present()));
    }

    match list.insert(&mut conn, user.id, recipe.id) {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict(list.already_present()))
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(list = list.name(), user_id = user.id, recipe_id = recipe.id, "recipe added");

    Ok((StatusCode::CREATED, Json(ShortRecipe::from(&recipe))).into_response())
}

fn remove(list: RecipeList, user: &User, pool: &DbPool, recipe_id: i32) -> ApiResult<Response> {
    let mut conn = pool.get()?;

    let recipe = find_recipe(&mut conn, recipe_id)?;

    if list.delete(&mut conn, user.id, recipe.id)? == 0 {
        return Err(ApiError::NotFound(list.not_present()));
    }

    tracing::info!(list = list.name(), user_id = user.id, recipe_id = recipe.id, "recipe removed");

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to favorites", body = ShortRecipe),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Already in favorites", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Response> {
    add(RecipeList::Favorites, &user, &pool, id)
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Removed from favorites"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found or not in favorites", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Response> {
    remove(RecipeList::Favorites, &user, &pool, id)
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to the shopping cart", body = ShortRecipe),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Already in the shopping cart", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn add_to_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Response> {
    add(RecipeList::ShoppingCart, &user, &pool, id)
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Removed from the shopping cart"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found or not in the shopping cart", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn remove_from_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Response> {
    remove(RecipeList::ShoppingCart, &user, &pool, id)
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestApp;
    use axum::http::{Method, StatusCode};

    async fn toggle_twice(app: &TestApp, path: &str) {
        let (author, _) = app.user();
        let (_, token) = app.user();
        let recipe_id = app.recipe(author.id, &[]);
        let uri = format!("/api/recipes/{recipe_id}/{path}");

        let first = app.send(Method::POST, &uri, Some(&token)).await;
        assert_eq!(first.status, StatusCode::CREATED);
        assert_eq!(first.json()["id"], recipe_id);

        let second = app.send(Method::POST, &uri, Some(&token)).await;
        assert_eq!(second.status, StatusCode::CONFLICT);
        assert!(second.json()["error"].is_string());

        let removed = app.send(Method::DELETE, &uri, Some(&token)).await;
        assert_eq!(removed.status, StatusCode::NO_CONTENT);

        let again = app.send(Method::DELETE, &uri, Some(&token)).await;
        assert_eq!(again.status, StatusCode::NOT_FOUND);
        assert_eq!(again.content_type, "application/json");
    }

    #[tokio::test]
    async fn test_favorite_twice_conflicts_and_unfavorite_twice_is_not_found() {
        let Some(app) = TestApp::new() else { return };
        toggle_twice(&app, "favorite").await;
    }

    #[tokio::test]
    async fn test_cart_twice_conflicts_and_remove_twice_is_not_found() {
        let Some(app) = TestApp::new() else { return };
        toggle_twice(&app, "shopping_cart").await;
    }

    #[tokio::test]
    async fn test_unknown_recipe_is_not_found() {
        let Some(app) = TestApp::new() else { return };
        let (_, token) = app.user();

        let response = app
            .send(Method::POST, "/api/recipes/2147483647/favorite", Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_anonymous_toggle_is_unauthorized() {
        let Some(app) = TestApp::new() else { return };
        let (author, _) = app.user();
        let recipe_id = app.recipe(author.id, &[]);

        let uri = format!("/api/recipes/{recipe_id}/shopping_cart");
        let response = app.send(Method::POST, &uri, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
}
