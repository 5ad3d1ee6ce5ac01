use crate::api::{ApiResult, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::schema::{ingredients, recipe_ingredients, shopping_cart};
use crate::shopping_list::{self, ShoppingListLine};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use diesel::dsl::sum;
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    tag = "recipes",
    responses(
        (status = 200, description = "Aggregated ingredient list for every recipe in the cart", content_type = "text/plain", body = String),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let mut lines = cart_totals(&mut conn, user.id)?;
    shopping_list::sort_lines(&mut lines);

    tracing::info!(user_id = user.id, lines = lines.len(), "shopping list downloaded");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", shopping_list::FILENAME),
            ),
        ],
        shopping_list::render(&lines),
    ))
}

/// Sums each (name, unit) pair over every recipe in the user's cart.
fn cart_totals(conn: &mut PgConnection, user_id: i32) -> QueryResult<Vec<ShoppingListLine>> {
    let rows: Vec<(String, String, Option<i64>)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(
            recipe_ingredients::recipe_id.eq_any(
                shopping_cart::table
                    .filter(shopping_cart::user_id.eq(user_id))
                    .select(shopping_cart::recipe_id),
            ),
        )
        .group_by((ingredients::name, ingredients::measurement_unit))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            sum(recipe_ingredients::amount),
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(name, measurement_unit, total)| ShoppingListLine {
            name,
            measurement_unit,
            total: total.unwrap_or(0),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestApp;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_download_sums_across_cart_recipes() {
        let Some(app) = TestApp::new() else { return };
        let (author, _) = app.user();
        let (_, token) = app.user();
        let (flour, flour_name) = app.ingredient("Flour", "g");
        let (sugar, sugar_name) = app.ingredient("Sugar", "g");
        let (egg, egg_name) = app.ingredient("Egg", "шт");

        let pie = app.recipe(author.id, &[(flour, 200), (sugar, 50)]);
        let bread = app.recipe(author.id, &[(flour, 100), (egg, 2)]);
        // Not in the cart, so never counted
        app.recipe(author.id, &[(flour, 3000)]);

        for recipe in [pie, bread] {
            let uri = format!("/api/recipes/{recipe}/shopping_cart");
            assert_eq!(app.send(Method::POST, &uri, Some(&token)).await.status, StatusCode::CREATED);
        }

        let response = app
            .send(Method::GET, "/api/recipes/download_shopping_cart", Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.content_type.starts_with("text/plain"));
        assert_eq!(
            response.body,
            format!("{flour_name} (g) - 300\n{sugar_name} (g) - 50\n{egg_name} (шт) - 2")
        );
    }

    #[tokio::test]
    async fn test_empty_cart_downloads_empty_file() {
        let Some(app) = TestApp::new() else { return };
        let (_, token) = app.user();

        let response = app
            .send(Method::GET, "/api/recipes/download_shopping_cart", Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "");
    }
}
