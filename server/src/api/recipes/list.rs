use super::filter::RecipeFilter;
use super::representation::{recipe_responses, RecipeResponse};
use crate::api::extract::ApiQuery;
use crate::api::pagination::{page_total, Page, PageParams};
use crate::api::{ApiResult, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::models::{Recipe, User};
use crate::raw_sql::count_over;
use crate::schema::{favorites, recipe_tags, recipes, shopping_cart, tags};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::pg::Pg;
use diesel::prelude::*;
use std::sync::Arc;
use utoipa::IntoParams;

/// OpenAPI description of the recipe list query. Only `params(...)` reads
/// it: the handler parses the raw pairs through [`RecipeFilter`] and
/// [`PageParams`] because `tags` may repeat, so the fields are never read.
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
pub struct ListRecipesParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Items per page
    pub limit: Option<i64>,
    /// Only recipes by this user ID
    pub author: Option<i32>,
    /// Tag slug; repeat to match any of several tags
    pub tags: Option<Vec<String>>,
    /// `1` or `true` to show only the requester's favorites
    pub is_favorited: Option<String>,
    /// `1` or `true` to show only recipes in the requester's shopping cart
    pub is_in_shopping_cart: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes, newest first", body = Page<RecipeResponse>),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    MaybeAuthUser(user): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    ApiQuery(pairs): ApiQuery<Vec<(String, String)>>,
) -> ApiResult<impl IntoResponse> {
    let filter = RecipeFilter::from_pairs(&pairs)?;
    let window = PageParams::from_pairs(&pairs)?.window(&config)?;

    let mut conn = pool.get()?;

    let rows: Vec<(Recipe, i64)> = filtered_recipes(&filter, user.as_ref())
        .select((Recipe::as_select(), count_over()))
        .order((recipes::pub_date.desc(), recipes::id.desc()))
        .limit(window.limit)
        .offset(window.offset)
        .load(&mut conn)?;

    let count = page_total(rows.first().map(|(_, total)| *total), window, || {
        filtered_recipes(&filter, user.as_ref())
            .count()
            .get_result(&mut conn)
    })?;
    let recipes: Vec<Recipe> = rows.into_iter().map(|(recipe, _)| recipe).collect();
    let results = recipe_responses(&mut conn, recipes, user.as_ref())?;

    Ok((StatusCode::OK, Json(Page { count, results })))
}

fn filtered_recipes<'a>(
    filter: &'a RecipeFilter,
    user: Option<&User>,
) -> recipes::BoxedQuery<'a, Pg> {
    let mut query = recipes::table.into_boxed();

    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    if !filter.tags.is_empty() {
        query = query.filter(
            recipes::id.eq_any(
                recipe_tags::table
                    .inner_join(tags::table)
                    .filter(tags::slug.eq_any(&filter.tags))
                    .select(recipe_tags::recipe_id),
            ),
        );
    }

    // Membership flags only make sense for a known user; anonymous requests ignore them
    if let Some(user) = user {
        if filter.is_favorited {
            query = query.filter(
                recipes::id.eq_any(
                    favorites::table
                        .filter(favorites::user_id.eq(user.id))
                        .select(favorites::recipe_id),
                ),
            );
        }
        if filter.is_in_shopping_cart {
            query = query.filter(
                recipes::id.eq_any(
                    shopping_cart::table
                        .filter(shopping_cart::user_id.eq(user.id))
                        .select(shopping_cart::recipe_id),
                ),
            );
        }
    }

    query
}
