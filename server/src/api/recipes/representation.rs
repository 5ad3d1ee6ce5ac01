use crate::api::users::representation::subscribed_author_ids;
use crate::api::users::UserResponse;
use crate::api::{ApiError, ApiResult};
use crate::models::{Ingredient, Recipe, RecipeIngredient, RecipeTag, Tag, User};
use crate::schema::{favorites, ingredients, recipe_ingredients, recipes, shopping_cart, tags, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

/// Compact recipe used by favorites, the cart and subscriptions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortRecipe {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    /// Minutes
    pub cooking_time: i32,
}

impl From<&Recipe> for ShortRecipe {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    /// Ingredient ID
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<Tag>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    /// Minutes
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

/// Ids among `recipe_ids` that the viewer has favorited and has in the cart.
fn viewer_marks(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    recipe_ids: &[i32],
) -> QueryResult<(HashSet<i32>, HashSet<i32>)> {
    let Some(viewer) = viewer else {
        return Ok((HashSet::new(), HashSet::new()));
    };

    let favorited: Vec<i32> = favorites::table
        .filter(favorites::user_id.eq(viewer.id))
        .filter(favorites::recipe_id.eq_any(recipe_ids))
        .select(favorites::recipe_id)
        .load(conn)?;

    let in_cart: Vec<i32> = shopping_cart::table
        .filter(shopping_cart::user_id.eq(viewer.id))
        .filter(shopping_cart::recipe_id.eq_any(recipe_ids))
        .select(shopping_cart::recipe_id)
        .load(conn)?;

    Ok((favorited.into_iter().collect(), in_cart.into_iter().collect()))
}

/// Builds full representations for a batch of recipes with a fixed number of
/// queries, preserving the input order.
pub fn recipe_responses(
    conn: &mut PgConnection,
    recipes: Vec<Recipe>,
    viewer: Option<&User>,
) -> QueryResult<Vec<RecipeResponse>> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();

    let tag_rows: Vec<(RecipeTag, Tag)> = RecipeTag::belonging_to(&recipes)
        .inner_join(tags::table)
        .select((RecipeTag::as_select(), Tag::as_select()))
        .order(tags::id.asc())
        .load(conn)?;

    let ingredient_rows: Vec<(RecipeIngredient, Ingredient)> =
        RecipeIngredient::belonging_to(&recipes)
            .inner_join(ingredients::table)
            .select((RecipeIngredient::as_select(), Ingredient::as_select()))
            .order(recipe_ingredients::id.asc())
            .load(conn)?;

    let mut author_ids: Vec<i32> = recipes.iter().map(|r| r.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<i32, User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load(conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let subscribed = subscribed_author_ids(conn, viewer, &author_ids)?;
    let (favorited, in_cart) = viewer_marks(conn, viewer, &recipe_ids)?;

    let tags_per_recipe = tag_rows.grouped_by(&recipes);
    let ingredients_per_recipe = ingredient_rows.grouped_by(&recipes);

    let mut responses = Vec::with_capacity(recipes.len());
    for ((recipe, tags), ingredients) in recipes
        .into_iter()
        .zip(tags_per_recipe)
        .zip(ingredients_per_recipe)
    {
        let author = authors
            .get(&recipe.author_id)
            .ok_or(diesel::result::Error::NotFound)?;

        responses.push(RecipeResponse {
            id: recipe.id,
            tags: tags.into_iter().map(|(_, tag)| tag).collect(),
            author: UserResponse::new(author, subscribed.contains(&author.id)),
            ingredients: ingredients
                .into_iter()
                .map(|(row, ingredient)| RecipeIngredientResponse {
                    id: ingredient.id,
                    name: ingredient.name,
                    measurement_unit: ingredient.measurement_unit,
                    amount: row.amount,
                })
                .collect(),
            is_favorited: favorited.contains(&recipe.id),
            is_in_shopping_cart: in_cart.contains(&recipe.id),
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
            pub_date: recipe.pub_date,
        });
    }

    Ok(responses)
}

/// Single-recipe convenience wrapper around [`recipe_responses`].
pub fn recipe_response(
    conn: &mut PgConnection,
    recipe: Recipe,
    viewer: Option<&User>,
) -> QueryResult<RecipeResponse> {
    recipe_responses(conn, vec![recipe], viewer)?
        .pop()
        .ok_or(diesel::result::Error::NotFound)
}

/// Loads a recipe by id or fails with 404.
pub fn find_recipe(conn: &mut PgConnection, id: i32) -> ApiResult<Recipe> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe not found"))
}
