use crate::api::recipes::ShortRecipe;
use crate::models::{Recipe, User};
use crate::schema::{follows, recipes};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the requesting user follows this user (always false for anonymous requests)
    pub is_subscribed: bool,
}

/// A followed author together with a slice of their recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<ShortRecipe>,
    /// Total number of recipes by this author, regardless of `recipes_limit`
    pub recipes_count: i64,
}

impl UserResponse {
    pub fn new(user: &User, is_subscribed: bool) -> Self {
        Self {
            email: user.email.clone(),
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
        }
    }
}

/// Which of `author_ids` the viewer follows.
pub fn subscribed_author_ids(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    author_ids: &[i32],
) -> QueryResult<HashSet<i32>> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    if author_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let ids: Vec<i32> = follows::table
        .filter(follows::user_id.eq(viewer.id))
        .filter(follows::author_id.eq_any(author_ids))
        .select(follows::author_id)
        .load(conn)?;

    Ok(ids.into_iter().collect())
}

pub fn user_responses(
    conn: &mut PgConnection,
    users: &[User],
    viewer: Option<&User>,
) -> QueryResult<Vec<UserResponse>> {
    let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    let subscribed = subscribed_author_ids(conn, viewer, &ids)?;

    Ok(users
        .iter()
        .map(|u| UserResponse::new(u, subscribed.contains(&u.id)))
        .collect())
}

/// Builds subscription entries for `authors`, keeping at most `recipes_limit`
/// recipes per author (all of them when `None`), newest first.
pub fn subscription_responses(
    conn: &mut PgConnection,
    authors: &[User],
    viewer: &User,
    recipes_limit: Option<usize>,
) -> QueryResult<Vec<SubscriptionResponse>> {
    let recipes: Vec<Recipe> = Recipe::belonging_to(authors)
        .select(Recipe::as_select())
        .order((recipes::pub_date.desc(), recipes::id.desc()))
        .load(conn)?;

    let users = user_responses(conn, authors, Some(viewer))?;
    let limit = recipes_limit.unwrap_or(usize::MAX);

    Ok(recipes
        .grouped_by(authors)
        .into_iter()
        .zip(users)
        .map(|(recipes, user)| SubscriptionResponse {
            user,
            recipes_count: recipes.len() as i64,
            recipes: recipes.iter().take(limit).map(ShortRecipe::from).collect(),
        })
        .collect())
}
