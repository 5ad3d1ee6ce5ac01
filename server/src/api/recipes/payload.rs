use crate::api::{ApiError, ApiResult};
use crate::models::RecipeChangeset;
use serde::Deserialize;
use std::collections::HashSet;
use utoipa::ToSchema;

pub const MIN_AMOUNT: i32 = 1;
pub const MAX_AMOUNT: i32 = 3000;
pub const MIN_COOKING_TIME: i32 = 1;
pub const MAX_COOKING_TIME: i32 = 100;
const MAX_NAME_LENGTH: usize = 200;

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct IngredientAmount {
    /// Ingredient ID
    pub id: i32,
    pub amount: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub ingredients: Vec<IngredientAmount>,
    /// Tag IDs
    #[serde(default)]
    pub tags: Vec<i32>,
    pub image: Option<String>,
    pub name: String,
    pub text: String,
    /// Minutes, 1 to 100
    pub cooking_time: i32,
}

/// Partial update. `ingredients` and `tags`, when present, replace the
/// recipe's current sets.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub ingredients: Option<Vec<IngredientAmount>>,
    pub tags: Option<Vec<i32>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

impl CreateRecipeRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_name(&self.name)?;
        validate_text(&self.text)?;
        validate_cooking_time(self.cooking_time)?;
        validate_ingredients(&self.ingredients)?;
        validate_tags(&self.tags)
    }
}

impl UpdateRecipeRequest {
    pub fn validate(&self) -> ApiResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(text) = &self.text {
            validate_text(text)?;
        }
        if let Some(cooking_time) = self.cooking_time {
            validate_cooking_time(cooking_time)?;
        }
        if let Some(ingredients) = &self.ingredients {
            validate_ingredients(ingredients)?;
        }
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        Ok(())
    }

    pub fn changeset(&self) -> RecipeChangeset<'_> {
        RecipeChangeset {
            name: self.name.as_deref().map(str::trim),
            text: self.text.as_deref(),
            image: self.image.as_deref(),
            cooking_time: self.cooking_time,
        }
    }
}

fn validate_name(name: &str) -> ApiResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("name", "Name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ApiError::validation(
            "name",
            format!("Name must be at most {MAX_NAME_LENGTH} characters"),
        ));
    }
    Ok(())
}

fn validate_text(text: &str) -> ApiResult<()> {
    if text.trim().is_empty() {
        return Err(ApiError::validation("text", "Text cannot be empty"));
    }
    Ok(())
}

fn validate_cooking_time(minutes: i32) -> ApiResult<()> {
    if !(MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&minutes) {
        return Err(ApiError::validation(
            "cooking_time",
            format!(
                "Cooking time must be between {MIN_COOKING_TIME} and {MAX_COOKING_TIME} minutes"
            ),
        ));
    }
    Ok(())
}

fn validate_ingredients(items: &[IngredientAmount]) -> ApiResult<()> {
    if items.is_empty() {
        return Err(ApiError::validation(
            "ingredients",
            "At least one ingredient is required",
        ));
    }

    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id) {
            return Err(ApiError::validation(
                "ingredients",
                "Ingredients must be unique",
            ));
        }
        if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&item.amount) {
            return Err(ApiError::validation(
                "ingredients",
                format!("Amount must be between {MIN_AMOUNT} and {MAX_AMOUNT}"),
            ));
        }
    }
    Ok(())
}

fn validate_tags(ids: &[i32]) -> ApiResult<()> {
    let unique: HashSet<&i32> = ids.iter().collect();
    if unique.len() != ids.len() {
        return Err(ApiError::validation("tags", "Tags must be unique"));
    }
    Ok(())
}
