pub mod create;
pub mod delete;
pub mod download;
pub mod filter;
pub mod get;
pub mod list;
pub mod membership;
pub mod payload;
pub mod representation;
pub mod update;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

pub use representation::{RecipeResponse, ShortRecipe};

/// Routes under /api/recipes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recipes",
            get(list::list_recipes).post(create::create_recipe),
        )
        .route(
            "/api/recipes/download_shopping_cart",
            get(download::download_shopping_cart),
        )
        .route(
            "/api/recipes/{id}",
            get(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route(
            "/api/recipes/{id}/favorite",
            post(membership::add_favorite).delete(membership::remove_favorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart",
            post(membership::add_to_cart).delete(membership::remove_from_cart),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        create::create_recipe,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        membership::add_favorite,
        membership::remove_favorite,
        membership::add_to_cart,
        membership::remove_from_cart,
        download::download_shopping_cart,
    ),
    components(schemas(
        RecipeResponse,
        ShortRecipe,
        representation::RecipeIngredientResponse,
        payload::IngredientAmount,
        payload::CreateRecipeRequest,
        payload::UpdateRecipeRequest,
    ))
)]
pub struct ApiDoc;
