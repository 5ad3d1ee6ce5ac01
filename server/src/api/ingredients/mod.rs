pub mod create;
pub mod delete;
pub mod list;
pub mod payload;
pub mod update;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Routes under /api/ingredients. Reads are public, writes are admin-only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/ingredients",
            get(list::list_ingredients).post(create::create_ingredient),
        )
        .route(
            "/api/ingredients/{id}",
            get(list::get_ingredient)
                .patch(update::update_ingredient)
                .delete(delete::delete_ingredient),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_ingredients,
        list::get_ingredient,
        create::create_ingredient,
        update::update_ingredient,
        delete::delete_ingredient,
    ),
    components(schemas(
        crate::models::Ingredient,
        payload::CreateIngredientRequest,
        payload::UpdateIngredientRequest,
    ))
)]
pub struct ApiDoc;
