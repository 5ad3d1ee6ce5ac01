pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod payload;
pub mod update;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Routes under /api/tags. Reads are public, writes are admin-only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tags", get(list::list_tags).post(create::create_tag))
        .route(
            "/api/tags/{id}",
            get(get::get_tag)
                .patch(update::update_tag)
                .delete(delete::delete_tag),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_tags,
        get::get_tag,
        create::create_tag,
        update::update_tag,
        delete::delete_tag,
    ),
    components(schemas(
        crate::models::Tag,
        payload::CreateTagRequest,
        payload::UpdateTagRequest,
    ))
)]
pub struct ApiDoc;
