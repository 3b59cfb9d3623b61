//! Resource CRUD routes. Parameterized paths let one set of handlers serve every resource;
//! handlers resolve the resource by path segment.

use crate::handlers::resource::{create, delete as delete_handler, list, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route("/:path_segment", get(list).post(create))
        .route(
            "/:path_segment/:id",
            axum::routing::put(update).patch(update).delete(delete_handler),
        )
        .with_state(state)
}
