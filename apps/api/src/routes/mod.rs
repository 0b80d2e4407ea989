pub mod health;

use axum::{middleware, routing::get, Router};

use crate::auth;
use crate::resumes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let resumes = Router::new()
        .route(
            "/api/v1/resumes",
            get(handlers::handle_list).post(handlers::handle_create),
        )
        .route(
            "/api/v1/resumes/:id",
            get(handlers::handle_get)
                .patch(handlers::handle_update)
                .delete(handlers::handle_delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::identify));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(resumes)
        .with_state(state)
}
