pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job matching
        .route(
            "/matches/generate/:user_id",
            post(handlers::handle_generate_matches),
        )
        .route(
            "/matches/user/:user_id",
            get(handlers::handle_get_user_matches),
        )
        .with_state(state)
}
