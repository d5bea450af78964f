pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interpretation::handlers as interpretation;
use crate::journal::handlers as journal;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interpretation API
        .route(
            "/api/v1/interpretations",
            post(interpretation::handle_interpret),
        )
        .route(
            "/api/v1/interpretations/extract",
            post(interpretation::handle_extract),
        )
        .route(
            "/api/v1/interpretations/summary",
            post(interpretation::handle_summary),
        )
        // Journal API
        .route(
            "/api/v1/dreams",
            get(journal::handle_list_dreams).post(journal::handle_create_dream),
        )
        .route("/api/v1/dreams/:id", get(journal::handle_get_dream))
        .route(
            "/api/v1/dreams/:id/interpret",
            post(journal::handle_interpret_dream),
        )
        .with_state(state)
}
