//! API routes definition

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;

/// Prefix every route is mounted under
pub const API_PREFIX: &str = "/api/v1";

/// Build the API router with all endpoints
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        // Channel routes
        .route(
            "/channels",
            get(handlers::list_channels).post(handlers::create_channel),
        )
        .route(
            "/channels/:id",
            patch(handlers::rename_channel).delete(handlers::delete_channel),
        )
        // Message routes
        .route(
            "/channels/:id/messages",
            get(handlers::list_messages).post(handlers::create_message),
        )
        // Snapshot and live updates
        .route("/state", get(handlers::get_state))
        .route("/events", get(handlers::stream_events))
        .with_state(state);

    Router::new().nest(API_PREFIX, api)
}
