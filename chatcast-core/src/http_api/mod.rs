//! HTTP API for chatcast
//!
//! REST endpoints map one-to-one onto mutation intents and read queries;
//! `GET /api/v1/events` streams every accepted change as server-sent events.

pub mod api;
pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

pub use api::{build_router, API_PREFIX};
pub use server::ChatServer;
pub use state::AppState;
