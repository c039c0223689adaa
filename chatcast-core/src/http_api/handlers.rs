//! HTTP API handlers
//!
//! Mutating handlers go through [`MutationService::submit`] and answer with
//! the envelope of the event that was broadcast, so the HTTP body and the
//! stream payload cannot drift apart.
//!
//! [`MutationService::submit`]: crate::core_chat::MutationService::submit

use super::state::AppState;
use super::types::*;
use crate::core_chat::{ChangeEvent, ChatError, EntityId, ErrorKind, MutationIntent, StateSnapshot};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    Stream, StreamExt,
};
use tracing::{debug, warn};

/// Error type for API responses
pub struct ApiError(ChatError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        };
        let error_response = ErrorResponse {
            error: self.0.to_string(),
            details: Some(kind.as_str().to_string()),
        };
        (status, Json(error_response)).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        ApiError(err)
    }
}

/// Malformed bodies answer in the same `{error, details}` shape as domain errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(status = %rejection.status(), "Rejected request body");
        ApiError(ChatError::InvalidInput(rejection.body_text()))
    }
}

type ApiResult<T> = Result<T, ApiError>;

async fn submit(state: &AppState, intent: MutationIntent) -> ApiResult<Json<Value>> {
    let event = state.service.submit(intent).await?;
    Ok(Json(event.envelope()))
}

// ============================================================================
// Channel Handlers
// ============================================================================

/// GET /channels - List channels in creation order
pub async fn list_channels(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.service.list_channels().await)
}

/// POST /channels - Create a channel
pub async fn create_channel(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChannelRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(req) = payload?;
    let intent = MutationIntent::CreateChannel {
        name: req.data.attributes.name,
    };
    Ok((StatusCode::CREATED, submit(&state, intent).await?))
}

/// PATCH /channels/:id - Rename a channel
pub async fn rename_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    payload: Result<Json<ChannelRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    let intent = MutationIntent::RenameChannel {
        id: EntityId(id),
        name: req.data.attributes.name,
    };
    submit(&state, intent).await
}

/// DELETE /channels/:id - Delete a channel and its messages
pub async fn delete_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    submit(&state, MutationIntent::DeleteChannel { id: EntityId(id) }).await
}

// ============================================================================
// Message Handlers
// ============================================================================

/// GET /channels/:id/messages - Messages of one channel
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<u64>,
) -> Json<Vec<MessageResource>> {
    let messages = state.service.list_messages(EntityId(channel_id)).await;
    Json(messages.into_iter().map(MessageResource::from).collect())
}

/// POST /channels/:id/messages - Post a message
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<u64>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(req) = payload?;
    let intent = MutationIntent::CreateMessage {
        channel_id: EntityId(channel_id),
        attributes: req.data.attributes,
    };
    Ok((StatusCode::CREATED, submit(&state, intent).await?))
}

// ============================================================================
// Snapshot & Event Stream
// ============================================================================

/// GET /state - Full snapshot for a client that is just connecting
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateSnapshot> {
    Json(state.service.snapshot().await)
}

fn to_sse_event(event: &ChangeEvent) -> Event {
    Event::default()
        .event(event.wire_name())
        .data(event.envelope().to_string())
}

/// GET /events - Server-sent change events from the moment of connecting
pub async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!(
        subscribers = state.broadcaster.subscriber_count() + 1,
        "Event stream opened"
    );

    let stream = BroadcastStream::new(state.broadcaster.subscribe()).filter_map(|item| match item {
        Ok(event) => Some(Ok(to_sse_event(&event))),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(skipped, "Event stream subscriber lagged, events dropped");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(state.keep_alive))
}
