use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::info;

use crate::booking::{BookingPipeline, BookingRequest};
use crate::error::AppResult;

/// Shared state for the webhook handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<BookingPipeline>,
}

/// Handler for the booking webhook. Replies with the bare join URL so
/// the caller can paste it straight into chat.
pub async fn book_meeting_handler(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> AppResult<String> {
    info!(
        "Received booking \"{}\" hosted by {}",
        request.title, request.host
    );

    let join_url = state.pipeline.handle_booking_request(request).await?;
    Ok(join_url)
}

/// Handler for health checks
pub async fn health_handler() -> &'static str {
    "OK"
}
