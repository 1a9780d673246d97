use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::errors::AppError;
use crate::models::{BookingOutcome, BookingRequest};
use crate::state::AppState;

// POST /api/bookings
pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookingRequest>,
) -> Result<Response, AppError> {
    let response = match state.bookings.submit_booking(&request).await? {
        BookingOutcome::Booked(appointment) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "appointment": appointment })),
        )
            .into_response(),
        BookingOutcome::Rejected(fields) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "fieldErrors": fields })),
        )
            .into_response(),
    };
    Ok(response)
}
