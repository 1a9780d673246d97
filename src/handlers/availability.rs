use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::TimeSlot;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub date: String,
    pub service_id: String,
}

// GET /api/availability?date=YYYY-MM-DD&serviceId=...
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let slots = state
        .availability
        .get_availability(&query.date, &query.service_id)
        .await?;
    Ok(Json(slots))
}
