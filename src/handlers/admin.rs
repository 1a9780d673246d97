use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::AppointmentRepository;
use crate::errors::AppError;
use crate::models::{Appointment, Field, FieldErrors, LifecycleAction};
use crate::services::lifecycle;
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/appointments?date=YYYY-MM-DD
#[derive(Deserialize)]
pub struct AppointmentsQuery {
    pub date: String,
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(FieldErrors::single(
            Field::Date,
            "Date must be in YYYY-MM-DD format",
        ))
    })?;

    Ok(Json(state.store.list_all_by_date(&date).await?))
}

// POST /api/admin/appointments/:id/:action
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, action)): Path<(String, LifecycleAction)>,
) -> Result<Json<Appointment>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let appointment = lifecycle::apply_action(&state.store, &id, action).await?;
    Ok(Json(appointment))
}
