use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::db::ServiceRepository;
use crate::errors::AppError;
use crate::models::Service;
use crate::state::AppState;

// GET /api/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    Ok(Json(state.store.list().await?))
}

// GET /api/services/:id
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Service>, AppError> {
    ServiceRepository::get_by_id(&state.store, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))
}
