pub mod admin;
pub mod availability;
pub mod bookings;
pub mod catalog;
pub mod health;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/health", get(health::health))
        .route("/api/services", get(catalog::list_services))
        .route("/api/services/:id", get(catalog::get_service))
        .route("/api/availability", get(availability::get_availability))
        .route("/api/bookings", post(bookings::submit_booking))
        .route("/api/admin/appointments", get(admin::list_appointments))
        .route(
            "/api/admin/appointments/:id/:action",
            post(admin::update_appointment),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// `*` or empty allows any origin; otherwise a comma-separated list.
fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "*")
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}
