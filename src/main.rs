use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use salon_booking::config::AppConfig;
use salon_booking::db;
use salon_booking::handlers;
use salon_booking::services::clock::SystemClock;
use salon_booking::services::notifications::email::HttpEmailSender;
use salon_booking::services::notifications::{LogOnlySender, NotificationSender};
use salon_booking::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let notifier: Arc<dyn NotificationSender> = if config.email_api_url.is_empty() {
        tracing::warn!("EMAIL_API_URL not set, booking confirmations will only be logged");
        Arc::new(LogOnlySender)
    } else {
        tracing::info!("sending booking confirmations via {}", config.email_api_url);
        Arc::new(HttpEmailSender::new(
            config.email_api_url.clone(),
            config.email_api_key.clone(),
            config.email_from.clone(),
            config.business_name.clone(),
        ))
    };

    tracing::info!(
        min_phone_length = config.min_phone_length.max(1),
        "phone validation minimum"
    );

    let state = Arc::new(AppState::new(
        config.clone(),
        conn,
        Arc::new(SystemClock),
        notifier,
    )?);

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
