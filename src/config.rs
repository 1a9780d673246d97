use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub business_name: String,
    // Values below 1 are treated as 1.
    pub min_phone_length: usize,
    pub email_api_url: String,
    pub email_api_key: String,
    pub email_from: String,
    pub notification_timeout_secs: u64,
    pub cors_allowed_origins: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "salon.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            business_name: env::var("BUSINESS_NAME").unwrap_or_else(|_| "Salon".to_string()),
            min_phone_length: env::var("MIN_PHONE_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            email_api_url: env::var("EMAIL_API_URL").unwrap_or_default(),
            email_api_key: env::var("EMAIL_API_KEY").unwrap_or_default(),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "bookings@localhost".to_string()),
            notification_timeout_secs: env::var("NOTIFICATION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        }
    }
}
