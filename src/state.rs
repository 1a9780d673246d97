use std::sync::Arc;
use std::time::Duration;

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::SqliteStore;
use crate::services::availability::AvailabilityService;
use crate::services::booking::{BookingService, BookingValidator};
use crate::services::business_calendar::BusinessCalendar;
use crate::services::clock::Clock;
use crate::services::notifications::NotificationSender;

pub struct AppState {
    pub config: AppConfig,
    pub store: SqliteStore,
    pub availability: Arc<AvailabilityService>,
    pub bookings: BookingService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        conn: Connection,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn NotificationSender>,
    ) -> anyhow::Result<Self> {
        let store = SqliteStore::new(conn);
        let calendar = BusinessCalendar::new(store.weekly_schedule()?);

        let availability = Arc::new(AvailabilityService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            calendar,
            clock,
        ));
        let validator = BookingValidator::new(
            Arc::new(store.clone()),
            availability.clone(),
            config.min_phone_length,
        );
        let bookings = BookingService::new(
            validator,
            Arc::new(store.clone()),
            notifier,
            Duration::from_secs(config.notification_timeout_secs),
        );

        Ok(Self {
            config,
            store,
            availability,
            bookings,
        })
    }
}
