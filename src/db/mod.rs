pub mod migrations;
pub mod queries;
pub mod store;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::errors::AppError;
use crate::models::{Appointment, AppointmentStatus, BookingCommand, Service};

pub use store::SqliteStore;

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<Option<Service>, AppError>;
    async fn list(&self) -> Result<Vec<Service>, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    // Only statuses that still hold the slot.
    async fn list_by_date(&self, date: &NaiveDate) -> Result<Vec<Appointment>, AppError>;

    async fn list_all_by_date(&self, date: &NaiveDate) -> Result<Vec<Appointment>, AppError>;

    // Conflict when the slot already holds a live appointment.
    async fn create(&self, command: &BookingCommand) -> Result<Appointment, AppError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError>;

    // false when the row is gone or no longer in `from`.
    async fn update_status(
        &self,
        id: &str,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<bool, AppError>;
}
