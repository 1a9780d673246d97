use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

use super::{queries, AppointmentRepository, ServiceRepository};
use crate::errors::AppError;
use crate::models::{Appointment, AppointmentStatus, BookingCommand, Service, WeeklySchedule};

#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::Infrastructure(anyhow::anyhow!("database mutex poisoned")))
    }

    pub fn weekly_schedule(&self) -> Result<WeeklySchedule, AppError> {
        let records = queries::get_business_hours(&*self.conn()?)?;
        Ok(WeeklySchedule::from_records(records)?)
    }
}

#[async_trait]
impl ServiceRepository for SqliteStore {
    async fn get_by_id(&self, id: &str) -> Result<Option<Service>, AppError> {
        Ok(queries::get_service(&*self.conn()?, id)?)
    }

    async fn list(&self) -> Result<Vec<Service>, AppError> {
        Ok(queries::list_services(&*self.conn()?)?)
    }
}

#[async_trait]
impl AppointmentRepository for SqliteStore {
    async fn list_by_date(&self, date: &NaiveDate) -> Result<Vec<Appointment>, AppError> {
        Ok(queries::get_appointments_for_date(&*self.conn()?, date)?)
    }

    async fn list_all_by_date(&self, date: &NaiveDate) -> Result<Vec<Appointment>, AppError> {
        Ok(queries::get_all_appointments_for_date(&*self.conn()?, date)?)
    }

    async fn create(&self, command: &BookingCommand) -> Result<Appointment, AppError> {
        let now = Utc::now().naive_utc();
        let appointment = Appointment {
            id: uuid::Uuid::new_v4().to_string(),
            service_id: command.service_id.clone(),
            date: command.date,
            time: command.time,
            client_info: command.client_info.clone(),
            status: command.status,
            created_at: now,
            updated_at: now,
        };

        match queries::insert_appointment(&*self.conn()?, &appointment) {
            Ok(()) => Ok(appointment),
            Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
                "{} {} is already booked",
                appointment.date,
                appointment.time.format("%H:%M")
            ))),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        Ok(queries::get_appointment_by_id(&*self.conn()?, id)?)
    }

    async fn update_status(
        &self,
        id: &str,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<bool, AppError> {
        Ok(queries::update_appointment_status(&*self.conn()?, id, &from, &to)?)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
