use crate::db::AppointmentRepository;
use crate::errors::AppError;
use crate::models::{Appointment, LifecycleAction};

pub async fn apply_action(
    appointments: &dyn AppointmentRepository,
    id: &str,
    action: LifecycleAction,
) -> Result<Appointment, AppError> {
    let mut appointment = appointments
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("appointment {id}")))?;

    let from = appointment.status;
    let to = from
        .apply(action)
        .ok_or(AppError::InvalidTransition { from, action })?;

    if !appointments.update_status(id, from, to).await? {
        // Lost a race with another action; report against the status that won.
        let current = appointments
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("appointment {id}")))?;
        tracing::warn!(appointment_id = id, %from, current = %current.status, %action, "status changed concurrently");
        return Err(AppError::InvalidTransition {
            from: current.status,
            action,
        });
    }

    tracing::info!(appointment_id = id, %from, %to, "appointment status changed");

    appointment.status = to;
    Ok(appointment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, SqliteStore};
    use crate::models::{AppointmentStatus, BookingCommand, ClientInfo};
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};

    // Yields after every read so two actions interleave between read and write.
    struct YieldingStore {
        inner: SqliteStore,
    }

    #[async_trait]
    impl AppointmentRepository for YieldingStore {
        async fn list_by_date(&self, date: &NaiveDate) -> Result<Vec<Appointment>, AppError> {
            self.inner.list_by_date(date).await
        }

        async fn list_all_by_date(&self, date: &NaiveDate) -> Result<Vec<Appointment>, AppError> {
            self.inner.list_all_by_date(date).await
        }

        async fn create(&self, command: &BookingCommand) -> Result<Appointment, AppError> {
            self.inner.create(command).await
        }

        async fn get_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
            let found = AppointmentRepository::get_by_id(&self.inner, id).await;
            tokio::task::yield_now().await;
            found
        }

        async fn update_status(
            &self,
            id: &str,
            from: AppointmentStatus,
            to: AppointmentStatus,
        ) -> Result<bool, AppError> {
            self.inner.update_status(id, from, to).await
        }
    }

    async fn setup() -> (SqliteStore, String) {
        let store = SqliteStore::new(db::init_db(":memory:").unwrap());
        let cmd = BookingCommand {
            service_id: "facial".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 18).unwrap(),
            time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            client_info: ClientInfo {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: "grace@example.com".to_string(),
                phone: "5550001111".to_string(),
                notes: None,
            },
            status: AppointmentStatus::Pending,
        };
        let id = store.create(&cmd).await.unwrap().id;
        (store, id)
    }

    #[tokio::test]
    async fn test_confirm_then_complete() {
        let (store, id) = setup().await;
        let appt = apply_action(&store, &id, LifecycleAction::Confirm).await.unwrap();
        assert_eq!(appt.status, AppointmentStatus::Confirmed);
        let appt = apply_action(&store, &id, LifecycleAction::Complete).await.unwrap();
        assert_eq!(appt.status, AppointmentStatus::Completed);

        let stored = AppointmentRepository::get_by_id(&store, &id).await.unwrap().unwrap();
        assert_eq!(stored.status, AppointmentStatus::Completed);
    }

    #[tokio::test]
    async fn test_cancelled_is_terminal() {
        let (store, id) = setup().await;
        apply_action(&store, &id, LifecycleAction::Cancel).await.unwrap();
        let err = apply_action(&store, &id, LifecycleAction::Confirm).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                from: AppointmentStatus::Cancelled,
                action: LifecycleAction::Confirm
            }
        ));
    }

    #[tokio::test]
    async fn test_unknown_appointment() {
        let (store, _) = setup().await;
        let err = apply_action(&store, "missing", LifecycleAction::Cancel).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_concurrent_actions_do_not_overwrite() {
        let (inner, id) = setup().await;
        apply_action(&inner, &id, LifecycleAction::Confirm).await.unwrap();

        let store = YieldingStore { inner };
        let (cancel, complete) = tokio::join!(
            apply_action(&store, &id, LifecycleAction::Cancel),
            apply_action(&store, &id, LifecycleAction::Complete),
        );
        assert_eq!(cancel.is_ok() as u8 + complete.is_ok() as u8, 1);

        let winner = match (&cancel, &complete) {
            (Ok(appt), Err(_)) | (Err(_), Ok(appt)) => appt.status,
            _ => unreachable!(),
        };
        let loser = cancel.err().or(complete.err()).unwrap();
        assert!(matches!(loser, AppError::InvalidTransition { from, .. } if from == winner));

        let stored = AppointmentRepository::get_by_id(&store.inner, &id).await.unwrap().unwrap();
        assert_eq!(stored.status, winner);
    }
}
