use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::db::{AppointmentRepository, ServiceRepository};
use crate::errors::AppError;
use crate::models::{Field, FieldErrors, Service, TimeSlot};
use crate::services::business_calendar::BusinessCalendar;
use crate::services::clock::Clock;
use crate::services::slots::SlotGenerator;

pub struct AvailabilityService {
    services: Arc<dyn ServiceRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    calendar: BusinessCalendar,
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
    pub fn new(
        services: Arc<dyn ServiceRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        calendar: BusinessCalendar,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            services,
            appointments,
            calendar,
            clock,
        }
    }

    // Unknown services are NotFound; closed, past and cut-off days yield an empty list.
    pub async fn get_availability(
        &self,
        date: &str,
        service_id: &str,
    ) -> Result<Vec<TimeSlot>, AppError> {
        let service = self
            .services
            .get_by_id(service_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("service {service_id}")))?;

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            AppError::Validation(FieldErrors::single(
                Field::Date,
                "Date must be in YYYY-MM-DD format",
            ))
        })?;

        self.slots_for(&date, &service).await
    }

    pub async fn slots_for(
        &self,
        date: &NaiveDate,
        service: &Service,
    ) -> Result<Vec<TimeSlot>, AppError> {
        let now = self.clock.now();
        let Some(window) = self.calendar.bookable_window(date, &now) else {
            tracing::debug!(%date, service_id = %service.id, "date not bookable");
            return Ok(vec![]);
        };

        let booked: HashSet<_> = self
            .appointments
            .list_by_date(date)
            .await?
            .into_iter()
            .filter(|a| a.status.occupies_slot())
            .map(|a| a.time)
            .collect();

        let is_today = *date == now.date();
        let slots = SlotGenerator::new(window, service.duration)
            .iter()
            .map(|time| {
                let past = is_today && time <= now.time();
                TimeSlot {
                    time,
                    available: !past && !booked.contains(&time),
                }
            })
            .collect();

        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, SqliteStore};
    use crate::models::time_slot::format_hhmm;
    use crate::models::{AppointmentStatus, BookingCommand, ClientInfo, WeeklySchedule};
    use crate::services::clock::FixedClock;
    use chrono::{NaiveDateTime, NaiveTime};

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    // Tuesday 2025-06-17, 09:00
    fn setup(now: &str) -> (AvailabilityService, SqliteStore, Arc<FixedClock>) {
        let store = SqliteStore::new(db::init_db(":memory:").unwrap());
        let clock = Arc::new(FixedClock::new(dt(now)));
        let service = AvailabilityService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            BusinessCalendar::new(WeeklySchedule::canonical()),
            clock.clone(),
        );
        (service, store, clock)
    }

    async fn book(store: &SqliteStore, date: &str, time: &str) -> String {
        let cmd = BookingCommand {
            service_id: "blowout".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            client_info: ClientInfo {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "5551234567".to_string(),
                notes: None,
            },
            status: AppointmentStatus::Pending,
        };
        store.create(&cmd).await.unwrap().id
    }

    #[tokio::test]
    async fn test_full_grid_for_open_day() {
        let (svc, _, _) = setup("2025-06-17 09:00");
        let slots = svc.get_availability("2025-06-18", "blowout").await.unwrap();
        assert_eq!(slots.len(), 17);
        assert!(slots.iter().all(|s| s.available));
        assert_eq!(format_hhmm(&slots[0].time), "10:00");
        assert_eq!(format_hhmm(&slots[16].time), "18:00");
    }

    #[tokio::test]
    async fn test_duration_widening() {
        // bridal-makeup runs 90 minutes
        let (svc, _, _) = setup("2025-06-17 09:00");
        let slots = svc.get_availability("2025-06-18", "bridal-makeup").await.unwrap();
        assert_eq!(format_hhmm(&slots.last().unwrap().time), "17:00");
    }

    #[tokio::test]
    async fn test_long_service_uses_capped_duration() {
        // balayage runs 240 minutes
        let (svc, _, _) = setup("2025-06-17 09:00");
        let slots = svc.get_availability("2025-06-18", "balayage").await.unwrap();
        assert_eq!(slots.len(), 12);
        assert_eq!(format_hhmm(&slots.last().unwrap().time), "15:30");
    }

    #[tokio::test]
    async fn test_closed_days_are_empty() {
        let (svc, _, _) = setup("2025-06-17 09:00");
        for date in ["2025-06-22", "2025-06-23"] {
            for service in ["blowout", "balayage", "manicure"] {
                let slots = svc.get_availability(date, service).await.unwrap();
                assert!(slots.is_empty(), "{date} {service}");
            }
        }
    }

    #[tokio::test]
    async fn test_booked_slot_marked_unavailable() {
        let (svc, store, _) = setup("2025-06-17 09:00");
        book(&store, "2025-06-18", "14:00").await;

        let slots = svc.get_availability("2025-06-18", "blowout").await.unwrap();
        assert_eq!(slots.len(), 17);
        for slot in &slots {
            let expected = format_hhmm(&slot.time) != "14:00";
            assert_eq!(slot.available, expected, "{}", format_hhmm(&slot.time));
        }
    }

    #[tokio::test]
    async fn test_cancelled_appointment_does_not_block() {
        let (svc, store, _) = setup("2025-06-17 09:00");
        let id = book(&store, "2025-06-18", "14:00").await;
        store.update_status(&id, AppointmentStatus::Pending, AppointmentStatus::Cancelled).await.unwrap();

        let slots = svc.get_availability("2025-06-18", "blowout").await.unwrap();
        assert!(slots.iter().all(|s| s.available));
    }

    #[tokio::test]
    async fn test_same_day_after_cutoff_is_empty() {
        let (svc, _, _) = setup("2025-06-17 17:45");
        let slots = svc.get_availability("2025-06-17", "blowout").await.unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_same_day_morning_returns_full_grid() {
        let (svc, _, _) = setup("2025-06-17 09:00");
        let slots = svc.get_availability("2025-06-17", "blowout").await.unwrap();
        assert_eq!(slots.len(), 17);
        assert!(slots.iter().all(|s| s.available));
    }

    #[tokio::test]
    async fn test_same_day_past_slots_unavailable() {
        let (svc, _, clock) = setup("2025-06-17 09:00");
        clock.set(dt("2025-06-17 12:00"));

        let slots = svc.get_availability("2025-06-17", "blowout").await.unwrap();
        assert_eq!(slots.len(), 17);
        for slot in &slots {
            let expected = slot.time > NaiveTime::from_hms_opt(12, 0, 0).unwrap();
            assert_eq!(slot.available, expected, "{}", format_hhmm(&slot.time));
        }
    }

    #[tokio::test]
    async fn test_past_date_is_empty() {
        let (svc, _, _) = setup("2025-06-18 09:00");
        let slots = svc.get_availability("2025-06-17", "blowout").await.unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_service_not_found() {
        let (svc, _, _) = setup("2025-06-17 09:00");
        let err = svc.get_availability("2025-06-18", "ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_malformed_date() {
        let (svc, _, _) = setup("2025-06-17 09:00");
        let err = svc.get_availability("18/06/2025", "blowout").await.unwrap_err();
        match err {
            AppError::Validation(fields) => assert!(fields.contains(Field::Date)),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
