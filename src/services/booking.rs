use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::db::{AppointmentRepository, ServiceRepository};
use crate::errors::AppError;
use crate::models::time_slot::parse_hhmm;
use crate::models::{
    Appointment, AppointmentStatus, BookingCommand, BookingOutcome, BookingRequest, ClientInfo,
    Field, FieldErrors, Service, SLOT_UNAVAILABLE_MESSAGE,
};
use crate::services::availability::AvailabilityService;
use crate::services::notifications::NotificationSender;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

pub struct BookingValidator {
    services: Arc<dyn ServiceRepository>,
    availability: Arc<AvailabilityService>,
    min_phone_length: usize,
}

impl BookingValidator {
    pub fn new(
        services: Arc<dyn ServiceRepository>,
        availability: Arc<AvailabilityService>,
        min_phone_length: usize,
    ) -> Self {
        Self {
            services,
            availability,
            min_phone_length: min_phone_length.max(1),
        }
    }

    // Only lookup failures surface as errors other than Validation.
    pub async fn validate(
        &self,
        req: &BookingRequest,
    ) -> Result<(BookingCommand, Service), AppError> {
        let mut errors = FieldErrors::new();

        let service = self.resolve_service(&req.service_id, &mut errors).await?;
        let date = parse_date(&req.date, &mut errors);
        let time = parse_time(&req.time, &mut errors);
        let client_info = self.check_client(req, &mut errors);

        if let (Some(service), Some(date), Some(time)) = (&service, date, time) {
            if !self.slot_is_open(&date, time, service).await? {
                errors.add(Field::SlotUnavailable, SLOT_UNAVAILABLE_MESSAGE);
            }
        }

        match (service, date, time) {
            (Some(service), Some(date), Some(time)) if errors.is_empty() => Ok((
                BookingCommand {
                    service_id: service.id.clone(),
                    date,
                    time,
                    client_info,
                    status: AppointmentStatus::Pending,
                },
                service,
            )),
            _ => Err(AppError::Validation(errors)),
        }
    }

    async fn resolve_service(
        &self,
        service_id: &str,
        errors: &mut FieldErrors,
    ) -> Result<Option<Service>, AppError> {
        let service_id = service_id.trim();
        if service_id.is_empty() {
            errors.add(Field::ServiceId, "Please select a service");
            return Ok(None);
        }

        let service = self.services.get_by_id(service_id).await?;
        if service.is_none() {
            errors.add(Field::ServiceId, "Selected service does not exist");
        }
        Ok(service)
    }

    fn check_client(&self, req: &BookingRequest, errors: &mut FieldErrors) -> ClientInfo {
        let input = &req.client_info;
        let first_name = input.first_name.trim();
        let last_name = input.last_name.trim();
        let email = input.email.trim();
        let phone = input.phone.trim();

        if first_name.is_empty() {
            errors.add(Field::FirstName, "First name is required");
        }
        if last_name.is_empty() {
            errors.add(Field::LastName, "Last name is required");
        }
        if email.is_empty() {
            errors.add(Field::Email, "Email is required");
        } else if !is_valid_email(email) {
            errors.add(Field::Email, "Please enter a valid email address");
        }
        if phone.is_empty() {
            errors.add(Field::Phone, "Phone number is required");
        } else if phone.chars().count() < self.min_phone_length {
            errors.add(
                Field::Phone,
                format!(
                    "Phone number must be at least {} characters",
                    self.min_phone_length
                ),
            );
        }

        ClientInfo {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            notes: input
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        }
    }

    async fn slot_is_open(
        &self,
        date: &NaiveDate,
        time: NaiveTime,
        service: &Service,
    ) -> Result<bool, AppError> {
        let slots = self.availability.slots_for(date, service).await?;
        Ok(slots.iter().any(|s| s.time == time && s.available))
    }
}

fn parse_date(raw: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(Field::Date, "Please select a date");
        return None;
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
    if date.is_none() {
        errors.add(Field::Date, "Date must be in YYYY-MM-DD format");
    }
    date
}

fn parse_time(raw: &str, errors: &mut FieldErrors) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(Field::Time, "Please select a time");
        return None;
    }
    let time = parse_hhmm(raw);
    if time.is_none() {
        errors.add(Field::Time, "Time must be in HH:MM format");
    }
    time
}

pub struct BookingService {
    validator: BookingValidator,
    appointments: Arc<dyn AppointmentRepository>,
    notifier: Arc<dyn NotificationSender>,
    notification_timeout: Duration,
}

impl BookingService {
    pub fn new(
        validator: BookingValidator,
        appointments: Arc<dyn AppointmentRepository>,
        notifier: Arc<dyn NotificationSender>,
        notification_timeout: Duration,
    ) -> Self {
        Self {
            validator,
            appointments,
            notifier,
            notification_timeout,
        }
    }

    pub async fn submit_booking(&self, req: &BookingRequest) -> Result<BookingOutcome, AppError> {
        let (command, service) = match self.validator.validate(req).await {
            Ok(valid) => valid,
            Err(AppError::Validation(fields)) => {
                tracing::info!(fields = %fields, "booking rejected");
                return Ok(BookingOutcome::Rejected(fields));
            }
            Err(e) => return Err(e),
        };

        let appointment = match self.appointments.create(&command).await {
            Ok(appointment) => appointment,
            Err(AppError::Conflict(reason)) => {
                tracing::warn!(%reason, "booking lost slot race");
                return Ok(BookingOutcome::Rejected(FieldErrors::single(
                    Field::SlotUnavailable,
                    SLOT_UNAVAILABLE_MESSAGE,
                )));
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            appointment_id = %appointment.id,
            service_id = %appointment.service_id,
            date = %appointment.date,
            time = %appointment.time.format("%H:%M"),
            "appointment booked"
        );

        self.notify(&appointment, &service).await;

        Ok(BookingOutcome::Booked(appointment))
    }

    async fn notify(&self, appointment: &Appointment, service: &Service) {
        let send = self.notifier.send_booking_confirmation(appointment, service);
        match tokio::time::timeout(self.notification_timeout, send).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(
                    appointment_id = %appointment.id,
                    error = %e,
                    "failed to send booking confirmation"
                );
            }
            Err(_) => {
                tracing::warn!(
                    appointment_id = %appointment.id,
                    timeout_secs = self.notification_timeout.as_secs(),
                    "booking confirmation timed out"
                );
            }
        }
    }
}
