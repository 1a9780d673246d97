pub mod email;

use async_trait::async_trait;

use crate::models::time_slot::format_hhmm;
use crate::models::{Appointment, Service};

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_booking_confirmation(
        &self,
        appointment: &Appointment,
        service: &Service,
    ) -> anyhow::Result<()>;
}

// Used when no email API is configured.
pub struct LogOnlySender;

#[async_trait]
impl NotificationSender for LogOnlySender {
    async fn send_booking_confirmation(
        &self,
        appointment: &Appointment,
        service: &Service,
    ) -> anyhow::Result<()> {
        tracing::info!(
            appointment_id = %appointment.id,
            to = %appointment.client_info.email,
            service = %service.name,
            "email not configured, skipping booking confirmation"
        );
        Ok(())
    }
}

pub struct ConfirmationEmail {
    pub subject: String,
    pub body: String,
}

pub fn confirmation_email(
    appointment: &Appointment,
    service: &Service,
    business_name: &str,
) -> ConfirmationEmail {
    let client = &appointment.client_info;
    let date = appointment.date.format("%A, %B %-d, %Y");
    let time = format_hhmm(&appointment.time);

    let subject = format!("Your {} appointment at {business_name}", service.name);

    let mut body = format!(
        "Hi {},\n\n\
         Thanks for booking with {business_name}! We've received your request:\n\n\
         Service: {}\n\
         Date: {date}\n\
         Time: {time}\n\
         Reference: {}\n",
        client.first_name, service.name, appointment.id
    );
    if let Some(notes) = client.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        body.push_str(&format!("Notes: {notes}\n"));
    }
    body.push_str("\nWe'll be in touch to confirm. See you soon!\n");

    ConfirmationEmail { subject, body }
}
