use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{confirmation_email, NotificationSender};
use crate::models::{Appointment, Service};

pub struct HttpEmailSender {
    api_url: String,
    api_key: String,
    from: String,
    business_name: String,
    client: reqwest::Client,
}

impl HttpEmailSender {
    pub fn new(api_url: String, api_key: String, from: String, business_name: String) -> Self {
        Self {
            api_url,
            api_key,
            from,
            business_name,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationSender for HttpEmailSender {
    async fn send_booking_confirmation(
        &self,
        appointment: &Appointment,
        service: &Service,
    ) -> anyhow::Result<()> {
        let email = confirmation_email(appointment, service, &self.business_name);

        let body = json!({
            "from": self.from,
            "to": [appointment.client_info.email],
            "subject": email.subject,
            "text": email.body,
        });

        let mut request = self.client.post(&self.api_url).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        request
            .send()
            .await
            .context("failed to call email API")?
            .error_for_status()
            .context("email API returned error")?;

        tracing::info!(
            appointment_id = %appointment.id,
            to = %appointment.client_info.email,
            "sent booking confirmation"
        );
        Ok(())
    }
}
