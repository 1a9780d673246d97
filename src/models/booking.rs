use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::appointment::{Appointment, AppointmentStatus, ClientInfo};

pub const SLOT_UNAVAILABLE_MESSAGE: &str =
    "Sorry, that time slot is no longer available. Please pick a different time.";

// Missing fields decode as empty strings so they surface as field errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BookingRequest {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub client_info: ClientInfoInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientInfoInput {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingCommand {
    pub service_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub client_info: ClientInfo,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ServiceId,
    Date,
    Time,
    FirstName,
    LastName,
    Email,
    Phone,
    SlotUnavailable,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ServiceId => "serviceId",
            Field::Date => "date",
            Field::Time => "time",
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::SlotUnavailable => "slotUnavailable",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    // First message wins.
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .0
            .keys()
            .map(Field::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Booked(Appointment),
    Rejected(FieldErrors),
}
