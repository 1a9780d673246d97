pub mod availability;
pub mod booking;
pub mod business_calendar;
pub mod clock;
pub mod lifecycle;
pub mod notifications;
pub mod slots;
