pub mod appointment;
pub mod booking;
pub mod business_hours;
pub mod service;
pub mod time_slot;

pub use appointment::{Appointment, AppointmentStatus, ClientInfo, LifecycleAction};
pub use booking::{
    BookingCommand, BookingOutcome, BookingRequest, ClientInfoInput, Field, FieldErrors,
    SLOT_UNAVAILABLE_MESSAGE,
};
pub use business_hours::{BusinessHours, OpeningWindow, WeeklySchedule};
pub use service::{Service, ServiceCategory};
pub use time_slot::TimeSlot;
