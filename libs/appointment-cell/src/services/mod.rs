pub mod appointment;

pub use appointment::{AppointmentManager, AppointmentSchema};
