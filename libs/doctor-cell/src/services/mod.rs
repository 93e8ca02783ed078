pub mod doctor;

pub use doctor::{DoctorManager, DoctorSchema};
