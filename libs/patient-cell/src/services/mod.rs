pub mod patient;

pub use patient::{PatientManager, PatientSchema};
