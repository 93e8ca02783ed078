// libs/appointment-cell/src/models.rs
use std::fmt;
use std::str::FromStr;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use doctor_cell::Doctor;
use patient_cell::Patient;
use shared_models::{null_as_default, AppError, EntityId, EntityRef};

/// Minute-precision representation used by the edit form.
pub const FORM_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
/// Wire format; always carries an explicit seconds component.
pub const WIRE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const DISPLAY_TIME_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// Appointment as returned by `GET /api/appointments`.
///
/// `patient` and `doctor` are snapshots of the referenced records as the
/// server last returned them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: EntityId,
    #[serde(default)]
    pub patient: Option<Patient>,
    #[serde(default)]
    pub doctor: Option<Doctor>,
    #[serde(default, with = "local_time::option")]
    pub appointment_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn patient_label(&self) -> String {
        self.patient.as_ref().map(Patient::full_name).unwrap_or_default()
    }

    pub fn doctor_label(&self) -> String {
        self.doctor.as_ref().map(Doctor::display_label).unwrap_or_default()
    }

    /// e.g. `May 1, 2024, 10:30 AM`; empty when the server sent no time.
    pub fn display_time(&self) -> String {
        self.appointment_time
            .map(|time| time.format(DISPLAY_TIME_FORMAT).to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "Scheduled"),
            AppointmentStatus::Completed => write!(f, "Completed"),
            AppointmentStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::validation(format!(
                "Status must be one of Scheduled, Completed, Cancelled; got '{}'", s
            )))
    }
}

// ==============================================================================
// FORM STATE AND PAYLOAD
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub patient_id: Option<EntityId>,
    pub doctor_id: Option<EntityId>,
    /// `YYYY-MM-DDTHH:MM` or empty.
    pub appointment_time: String,
    pub reason: String,
    pub status: AppointmentStatus,
}

impl From<&Appointment> for AppointmentDraft {
    fn from(appointment: &Appointment) -> Self {
        Self {
            patient_id: appointment.patient.as_ref().map(|p| p.id.clone()),
            doctor_id: appointment.doctor.as_ref().map(|d| d.id.clone()),
            appointment_time: appointment
                .appointment_time
                .map(|time| time.format(FORM_TIME_FORMAT).to_string())
                .unwrap_or_default(),
            reason: appointment.reason.clone().unwrap_or_default(),
            status: appointment.status,
        }
    }
}

/// Body of `POST /api/appointments` and `PUT /api/appointments/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub patient: EntityRef,
    pub doctor: EntityRef,
    pub appointment_time: String,
    pub reason: String,
    pub status: AppointmentStatus,
}

/// Timezone-naive timestamps as the records API exchanges them. Accepts
/// values with or without seconds; always writes seconds.
pub mod local_time {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::{FORM_TIME_FORMAT, WIRE_TIME_FORMAT};

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, FORM_TIME_FORMAT))
            .ok()
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(WIRE_TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid appointment time '{}'", raw)))
    }

    /// Same formats for a time the server may leave `null` or blank.
    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(time) => super::serialize(time, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid appointment time '{}'", raw))),
                _ => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use serde_json::json;

    #[test]
    fn test_status_parsing_is_closed() {
        assert_eq!("completed".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::Completed);
        assert_eq!(" Cancelled ".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::Cancelled);
        assert!("NoShow".parse::<AppointmentStatus>().is_err());
        assert_eq!(AppointmentStatus::default(), AppointmentStatus::Scheduled);
    }

    #[test]
    fn test_time_accepts_missing_seconds() {
        let with_seconds: Appointment = serde_json::from_value(json!({
            "id": 1, "appointmentTime": "2024-05-01T10:30:45", "status": "Completed"
        })).unwrap();
        let without_seconds: Appointment = serde_json::from_value(json!({
            "id": 2, "appointmentTime": "2024-05-01T10:30"
        })).unwrap();

        assert_eq!(with_seconds.appointment_time.map(|t| t.second()), Some(45));
        assert_eq!(without_seconds.appointment_time.map(|t| t.minute()), Some(30));
        assert_eq!(without_seconds.status, AppointmentStatus::Scheduled);
        assert_eq!(without_seconds.patient_label(), "");
    }

    #[test]
    fn test_draft_truncates_to_minutes() {
        let appointment: Appointment = serde_json::from_value(json!({
            "id": 9,
            "patient": { "id": 1, "firstName": "Ann", "lastName": "Lee" },
            "doctor": { "id": 2, "firstName": "Lisa", "lastName": "Cuddy", "specialization": "Endocrinology" },
            "appointmentTime": "2024-05-01T10:30:45",
            "reason": null,
            "status": "Cancelled"
        })).unwrap();

        let draft = AppointmentDraft::from(&appointment);

        assert_eq!(draft, AppointmentDraft {
            patient_id: Some(EntityId::from(1)),
            doctor_id: Some(EntityId::from(2)),
            appointment_time: "2024-05-01T10:30".to_string(),
            reason: String::new(),
            status: AppointmentStatus::Cancelled,
        });
        assert_eq!(appointment.doctor_label(), "Lisa Cuddy (Endocrinology)");
        assert_eq!(appointment.display_time(), "May 1, 2024, 10:30 AM");
    }

    #[test]
    fn test_null_time_and_status_are_tolerated() {
        let appointment: Appointment = serde_json::from_value(json!({
            "id": 11,
            "patient": { "id": 1, "firstName": "Bo", "lastName": null },
            "doctor": null,
            "appointmentTime": null,
            "reason": null,
            "status": null
        })).unwrap();

        assert_eq!(appointment.appointment_time, None);
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.display_time(), "");
        assert_eq!(appointment.patient_label(), "Bo");
        assert_eq!(AppointmentDraft::from(&appointment).appointment_time, "");

        let blank: Appointment = serde_json::from_value(json!({ "id": 12, "appointmentTime": " " })).unwrap();
        assert_eq!(blank.appointment_time, None);
        assert_eq!(serde_json::to_value(&blank).unwrap()["appointmentTime"], json!(null));
    }
}
