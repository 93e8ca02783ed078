use std::sync::Arc;
use chrono::NaiveDateTime;
use tracing::{debug, error, instrument};

use doctor_cell::{Doctor, DoctorSchema};
use notification_cell::NotificationChannel;
use patient_cell::{Patient, PatientSchema};
use resource_cell::schema::unknown_field;
use resource_cell::{Confirm, EntitySchema, Outcome, ReferenceLookup, ResourceManager};
use shared_api_client::ApiClient;
use shared_models::{AppError, EntityId, EntityRef};

use crate::models::{
    Appointment, AppointmentDraft, AppointmentPayload, AppointmentStatus, FORM_TIME_FORMAT,
    WIRE_TIME_FORMAT,
};

pub const REFERENCE_FAILURE_MESSAGE: &str = "Failed to load patient and doctor data.";

pub struct AppointmentSchema;

impl EntitySchema for AppointmentSchema {
    type Entity = Appointment;
    type Draft = AppointmentDraft;
    type Payload = AppointmentPayload;

    const COLLECTION: &'static str = "appointments";
    const SINGULAR: &'static str = "appointment";
    const PLURAL: &'static str = "appointments";
    const TITLE: &'static str = "Appointment";

    fn entity_id(entity: &Appointment) -> &EntityId {
        &entity.id
    }

    fn draft_from(entity: &Appointment) -> AppointmentDraft {
        AppointmentDraft::from(entity)
    }

    fn payload(draft: &AppointmentDraft) -> Result<AppointmentPayload, AppError> {
        let patient_id = draft.patient_id.clone()
            .ok_or_else(|| AppError::validation("Patient is required"))?;
        let doctor_id = draft.doctor_id.clone()
            .ok_or_else(|| AppError::validation("Doctor is required"))?;

        let raw_time = draft.appointment_time.trim();
        let time = NaiveDateTime::parse_from_str(raw_time, FORM_TIME_FORMAT).map_err(|_| {
            AppError::validation(format!("Appointment time must be YYYY-MM-DDTHH:MM, got '{}'", raw_time))
        })?;

        Ok(AppointmentPayload {
            patient: EntityRef::from(patient_id),
            doctor: EntityRef::from(doctor_id),
            appointment_time: time.format(WIRE_TIME_FORMAT).to_string(),
            reason: draft.reason.clone(),
            status: draft.status,
        })
    }

    fn search_fields(entity: &Appointment) -> Vec<Option<&str>> {
        let patient = entity.patient.as_ref();
        let doctor = entity.doctor.as_ref();
        vec![
            patient.map(|p| p.first_name.as_str()),
            patient.map(|p| p.last_name.as_str()),
            doctor.map(|d| d.first_name.as_str()),
            doctor.map(|d| d.last_name.as_str()),
            entity.reason.as_deref(),
        ]
    }

    fn columns() -> &'static [&'static str] {
        &["Patient", "Doctor", "Time", "Reason", "Status"]
    }

    fn row(entity: &Appointment) -> Vec<String> {
        vec![
            entity.patient_label(),
            entity.doctor_label(),
            entity.display_time(),
            entity.reason.clone().unwrap_or_default(),
            entity.status.to_string(),
        ]
    }

    fn draft_fields() -> &'static [&'static str] {
        &["patientId", "doctorId", "appointmentTime", "reason", "status"]
    }

    fn set_draft_field(draft: &mut AppointmentDraft, field: &str, value: &str) -> Result<(), AppError> {
        match field {
            "patientId" => draft.patient_id = parse_reference(value),
            "doctorId" => draft.doctor_id = parse_reference(value),
            "appointmentTime" => draft.appointment_time = value.to_string(),
            "reason" => draft.reason = value.to_string(),
            "status" => draft.status = value.parse::<AppointmentStatus>()?,
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }

    fn draft_values(draft: &AppointmentDraft) -> Vec<String> {
        let reference = |id: &Option<EntityId>| id.as_ref().map(EntityId::to_string).unwrap_or_default();
        vec![
            reference(&draft.patient_id),
            reference(&draft.doctor_id),
            draft.appointment_time.clone(),
            draft.reason.clone(),
            draft.status.to_string(),
        ]
    }

    fn save_failure_message() -> String {
        "Failed to save appointment. Please check your input and ensure Patient/Doctor IDs are valid.".to_string()
    }
}

fn parse_reference(value: &str) -> Option<EntityId> {
    match value.trim() {
        "" => None,
        raw => raw.parse().ok(),
    }
}

/// Appointment list and form, plus the patient and doctor pickers the form
/// needs.
#[derive(Clone)]
pub struct AppointmentManager {
    records: ResourceManager<AppointmentSchema>,
    patients: ReferenceLookup<PatientSchema>,
    doctors: ReferenceLookup<DoctorSchema>,
}

impl AppointmentManager {
    pub fn new(api: &ApiClient, notifier: NotificationChannel, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            records: ResourceManager::new(api, notifier, confirm),
            patients: ReferenceLookup::new(api),
            doctors: ReferenceLookup::new(api),
        }
    }

    pub fn records(&self) -> &ResourceManager<AppointmentSchema> {
        &self.records
    }

    /// Loads appointments and both pickers concurrently.
    pub async fn activate(&self) -> (Outcome, Outcome) {
        futures::join!(self.records.load(), self.load_references())
    }

    /// Replaces both picker lists only when both fetches succeed.
    #[instrument(skip(self))]
    pub async fn load_references(&self) -> Outcome {
        match futures::try_join!(self.patients.fetch(), self.doctors.fetch()) {
            Ok((patients, doctors)) => {
                debug!("Loaded {} patients and {} doctors for selection", patients.len(), doctors.len());
                self.patients.replace(patients).await;
                self.doctors.replace(doctors).await;
                Outcome::Completed
            }
            Err(e) => {
                error!("Error fetching patients or doctors: {}", e);
                self.records.notifier().error(REFERENCE_FAILURE_MESSAGE).await;
                Outcome::Failed
            }
        }
    }

    pub async fn patient_options(&self) -> Vec<Patient> {
        self.patients.options().await
    }

    pub async fn doctor_options(&self) -> Vec<Doctor> {
        self.doctors.options().await
    }

    /// Picks a patient from the loaded options.
    pub async fn select_patient(&self, id: &EntityId) -> Result<(), AppError> {
        if !self.patients.contains(id).await {
            return Err(AppError::validation(format!("No patient with id {} to select", id)));
        }
        let id = id.clone();
        self.records.update_draft(|draft| draft.patient_id = Some(id)).await;
        Ok(())
    }

    /// Picks a doctor from the loaded options.
    pub async fn select_doctor(&self, id: &EntityId) -> Result<(), AppError> {
        if !self.doctors.contains(id).await {
            return Err(AppError::validation(format!("No doctor with id {} to select", id)));
        }
        let id = id.clone();
        self.records.update_draft(|draft| draft.doctor_id = Some(id)).await;
        Ok(())
    }

    /// Form input binding; patient and doctor go through the pickers.
    pub async fn set_field(&self, field: &str, value: &str) -> Result<(), AppError> {
        match (field, parse_reference(value)) {
            ("patientId", Some(id)) => self.select_patient(&id).await,
            ("doctorId", Some(id)) => self.select_doctor(&id).await,
            _ => self.records.set_field(field, value).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_cell::filter_items;
    use serde_json::json;

    fn appointments() -> Vec<Appointment> {
        serde_json::from_value(json!([
            {
                "id": 1,
                "patient": { "id": 1, "firstName": "Ann", "lastName": "Lee" },
                "doctor": { "id": 2, "firstName": "Lisa", "lastName": "Cuddy", "specialization": "Endocrinology" },
                "appointmentTime": "2024-05-01T10:30:00",
                "reason": "Thyroid follow-up",
                "status": "Scheduled"
            },
            {
                "id": 2,
                "patient": null,
                "doctor": { "id": 3, "firstName": "James", "lastName": "Wilson" },
                "appointmentTime": "2024-05-02T09:00:00",
                "reason": null,
                "status": "Completed"
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_payload_nests_references_and_appends_seconds() {
        let draft = AppointmentDraft {
            patient_id: Some(EntityId::from(1)),
            doctor_id: Some(EntityId::from(2)),
            appointment_time: "2024-05-01T10:30".to_string(),
            reason: "Checkup".to_string(),
            status: AppointmentStatus::Scheduled,
        };

        let payload = AppointmentSchema::payload(&draft).unwrap();

        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({
            "patient": { "id": 1 },
            "doctor": { "id": 2 },
            "appointmentTime": "2024-05-01T10:30:00",
            "reason": "Checkup",
            "status": "Scheduled"
        }));
    }

    #[test]
    fn test_payload_requires_references_and_time() {
        let mut draft = AppointmentDraft {
            appointment_time: "2024-05-01T10:30".to_string(),
            ..AppointmentDraft::default()
        };
        assert_eq!(AppointmentSchema::payload(&draft).unwrap_err(), AppError::validation("Patient is required"));

        draft.patient_id = Some(EntityId::from(1));
        draft.doctor_id = Some(EntityId::from(2));
        draft.appointment_time = "2024-05-01 10:30".to_string();
        assert!(AppointmentSchema::payload(&draft).unwrap_err().is_validation());
    }

    #[test]
    fn test_search_covers_names_and_reason() {
        let items = appointments();

        assert_eq!(filter_items::<AppointmentSchema>(&items, "thyroid").len(), 1);
        assert_eq!(filter_items::<AppointmentSchema>(&items, "WILSON")[0].id, EntityId::from(2));
        // Specialization is rendered but not searched.
        assert!(filter_items::<AppointmentSchema>(&items, "endocrinology").is_empty());
        assert_eq!(filter_items::<AppointmentSchema>(&items, "").len(), 2);
    }

    #[test]
    fn test_row_rendering() {
        let items = appointments();

        assert_eq!(AppointmentSchema::row(&items[0]), vec![
            "Ann Lee".to_string(),
            "Lisa Cuddy (Endocrinology)".to_string(),
            "May 1, 2024, 10:30 AM".to_string(),
            "Thyroid follow-up".to_string(),
            "Scheduled".to_string(),
        ]);
        assert_eq!(AppointmentSchema::row(&items[1])[0], "");
        assert_eq!(AppointmentSchema::row(&items[1])[2], "May 2, 2024, 09:00 AM");
    }

    #[test]
    fn test_status_field_only_accepts_enumerated_values() {
        let mut draft = AppointmentDraft::default();

        AppointmentSchema::set_draft_field(&mut draft, "status", "cancelled").unwrap();
        assert_eq!(draft.status, AppointmentStatus::Cancelled);

        assert!(AppointmentSchema::set_draft_field(&mut draft, "status", "Postponed").is_err());
        assert_eq!(draft.status, AppointmentStatus::Cancelled);
    }
}
