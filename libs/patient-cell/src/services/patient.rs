use std::sync::Arc;
use chrono::NaiveDate;

use notification_cell::NotificationChannel;
use resource_cell::schema::{require, unknown_field};
use resource_cell::{Confirm, EntitySchema, ResourceManager};
use shared_api_client::ApiClient;
use shared_models::{AppError, EntityId};

use crate::models::{Patient, PatientDraft, PatientPayload, DATE_FORMAT};

pub struct PatientSchema;

pub type PatientManager = ResourceManager<PatientSchema>;

impl EntitySchema for PatientSchema {
    type Entity = Patient;
    type Draft = PatientDraft;
    type Payload = PatientPayload;

    const COLLECTION: &'static str = "patients";
    const SINGULAR: &'static str = "patient";
    const PLURAL: &'static str = "patients";
    const TITLE: &'static str = "Patient";

    fn entity_id(entity: &Patient) -> &EntityId {
        &entity.id
    }

    fn draft_from(entity: &Patient) -> PatientDraft {
        PatientDraft::from(entity)
    }

    fn payload(draft: &PatientDraft) -> Result<PatientPayload, AppError> {
        let date_of_birth = match draft.date_of_birth.trim() {
            "" => None,
            raw => Some(NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                AppError::validation(format!("Date of birth must be YYYY-MM-DD, got '{}'", raw))
            })?),
        };

        Ok(PatientPayload {
            first_name: require(&draft.first_name, "First name")?,
            last_name: require(&draft.last_name, "Last name")?,
            date_of_birth,
            gender: draft.gender.clone(),
            phone_number: draft.phone_number.clone(),
            address: draft.address.clone(),
        })
    }

    fn search_fields(entity: &Patient) -> Vec<Option<&str>> {
        vec![
            Some(entity.first_name.as_str()),
            Some(entity.last_name.as_str()),
            entity.phone_number.as_deref(),
        ]
    }

    fn columns() -> &'static [&'static str] {
        &["First Name", "Last Name", "DOB", "Gender", "Phone", "Address"]
    }

    fn row(entity: &Patient) -> Vec<String> {
        vec![
            entity.first_name.clone(),
            entity.last_name.clone(),
            entity.date_of_birth.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default(),
            entity.gender.clone().unwrap_or_default(),
            entity.phone_number.clone().unwrap_or_default(),
            entity.address.clone().unwrap_or_default(),
        ]
    }

    fn draft_fields() -> &'static [&'static str] {
        &["firstName", "lastName", "dateOfBirth", "gender", "phoneNumber", "address"]
    }

    fn set_draft_field(draft: &mut PatientDraft, field: &str, value: &str) -> Result<(), AppError> {
        let slot = match field {
            "firstName" => &mut draft.first_name,
            "lastName" => &mut draft.last_name,
            "dateOfBirth" => &mut draft.date_of_birth,
            "gender" => &mut draft.gender,
            "phoneNumber" => &mut draft.phone_number,
            "address" => &mut draft.address,
            other => return Err(unknown_field::<Self>(other)),
        };
        *slot = value.to_string();
        Ok(())
    }

    fn draft_values(draft: &PatientDraft) -> Vec<String> {
        vec![
            draft.first_name.clone(),
            draft.last_name.clone(),
            draft.date_of_birth.clone(),
            draft.gender.clone(),
            draft.phone_number.clone(),
            draft.address.clone(),
        ]
    }
}

impl PatientSchema {
    pub fn manager(api: &ApiClient, notifier: NotificationChannel, confirm: Arc<dyn Confirm>) -> PatientManager {
        ResourceManager::new(api, notifier, confirm)
    }
}
