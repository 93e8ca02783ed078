use std::sync::Arc;

use notification_cell::NotificationChannel;
use resource_cell::schema::{require, unknown_field};
use resource_cell::{Confirm, EntitySchema, ResourceManager};
use shared_api_client::ApiClient;
use shared_models::{AppError, EntityId};

use crate::models::{Doctor, DoctorDraft, DoctorPayload};

pub struct DoctorSchema;

pub type DoctorManager = ResourceManager<DoctorSchema>;

impl EntitySchema for DoctorSchema {
    type Entity = Doctor;
    type Draft = DoctorDraft;
    type Payload = DoctorPayload;

    const COLLECTION: &'static str = "doctors";
    const SINGULAR: &'static str = "doctor";
    const PLURAL: &'static str = "doctors";
    const TITLE: &'static str = "Doctor";

    fn entity_id(entity: &Doctor) -> &EntityId {
        &entity.id
    }

    fn draft_from(entity: &Doctor) -> DoctorDraft {
        DoctorDraft::from(entity)
    }

    fn payload(draft: &DoctorDraft) -> Result<DoctorPayload, AppError> {
        Ok(DoctorPayload {
            first_name: require(&draft.first_name, "First name")?,
            last_name: require(&draft.last_name, "Last name")?,
            specialization: draft.specialization.clone(),
            phone_number: draft.phone_number.clone(),
            email: draft.email.trim().to_string(),
        })
    }

    fn search_fields(entity: &Doctor) -> Vec<Option<&str>> {
        vec![
            Some(entity.first_name.as_str()),
            Some(entity.last_name.as_str()),
            entity.specialization.as_deref(),
            entity.email.as_deref(),
        ]
    }

    fn columns() -> &'static [&'static str] {
        &["First Name", "Last Name", "Specialization", "Phone", "Email"]
    }

    fn row(entity: &Doctor) -> Vec<String> {
        vec![
            entity.first_name.clone(),
            entity.last_name.clone(),
            entity.specialization.clone().unwrap_or_default(),
            entity.phone_number.clone().unwrap_or_default(),
            entity.email.clone().unwrap_or_default(),
        ]
    }

    fn draft_fields() -> &'static [&'static str] {
        &["firstName", "lastName", "specialization", "phoneNumber", "email"]
    }

    fn set_draft_field(draft: &mut DoctorDraft, field: &str, value: &str) -> Result<(), AppError> {
        let slot = match field {
            "firstName" => &mut draft.first_name,
            "lastName" => &mut draft.last_name,
            "specialization" => &mut draft.specialization,
            "phoneNumber" => &mut draft.phone_number,
            "email" => &mut draft.email,
            other => return Err(unknown_field::<Self>(other)),
        };
        *slot = value.to_string();
        Ok(())
    }

    fn draft_values(draft: &DoctorDraft) -> Vec<String> {
        vec![
            draft.first_name.clone(),
            draft.last_name.clone(),
            draft.specialization.clone(),
            draft.phone_number.clone(),
            draft.email.clone(),
        ]
    }
}

impl DoctorSchema {
    pub fn manager(api: &ApiClient, notifier: NotificationChannel, confirm: Arc<dyn Confirm>) -> DoctorManager {
        ResourceManager::new(api, notifier, confirm)
    }
}
