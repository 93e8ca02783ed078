use serde::{Deserialize, Serialize};

use shared_models::{null_as_default, EntityId};

/// Doctor as returned by `GET /api/doctors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// `First Last (Specialization)`, as shown in pickers and appointment rows.
    pub fn display_label(&self) -> String {
        match self.specialization.as_deref() {
            Some(specialization) if !specialization.is_empty() => {
                format!("{} ({})", self.full_name(), specialization)
            }
            _ => self.full_name(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorDraft {
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub phone_number: String,
    pub email: String,
}

impl From<&Doctor> for DoctorDraft {
    fn from(doctor: &Doctor) -> Self {
        Self {
            first_name: doctor.first_name.clone(),
            last_name: doctor.last_name.clone(),
            specialization: doctor.specialization.clone().unwrap_or_default(),
            phone_number: doctor.phone_number.clone().unwrap_or_default(),
            email: doctor.email.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorPayload {
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub phone_number: String,
    pub email: String,
}
