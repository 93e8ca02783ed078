use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use shared_models::{null_as_default, EntityId};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Patient as returned by `GET /api/patients`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Editable form state. Every field is raw input text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientDraft {
    pub first_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD` or empty.
    pub date_of_birth: String,
    pub gender: String,
    pub phone_number: String,
    pub address: String,
}

impl From<&Patient> for PatientDraft {
    fn from(patient: &Patient) -> Self {
        Self {
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            date_of_birth: patient
                .date_of_birth
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            gender: patient.gender.clone().unwrap_or_default(),
            phone_number: patient.phone_number.clone().unwrap_or_default(),
            address: patient.address.clone().unwrap_or_default(),
        }
    }
}

/// Body of `POST /api/patients` and `PUT /api/patients/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub phone_number: String,
    pub address: String,
}
