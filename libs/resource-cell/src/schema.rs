use std::fmt::Debug;
use serde::{de::DeserializeOwned, Serialize};

use shared_models::{AppError, EntityId};

/// Per-entity configuration of a [`crate::ResourceManager`].
///
/// Everything that differs between patients, doctors and appointments lives
/// here: the endpoint, the wire types, draft conversion and validation, the
/// searchable fields, rendering, and the user-facing messages.
pub trait EntitySchema: Send + Sync + 'static {
    type Entity: DeserializeOwned + Clone + Debug + Send + Sync + 'static;
    type Draft: Default + Clone + Debug + PartialEq + Send + Sync + 'static;
    type Payload: Serialize + Debug + Send + Sync;

    /// Path segment under `/api/`.
    const COLLECTION: &'static str;
    /// Lower-case singular, e.g. `patient`.
    const SINGULAR: &'static str;
    /// Lower-case plural, e.g. `patients`.
    const PLURAL: &'static str;
    /// Capitalised singular, e.g. `Patient`.
    const TITLE: &'static str;

    fn entity_id(entity: &Self::Entity) -> &EntityId;

    /// Copies an existing record into editable form state.
    fn draft_from(entity: &Self::Entity) -> Self::Draft;

    /// Validates a draft and builds the create/update body.
    fn payload(draft: &Self::Draft) -> Result<Self::Payload, AppError>;

    /// Fields matched by the free-text filter. `None` never matches.
    fn search_fields(entity: &Self::Entity) -> Vec<Option<&str>>;

    fn columns() -> &'static [&'static str];

    fn row(entity: &Self::Entity) -> Vec<String>;

    /// Names accepted by [`EntitySchema::set_draft_field`].
    fn draft_fields() -> &'static [&'static str];

    fn set_draft_field(draft: &mut Self::Draft, field: &str, value: &str) -> Result<(), AppError>;

    /// Current input text of each field, in [`EntitySchema::draft_fields`] order.
    fn draft_values(draft: &Self::Draft) -> Vec<String>;

    fn fetch_failure_message() -> String {
        format!("Failed to fetch {}.", Self::PLURAL)
    }

    fn save_failure_message() -> String {
        format!("Failed to save {}. Please check your input.", Self::SINGULAR)
    }

    fn delete_failure_message() -> String {
        format!("Failed to delete {}.", Self::SINGULAR)
    }

    fn created_message() -> String {
        format!("{} added successfully.", Self::TITLE)
    }

    fn updated_message() -> String {
        format!("{} updated successfully.", Self::TITLE)
    }

    fn deleted_message() -> String {
        format!("{} deleted successfully.", Self::TITLE)
    }

    fn delete_prompt() -> String {
        format!("Are you sure you want to delete this {}?", Self::SINGULAR)
    }
}

/// Rejects a blank required text field.
pub fn require(value: &str, label: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} is required", label)));
    }
    Ok(trimmed.to_string())
}

/// Error for a field name the schema does not know.
pub fn unknown_field<S: EntitySchema>(field: &str) -> AppError {
    AppError::validation(format!(
        "Unknown {} field '{}' (expected one of: {})",
        S::SINGULAR,
        field,
        S::draft_fields().join(", ")
    ))
}
