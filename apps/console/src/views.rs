use async_trait::async_trait;

use appointment_cell::AppointmentManager;
use resource_cell::{EntitySchema, FormMode, Outcome, ResourceManager};
use shared_models::{AppError, EntityId};

/// What the console needs from one page, whichever entity it manages.
#[async_trait]
pub trait AdminView: Send + Sync {
    fn title(&self) -> &'static str;

    /// Runs when the page is switched to.
    async fn activate(&self);
    async fn render(&self) -> String;
    async fn search(&self, term: &str);
    async fn begin_create(&self);
    async fn begin_edit(&self, id: &EntityId) -> bool;
    async fn set_field(&self, field: &str, value: &str) -> Result<(), AppError>;
    async fn submit(&self) -> Outcome;
    async fn cancel(&self);
    async fn delete(&self, id: &EntityId) -> Outcome;
    async fn form(&self) -> Option<String>;

    /// Selection inputs, for pages that have them.
    async fn options(&self) -> Option<String> {
        None
    }
}

async fn render_form<S: EntitySchema>(manager: &ResourceManager<S>) -> Option<String> {
    if !manager.is_form_open().await {
        return None;
    }

    let heading = match manager.mode().await {
        FormMode::Create => format!("Add New {}", S::TITLE),
        FormMode::Edit(item) => format!("Edit {} {}", S::TITLE, S::entity_id(&item)),
    };
    let draft = manager.draft().await;
    Some(form_text(&heading, S::draft_fields(), &S::draft_values(&draft)))
}

/// Heading followed by one aligned `field : value` line per input.
fn form_text(heading: &str, fields: &[&str], values: &[String]) -> String {
    let width = fields.iter().map(|f| f.len()).max().unwrap_or(0);
    let mut out = heading.to_string();
    for (field, value) in fields.iter().zip(values) {
        out.push_str(&format!("\n  {:<width$} : {}", field, value, width = width));
    }
    out
}

#[async_trait]
impl<S: EntitySchema> AdminView for ResourceManager<S> {
    fn title(&self) -> &'static str {
        S::PLURAL
    }

    async fn activate(&self) {
        self.load().await;
    }

    async fn render(&self) -> String {
        self.render_table().await.to_string()
    }

    async fn search(&self, term: &str) {
        self.set_search_term(term).await;
    }

    async fn begin_create(&self) {
        ResourceManager::begin_create(self).await;
    }

    async fn begin_edit(&self, id: &EntityId) -> bool {
        self.begin_edit_by_id(id).await
    }

    async fn set_field(&self, field: &str, value: &str) -> Result<(), AppError> {
        ResourceManager::set_field(self, field, value).await
    }

    async fn submit(&self) -> Outcome {
        ResourceManager::submit(self).await
    }

    async fn cancel(&self) {
        self.cancel_form().await;
    }

    async fn delete(&self, id: &EntityId) -> Outcome {
        ResourceManager::delete(self, id).await
    }

    async fn form(&self) -> Option<String> {
        render_form(self).await
    }
}

#[async_trait]
impl AdminView for AppointmentManager {
    fn title(&self) -> &'static str {
        "appointments"
    }

    async fn activate(&self) {
        AppointmentManager::activate(self).await;
    }

    async fn render(&self) -> String {
        self.records().render_table().await.to_string()
    }

    async fn search(&self, term: &str) {
        self.records().set_search_term(term).await;
    }

    async fn begin_create(&self) {
        self.records().begin_create().await;
    }

    async fn begin_edit(&self, id: &EntityId) -> bool {
        self.records().begin_edit_by_id(id).await
    }

    async fn set_field(&self, field: &str, value: &str) -> Result<(), AppError> {
        AppointmentManager::set_field(self, field, value).await
    }

    async fn submit(&self) -> Outcome {
        self.records().submit().await
    }

    async fn cancel(&self) {
        self.records().cancel_form().await;
    }

    async fn delete(&self, id: &EntityId) -> Outcome {
        self.records().delete(id).await
    }

    async fn form(&self) -> Option<String> {
        render_form(self.records()).await
    }

    async fn options(&self) -> Option<String> {
        let mut out = String::from("Patients:\n");
        for patient in self.patient_options().await {
            out.push_str(&format!("  {}  {}\n", patient.id, patient.full_name()));
        }
        out.push_str("Doctors:\n");
        for doctor in self.doctor_options().await {
            out.push_str(&format!("  {}  {}\n", doctor.id, doctor.display_label()));
        }
        Some(out)
    }
}
