use std::collections::VecDeque;
use std::sync::Mutex;
use async_trait::async_trait;
use serde_json::{json, Value};

use resource_cell::Confirm;
use shared_config::AppConfig;

pub struct TestConfig {
    pub api_base_url: String,
    pub notification_dwell_ms: u64,
    pub notification_enter_ms: u64,
    pub notification_exit_ms: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            notification_dwell_ms: 5_000,
            notification_enter_ms: 100,
            notification_exit_ms: 300,
        }
    }
}

impl TestConfig {
    /// Points the config at a mock server, e.g. `wiremock::MockServer::uri()`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            notification_dwell_ms: self.notification_dwell_ms,
            notification_enter_ms: self.notification_enter_ms,
            notification_exit_ms: self.notification_exit_ms,
        }
    }

}

/// Canned JSON bodies shaped like the records API.
pub struct MockApiResponses;

impl MockApiResponses {
    pub fn patient_response(id: i64, first_name: &str, last_name: &str) -> Value {
        json!({
            "id": id,
            "firstName": first_name,
            "lastName": last_name,
            "dateOfBirth": "1985-04-12",
            "gender": "Female",
            "phoneNumber": format!("555-01{:02}", id % 100),
            "address": "12 Harbour Road"
        })
    }

    pub fn doctor_response(id: i64, first_name: &str, last_name: &str, specialization: &str) -> Value {
        json!({
            "id": id,
            "firstName": first_name,
            "lastName": last_name,
            "specialization": specialization,
            "phoneNumber": "555-0200",
            "email": format!("{}.{}@hospital.test", first_name.to_lowercase(), last_name.to_lowercase())
        })
    }

    pub fn appointment_response(id: i64, patient: Value, doctor: Value, appointment_time: &str, reason: Option<&str>, status: &str) -> Value {
        json!({
            "id": id,
            "patient": patient,
            "doctor": doctor,
            "appointmentTime": appointment_time,
            "reason": reason,
            "status": status
        })
    }

    pub fn error_response(message: &str) -> Value {
        json!({
            "status": 400,
            "error": "Bad Request",
            "message": message
        })
    }
}

/// Answers confirmation prompts from a prepared script, then falls back to a
/// fixed answer.
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<bool>>,
    fallback: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            fallback,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn always(answer: bool) -> Self {
        Self::new([], answer)
    }

    /// Prompts seen so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Confirm for ScriptedConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).push(prompt.to_string());
        self.answers.lock().unwrap_or_else(|e| e.into_inner()).pop_front().unwrap_or(self.fallback)
    }
}
