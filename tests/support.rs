//! Wiring shared by the cross-cell flows: one records API mock, one
//! notification channel, and all three managers built on top of them.

use std::sync::Arc;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::AppointmentManager;
use doctor_cell::{DoctorManager, DoctorSchema};
use notification_cell::{NotificationChannel, NotificationKind};
use patient_cell::{PatientManager, PatientSchema};
use shared_api_client::ApiClient;
use shared_utils::test_utils::{ScriptedConfirm, TestConfig};

pub struct AdminHarness {
    pub server: MockServer,
    pub notifier: NotificationChannel,
    pub confirm: Arc<ScriptedConfirm>,
    pub patients: PatientManager,
    pub doctors: DoctorManager,
    pub appointments: AppointmentManager,
}

impl AdminHarness {
    /// Confirmation prompts are answered from `answers` in order, then with "no".
    pub async fn start(answers: Vec<bool>) -> Self {
        let server = MockServer::start().await;
        let config = TestConfig::with_base_url(server.uri()).to_app_config();
        let api = ApiClient::new(&config);
        let notifier = NotificationChannel::default();
        let confirm = Arc::new(ScriptedConfirm::new(answers, false));

        Self {
            patients: PatientSchema::manager(&api, notifier.clone(), confirm.clone()),
            doctors: DoctorSchema::manager(&api, notifier.clone(), confirm.clone()),
            appointments: AppointmentManager::new(&api, notifier.clone(), confirm.clone()),
            server,
            notifier,
            confirm,
        }
    }

    pub async fn mount_list(&self, collection: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api/{}", collection)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn messages(&self) -> Vec<(NotificationKind, String)> {
        self.notifier
            .snapshot()
            .await
            .into_iter()
            .map(|n| (n.kind, n.message))
            .collect()
    }
}
