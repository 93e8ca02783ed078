use std::sync::Arc;
use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, body_json};

use appointment_cell::{AppointmentManager, AppointmentStatus};
use appointment_cell::services::appointment::REFERENCE_FAILURE_MESSAGE;
use notification_cell::{NotificationChannel, NotificationKind};
use resource_cell::{FormMode, Outcome};
use shared_api_client::ApiClient;
use shared_models::{AppError, EntityId};
use shared_utils::test_utils::{MockApiResponses, ScriptedConfirm, TestConfig};

fn setup(server: &MockServer) -> (AppointmentManager, NotificationChannel) {
    let config = TestConfig::with_base_url(server.uri()).to_app_config();
    let notifier = NotificationChannel::default();
    let manager = AppointmentManager::new(
        &ApiClient::new(&config),
        notifier.clone(),
        Arc::new(ScriptedConfirm::always(true)),
    );
    (manager, notifier)
}

async fn mount_references(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockApiResponses::patient_response(1, "Ann", "Lee")
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockApiResponses::doctor_response(2, "Lisa", "Cuddy", "Endocrinology")
        ])))
        .mount(server)
        .await;
}

fn stored_appointment() -> serde_json::Value {
    MockApiResponses::appointment_response(
        10,
        MockApiResponses::patient_response(1, "Ann", "Lee"),
        MockApiResponses::doctor_response(2, "Lisa", "Cuddy", "Endocrinology"),
        "2024-05-01T10:30:00",
        Some("Thyroid follow-up"),
        "Scheduled",
    )
}

async fn messages(notifier: &NotificationChannel) -> Vec<(NotificationKind, String)> {
    notifier.snapshot().await.into_iter().map(|n| (n.kind, n.message)).collect()
}

#[tokio::test]
async fn test_create_appointment_payload_shape() {
    let server = MockServer::start().await;
    let (manager, notifier) = setup(&server);
    mount_references(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .and(body_json(json!({
            "patient": { "id": 1 },
            "doctor": { "id": 2 },
            "appointmentTime": "2024-05-01T10:30:00",
            "reason": "",
            "status": "Scheduled"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(stored_appointment()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored_appointment()])))
        .mount(&server)
        .await;

    assert_eq!(manager.activate().await, (Outcome::Completed, Outcome::Completed));

    let records = manager.records();
    records.begin_create().await;
    assert_eq!(records.draft().await.status, AppointmentStatus::Scheduled);

    manager.set_field("patientId", "1").await.unwrap();
    manager.set_field("doctorId", "2").await.unwrap();
    manager.set_field("appointmentTime", "2024-05-01T10:30").await.unwrap();

    assert_eq!(records.submit().await, Outcome::Completed);
    assert_eq!(records.items().await.len(), 1);
    assert_eq!(
        messages(&notifier).await,
        vec![(NotificationKind::Success, "Appointment added successfully.".to_string())]
    );
}

#[tokio::test]
async fn test_edit_prefills_references_and_minute_precision() {
    let server = MockServer::start().await;
    let (manager, _) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored_appointment()])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/appointments/10"))
        .and(body_json(json!({
            "patient": { "id": 1 },
            "doctor": { "id": 2 },
            "appointmentTime": "2024-05-01T10:30:00",
            "reason": "Thyroid follow-up",
            "status": "Completed"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let records = manager.records();
    records.load().await;
    assert!(records.begin_edit_by_id(&EntityId::from(10)).await);

    let draft = records.draft().await;
    assert_eq!(draft.patient_id, Some(EntityId::from(1)));
    assert_eq!(draft.doctor_id, Some(EntityId::from(2)));
    assert_eq!(draft.appointment_time, "2024-05-01T10:30");
    assert_matches!(records.mode().await, FormMode::Edit(a) if a.id == EntityId::from(10));

    manager.set_field("status", "Completed").await.unwrap();
    assert_eq!(records.submit().await, Outcome::Completed);
}

#[tokio::test]
async fn test_rejected_cross_reference_keeps_form_open() {
    let server = MockServer::start().await;
    let (manager, notifier) = setup(&server);

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(400).set_body_json(MockApiResponses::error_response("Patient not found")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let records = manager.records();
    records.begin_create().await;
    // Raw field binding bypasses the pickers; the server has the final word.
    records.set_field("patientId", "99").await.unwrap();
    records.set_field("doctorId", "2").await.unwrap();
    records.set_field("appointmentTime", "2024-05-01T10:30").await.unwrap();

    assert_eq!(records.submit().await, Outcome::Failed);
    assert!(records.is_form_open().await);
    assert_eq!(
        messages(&notifier).await,
        vec![(
            NotificationKind::Error,
            "Failed to save appointment. Please check your input and ensure Patient/Doctor IDs are valid.".to_string()
        )]
    );
}

#[tokio::test]
async fn test_reference_failure_leaves_pickers_empty() {
    let server = MockServer::start().await;
    let (manager, notifier) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/api/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockApiResponses::patient_response(1, "Ann", "Lee")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/doctors"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert_eq!(manager.load_references().await, Outcome::Failed);

    assert!(manager.patient_options().await.is_empty());
    assert!(manager.doctor_options().await.is_empty());
    assert!(manager.records().items().await.is_empty());
    assert_eq!(
        messages(&notifier).await,
        vec![(NotificationKind::Error, REFERENCE_FAILURE_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn test_pickers_only_accept_loaded_options() {
    let server = MockServer::start().await;
    let (manager, _) = setup(&server);
    mount_references(&server).await;

    assert_eq!(manager.load_references().await, Outcome::Completed);
    assert_eq!(manager.patient_options().await[0].full_name(), "Ann Lee");
    assert_eq!(manager.doctor_options().await[0].display_label(), "Lisa Cuddy (Endocrinology)");

    manager.records().begin_create().await;
    let err = manager.select_doctor(&EntityId::from(7)).await.unwrap_err();
    assert_matches!(err, AppError::Validation(_));
    assert_eq!(manager.records().draft().await.doctor_id, None);

    manager.select_doctor(&EntityId::from(2)).await.unwrap();
    assert_eq!(manager.records().draft().await.doctor_id, Some(EntityId::from(2)));

    // Reference data never leaks into the appointment list.
    assert!(manager.records().items().await.is_empty());
}

#[tokio::test]
async fn test_load_tolerates_null_time_and_snapshots() {
    let server = MockServer::start().await;
    let (manager, notifier) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            stored_appointment(),
            { "id": 11, "patient": null, "doctor": null, "appointmentTime": null, "reason": null, "status": null }
        ])))
        .mount(&server)
        .await;

    assert_eq!(manager.records().load().await, Outcome::Completed);

    let items = manager.records().items().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].appointment_time, None);
    assert_eq!(items[1].status, AppointmentStatus::Scheduled);
    assert!(messages(&notifier).await.is_empty());

    let table = manager.records().render_table().await;
    assert_eq!(table.rows[1].1[2], "");

    assert!(manager.records().begin_edit_by_id(&EntityId::from(11)).await);
    assert_eq!(manager.records().draft().await.appointment_time, "");
}
