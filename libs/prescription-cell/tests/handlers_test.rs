use std::sync::Arc;
use axum::{
    extract::{Extension, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_partial_json, method, path, query_param};

use prescription_cell::handlers::{self, PrescriptionQuery};
use prescription_cell::models::{
    CreatePrescriptionRequest, PrescriptionStatus, UpdatePrescriptionRequest,
};
use shared_config::AppConfig;
use shared_models::{auth::User, error::AppError};
use shared_utils::test_utils::{MockPostgrestResponses, TestConfig, TestUser};

fn state_for(mock_server: &MockServer) -> Arc<AppConfig> {
    TestConfig::with_supabase_url(&mock_server.uri()).to_arc()
}

fn user_extension(user: &TestUser) -> Extension<User> {
    Extension(user.to_user())
}

fn auth_header() -> TypedHeader<Authorization<Bearer>> {
    TypedHeader(Authorization::bearer("test-token").unwrap())
}

fn create_request(patient_id: Uuid) -> CreatePrescriptionRequest {
    CreatePrescriptionRequest {
        patient_id: Some(patient_id),
        medication: Some("Lisinopril".to_string()),
        dosage: Some("10mg".to_string()),
        frequency: Some("once daily".to_string()),
        instructions: Some("Take in the morning".to_string()),
        start_date: Some("2024-06-01".parse().unwrap()),
        end_date: None,
    }
}

#[tokio::test]
async fn doctor_can_issue_prescription() {
    let mock_server = MockServer::start().await;
    let doctor = TestUser::doctor("doc@example.com");
    let patient_id = Uuid::new_v4();
    let prescription_id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/rest/v1/prescriptions"))
        .and(body_partial_json(json!({
            "doctor_id": doctor.id,
            "patient_id": patient_id,
            "status": "ACTIVE",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockPostgrestResponses::prescription_response(
                &prescription_id, &patient_id.to_string(), &doctor.id, "ACTIVE",
            )
        ])))
        .mount(&mock_server)
        .await;

    let result = handlers::create_prescription(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&doctor),
        Json(create_request(patient_id)),
    ).await;

    let Json(body) = result.expect("prescription should be created");
    assert_eq!(body["status"], json!("ACTIVE"));
    assert_eq!(body["medication"], json!("Lisinopril"));
}

#[tokio::test]
async fn patient_cannot_issue_prescription() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("pat@example.com");

    let result = handlers::create_prescription(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&patient),
        Json(create_request(Uuid::new_v4())),
    ).await;

    assert_matches!(result, Err(AppError::Forbidden(_)));
}

#[tokio::test]
async fn missing_fields_are_all_reported() {
    let mock_server = MockServer::start().await;
    let doctor = TestUser::doctor("doc@example.com");

    let result = handlers::create_prescription(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&doctor),
        Json(CreatePrescriptionRequest {
            patient_id: None,
            medication: None,
            dosage: Some("10mg".to_string()),
            frequency: Some("once daily".to_string()),
            instructions: Some("Morning".to_string()),
            start_date: Some("2024-06-01".parse().unwrap()),
            end_date: None,
        }),
    ).await;

    match result {
        Err(AppError::ValidationError(msg)) => {
            assert!(msg.contains("patientId"));
            assert!(msg.contains("medication"));
        }
        other => panic!("expected validation error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn patient_listing_defaults_to_active() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("pat@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .and(query_param("patient_id", format!("eq.{}", patient.id)))
        .and(query_param("status", "eq.ACTIVE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::prescription_response(
                &Uuid::new_v4().to_string(), &patient.id,
                &Uuid::new_v4().to_string(), "ACTIVE",
            )
        ])))
        .mount(&mock_server)
        .await;

    let result = handlers::list_prescriptions(
        State(state_for(&mock_server)),
        Query(PrescriptionQuery { status: None }),
        auth_header(),
        user_extension(&patient),
    ).await;

    let Json(body) = result.expect("listing should succeed");
    assert_eq!(body.as_array().map(|prescriptions| prescriptions.len()), Some(1));
}

#[tokio::test]
async fn updating_unknown_prescription_returns_not_found() {
    let mock_server = MockServer::start().await;
    let doctor = TestUser::doctor("doc@example.com");

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/prescriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = handlers::update_prescription(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&doctor),
        Json(UpdatePrescriptionRequest {
            id: Uuid::new_v4(),
            status: PrescriptionStatus::Cancelled,
        }),
    ).await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}
