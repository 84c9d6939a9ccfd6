use std::sync::Arc;
use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_partial_json, method, path, query_param};

use health_data_cell::handlers;
use health_data_cell::models::RecordHealthDataRequest;
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

#[tokio::test]
async fn recording_metrics_stores_partial_readings() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("pat@example.com");

    Mock::given(method("POST"))
        .and(path("/rest/v1/health_records"))
        .and(body_partial_json(json!({
            "patient_id": patient.id,
            "recorded_at": "2024-06-01",
            "systolic": 120,
            "glucose": null,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockPostgrestResponses::health_record_response(&patient.id, "2024-06-01")
        ])))
        .mount(&mock_server)
        .await;

    let result = handlers::record_health_data(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&patient),
        Json(RecordHealthDataRequest {
            date: Some("2024-06-01".parse().unwrap()),
            systolic: Some(120),
            diastolic: Some(80),
            heart_rate: None,
            glucose: None,
            cholesterol: None,
        }),
    ).await;

    let Json(body) = result.expect("metrics should be recorded");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["systolic"], json!(120));
}

#[tokio::test]
async fn recording_without_date_fails() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("pat@example.com");

    let result = handlers::record_health_data(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&patient),
        Json(RecordHealthDataRequest {
            date: None,
            systolic: Some(120),
            diastolic: None,
            heart_rate: None,
            glucose: None,
            cholesterol: None,
        }),
    ).await;

    assert_matches!(result, Err(AppError::ValidationError(_)));
}

#[tokio::test]
async fn listing_returns_caller_history() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("pat@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/health_records"))
        .and(query_param("patient_id", format!("eq.{}", patient.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::health_record_response(&patient.id, "2024-06-01"),
            MockPostgrestResponses::health_record_response(&patient.id, "2024-05-31"),
        ])))
        .mount(&mock_server)
        .await;

    let result = handlers::list_health_data(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&patient),
    ).await;

    let Json(body) = result.expect("listing should succeed");
    assert_eq!(body["data"].as_array().map(|records| records.len()), Some(2));
}
