use std::sync::Arc;
use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_partial_json, method, path, query_param};

use appointment_cell::handlers;
use appointment_cell::models::{AppointmentStatus, BookAppointmentRequest, UpdateAppointmentRequest};
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

fn appointment_row(
    appointment_id: Uuid,
    patient_id: &str,
    doctor_id: &str,
    status: &str,
    cancel_reason: Option<&str>,
) -> serde_json::Value {
    json!({
        "id": appointment_id,
        "patient_id": patient_id,
        "doctor_id": doctor_id,
        "date": "2024-06-01",
        "start_time": "09:00:00",
        "end_time": "09:30:00",
        "status": status,
        "cancel_reason": cancel_reason,
        "meet_link": null,
        "created_at": "2024-01-01T00:00:00Z"
    })
}

async fn mount_available_slot(
    mock_server: &MockServer,
    slot_id: Uuid,
    doctor_id: &str,
) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/time_slots"))
        .and(query_param("id", format!("eq.{}", slot_id)))
        .and(query_param("is_booked", "eq.false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPostgrestResponses::time_slot_response(
                &slot_id.to_string(), doctor_id,
                "2024-06-01", "09:00:00", "09:30:00", false,
            )
        ])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn booking_available_slot_succeeds() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("pat@example.com");
    let doctor_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();

    mount_available_slot(&mock_server, slot_id, &doctor_id.to_string()).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/book_time_slot"))
        .and(body_partial_json(json!({
            "p_time_slot_id": slot_id,
            "p_patient_id": patient.id,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(Uuid::new_v4(), &patient.id, &doctor_id.to_string(), "SCHEDULED", None)
        ])))
        .mount(&mock_server)
        .await;

    let result = handlers::book_appointment(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&patient),
        Json(BookAppointmentRequest { doctor_id, time_slot_id: slot_id }),
    ).await;

    let Json(body) = result.expect("booking should succeed");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["appointment"]["status"], json!("SCHEDULED"));
}

#[tokio::test]
async fn booking_unavailable_slot_fails() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("pat@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/time_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = handlers::book_appointment(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&patient),
        Json(BookAppointmentRequest {
            doctor_id: Uuid::new_v4(),
            time_slot_id: Uuid::new_v4(),
        }),
    ).await;

    assert_matches!(result, Err(AppError::Conflict(_)));
}

#[tokio::test]
async fn booking_lost_race_fails_without_partial_state() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("pat@example.com");
    let doctor_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();

    mount_available_slot(&mock_server, slot_id, &doctor_id.to_string()).await;

    // The transaction's conditional update matched zero rows.
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/book_time_slot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = handlers::book_appointment(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&patient),
        Json(BookAppointmentRequest { doctor_id, time_slot_id: slot_id }),
    ).await;

    assert_matches!(result, Err(AppError::Conflict(_)));
}

#[tokio::test]
async fn booking_with_mismatched_doctor_fails() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("pat@example.com");
    let slot_id = Uuid::new_v4();

    mount_available_slot(&mock_server, slot_id, &Uuid::new_v4().to_string()).await;

    let result = handlers::book_appointment(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&patient),
        Json(BookAppointmentRequest {
            doctor_id: Uuid::new_v4(),
            time_slot_id: slot_id,
        }),
    ).await;

    assert_matches!(result, Err(AppError::ValidationError(_)));
}

#[tokio::test]
async fn cancelling_scheduled_appointment_persists_reason() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("pat@example.com");
    let appointment_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(appointment_id, &patient.id, &doctor_id, "SCHEDULED", None)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({
            "status": "CANCELLED",
            "cancel_reason": "Feeling better",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(appointment_id, &patient.id, &doctor_id, "CANCELLED", Some("Feeling better"))
        ])))
        .mount(&mock_server)
        .await;

    let result = handlers::update_appointment(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&patient),
        Json(UpdateAppointmentRequest {
            appointment_id,
            status: AppointmentStatus::Cancelled,
            cancel_reason: Some("Feeling better".to_string()),
        }),
    ).await;

    let Json(body) = result.expect("cancellation should succeed");
    assert_eq!(body["status"], json!("CANCELLED"));
    assert_eq!(body["cancel_reason"], json!("Feeling better"));
}

#[tokio::test]
async fn completing_appointment_ignores_cancel_reason() {
    let mock_server = MockServer::start().await;
    let doctor = TestUser::doctor("doc@example.com");
    let appointment_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(appointment_id, &patient_id, &doctor.id, "SCHEDULED", None)
        ])))
        .mount(&mock_server)
        .await;

    // A completion must null out any provided reason.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({
            "status": "COMPLETED",
            "cancel_reason": null,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(appointment_id, &patient_id, &doctor.id, "COMPLETED", None)
        ])))
        .mount(&mock_server)
        .await;

    let result = handlers::update_appointment(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&doctor),
        Json(UpdateAppointmentRequest {
            appointment_id,
            status: AppointmentStatus::Completed,
            cancel_reason: Some("should be ignored".to_string()),
        }),
    ).await;

    let Json(body) = result.expect("completion should succeed");
    assert_eq!(body["status"], json!("COMPLETED"));
    assert_eq!(body["cancel_reason"], json!(null));
}

#[tokio::test]
async fn updating_terminal_appointment_is_rejected() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("pat@example.com");
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(appointment_id, &patient.id, &Uuid::new_v4().to_string(), "COMPLETED", None)
        ])))
        .mount(&mock_server)
        .await;

    let result = handlers::update_appointment(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&patient),
        Json(UpdateAppointmentRequest {
            appointment_id,
            status: AppointmentStatus::Cancelled,
            cancel_reason: None,
        }),
    ).await;

    assert_matches!(result, Err(AppError::BadRequest(_)));
}

#[tokio::test]
async fn patient_cannot_update_anothers_appointment() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("pat@example.com");
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(
                appointment_id,
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
                "SCHEDULED",
                None,
            )
        ])))
        .mount(&mock_server)
        .await;

    let result = handlers::update_appointment(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&patient),
        Json(UpdateAppointmentRequest {
            appointment_id,
            status: AppointmentStatus::Cancelled,
            cancel_reason: None,
        }),
    ).await;

    assert_matches!(result, Err(AppError::Forbidden(_)));
}

#[tokio::test]
async fn updating_unknown_appointment_returns_not_found() {
    let mock_server = MockServer::start().await;
    let patient = TestUser::patient("pat@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = handlers::update_appointment(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&patient),
        Json(UpdateAppointmentRequest {
            appointment_id: Uuid::new_v4(),
            status: AppointmentStatus::Cancelled,
            cancel_reason: None,
        }),
    ).await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn doctor_listing_queries_by_doctor_id() {
    let mock_server = MockServer::start().await;
    let doctor = TestUser::doctor("doc@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(
                Uuid::new_v4(),
                &Uuid::new_v4().to_string(),
                &doctor.id,
                "SCHEDULED",
                None,
            )
        ])))
        .mount(&mock_server)
        .await;

    let result = handlers::list_appointments(
        State(state_for(&mock_server)),
        auth_header(),
        user_extension(&doctor),
    ).await;

    let Json(body) = result.expect("listing should succeed");
    assert_eq!(body.as_array().map(|appointments| appointments.len()), Some(1));
}
