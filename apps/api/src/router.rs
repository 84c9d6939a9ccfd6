use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::doctor_routes;
use health_data_cell::router::health_data_routes;
use messaging_cell::router::message_routes;
use prescription_cell::router::prescription_routes;
use schedule_cell::router::schedule_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "CardioCare API is running!" }))
        .nest("/doctor-schedule", schedule_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/prescriptions", prescription_routes(state.clone()))
        .nest("/messages", message_routes(state.clone()))
        .nest("/health-data", health_data_routes(state))
}
