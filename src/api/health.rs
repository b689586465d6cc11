use actix_web::{HttpResponse, Responder};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::time::Instant;

lazy_static! {
    static ref STARTED_AT: Instant = Instant::now();
}

/// Pins the uptime clock to process start; called once from main before
/// the server begins accepting requests.
pub fn init_uptime_clock() {
    lazy_static::initialize(&STARTED_AT);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: i64,
    pub uptime_seconds: u64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "passion-journey-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        uptime_seconds: STARTED_AT.elapsed().as_secs(),
    })
}
