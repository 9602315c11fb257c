use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: usize,
    pub version: String,
}

pub async fn handler(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        sessions: state.sessions.len(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
