use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::{state::AppState, utils::AppError};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
    pub status: String,
    pub date: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ConfigResponse {
    #[serde(rename = "frontendUrl")]
    pub frontend_url: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Welcome payload", body = WelcomeResponse)
    )
)]
pub async fn welcome() -> impl Responder {
    HttpResponse::Ok().json(WelcomeResponse {
        message: "Welcome to the Drishyanet API!".to_string(),
        status: "success".to_string(),
        date: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })
}

#[utoipa::path(
    get,
    path = "/config",
    tag = "Health",
    responses(
        (status = 200, description = "Front-end origin the API serves", body = ConfigResponse)
    )
)]
pub async fn frontend_config(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ConfigResponse {
        frontend_url: state.frontend_url.clone(),
    })
}

pub async fn proceed() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Proceeding to next step"
    }))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Document store unreachable")
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    if let Err(e) = state.health.ping().await {
        log::warn!("⚠️  Health check failed: {}", e);
        return Err(AppError::NotReady(e.to_string()));
    }

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "drishyanet-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    }))
}
