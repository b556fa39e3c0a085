use actix_web::{web, HttpResponse};

use crate::{
    models::{SigninRequest, SigninResponse, SignupRequest},
    services::auth_service,
    state::AppState,
    utils::AppError,
};

#[utoipa::path(
    post,
    path = "/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Signup successful"),
        (status = 400, description = "Email or password missing"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn signup(
    state: web::Data<AppState>,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.clone().unwrap_or_default();
    log::info!("📝 POST /signup - email: {}", email);

    match auth_service::signup(&state, request.into_inner()).await {
        Ok(()) => {
            log::info!("✅ Signup successful: {}", email);
            Ok(HttpResponse::Created().json(serde_json::json!({
                "success": true,
                "message": "Signup successful"
            })))
        }
        Err(e) => {
            log::warn!("❌ Signup failed: {} - {}", email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/signin",
    tag = "Auth",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signin successful", body = SigninResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn signin(
    state: web::Data<AppState>,
    request: web::Json<SigninRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.clone();
    log::info!("🔐 POST /signin - email: {}", email);

    match auth_service::signin(&state, request.into_inner()).await {
        Ok(token) => {
            log::info!("✅ Signin successful: {}", email);
            Ok(HttpResponse::Ok().json(SigninResponse {
                success: true,
                token,
            }))
        }
        Err(e) => {
            log::warn!("❌ Signin failed: {} - {}", email, e);
            Err(e)
        }
    }
}
