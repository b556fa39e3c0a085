use actix_multipart::{Multipart, MultipartError};
use actix_web::{web, HttpResponse};
use futures::stream::TryStreamExt;

use crate::{
    models::{DeleteStudentRequest, StudentForm, StudentSummary},
    services::{auth_service::Claims, student_service},
    state::AppState,
    utils::AppError,
};

fn bad_multipart(e: MultipartError) -> AppError {
    AppError::bad_request(format!("Invalid form data: {}", e))
}

fn text_field(name: &str, data: Vec<u8>) -> Result<String, AppError> {
    String::from_utf8(data).map_err(|_| AppError::bad_request(format!("Field {} must be text", name)))
}

/// Collects `name`, `rollNo`, `phone` and the optional `image` file from the form.
async fn read_student_form(mut payload: Multipart) -> Result<StudentForm, AppError> {
    let mut form = StudentForm::default();

    while let Some(mut field) = payload.try_next().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(bad_multipart)? {
            data.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "name" => form.name = Some(text_field(&name, data)?),
            "rollNo" => form.roll_no = Some(text_field(&name, data)?),
            "phone" => form.phone = Some(text_field(&name, data)?),
            // Browsers send an empty part when no file was chosen
            "image" if !data.is_empty() && form.image.is_none() => form.image = Some(data),
            "image" => {}
            other => log::debug!("Ignoring unexpected form field: {}", other),
        }
    }

    Ok(form)
}

/// POST /api/register - multipart student registration
pub async fn register_student(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /api/register");

    let form = read_student_form(payload).await?;
    student_service::register_student(&state, form).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

#[utoipa::path(
    get,
    path = "/api/students",
    tag = "Students",
    responses(
        (status = 200, description = "Registered students", body = [StudentSummary]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_students(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    log::info!("👥 GET /api/students - by {}", user.email);

    let students = student_service::list_students(&state).await?;

    log::info!("✅ Found {} students", students.len());
    Ok(HttpResponse::Ok().json(students))
}

pub async fn delete_student(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    request: web::Json<DeleteStudentRequest>,
) -> Result<HttpResponse, AppError> {
    let name = request.into_inner().name;
    log::info!("🗑️ POST /api/students/delete - {:?} by {}", name, user.email);

    student_service::delete_student(&state, name).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Student deleted successfully"
    })))
}
