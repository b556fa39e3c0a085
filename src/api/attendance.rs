use actix_web::{web, HttpResponse};

use crate::{
    models::{DeleteAttendanceRequest, UpdateAttendanceRequest, ViewAttendanceQuery},
    services::attendance_service::{
        self, RecognitionResponse, RecognizeRequest, RunAttendanceRequest,
    },
    services::auth_service::Claims,
    state::AppState,
    utils::AppError,
};

#[utoipa::path(
    post,
    path = "/recognize-face",
    tag = "Attendance",
    request_body = RecognizeRequest,
    responses(
        (status = 200, description = "Identified student, or Unknown with a null position", body = RecognitionResponse),
        (status = 400, description = "No image provided"),
        (status = 500, description = "Recognizer failed")
    )
)]
pub async fn recognize_face(
    state: web::Data<AppState>,
    request: web::Json<RecognizeRequest>,
) -> Result<HttpResponse, AppError> {
    let subject = request.subject_name.clone().unwrap_or_default();
    log::info!("📸 POST /recognize-face - subject: {}", subject);

    let response = attendance_service::recognize_face(&state, request.into_inner()).await?;

    log::info!("✅ Recognition finished: {}", response.name);
    Ok(HttpResponse::Ok().json(response))
}

/// Replies in plain text on both paths; the front-end shows the body as-is.
pub async fn run_attendance(
    state: web::Data<AppState>,
    request: Option<web::Json<RunAttendanceRequest>>,
) -> HttpResponse {
    let request = request
        .map(web::Json::into_inner)
        .unwrap_or(RunAttendanceRequest { subject_name: None });
    log::info!("🐍 POST /run-python - subject: {:?}", request.subject_name);

    match attendance_service::run_attendance(&state, request).await {
        Ok(()) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body("Attendance started. Data saved."),
        Err(e) => {
            log::error!("❌ Attendance run failed: {}", e);
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body("An error occurred while starting attendance.")
        }
    }
}

#[utoipa::path(
    get,
    path = "/view-attendance",
    tag = "Attendance",
    params(ViewAttendanceQuery),
    responses(
        (status = 200, description = "Every record stored for the subject"),
        (status = 400, description = "Subject name required"),
        (status = 500, description = "Failed to retrieve attendance data")
    )
)]
pub async fn view_attendance(
    state: web::Data<AppState>,
    query: web::Query<ViewAttendanceQuery>,
) -> Result<HttpResponse, AppError> {
    let subject = query.into_inner().subject_name;
    log::info!("📊 GET /view-attendance - subject: {:?}", subject);

    let records = attendance_service::view_attendance(&state, subject).await?;

    log::info!("✅ Found {} attendance records", records.len());
    Ok(HttpResponse::Ok().json(records))
}

pub async fn update_attendance(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    request: web::Json<UpdateAttendanceRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("✏️  POST /api/attendance/update - by {}", user.email);

    let status = request.status.clone().unwrap_or_default();
    attendance_service::update_attendance(&state, request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("Attendance updated to {}", status)
    })))
}

pub async fn delete_attendance(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    request: web::Json<DeleteAttendanceRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️ POST /api/attendance/delete - by {}", user.email);

    attendance_service::delete_attendance(&state, request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Attendance record deleted"
    })))
}

#[cfg(test)]
mod tests {
    use crate::models::User;
    use crate::services::auth_service;
    use crate::test_support::{test_app, ScriptedRecognizer, TestContext};
    use actix_web::{http::StatusCode, test};
    use base64::Engine;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn frame_of(contents: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(contents)
    }

    #[actix_web::test]
    async fn test_recognize_face_success_and_unknown() {
        let ctx = TestContext::new();
        let app = test::init_service(test_app(ctx.state(), true)).await;

        let known = test::TestRequest::post()
            .uri("/recognize-face")
            .set_json(json!({ "frame": format!("data:image/jpeg;base64,{}", frame_of("Asha")), "subject_name": "Physics" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, known).await;
        assert_eq!(body["name"], "Asha");
        assert_eq!(body["facePosition"], json!({ "top": 10, "right": 80, "bottom": 90, "left": 5 }));

        let unknown = test::TestRequest::post()
            .uri("/recognize-face")
            .set_json(json!({ "frame": frame_of("nobody"), "subject_name": "Physics" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, unknown).await;
        assert_eq!(body, json!({ "name": "Unknown", "facePosition": null }));
    }

    #[actix_web::test]
    async fn test_recognize_face_errors() {
        let ctx = TestContext::new();
        let app = test::init_service(test_app(ctx.state(), true)).await;

        let missing = test::TestRequest::post()
            .uri("/recognize-face")
            .set_json(json!({ "subject_name": "Physics" }))
            .to_request();
        let response = test::call_service(&app, missing).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "No image provided");
        assert_eq!(ctx.recognizer.calls(), 0);

        let crash = test::TestRequest::post()
            .uri("/recognize-face")
            .set_json(json!({ "frame": frame_of("crash"), "subject_name": "Physics" }))
            .to_request();
        let response = test::call_service(&app, crash).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "Error in face recognition process");
    }

    #[actix_web::test]
    async fn test_run_python_plain_text_outcomes() {
        let ctx = TestContext::new();
        let app = test::init_service(test_app(ctx.state(), true)).await;
        let request = test::TestRequest::post()
            .uri("/run-python")
            .set_json(json!({ "subject_name": "Physics" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(test::read_body(response).await, "Attendance started. Data saved.");

        let failing = TestContext::with_recognizer(Arc::new(ScriptedRecognizer::failing_trigger()));
        let app = test::init_service(test_app(failing.state(), true)).await;
        let request = test::TestRequest::post().uri("/run-python").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            test::read_body(response).await,
            "An error occurred while starting attendance."
        );
    }

    #[actix_web::test]
    async fn test_recognition_routes_can_be_disabled() {
        let ctx = TestContext::new();
        let app = test::init_service(test_app(ctx.state(), false)).await;

        let request = test::TestRequest::post()
            .uri("/recognize-face")
            .set_json(json!({ "frame": frame_of("Asha") }))
            .to_request();
        assert_eq!(test::call_service(&app, request).await.status(), StatusCode::NOT_FOUND);

        let request = test::TestRequest::post().uri("/run-python").to_request();
        assert_eq!(test::call_service(&app, request).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_view_attendance_round_trip() {
        let ctx = TestContext::new();
        let app = test::init_service(test_app(ctx.state(), true)).await;
        let record = json!({ "_id": "65f0c0ffee", "name": "Asha", "status": "Present", "date": "2024-03-01", "time": "09:15:00" });
        ctx.attendance
            .seed("Physics", record.as_object().unwrap().clone());

        let physics: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/view-attendance?subject_name=Physics")
                .to_request(),
        )
        .await;
        assert_eq!(physics, json!([record]));

        let maths: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/view-attendance?subject_name=Maths")
                .to_request(),
        )
        .await;
        assert_eq!(maths, json!([]));
    }

    #[actix_web::test]
    async fn test_view_attendance_errors() {
        let ctx = TestContext::new();
        let app = test::init_service(test_app(ctx.state(), true)).await;

        for uri in ["/view-attendance", "/view-attendance?subject_name="] {
            let response =
                test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        ctx.attendance.set_unavailable();
        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/view-attendance?subject_name=Physics")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_attendance_management_requires_token() {
        let ctx = TestContext::new();
        let state = ctx.state();
        let app = test::init_service(test_app(state.clone(), true)).await;
        let record = json!({ "name": "Asha", "status": "Present", "date": "2024-03-01", "time": "09:15:00" });
        ctx.attendance
            .seed("Physics", record.as_object().unwrap().clone());
        let update = json!({ "subject": "Physics", "name": "Asha", "date": "2024-03-01", "status": "Late" });

        let anonymous = test::TestRequest::post()
            .uri("/api/attendance/update")
            .set_json(&update)
            .to_request();
        let response = test::call_service(&app, anonymous).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ctx.attendance.records("Physics")[0]["status"], "Present");

        let token = auth_service::issue_token(
            &User {
                id: None,
                name: "Teacher".into(),
                email: "teacher@example.com".into(),
                password: String::new(),
            },
            &state.auth,
        )
        .unwrap();
        let authorized = test::TestRequest::post()
            .uri("/api/attendance/update")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(&update)
            .to_request();
        let response = test::call_service(&app, authorized).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ctx.attendance.records("Physics")[0]["status"], "Late");

        let delete_missing = test::TestRequest::post()
            .uri("/api/attendance/delete")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(json!({ "subject": "Physics", "name": "Asha", "date": "1999-01-01" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, delete_missing).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}
