use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DrishyaNet Attendance API",
        version = "1.0.0",
        description = "Face-recognition classroom attendance service.\n\n**Authentication:** management endpoints under `/api/students` and `/api/attendance` require a JWT Bearer token obtained from `/signin`.\n\n**Features:**\n- Teacher signup and signin\n- Student registration with photo\n- Frame recognition and automatic attendance marking\n- Per-subject attendance listing and correction"
    ),
    paths(
        // Health
        crate::api::health::welcome,
        crate::api::health::frontend_config,
        crate::api::health::health_check,

        // Auth
        crate::api::auth::signup,
        crate::api::auth::signin,

        // Students
        crate::api::students::list_students,

        // Attendance
        crate::api::attendance::recognize_face,
        crate::api::attendance::view_attendance,
    ),
    components(
        schemas(
            // Health
            crate::api::health::WelcomeResponse,
            crate::api::health::ConfigResponse,
            crate::api::health::HealthResponse,

            // Auth
            crate::models::SignupRequest,
            crate::models::SigninRequest,
            crate::models::SigninResponse,

            // Students
            crate::models::StudentSummary,
            crate::models::DeleteStudentRequest,

            // Attendance
            crate::services::attendance_service::RecognizeRequest,
            crate::services::attendance_service::RunAttendanceRequest,
            crate::services::attendance_service::RecognitionResponse,
            crate::recognizer::FacePosition,
            crate::models::UpdateAttendanceRequest,
            crate::models::DeleteAttendanceRequest,
        )
    ),
    tags(
        (name = "Health", description = "Liveness, readiness and front-end configuration."),
        (name = "Auth", description = "Teacher accounts. Passwords are stored as bcrypt digests."),
        (name = "Students", description = "Student registry with face photos."),
        (name = "Attendance", description = "Recognition and per-subject attendance records."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /signin"))
                        .build(),
                ),
            );
        }
    }
}
