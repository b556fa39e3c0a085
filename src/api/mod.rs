pub mod attendance;
pub mod auth;
pub mod health;
pub mod students;
pub mod swagger;

use actix_web::web;

use crate::middleware::auth::AuthMiddleware;

/// Registers every route. Recognition routes are mounted only when enabled.
pub fn configure(cfg: &mut web::ServiceConfig, recognition_enabled: bool) {
    cfg.route("/", web::get().to(health::welcome))
        .route("/config", web::get().to(health::frontend_config))
        .route("/health", web::get().to(health::health_check))
        // Auth endpoints
        .route("/signup", web::post().to(auth::signup))
        .route("/signin", web::post().to(auth::signin))
        .route("/proceed", web::post().to(health::proceed))
        .route("/proceed1", web::post().to(health::proceed))
        // Attendance (public, as the classroom front-end expects)
        .route("/view-attendance", web::get().to(attendance::view_attendance))
        // Student registration with photo upload
        .route("/api/register", web::post().to(students::register_student))
        // Management endpoints - Requires JWT
        .service(
            web::scope("/api/students")
                .wrap(AuthMiddleware)
                .route("", web::get().to(students::list_students))
                .route("/delete", web::post().to(students::delete_student)),
        )
        .service(
            web::scope("/api/attendance")
                .wrap(AuthMiddleware)
                .route("/update", web::post().to(attendance::update_attendance))
                .route("/delete", web::post().to(attendance::delete_attendance)),
        );

    if recognition_enabled {
        cfg.route("/recognize-face", web::post().to(attendance::recognize_face))
            .route("/run-python", web::post().to(attendance::run_attendance));
    }
}
