mod api;
mod config;
mod database;
mod middleware;
mod models;
mod recognizer;
mod services;
mod state;
mod utils;

#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("🚀 Starting DrishyaNet attendance service...");
    log::info!(
        "📊 Databases: users={} students={} attendance={}",
        config.databases.users,
        config.databases.students,
        config.databases.attendance
    );

    // Initialize MongoDB connection
    let db = match database::MongoDB::new(&config.mongo_uri, &config.databases).await {
        Ok(db) => db,
        Err(e) => {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("✅ MongoDB connected successfully");

    if config.recognition_enabled {
        log::info!(
            "🐍 Recognition enabled: {} {}",
            config.recognizer.program,
            config.recognizer.script.display()
        );
    } else {
        log::info!("🙈 Recognition disabled; /recognize-face and /run-python are not mounted");
    }

    let state = web::Data::new(AppState::new(db, &config));
    let frontend_url = config.frontend_url.clone();
    let recognition_enabled = config.recognition_enabled;

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("🔗 Allowed origin: {}", frontend_url);
    log::info!(
        "📚 Swagger UI available at: http://{}:{}/swagger-ui/",
        config.host,
        config.port
    );

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
            ])
            .expose_headers(vec![header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(|cfg| api::configure(cfg, recognition_enabled))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
