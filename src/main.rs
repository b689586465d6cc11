mod api;
mod database;
mod genai;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");
    let frontend_url = env::var("FRONTEND_URL").ok();

    log::info!("🚀 Starting Passion Journey Service...");
    api::health::init_uptime_clock();

    // Generative model client (fails fast when the key is missing)
    let genai = genai::GenAi::from_env()
        .expect("GEMINI_API_KEY must be set");
    let genai_data = web::Data::new(genai);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db);

    log::info!("✅ MongoDB connected successfully");
    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_origin("http://127.0.0.1:5173")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
                actix_web::http::header::CONTENT_DISPOSITION,
            ])
            .expose_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::CONTENT_DISPOSITION,
            ])
            .supports_credentials()
            .max_age(3600);

        if let Some(origin) = &frontend_url {
            cors = cors.allowed_origin(origin);
        }

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(genai_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Auth endpoints
            .service(
                web::scope("/api/v1/auth")
                    .route("/login", web::post().to(api::auth::login))
                    .route("/register", web::post().to(api::auth::register))
                    .route("/refresh", web::post().to(api::auth::refresh_token))
                    .route("/verify", web::get().to(api::auth::verify_token))
                    .route("/me", web::get().to(api::auth::get_me))
                    .route("/password-reset/request", web::post().to(api::auth::request_password_reset))
                    .route("/password-reset/confirm", web::post().to(api::auth::confirm_password_reset))
                    .route("/account", web::delete().to(api::auth::delete_account))
            )
            // Profile: fields and language preference
            .service(
                web::scope("/api/v1/profile")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::profile::get_profile)
                    .service(api::profile::update_profile)
            )
            // Journey: passion candidates and their stations
            .service(
                web::scope("/api/v1/journey")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::journey::list_entries)
                    .service(api::journey::add_entry)
                    .service(api::journey::set_station_answers)
                    .service(api::journey::get_entry)
                    .service(api::journey::rename_entry)
                    .service(api::journey::remove_entry)
            )
            // AI: ranking, solutions, report and hints
            .service(
                web::scope("/api/v1/ai")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::ai::rank_journey)
                    .service(api::ai::suggest_solutions)
                    .service(api::ai::suggest_solutions_batch)
                    .service(api::ai::narrative_report)
                    .service(api::ai::station_hint)
            )
            // Results: stored ranking and narrative
            .service(
                web::scope("/api/v1/results")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::results::get_results)
            )
            // Exports: report and certificate downloads
            .service(
                web::scope("/api/v1/export")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::export::export_report)
                    .service(api::export::export_certificate)
            )
            // Admin: user table
            .service(
                web::scope("/api/v1/admin")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::admin::list_users)
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
