use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Passion Journey API",
        version = "1.0.0",
        description = "Guided self-discovery journey backend. \n\n**Authentication:** Most endpoints require JWT Bearer token authentication.\n\n**Features:**\n- Email/password accounts with reset and delete\n- Passion journey with five stations per candidate\n- Model-backed ranking, solutions and narrative report\n- Plain-text report and PDF certificate exports\n- Arabic-first output with an English toggle",
        contact(
            name = "Passion Journey Team",
            email = "support@passion-journey.app"
        )
    ),
    paths(
        // Auth endpoints
        crate::api::auth::login,
        crate::api::auth::register,
        crate::api::auth::verify_token,
        crate::api::auth::get_me,
        crate::api::auth::request_password_reset,
        crate::api::auth::confirm_password_reset,
        crate::api::auth::delete_account,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Profile
        crate::api::profile::get_profile,
        crate::api::profile::update_profile,

        // Journey
        crate::api::journey::list_entries,
        crate::api::journey::add_entry,
        crate::api::journey::set_station_answers,

        // AI
        crate::api::ai::rank_journey,
        crate::api::ai::suggest_solutions,
        crate::api::ai::narrative_report,
        crate::api::ai::station_hint,

        // Results & exports
        crate::api::results::get_results,
        crate::api::export::export_report,
        crate::api::export::export_certificate,

        // Admin
        crate::api::admin::list_users,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::PasswordResetRequest,
            crate::services::auth_service::PasswordResetConfirmRequest,
            crate::services::auth_service::DeleteAccountRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::UserInfo,
            crate::services::auth_service::VerifyTokenResponse,

            // Health
            crate::api::health::HealthResponse,

            // Journey
            crate::models::Language,
            crate::models::Station,
            crate::models::AnswerWeight,
            crate::models::StationAnswer,
            crate::models::JourneyEntry,
            crate::models::CreateEntryRequest,
            crate::models::RenameEntryRequest,
            crate::models::StationAnswersRequest,

            // Profile & results
            crate::models::ProfileView,
            crate::models::UpdateProfileRequest,
            crate::models::PassionRanking,
            crate::models::PassionResults,

            // AI
            crate::api::ai::LanguageOptions,

            // Admin
            crate::services::admin_service::AdminUserRow,
            crate::services::admin_service::AdminUsersPage,
        )
    ),
    tags(
        (name = "Auth", description = "Email/password authentication, password reset and account deletion."),
        (name = "Health", description = "Health check and service counters for monitoring."),
        (name = "Profile", description = "Profile fields and language preference of the authenticated user."),
        (name = "Journey", description = "Passion candidates and their five stations: purpose, power, proof, problems, possibilities."),
        (name = "AI", description = "Model-backed ranking, solution suggestions, narrative report and station hints."),
        (name = "Results", description = "Stored ranking produced by the model."),
        (name = "Export", description = "Plain-text report and PDF certificate downloads."),
        (name = "Admin", description = "User table for operators with the admin role."),
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
                        .description(Some("Enter your JWT token"))
                        .build()
                ),
            );
        }
    }
}
