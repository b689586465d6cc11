use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::PassionResults;
use crate::services::profile_service;
use actix_web::{get, web, HttpResponse, Responder};

/// GET /api/v1/results - Stored ranking and narrative, if any
#[utoipa::path(
    get,
    path = "/api/v1/results",
    tag = "Results",
    responses(
        (status = 200, description = "Stored results", body = PassionResults),
        (status = 404, description = "Journey has not been ranked yet")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[get("")]
pub async fn get_results(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    let user_id = &user.sub;
    log::info!("🏆 GET /results - user: {}", user_id);

    let profile = match profile_service::get_profile(&db, user_id).await {
        Ok(profile) => profile,
        Err(e) if e == "User profile not found" => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    };

    match profile.results {
        Some(results) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "results": results
        })),
        None => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": "Journey has not been ranked yet"
        })),
    }
}
