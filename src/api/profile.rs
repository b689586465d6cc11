use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{ProfileView, UpdateProfileRequest};
use crate::services::profile_service;
use actix_web::{get, put, web, HttpResponse, Responder};

/// GET /api/v1/profile - Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Profile retrieved", body = ProfileView),
        (status = 404, description = "Profile not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[get("")]
pub async fn get_profile(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    let user_id = &user.sub;
    log::info!("👤 GET /profile - user: {}", user_id);

    match profile_service::get_profile(&db, user_id).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "profile": ProfileView::from(profile)
        })),
        Err(e) if e == "User profile not found" => {
            HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// PUT /api/v1/profile - Updates name, phone, education fields or language
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    tag = "Profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileView),
        (status = 400, description = "No fields provided")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[put("")]
pub async fn update_profile(
    user: web::ReqData<Claims>,
    body: web::Json<UpdateProfileRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;
    log::info!("📝 PUT /profile - user: {}", user_id);

    match profile_service::update_profile(&db, user_id, &body).await {
        Ok(profile) => {
            log::info!("✅ Profile updated: {}", user_id);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "profile": ProfileView::from(profile)
            }))
        }
        Err(e) if e == "No profile fields provided" => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
        Err(e) if e == "User profile not found" => {
            HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}
