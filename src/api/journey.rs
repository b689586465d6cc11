use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{CreateEntryRequest, JourneyEntry, RenameEntryRequest, Station, StationAnswersRequest};
use crate::services::journey_service;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

fn failure(e: String) -> HttpResponse {
    if e == "Passion not found" || e == "User profile not found" {
        HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": e
        }))
    } else if e.starts_with("Database error")
        || e.starts_with("Permission denied")
        || e.starts_with("Failed to")
    {
        HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        }))
    } else {
        HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        }))
    }
}

/// GET /api/v1/journey - All passions of the authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/journey",
    tag = "Journey",
    responses(
        (status = 200, description = "Journey retrieved", body = [JourneyEntry])
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[get("")]
pub async fn list_entries(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    let user_id = &user.sub;

    match journey_service::list_entries(&db, user_id).await {
        Ok(entries) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "total": entries.len(),
            "journey": entries
        })),
        Err(e) => failure(e),
    }
}

/// POST /api/v1/journey - Adds a passion candidate to the journey
#[utoipa::path(
    post,
    path = "/api/v1/journey",
    tag = "Journey",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Passion added", body = JourneyEntry),
        (status = 400, description = "Empty name, duplicate or journey full")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[post("")]
pub async fn add_entry(
    user: web::ReqData<Claims>,
    body: web::Json<CreateEntryRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;
    log::info!("🌱 POST /journey - user: {} name: {}", user_id, body.name);

    match journey_service::add_entry(&db, user_id, &body.name).await {
        Ok(entry) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "entry": entry
        })),
        Err(e) => failure(e),
    }
}

/// GET /api/v1/journey/{entry_id} - One passion with all five stations
#[get("/{entry_id}")]
pub async fn get_entry(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;
    let entry_id = path.into_inner();

    match journey_service::get_entry(&db, user_id, &entry_id).await {
        Ok(entry) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "entry": entry
        })),
        Err(e) => failure(e),
    }
}

/// PUT /api/v1/journey/{entry_id} - Renames a passion
#[put("/{entry_id}")]
pub async fn rename_entry(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    body: web::Json<RenameEntryRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;
    let entry_id = path.into_inner();
    log::info!("📝 PUT /journey/{} - user: {}", entry_id, user_id);

    match journey_service::rename_entry(&db, user_id, &entry_id, &body.name).await {
        Ok(entry) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "entry": entry
        })),
        Err(e) => failure(e),
    }
}

/// PUT /api/v1/journey/{entry_id}/stations/{station} - Replaces one station's answers
#[utoipa::path(
    put,
    path = "/api/v1/journey/{entry_id}/stations/{station}",
    tag = "Journey",
    params(
        ("entry_id" = String, Path, description = "Passion entry id"),
        ("station" = String, Path, description = "purpose, power, proof, problems or possibilities")
    ),
    request_body = StationAnswersRequest,
    responses(
        (status = 200, description = "Station saved", body = JourneyEntry),
        (status = 400, description = "Unknown station or empty answers"),
        (status = 404, description = "Passion not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[put("/{entry_id}/stations/{station}")]
pub async fn set_station_answers(
    user: web::ReqData<Claims>,
    path: web::Path<(String, String)>,
    body: web::Json<StationAnswersRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;
    let (entry_id, station_name) = path.into_inner();

    let station = match Station::from_str(&station_name) {
        Some(station) => station,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("Unknown station '{}'", station_name)
            }))
        }
    };

    log::info!(
        "✍️ PUT /journey/{}/stations/{} - user: {} ({} answers)",
        entry_id,
        station.as_str(),
        user_id,
        body.answers.len()
    );

    match journey_service::set_station_answers(&db, user_id, &entry_id, station, &body.answers).await
    {
        Ok(entry) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "entry": entry
        })),
        Err(e) => failure(e),
    }
}

/// DELETE /api/v1/journey/{entry_id} - Removes a passion from the journey
#[delete("/{entry_id}")]
pub async fn remove_entry(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;
    let entry_id = path.into_inner();
    log::info!("🗑️ DELETE /journey/{} - user: {}", entry_id, user_id);

    match journey_service::remove_entry(&db, user_id, &entry_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Passion removed from the journey"
        })),
        Err(e) => failure(e),
    }
}
