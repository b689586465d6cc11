use crate::database::MongoDB;
use crate::genai::GenAi;
use crate::middleware::auth::Claims;
use crate::models::{Language, PassionResults, Station};
use crate::services::ai_service;
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;

/// Optional body for the model endpoints. When absent the stored profile
/// language decides the output language.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct LanguageOptions {
    pub language: Option<Language>,
}

#[derive(Debug, Deserialize)]
pub struct HintQuery {
    pub language: Option<Language>,
}

fn failure(e: String) -> HttpResponse {
    if e == "Passion not found" || e == "User profile not found" {
        HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": e
        }))
    } else if e.starts_with("Database error")
        || e.starts_with("Permission denied")
        || e.starts_with("Model ")
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

/// POST /api/v1/ai/rank - Scores and ranks the whole journey
#[utoipa::path(
    post,
    path = "/api/v1/ai/rank",
    tag = "AI",
    request_body = LanguageOptions,
    responses(
        (status = 200, description = "Journey ranked", body = PassionResults),
        (status = 400, description = "Journey is empty")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[post("/rank")]
pub async fn rank_journey(
    user: web::ReqData<Claims>,
    body: Option<web::Json<LanguageOptions>>,
    db: web::Data<MongoDB>,
    genai: web::Data<GenAi>,
) -> impl Responder {
    let user_id = &user.sub;
    let language = body.as_ref().and_then(|b| b.language);
    log::info!("🏁 POST /ai/rank - user: {}", user_id);

    match ai_service::rank_journey(&db, &genai, user_id, language).await {
        Ok(results) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "results": results
        })),
        Err(e) => {
            log::error!("❌ Ranking failed for {}: {}", user_id, e);
            failure(e)
        }
    }
}

/// POST /api/v1/ai/solutions/{entry_id} - Solutions for one passion's problems
#[utoipa::path(
    post,
    path = "/api/v1/ai/solutions/{entry_id}",
    tag = "AI",
    params(
        ("entry_id" = String, Path, description = "Passion entry id")
    ),
    request_body = LanguageOptions,
    responses(
        (status = 200, description = "Solutions stored on the passion"),
        (status = 400, description = "No problems recorded"),
        (status = 404, description = "Passion not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[post("/solutions/{entry_id}")]
pub async fn suggest_solutions(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    body: Option<web::Json<LanguageOptions>>,
    db: web::Data<MongoDB>,
    genai: web::Data<GenAi>,
) -> impl Responder {
    let user_id = &user.sub;
    let entry_id = path.into_inner();
    let language = body.as_ref().and_then(|b| b.language);
    log::info!("💡 POST /ai/solutions/{} - user: {}", entry_id, user_id);

    match ai_service::suggest_solutions(&db, &genai, user_id, &entry_id, language).await {
        Ok(solutions) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "entry_id": entry_id,
            "solutions": solutions
        })),
        Err(e) => {
            log::error!("❌ Solutions failed for {}: {}", user_id, e);
            failure(e)
        }
    }
}

/// POST /api/v1/ai/solutions - One call covering every passion with problems
#[post("/solutions")]
pub async fn suggest_solutions_batch(
    user: web::ReqData<Claims>,
    body: Option<web::Json<LanguageOptions>>,
    db: web::Data<MongoDB>,
    genai: web::Data<GenAi>,
) -> impl Responder {
    let user_id = &user.sub;
    let language = body.as_ref().and_then(|b| b.language);
    log::info!("💡 POST /ai/solutions (batch) - user: {}", user_id);

    match ai_service::suggest_solutions_batch(&db, &genai, user_id, language).await {
        Ok(entries) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "total": entries.len(),
            "entries": entries
        })),
        Err(e) => {
            log::error!("❌ Batch solutions failed for {}: {}", user_id, e);
            failure(e)
        }
    }
}

/// POST /api/v1/ai/report - Narrative report over the stored ranking
#[utoipa::path(
    post,
    path = "/api/v1/ai/report",
    tag = "AI",
    request_body = LanguageOptions,
    responses(
        (status = 200, description = "Narrative generated and stored"),
        (status = 400, description = "Journey has not been ranked yet")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[post("/report")]
pub async fn narrative_report(
    user: web::ReqData<Claims>,
    body: Option<web::Json<LanguageOptions>>,
    db: web::Data<MongoDB>,
    genai: web::Data<GenAi>,
) -> impl Responder {
    let user_id = &user.sub;
    let language = body.as_ref().and_then(|b| b.language);
    log::info!("📖 POST /ai/report - user: {}", user_id);

    match ai_service::narrative_report(&db, &genai, user_id, language).await {
        Ok(report) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "report": report
        })),
        Err(e) => {
            log::error!("❌ Report failed for {}: {}", user_id, e);
            failure(e)
        }
    }
}

/// GET /api/v1/ai/hints/{station} - Guidance text for one station
#[utoipa::path(
    get,
    path = "/api/v1/ai/hints/{station}",
    tag = "AI",
    params(
        ("station" = String, Path, description = "purpose, power, proof, problems or possibilities"),
        ("language" = Option<String>, Query, description = "ar or en, defaults to ar")
    ),
    responses(
        (status = 200, description = "Hint for the station"),
        (status = 400, description = "Unknown station")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[get("/hints/{station}")]
pub async fn station_hint(
    path: web::Path<String>,
    query: web::Query<HintQuery>,
    genai: web::Data<GenAi>,
) -> impl Responder {
    let station_name = path.into_inner();
    let station = match Station::from_str(&station_name) {
        Some(station) => station,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("Unknown station '{}'", station_name)
            }))
        }
    };
    let language = query.language.unwrap_or_default();

    match ai_service::station_hint(&genai, station, language).await {
        Ok(hint) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "station": station.as_str(),
            "language": language.as_code(),
            "hint": hint
        })),
        Err(e) => {
            log::error!("❌ Hint failed for {}: {}", station.as_str(), e);
            failure(e)
        }
    }
}
