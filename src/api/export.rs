use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::Language;
use crate::services::export_service::{self, ExportFile};
use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub language: Option<Language>,
}

#[derive(Debug, Deserialize)]
pub struct CertificateQuery {
    /// Name printed on the certificate; defaults to the profile name.
    pub name: Option<String>,
}

fn download(file: ExportFile) -> HttpResponse {
    let disposition = file.content_disposition();

    HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header(("Content-Disposition", disposition))
        .body(file.bytes)
}

fn failure(e: String) -> HttpResponse {
    if e == "User profile not found" {
        HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": e
        }))
    } else if e.starts_with("Database error") || e.starts_with("Permission denied") {
        HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        }))
    } else if e.starts_with("Rank the journey") || e == "The stored ranking is empty" {
        HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        }))
    } else {
        HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        }))
    }
}

/// GET /api/v1/export/report - Plain-text report download
#[utoipa::path(
    get,
    path = "/api/v1/export/report",
    tag = "Export",
    params(
        ("language" = Option<String>, Query, description = "ar or en, defaults to the profile language")
    ),
    responses(
        (status = 200, description = "Plain-text report attachment"),
        (status = 400, description = "Journey has not been ranked yet")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[get("/report")]
pub async fn export_report(
    user: web::ReqData<Claims>,
    query: web::Query<ReportQuery>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;
    log::info!("📄 GET /export/report - user: {}", user_id);

    match export_service::text_report(&db, user_id, query.language).await {
        Ok(file) => {
            log::info!("✅ Report exported: {} ({} bytes)", file.filename, file.bytes.len());
            download(file)
        }
        Err(e) => {
            log::warn!("❌ Report export failed for {}: {}", user_id, e);
            failure(e)
        }
    }
}

/// GET /api/v1/export/certificate - PDF certificate download
#[utoipa::path(
    get,
    path = "/api/v1/export/certificate",
    tag = "Export",
    params(
        ("name" = Option<String>, Query, description = "Name printed on the certificate")
    ),
    responses(
        (status = 200, description = "PDF certificate attachment"),
        (status = 400, description = "Journey has not been ranked yet")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[get("/certificate")]
pub async fn export_certificate(
    user: web::ReqData<Claims>,
    query: web::Query<CertificateQuery>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let user_id = &user.sub;
    log::info!("🎓 GET /export/certificate - user: {}", user_id);

    match export_service::certificate_pdf(&db, user_id, query.name.clone()).await {
        Ok(file) => {
            log::info!("✅ Certificate exported: {} ({} bytes)", file.filename, file.bytes.len());
            download(file)
        }
        Err(e) => {
            log::warn!("❌ Certificate export failed for {}: {}", user_id, e);
            failure(e)
        }
    }
}
