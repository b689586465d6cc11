use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::admin_service::{self, AdminUsersPage, DEFAULT_PAGE_SIZE};
use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

/// GET /api/v1/admin/users - Paginated user table, admin role only
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "Admin",
    params(
        ("skip" = Option<u64>, Query, description = "Rows to skip"),
        ("limit" = Option<i64>, Query, description = "Page size, capped at 200")
    ),
    responses(
        (status = 200, description = "User table page", body = AdminUsersPage),
        (status = 403, description = "Caller is not an admin")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[get("/users")]
pub async fn list_users(
    user: web::ReqData<Claims>,
    query: web::Query<PaginationQuery>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    if !user.roles.iter().any(|r| r == "admin") {
        log::warn!("🚫 Admin endpoint denied for user {}", user.sub);
        return HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "error": "Admin role required"
        }));
    }

    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    log::info!("📋 GET /admin/users - admin: {} skip: {} limit: {}", user.sub, skip, limit);

    match admin_service::list_users(&db, skip, limit).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => {
            log::error!("❌ Admin user listing failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}
