use crate::services::auth_service::{
    AuthResponse, DeleteAccountRequest, LoginRequest, PasswordResetConfirmRequest,
    PasswordResetRequest, RegisterRequest, UserInfo,
};
use crate::{database::MongoDB, services::auth_service};
use actix_web::{web, HttpRequest, HttpResponse};

/// Pulls the Bearer token out of the Authorization header, if any.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    request: web::Json<auth_service::LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Invalid request or user already exists")
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    request: web::Json<auth_service::RegisterRequest>,
) -> HttpResponse {
    log::info!("📝 POST /auth/register - email: {}", request.email);

    match auth_service::register(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Registration successful: {}", request.email);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", request.email, e);
            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

pub async fn refresh_token(
    db: web::Data<MongoDB>,
    request: web::Json<auth_service::RefreshTokenRequest>,
) -> HttpResponse {
    log::info!("🔄 POST /auth/refresh");

    match auth_service::refresh_token(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Token refreshed");
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Token refresh failed: {}", e);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn verify_token(req: HttpRequest) -> HttpResponse {
    log::info!("✓ GET /auth/verify");

    let token = match bearer_token(&req) {
        Some(token) => token,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": "No valid Authorization header"
            }));
        }
    };

    match auth_service::verify_token(token) {
        Ok(claims) => {
            log::info!("✅ Token valid for user: {}", claims.sub);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "valid": true,
                "user_id": claims.sub,
                "email": claims.email,
                "exp": claims.exp
            }))
        }
        Err(e) => {
            log::warn!("❌ Invalid token: {}", e);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "valid": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "User information retrieved", body = UserInfo),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    log::info!("👤 GET /auth/me");

    let token = match bearer_token(&req) {
        Some(token) => token,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": "No valid Authorization header"
            }));
        }
    };

    let claims = match auth_service::verify_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            log::warn!("❌ Invalid token: {}", e);
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": e
            }));
        }
    };

    match auth_service::get_current_user(&db, &claims.sub).await {
        Ok(user) => {
            log::info!("✅ User info retrieved: {}", claims.sub);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "user": user
            }))
        }
        Err(e) => {
            log::error!("❌ Failed to get user: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/password-reset/request",
    tag = "Auth",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset token issued if the account exists")
    )
)]
pub async fn request_password_reset(
    db: web::Data<MongoDB>,
    request: web::Json<PasswordResetRequest>,
) -> HttpResponse {
    log::info!("🔑 POST /auth/password-reset/request");

    match auth_service::request_password_reset(&db, &request.email).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "If the account exists, a reset token has been issued"
        })),
        Err(e) => {
            log::error!("❌ Password reset request failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/password-reset/confirm",
    tag = "Auth",
    request_body = PasswordResetConfirmRequest,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Invalid or expired reset token")
    )
)]
pub async fn confirm_password_reset(
    db: web::Data<MongoDB>,
    request: web::Json<PasswordResetConfirmRequest>,
) -> HttpResponse {
    log::info!("🔑 POST /auth/password-reset/confirm");

    match auth_service::confirm_password_reset(&db, &request).await {
        Ok(()) => {
            log::info!("✅ Password reset confirmed");
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Password updated"
            }))
        }
        Err(e) => {
            log::warn!("❌ Password reset rejected: {}", e);
            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

/// Deletes the account and every trace of the journey. The password in the
/// body re-authenticates the session on top of the Bearer token.
#[utoipa::path(
    delete,
    path = "/api/v1/auth/account",
    tag = "Auth",
    request_body = DeleteAccountRequest,
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Unauthorized or wrong password")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_account(
    db: web::Data<MongoDB>,
    req: HttpRequest,
    request: web::Json<DeleteAccountRequest>,
) -> HttpResponse {
    log::info!("🗑️ DELETE /auth/account");

    let token = match bearer_token(&req) {
        Some(token) => token,
        None => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": "No valid Authorization header"
            }));
        }
    };

    let claims = match auth_service::verify_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            log::warn!("❌ Invalid token: {}", e);
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": "Invalid or expired token"
            }));
        }
    };

    match auth_service::delete_user_account(&db, &claims.sub, &request.password).await {
        Ok(()) => {
            log::info!("✅ Account deleted successfully: {}", claims.sub);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Account deleted successfully"
            }))
        }
        Err(e) if e == "Invalid credentials" => {
            log::warn!("❌ Account deletion rejected for {}: wrong password", claims.sub);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
        Err(e) => {
            log::error!("❌ Failed to delete account {}: {}", claims.sub, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to delete account: {}", e)
            }))
        }
    }
}
