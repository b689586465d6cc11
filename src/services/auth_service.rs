use crate::database::MongoDB;
use crate::models::{Language, UserProfile};
use crate::utils::db_error;
use base64::{engine::general_purpose, Engine as _};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

const COLLECTION: &str = "users";
const MIN_PASSWORD_LEN: usize = 8;
const RESET_TOKEN_TTL_SECS: i64 = 3600;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub name: Option<String>,
    pub roles: Vec<String>,
    pub is_active: bool,
    pub iat: usize,  // issued at
    pub exp: usize,  // expiration
    pub jti: String, // JWT ID
    pub aud: String, // audience
    pub iss: String, // issuer
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub language: Option<Language>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PasswordResetConfirmRequest {
    pub email: String,
    pub token: String,
    pub new_password: String,
}

/// DELETE /api/v1/auth/account asks for the current password again.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DeleteAccountRequest {
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub public_code: Option<String>,
    pub language: Option<String>,
    pub roles: Vec<String>,
}

impl From<&UserProfile> for UserInfo {
    fn from(user: &UserProfile) -> Self {
        UserInfo {
            id: user.user_id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            public_code: user.public_code.clone(),
            language: user.language.clone(),
            roles: user.roles.clone(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub user: Option<UserInfo>,
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "passion-journey-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "passion-journey-app".to_string())
}

// Generate JWT token
pub fn generate_jwt(user: &UserProfile) -> Result<String, String> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        roles: user.roles.clone(),
        is_active: user.is_active,
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| format!("Failed to generate token: {}", e))
}

// Generate refresh token (longer expiry)
pub fn generate_refresh_token(user_id: &str) -> Result<String, String> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::days(30)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user_id.to_string(),
        email: String::new(),
        name: None,
        roles: vec![],
        is_active: true,
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| format!("Failed to generate refresh token: {}", e))
}

// Verify JWT token
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

/// Short shareable code printed on exports. Derived from a fresh UUID so it
/// needs no coordination: 8 uppercase hex characters.
fn generate_public_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

/// Opaque reset token handed to the user out of band. Only its bcrypt hash
/// is stored.
fn generate_reset_token() -> String {
    let mut bytes = Vec::with_capacity(32);
    bytes.extend_from_slice(Uuid::new_v4().as_bytes());
    bytes.extend_from_slice(Uuid::new_v4().as_bytes());
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(())
}

// User login
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, String> {
    let collection = db.collection::<UserProfile>(COLLECTION);

    let filter = doc! {
        "email": request.email.trim().to_lowercase(),
    };

    let user = collection
        .find_one(filter)
        .await
        .map_err(|e| db_error("login", e))?
        .ok_or_else(|| "Invalid credentials".to_string())?;

    let stored_password = user
        .password
        .as_ref()
        .ok_or_else(|| "Invalid credentials".to_string())?;

    let valid = verify(&request.password, stored_password)
        .map_err(|e| format!("Password verification error: {}", e))?;

    if !valid {
        return Err("Invalid credentials".to_string());
    }

    if !user.is_active {
        return Err("Account is inactive".to_string());
    }

    let token = generate_jwt(&user)?;
    let refresh_token = generate_refresh_token(&user.user_id)?;

    collection
        .update_one(
            doc! { "user_id": &user.user_id },
            doc! { "$set": { "last_login": BsonDateTime::now() } },
        )
        .await
        .map_err(|e| db_error("recording login", e))?;

    log::info!("🔐 User logged in: {}", user.email);

    Ok(AuthResponse {
        success: true,
        token,
        refresh_token: Some(refresh_token),
        user: UserInfo::from(&user),
    })
}

// User registration
pub async fn register(db: &MongoDB, request: &RegisterRequest) -> Result<AuthResponse, String> {
    let collection = db.collection::<UserProfile>(COLLECTION);

    let email = request.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err("A valid email is required".to_string());
    }
    validate_password(&request.password)?;

    if collection
        .find_one(doc! { "email": &email })
        .await
        .map_err(|e| db_error("registration", e))?
        .is_some()
    {
        return Err("User already exists".to_string());
    }

    let hashed_password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| format!("Failed to hash password: {}", e))?;

    let new_user_id = ObjectId::new().to_hex();

    let new_user = UserProfile {
        _id: None,
        user_id: new_user_id.clone(),
        email: email.clone(),
        password: Some(hashed_password),
        name: request.name.clone(),
        phone: None,
        education_status: None,
        school_name: None,
        public_code: Some(generate_public_code()),
        language: Some(request.language.unwrap_or_default().as_code().to_string()),
        roles: vec!["user".to_string()],
        is_active: true,
        journey: Vec::new(),
        results: None,
        reset_token: None,
        reset_token_expires: None,
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
        last_login: Some(BsonDateTime::now()),
    };

    collection
        .insert_one(&new_user)
        .await
        .map_err(|e| db_error("creating user", e))?;

    let token = generate_jwt(&new_user)?;
    let refresh_token = generate_refresh_token(&new_user_id)?;

    log::info!("✅ User registered successfully: {}", email);

    Ok(AuthResponse {
        success: true,
        token,
        refresh_token: Some(refresh_token),
        user: UserInfo::from(&new_user),
    })
}

// Refresh token
pub async fn refresh_token(
    db: &MongoDB,
    request: &RefreshTokenRequest,
) -> Result<AuthResponse, String> {
    let claims = verify_token(&request.refresh_token)?;

    let collection = db.collection::<UserProfile>(COLLECTION);

    let filter = doc! {
        "user_id": &claims.sub,
    };

    let user = collection
        .find_one(filter)
        .await
        .map_err(|e| db_error("refreshing token", e))?
        .ok_or_else(|| "User not found".to_string())?;

    if !user.is_active {
        return Err("Account is inactive".to_string());
    }

    let token = generate_jwt(&user)?;
    let new_refresh_token = generate_refresh_token(&user.user_id)?;

    Ok(AuthResponse {
        success: true,
        token,
        refresh_token: Some(new_refresh_token),
        user: UserInfo::from(&user),
    })
}

// Get current user
pub async fn get_current_user(db: &MongoDB, user_id: &str) -> Result<UserInfo, String> {
    let collection = db.collection::<UserProfile>(COLLECTION);

    let filter = doc! {
        "user_id": user_id,
    };

    let user = collection
        .find_one(filter)
        .await
        .map_err(|e| db_error("loading user", e))?
        .ok_or_else(|| "User not found".to_string())?;

    Ok(UserInfo::from(&user))
}

/// Issues a reset token for the account, if one exists. Always succeeds so
/// the endpoint cannot be used to probe which emails are registered. The
/// token travels out of band; debug builds log it to ease local testing.
pub async fn request_password_reset(db: &MongoDB, email: &str) -> Result<(), String> {
    let collection = db.collection::<UserProfile>(COLLECTION);
    let email = email.trim().to_lowercase();

    let user = match collection
        .find_one(doc! { "email": &email })
        .await
        .map_err(|e| db_error("requesting password reset", e))?
    {
        Some(user) => user,
        None => {
            log::info!("🔑 Password reset requested for unknown email");
            return Ok(());
        }
    };

    let token = generate_reset_token();
    let token_hash =
        hash(&token, DEFAULT_COST).map_err(|e| format!("Failed to hash reset token: {}", e))?;
    let expires = Utc::now().timestamp() + RESET_TOKEN_TTL_SECS;

    collection
        .update_one(
            doc! { "user_id": &user.user_id },
            doc! { "$set": {
                "reset_token": token_hash,
                "reset_token_expires": expires,
                "updated_at": BsonDateTime::now(),
            }},
        )
        .await
        .map_err(|e| db_error("storing reset token", e))?;

    log::info!("🔑 Password reset token issued for {}", email);
    if cfg!(debug_assertions) {
        log::debug!("🔑 Reset token for {}: {}", email, token);
    }

    Ok(())
}

/// Completes a reset: the presented token must match the stored hash and
/// still be inside its validity window.
pub async fn confirm_password_reset(
    db: &MongoDB,
    request: &PasswordResetConfirmRequest,
) -> Result<(), String> {
    let collection = db.collection::<UserProfile>(COLLECTION);
    let email = request.email.trim().to_lowercase();

    validate_password(&request.new_password)?;

    let user = collection
        .find_one(doc! { "email": &email })
        .await
        .map_err(|e| db_error("confirming password reset", e))?
        .ok_or_else(|| "Invalid or expired reset token".to_string())?;

    let stored_hash = user
        .reset_token
        .as_ref()
        .ok_or_else(|| "Invalid or expired reset token".to_string())?;

    let expires = user.reset_token_expires.unwrap_or(0);
    if Utc::now().timestamp() > expires {
        return Err("Invalid or expired reset token".to_string());
    }

    let valid = verify(&request.token, stored_hash)
        .map_err(|e| format!("Reset token verification error: {}", e))?;
    if !valid {
        return Err("Invalid or expired reset token".to_string());
    }

    let new_hash = hash(&request.new_password, DEFAULT_COST)
        .map_err(|e| format!("Failed to hash password: {}", e))?;

    collection
        .update_one(
            doc! { "user_id": &user.user_id },
            doc! {
                "$set": { "password": new_hash, "updated_at": BsonDateTime::now() },
                "$unset": { "reset_token": "", "reset_token_expires": "" },
            },
        )
        .await
        .map_err(|e| db_error("updating password", e))?;

    log::info!("✅ Password reset completed for {}", email);
    Ok(())
}

/// Deletes the account after re-checking the password. The journey and the
/// results live on the same document, so one delete removes everything.
pub async fn delete_user_account(db: &MongoDB, user_id: &str, password: &str) -> Result<(), String> {
    log::info!("🗑️ Deleting account for user_id: {}", user_id);

    let collection = db.collection::<UserProfile>(COLLECTION);

    let user = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| db_error("deleting account", e))?
        .ok_or_else(|| format!("User {} not found", user_id))?;

    let stored_password = user
        .password
        .as_ref()
        .ok_or_else(|| "Invalid credentials".to_string())?;

    let valid = verify(password, stored_password)
        .map_err(|e| format!("Password verification error: {}", e))?;
    if !valid {
        return Err("Invalid credentials".to_string());
    }

    let delete_result = collection
        .delete_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| db_error("deleting account", e))?;

    if delete_result.deleted_count == 0 {
        log::warn!("⚠️ User {} not found in database", user_id);
        return Err(format!("User {} not found", user_id));
    }

    log::info!("🎉 Account and all journey data deleted for user {}", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> UserProfile {
        UserProfile {
            _id: None,
            user_id: "64f000000000000000000001".to_string(),
            email: "amal@example.com".to_string(),
            password: None,
            name: Some("Amal".to_string()),
            phone: None,
            education_status: None,
            school_name: None,
            public_code: Some("ABCD1234".to_string()),
            language: Some("ar".to_string()),
            roles: vec!["user".to_string()],
            is_active: true,
            journey: Vec::new(),
            results: None,
            reset_token: None,
            reset_token_expires: None,
            created_at: None,
            updated_at: None,
            last_login: None,
        }
    }

    #[test]
    fn test_jwt_round_trip() {
        let user = sample_user();
        let token = generate_jwt(&user).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.user_id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.roles, vec!["user".to_string()]);
        assert_eq!(claims.aud, get_jwt_audience());
        assert_eq!(claims.iss, get_jwt_issuer());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let user = sample_user();
        let mut token = generate_jwt(&user).unwrap();
        token.pop();
        token.push('x');
        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_wrong_audience_or_issuer() {
        let mut claims = Claims {
            sub: "u-1".to_string(),
            email: "a@b.c".to_string(),
            name: None,
            roles: vec![],
            is_active: true,
            iat: Utc::now().timestamp() as usize,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            aud: "some-other-app".to_string(),
            iss: get_jwt_issuer(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();
        assert!(verify_token(&token).is_err());

        claims.aud = get_jwt_audience();
        claims.iss = "someone-else".to_string();
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();
        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn test_public_code_shape() {
        let code = generate_public_code();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(code, code.to_uppercase());
        assert_ne!(code, generate_public_code());
    }

    #[test]
    fn test_reset_token_is_long_and_random() {
        let token = generate_reset_token();
        assert!(token.len() >= 40);
        assert_ne!(token, generate_reset_token());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long-enough-secret").is_ok());
    }

    #[test]
    fn test_bcrypt_round_trip() {
        let hashed = hash("my-journey-pass", DEFAULT_COST).unwrap();
        assert!(verify("my-journey-pass", &hashed).unwrap());
        assert!(!verify("wrong-pass", &hashed).unwrap());
    }
}
