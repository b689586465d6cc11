use crate::database::MongoDB;
use crate::models::{UpdateProfileRequest, UserProfile};
use crate::utils::db_error;
use mongodb::bson::{doc, DateTime as BsonDateTime, Document};

const COLLECTION: &str = "users";

/// Loads the full user document.
pub async fn get_profile(db: &MongoDB, user_id: &str) -> Result<UserProfile, String> {
    let collection = db.collection::<UserProfile>(COLLECTION);

    collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| db_error("fetching profile", e))?
        .ok_or_else(|| "User profile not found".to_string())
}

/// Merges the provided fields into the document. Untouched fields keep
/// whatever value they had; there is no way to blank a field through this
/// path.
pub async fn update_profile(
    db: &MongoDB,
    user_id: &str,
    request: &UpdateProfileRequest,
) -> Result<UserProfile, String> {
    let collection = db.collection::<UserProfile>(COLLECTION);

    let mut set = Document::new();
    if let Some(name) = &request.name {
        set.insert("name", name.trim());
    }
    if let Some(phone) = &request.phone {
        set.insert("phone", phone.trim());
    }
    if let Some(education_status) = &request.education_status {
        set.insert("education_status", education_status.trim());
    }
    if let Some(school_name) = &request.school_name {
        set.insert("school_name", school_name.trim());
    }
    if let Some(language) = request.language {
        set.insert("language", language.as_code());
    }

    if set.is_empty() {
        return Err("No profile fields provided".to_string());
    }
    set.insert("updated_at", BsonDateTime::now());

    let result = collection
        .update_one(doc! { "user_id": user_id }, doc! { "$set": set })
        .await
        .map_err(|e| db_error("updating profile", e))?;

    if result.matched_count == 0 {
        return Err("User profile not found".to_string());
    }

    log::info!("📝 Profile updated for user {}", user_id);

    get_profile(db, user_id).await
}
