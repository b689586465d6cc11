use crate::database::MongoDB;
use crate::models::UserProfile;
use crate::utils::db_error;
use futures::stream::StreamExt;
use mongodb::bson::doc;
use serde::Serialize;

const COLLECTION: &str = "users";

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

/// One row of the admin table. Flattened from the user document; no
/// credentials, no raw journey answers.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AdminUserRow {
    pub user_id: String,
    pub name: Option<String>,
    pub email: String,
    pub public_code: Option<String>,
    pub education_status: Option<String>,
    pub school_name: Option<String>,
    pub language: Option<String>,
    pub journey_entries: usize,
    pub has_results: bool,
    pub top_passion: Option<String>,
    pub created_at: Option<i64>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AdminUsersPage {
    pub success: bool,
    pub total: u64,
    pub skip: u64,
    pub limit: i64,
    pub users: Vec<AdminUserRow>,
}

impl From<UserProfile> for AdminUserRow {
    fn from(profile: UserProfile) -> Self {
        let top_passion = profile
            .results
            .as_ref()
            .and_then(|r| r.top_passion())
            .map(|r| r.name.clone());
        AdminUserRow {
            user_id: profile.user_id,
            name: profile.name,
            email: profile.email,
            public_code: profile.public_code,
            education_status: profile.education_status,
            school_name: profile.school_name,
            language: profile.language,
            journey_entries: profile.journey.len(),
            has_results: profile.results.is_some(),
            top_passion,
            created_at: profile.created_at.map(|d| d.timestamp_millis()),
        }
    }
}

/// Newest-first page of every registered user.
pub async fn list_users(db: &MongoDB, skip: u64, limit: i64) -> Result<AdminUsersPage, String> {
    let limit = limit.clamp(1, MAX_PAGE_SIZE);
    let collection = db.collection::<UserProfile>(COLLECTION);

    let total = collection
        .count_documents(doc! {})
        .await
        .map_err(|e| db_error("counting users", e))?;

    let mut cursor = collection
        .find(doc! {})
        .sort(doc! { "created_at": -1 })
        .skip(skip)
        .limit(limit)
        .await
        .map_err(|e| db_error("listing users", e))?;

    let mut users = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(profile) => users.push(AdminUserRow::from(profile)),
            Err(e) => log::error!("❌ Skipping unreadable user document: {}", e),
        }
    }

    log::info!("📋 Admin listed {} of {} users (skip {})", users.len(), total, skip);

    Ok(AdminUsersPage {
        success: true,
        total,
        skip,
        limit,
        users,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PassionRanking, PassionResults};

    #[test]
    fn test_row_flattens_top_passion() {
        let profile = UserProfile {
            _id: None,
            user_id: "u-3".to_string(),
            email: "s@example.com".to_string(),
            password: Some("hash".to_string()),
            name: Some("Sara".to_string()),
            phone: None,
            education_status: Some("university".to_string()),
            school_name: None,
            public_code: Some("11AA22BB".to_string()),
            language: Some("en".to_string()),
            roles: vec!["user".to_string()],
            is_active: true,
            journey: Vec::new(),
            results: Some(PassionResults {
                rankings: vec![PassionRanking {
                    name: "Writing".to_string(),
                    score: 77.0,
                    justification: String::new(),
                }],
                narrative: None,
                language: "en".to_string(),
                generated_at: 0,
            }),
            reset_token: Some("hash".to_string()),
            reset_token_expires: None,
            created_at: None,
            updated_at: None,
            last_login: None,
        };

        let row = AdminUserRow::from(profile);
        assert_eq!(row.top_passion.as_deref(), Some("Writing"));
        assert!(row.has_results);
        assert_eq!(row.journey_entries, 0);

        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("hash"));
    }
}
