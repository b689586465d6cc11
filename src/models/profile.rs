use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

use crate::models::journey::JourneyEntry;
use crate::models::language::Language;
use crate::models::results::PassionResults;

/// User document (collection `users`). One document per user carries the
/// account, the onboarding profile, the journey entries and the ranking
/// results, so a single read serves the whole client session.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserProfile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub user_id: String, // PRIMARY IDENTIFIER - matches MongoDB structure
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>, // bcrypt hash
    pub name: Option<String>,
    pub phone: Option<String>,
    pub education_status: Option<String>,
    pub school_name: Option<String>,
    /// Short shareable code printed on exports ("their number").
    pub public_code: Option<String>,
    /// Preferred interface language code ("ar" or "en").
    pub language: Option<String>,
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub journey: Vec<JourneyEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<PassionResults>,
    /// bcrypt hash of the last issued password reset token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    /// Unix timestamp after which the reset token is dead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token_expires: Option<i64>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
    pub last_login: Option<BsonDateTime>,
}

// Default functions for serde
fn default_roles() -> Vec<String> {
    vec!["user".to_string()]
}

fn default_is_active() -> bool {
    true
}

impl UserProfile {
    /// Language for an AI or export operation: explicit request choice wins,
    /// then the stored preference, then Arabic.
    pub fn effective_language(&self, requested: Option<Language>) -> Language {
        requested
            .or_else(|| self.language.as_deref().and_then(Language::from_code))
            .unwrap_or_default()
    }

    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

/// Profile view returned to the client. Credentials and reset material
/// never leave the service.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProfileView {
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub education_status: Option<String>,
    pub school_name: Option<String>,
    pub public_code: Option<String>,
    pub language: Option<String>,
    pub journey_entries: usize,
    pub has_results: bool,
    pub created_at: Option<i64>,
}

impl From<UserProfile> for ProfileView {
    fn from(profile: UserProfile) -> Self {
        ProfileView {
            user_id: profile.user_id,
            email: profile.email,
            name: profile.name,
            phone: profile.phone,
            education_status: profile.education_status,
            school_name: profile.school_name,
            public_code: profile.public_code,
            language: profile.language,
            journey_entries: profile.journey.len(),
            has_results: profile.results.is_some(),
            created_at: profile.created_at.map(|d| d.timestamp_millis()),
        }
    }
}

/// PUT /api/v1/profile - only the provided fields are merged into the
/// document, everything else stays untouched.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub education_status: Option<String>,
    pub school_name: Option<String>,
    pub language: Option<Language>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> UserProfile {
        UserProfile {
            _id: None,
            user_id: "u-1".to_string(),
            email: "nour@example.com".to_string(),
            password: Some("$2b$12$hash".to_string()),
            name: Some("Nour".to_string()),
            phone: None,
            education_status: Some("secondary".to_string()),
            school_name: None,
            public_code: Some("A1B2C3D4".to_string()),
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
    fn test_effective_language_precedence() {
        let mut profile = sample_profile();
        assert_eq!(profile.effective_language(Some(Language::En)), Language::En);
        assert_eq!(profile.effective_language(None), Language::Ar);
        profile.language = Some("en".to_string());
        assert_eq!(profile.effective_language(None), Language::En);
        profile.language = None;
        assert_eq!(profile.effective_language(None), Language::Ar);
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut profile = sample_profile();
        assert_eq!(profile.display_name(), "Nour");
        profile.name = Some("   ".to_string());
        assert_eq!(profile.display_name(), "nour@example.com");
        profile.name = None;
        assert_eq!(profile.display_name(), "nour@example.com");
    }

    #[test]
    fn test_profile_deserializes_with_defaults() {
        // Minimal document, the way an early account may look
        let json = r#"{
            "user_id": "u-2",
            "email": "t@example.com",
            "name": null,
            "phone": null,
            "education_status": null,
            "school_name": null,
            "public_code": null,
            "language": null,
            "created_at": null,
            "updated_at": null,
            "last_login": null
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.roles, vec!["user".to_string()]);
        assert!(profile.is_active);
        assert!(profile.journey.is_empty());
        assert!(profile.results.is_none());
    }

    #[test]
    fn test_view_hides_credentials() {
        let profile = sample_profile();
        let view = ProfileView::from(profile);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("reset_token"));
        assert!(json.contains("A1B2C3D4"));
    }
}
