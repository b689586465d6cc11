use crate::database::MongoDB;
use crate::models::{JourneyEntry, Station, StationAnswer, UserProfile};
use crate::services::profile_service;
use crate::utils::db_error;
use mongodb::bson::{doc, to_bson, DateTime as BsonDateTime};

const COLLECTION: &str = "users";
/// A journey stays small by design; the wizard UX caps candidates.
const MAX_ENTRIES: usize = 10;

pub async fn list_entries(db: &MongoDB, user_id: &str) -> Result<Vec<JourneyEntry>, String> {
    let profile = profile_service::get_profile(db, user_id).await?;
    Ok(profile.journey)
}

pub async fn get_entry(db: &MongoDB, user_id: &str, entry_id: &str) -> Result<JourneyEntry, String> {
    let profile = profile_service::get_profile(db, user_id).await?;
    profile
        .journey
        .into_iter()
        .find(|e| e.entry_id == entry_id)
        .ok_or_else(|| "Passion not found".to_string())
}

/// Appends a fresh passion to the journey.
pub async fn add_entry(db: &MongoDB, user_id: &str, name: &str) -> Result<JourneyEntry, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Passion name is required".to_string());
    }

    let profile = profile_service::get_profile(db, user_id).await?;
    if profile.journey.len() >= MAX_ENTRIES {
        return Err(format!(
            "Journey is full: at most {} passions at a time",
            MAX_ENTRIES
        ));
    }
    if profile
        .journey
        .iter()
        .any(|e| e.name.eq_ignore_ascii_case(name))
    {
        return Err(format!("'{}' is already in the journey", name));
    }

    let entry = JourneyEntry::new(name);
    let entry_bson = to_bson(&entry).map_err(|e| format!("Failed to encode passion: {}", e))?;

    let collection = db.collection::<UserProfile>(COLLECTION);
    collection
        .update_one(
            doc! { "user_id": user_id },
            doc! {
                "$push": { "journey": entry_bson },
                "$set": { "updated_at": BsonDateTime::now() },
            },
        )
        .await
        .map_err(|e| db_error("adding passion", e))?;

    log::info!("🌱 Passion '{}' added for user {}", entry.name, user_id);
    Ok(entry)
}

pub async fn rename_entry(
    db: &MongoDB,
    user_id: &str,
    entry_id: &str,
    name: &str,
) -> Result<JourneyEntry, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Passion name is required".to_string());
    }

    let collection = db.collection::<UserProfile>(COLLECTION);
    let now = chrono::Utc::now().timestamp();
    let p = "journey.$[elem]";

    collection
        .update_one(
            doc! { "user_id": user_id },
            doc! { "$set": {
                format!("{}.name", p): name,
                format!("{}.updated_at", p): now,
                "updated_at": BsonDateTime::now(),
            }},
        )
        .array_filters(vec![doc! { "elem.entry_id": entry_id }])
        .await
        .map_err(|e| db_error("renaming passion", e))?;

    get_entry(db, user_id, entry_id).await
}

/// Replaces the whole answer list of one station. The wizard always sends
/// the station's full state, so there is no per-answer patching.
pub async fn set_station_answers(
    db: &MongoDB,
    user_id: &str,
    entry_id: &str,
    station: Station,
    answers: &[StationAnswer],
) -> Result<JourneyEntry, String> {
    if answers.iter().any(|a| a.text.trim().is_empty()) {
        return Err("Answers cannot be empty".to_string());
    }

    let answers_bson =
        to_bson(answers).map_err(|e| format!("Failed to encode answers: {}", e))?;

    let collection = db.collection::<UserProfile>(COLLECTION);
    let now = chrono::Utc::now().timestamp();
    let p = "journey.$[elem]";

    collection
        .update_one(
            doc! { "user_id": user_id },
            doc! { "$set": {
                format!("{}.{}", p, station.as_str()): answers_bson,
                format!("{}.updated_at", p): now,
                "updated_at": BsonDateTime::now(),
            }},
        )
        .array_filters(vec![doc! { "elem.entry_id": entry_id }])
        .await
        .map_err(|e| db_error("saving station answers", e))?;

    log::info!(
        "✍️ Station '{}' saved with {} answers for user {}",
        station.as_str(),
        answers.len(),
        user_id
    );

    get_entry(db, user_id, entry_id).await
}

/// Attaches model-suggested solutions to the entry's problems station.
pub async fn store_solutions(
    db: &MongoDB,
    user_id: &str,
    entry_id: &str,
    solutions: &[String],
) -> Result<(), String> {
    let solutions_bson =
        to_bson(solutions).map_err(|e| format!("Failed to encode solutions: {}", e))?;

    let collection = db.collection::<UserProfile>(COLLECTION);
    let now = chrono::Utc::now().timestamp();
    let p = "journey.$[elem]";

    collection
        .update_one(
            doc! { "user_id": user_id },
            doc! { "$set": {
                format!("{}.solutions", p): solutions_bson,
                format!("{}.updated_at", p): now,
                "updated_at": BsonDateTime::now(),
            }},
        )
        .array_filters(vec![doc! { "elem.entry_id": entry_id }])
        .await
        .map_err(|e| db_error("saving solutions", e))?;

    Ok(())
}

pub async fn remove_entry(db: &MongoDB, user_id: &str, entry_id: &str) -> Result<(), String> {
    let collection = db.collection::<UserProfile>(COLLECTION);

    let result = collection
        .update_one(
            doc! { "user_id": user_id },
            doc! {
                "$pull": { "journey": { "entry_id": entry_id } },
                "$set": { "updated_at": BsonDateTime::now() },
            },
        )
        .await
        .map_err(|e| db_error("removing passion", e))?;

    if result.modified_count == 0 {
        return Err("Passion not found".to_string());
    }

    log::info!("🗑️ Passion {} removed for user {}", entry_id, user_id);
    Ok(())
}
