use crate::database::MongoDB;
use crate::genai::prompts;
use crate::genai::types::{
    BatchSolutionsOutcome, HintOutcome, RankingOutcome, ReportOutcome, SolutionsOutcome,
};
use crate::genai::GenAi;
use crate::models::{JourneyEntry, Language, PassionRanking, PassionResults, Station, UserProfile};
use crate::services::{journey_service, profile_service};
use crate::utils::db_error;
use lazy_static::lazy_static;
use mongodb::bson::{doc, to_bson, DateTime as BsonDateTime};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

const COLLECTION: &str = "users";

/// Runs the ranking template over the whole journey and stores the outcome
/// under `results`, replacing any previous ranking (and its narrative).
pub async fn rank_journey(
    db: &MongoDB,
    genai: &GenAi,
    user_id: &str,
    language: Option<Language>,
) -> Result<PassionResults, String> {
    let profile = profile_service::get_profile(db, user_id).await?;
    if profile.journey.is_empty() {
        return Err("The journey has no passions to rank yet".to_string());
    }
    if !profile.journey.iter().any(|e| e.has_answers()) {
        return Err("No station answers recorded yet".to_string());
    }
    let language = profile.effective_language(language);

    log::info!(
        "🏁 Ranking {} passions for user {} ({})",
        profile.journey.len(),
        user_id,
        language.as_code()
    );

    let request = prompts::ranking_request(&profile.journey, language);
    let outcome: RankingOutcome = genai.generate(request).await?;
    if outcome.rankings.is_empty() {
        return Err("The model returned an empty ranking".to_string());
    }

    let mut rankings: Vec<PassionRanking> = outcome
        .rankings
        .into_iter()
        .map(|r| PassionRanking {
            name: r.name,
            score: r.score,
            justification: r.justification,
        })
        .collect();
    // The template demands best-first order; re-sort in case the model drifts
    sort_by_score_desc(&mut rankings);

    let results = PassionResults {
        rankings,
        narrative: None,
        language: language.as_code().to_string(),
        generated_at: chrono::Utc::now().timestamp(),
    };

    let results_bson = to_bson(&results).map_err(|e| format!("Failed to encode results: {}", e))?;
    let collection = db.collection::<UserProfile>(COLLECTION);
    collection
        .update_one(
            doc! { "user_id": user_id },
            doc! { "$set": {
                "results": results_bson,
                "updated_at": BsonDateTime::now(),
            }},
        )
        .await
        .map_err(|e| db_error("saving results", e))?;

    log::info!(
        "✅ Ranking stored for user {}: top passion '{}'",
        user_id,
        results.top_passion().map(|r| r.name.as_str()).unwrap_or("?")
    );

    Ok(results)
}

fn sort_by_score_desc(rankings: &mut [PassionRanking]) {
    rankings.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Suggests solutions for one passion's recorded problems and stores them
/// on the entry.
pub async fn suggest_solutions(
    db: &MongoDB,
    genai: &GenAi,
    user_id: &str,
    entry_id: &str,
    language: Option<Language>,
) -> Result<Vec<String>, String> {
    let profile = profile_service::get_profile(db, user_id).await?;
    let entry = profile
        .journey
        .iter()
        .find(|e| e.entry_id == entry_id)
        .ok_or_else(|| "Passion not found".to_string())?;

    if entry.problems.is_empty() {
        return Err("No problems recorded for this passion yet".to_string());
    }
    let language = profile.effective_language(language);

    let request = prompts::solutions_request(entry, language);
    let outcome: SolutionsOutcome = genai.generate(request).await?;
    if outcome.solutions.is_empty() {
        return Err("The model returned no solutions".to_string());
    }

    journey_service::store_solutions(db, user_id, entry_id, &outcome.solutions).await?;

    log::info!(
        "💡 {} solutions stored for passion '{}' of user {}",
        outcome.solutions.len(),
        entry.name,
        user_id
    );

    Ok(outcome.solutions)
}

/// Batch response row for one passion.
#[derive(Debug, Serialize)]
pub struct EntrySolutionsView {
    pub entry_id: String,
    pub name: String,
    pub solutions: Vec<String>,
}

/// One model call covering every passion that has problems recorded. Rows
/// the model returns for unknown entry ids are dropped with a warning.
pub async fn suggest_solutions_batch(
    db: &MongoDB,
    genai: &GenAi,
    user_id: &str,
    language: Option<Language>,
) -> Result<Vec<EntrySolutionsView>, String> {
    let profile = profile_service::get_profile(db, user_id).await?;
    let eligible: Vec<&JourneyEntry> = profile
        .journey
        .iter()
        .filter(|e| !e.problems.is_empty())
        .collect();

    if eligible.is_empty() {
        return Err("No passion has problems recorded yet".to_string());
    }
    let language = profile.effective_language(language);

    log::info!(
        "💡 Requesting solutions for {} passions of user {}",
        eligible.len(),
        user_id
    );

    let request = prompts::batch_solutions_request(&eligible, language);
    let outcome: BatchSolutionsOutcome = genai.generate(request).await?;

    let mut views = Vec::new();
    for row in outcome.entries {
        let entry = match eligible.iter().find(|e| e.entry_id == row.entry_id) {
            Some(entry) => entry,
            None => {
                log::warn!("⚠️ Model returned unknown entry_id '{}', skipping", row.entry_id);
                continue;
            }
        };
        if row.solutions.is_empty() {
            continue;
        }
        journey_service::store_solutions(db, user_id, &row.entry_id, &row.solutions).await?;
        views.push(EntrySolutionsView {
            entry_id: row.entry_id,
            name: entry.name.clone(),
            solutions: row.solutions,
        });
    }

    if views.is_empty() {
        return Err("The model returned no usable solutions".to_string());
    }

    Ok(views)
}

/// Writes the narrative report from the stored ranking and attaches it to
/// `results.narrative`.
pub async fn narrative_report(
    db: &MongoDB,
    genai: &GenAi,
    user_id: &str,
    language: Option<Language>,
) -> Result<String, String> {
    let profile = profile_service::get_profile(db, user_id).await?;
    let results = profile
        .results
        .as_ref()
        .ok_or_else(|| "Rank the journey before requesting a report".to_string())?;
    let language = profile.effective_language(language);

    let request = prompts::report_request(profile.display_name(), results, language);
    let outcome: ReportOutcome = genai.generate(request).await?;
    if outcome.report.trim().is_empty() {
        return Err("The model returned an empty report".to_string());
    }

    let collection = db.collection::<UserProfile>(COLLECTION);
    collection
        .update_one(
            doc! { "user_id": user_id },
            doc! { "$set": {
                "results.narrative": &outcome.report,
                "updated_at": BsonDateTime::now(),
            }},
        )
        .await
        .map_err(|e| db_error("saving narrative", e))?;

    log::info!("📖 Narrative report stored for user {}", user_id);

    Ok(outcome.report)
}

// In-memory cache for station hints. Hints do not depend on the user, only
// on (station, language), so one model call serves everyone for a day.
#[derive(Debug, Clone)]
struct CachedHint {
    text: String,
    timestamp: std::time::Instant,
}

lazy_static! {
    static ref HINT_CACHE: Mutex<HashMap<String, CachedHint>> = Mutex::new(HashMap::new());
}

const HINT_CACHE_TTL_SECONDS: u64 = 86400; // 24 hours

pub async fn station_hint(
    genai: &GenAi,
    station: Station,
    language: Language,
) -> Result<String, String> {
    let cache_key = format!("{}_{}", station.as_str(), language.as_code());

    {
        let cache = HINT_CACHE.lock().unwrap();
        if let Some(cached) = cache.get(&cache_key) {
            let elapsed = cached.timestamp.elapsed().as_secs();
            if elapsed < HINT_CACHE_TTL_SECONDS {
                log::debug!("📦 Using cached hint for {} (age: {}s)", cache_key, elapsed);
                return Ok(cached.text.clone());
            }
        }
    }

    let request = prompts::hint_request(station, language);
    let outcome: HintOutcome = genai.generate(request).await?;
    if outcome.hint.trim().is_empty() {
        return Err("The model returned an empty hint".to_string());
    }

    {
        let mut cache = HINT_CACHE.lock().unwrap();
        cache.insert(
            cache_key.clone(),
            CachedHint {
                text: outcome.hint.clone(),
                timestamp: std::time::Instant::now(),
            },
        );
        log::debug!("💾 Cached hint for {}", cache_key);
    }

    Ok(outcome.hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::{GenerativeBackend, PromptRequest};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingBackend {
        calls: AtomicUsize,
        reply: Value,
    }

    #[async_trait]
    impl GenerativeBackend for CountingBackend {
        async fn generate_json(&self, _request: PromptRequest) -> Result<Value, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn test_sort_by_score_desc() {
        let mut rankings = vec![
            PassionRanking {
                name: "B".to_string(),
                score: 55.0,
                justification: String::new(),
            },
            PassionRanking {
                name: "A".to_string(),
                score: 91.0,
                justification: String::new(),
            },
            PassionRanking {
                name: "C".to_string(),
                score: 70.5,
                justification: String::new(),
            },
        ];
        sort_by_score_desc(&mut rankings);
        let names: Vec<&str> = rankings.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[tokio::test]
    async fn test_station_hint_is_cached() {
        let backend = Arc::new(CountingBackend {
            calls: AtomicUsize::new(0),
            reply: json!({"hint": "Look for skills others notice in you"}),
        });
        let genai = GenAi::new(backend.clone());

        // Power/En is not touched by any other test, so the cache is cold
        let first = station_hint(&genai, Station::Power, Language::En)
            .await
            .unwrap();
        let second = station_hint(&genai, Station::Power, Language::En)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_station_hint_rejects_empty() {
        let backend = Arc::new(CountingBackend {
            calls: AtomicUsize::new(0),
            reply: json!({"hint": "   "}),
        });
        let genai = GenAi::new(backend);
        let result = station_hint(&genai, Station::Proof, Language::En).await;
        assert!(result.is_err());
    }
}
