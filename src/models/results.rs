use serde::{Deserialize, Serialize};

/// Final score and reasoning for one passion, as returned by the ranking.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PassionRanking {
    pub name: String,
    /// 0-100, weighted over the five stations.
    pub score: f64,
    pub justification: String,
}

/// Ranking outcome stored on the user document under `results`. Regenerating
/// the ranking replaces the whole record; the narrative is attached later by
/// the report operation.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PassionResults {
    /// Ordered best-first.
    pub rankings: Vec<PassionRanking>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    /// Language the rankings were written in ("ar" or "en").
    pub language: String,
    pub generated_at: i64,
}

impl PassionResults {
    pub fn top_passion(&self) -> Option<&PassionRanking> {
        self.rankings.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_serde_without_narrative() {
        let results = PassionResults {
            rankings: vec![PassionRanking {
                name: "Astronomy".to_string(),
                score: 82.5,
                justification: "Strong purpose and proof".to_string(),
            }],
            narrative: None,
            language: "en".to_string(),
            generated_at: 1700000000,
        };
        let json = serde_json::to_string(&results).unwrap();
        assert!(!json.contains("narrative"));
        let parsed: PassionResults = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rankings.len(), 1);
        assert_eq!(parsed.top_passion().unwrap().name, "Astronomy");
    }

    #[test]
    fn test_top_passion_empty() {
        let results = PassionResults {
            rankings: Vec::new(),
            narrative: None,
            language: "ar".to_string(),
            generated_at: 0,
        };
        assert!(results.top_passion().is_none());
    }
}
