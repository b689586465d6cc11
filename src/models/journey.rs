use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::language::Language;

/// Qualitative weight the user attaches to a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnswerWeight {
    Low,
    Medium,
    High,
}

/// One free-text answer recorded at a station, with its weight.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StationAnswer {
    pub text: String,
    pub weight: AnswerWeight,
}

/// The five fixed stations every candidate passion travels through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Station {
    Purpose,
    Power,
    Proof,
    Problems,
    Possibilities,
}

impl Station {
    pub const ALL: [Station; 5] = [
        Station::Purpose,
        Station::Power,
        Station::Proof,
        Station::Problems,
        Station::Possibilities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Station::Purpose => "purpose",
            Station::Power => "power",
            Station::Proof => "proof",
            Station::Problems => "problems",
            Station::Possibilities => "possibilities",
        }
    }

    pub fn from_str(s: &str) -> Option<Station> {
        match s.trim().to_lowercase().as_str() {
            "purpose" => Some(Station::Purpose),
            "power" => Some(Station::Power),
            "proof" => Some(Station::Proof),
            "problems" => Some(Station::Problems),
            "possibilities" => Some(Station::Possibilities),
            _ => None,
        }
    }

    /// Fixed share of the final passion score, in percent. The ranking
    /// prompt quotes these numbers; the scoring itself happens on the
    /// model side.
    pub fn score_weight(&self) -> u32 {
        match self {
            Station::Purpose => 25,
            Station::Power => 25,
            Station::Proof => 20,
            Station::Problems => 15,
            Station::Possibilities => 15,
        }
    }

    /// Display label in the given language, used by exports and prompts.
    pub fn label(&self, language: Language) -> &'static str {
        match language {
            Language::En => match self {
                Station::Purpose => "Purpose",
                Station::Power => "Power",
                Station::Proof => "Proof",
                Station::Problems => "Problems",
                Station::Possibilities => "Possibilities",
            },
            Language::Ar => match self {
                Station::Purpose => "الهدف",
                Station::Power => "القوة",
                Station::Proof => "الدليل",
                Station::Problems => "العقبات",
                Station::Possibilities => "الإمكانيات",
            },
        }
    }
}

/// One candidate passion inside the user's journey. Lives as an element of
/// the `journey` array on the user document.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct JourneyEntry {
    pub entry_id: String,
    pub name: String,
    #[serde(default)]
    pub purpose: Vec<StationAnswer>,
    #[serde(default)]
    pub power: Vec<StationAnswer>,
    #[serde(default)]
    pub proof: Vec<StationAnswer>,
    #[serde(default)]
    pub problems: Vec<StationAnswer>,
    #[serde(default)]
    pub possibilities: Vec<StationAnswer>,
    /// Suggested solutions for the problems station, filled by the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solutions: Option<Vec<String>>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl JourneyEntry {
    pub fn new(name: &str) -> Self {
        let now = chrono::Utc::now().timestamp();
        JourneyEntry {
            entry_id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            purpose: Vec::new(),
            power: Vec::new(),
            proof: Vec::new(),
            problems: Vec::new(),
            possibilities: Vec::new(),
            solutions: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn station_answers(&self, station: Station) -> &[StationAnswer] {
        match station {
            Station::Purpose => &self.purpose,
            Station::Power => &self.power,
            Station::Proof => &self.proof,
            Station::Problems => &self.problems,
            Station::Possibilities => &self.possibilities,
        }
    }

    /// True once at least one station holds an answer.
    pub fn has_answers(&self) -> bool {
        Station::ALL
            .iter()
            .any(|station| !self.station_answers(*station).is_empty())
    }
}

/// POST /api/v1/journey
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateEntryRequest {
    pub name: String,
}

/// PUT /api/v1/journey/{entry_id}
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RenameEntryRequest {
    pub name: String,
}

/// PUT /api/v1/journey/{entry_id}/stations/{station} - replaces the whole
/// answer list of that station.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StationAnswersRequest {
    pub answers: Vec<StationAnswer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_round_trip() {
        for station in Station::ALL {
            assert_eq!(Station::from_str(station.as_str()), Some(station));
        }
        assert_eq!(Station::from_str("Purpose"), Some(Station::Purpose));
        assert_eq!(Station::from_str("passion"), None);
    }

    #[test]
    fn test_station_weights_sum_to_one_hundred() {
        let total: u32 = Station::ALL.iter().map(|s| s.score_weight()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_answer_weight_serde_lowercase() {
        assert_eq!(serde_json::to_string(&AnswerWeight::High).unwrap(), "\"high\"");
        let parsed: AnswerWeight = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, AnswerWeight::Medium);
    }

    #[test]
    fn test_new_entry_is_empty() {
        let entry = JourneyEntry::new("  Robotics  ");
        assert_eq!(entry.name, "Robotics");
        assert!(!entry.entry_id.is_empty());
        assert!(!entry.has_answers());
        assert!(entry.solutions.is_none());
        assert_eq!(entry.created_at, entry.updated_at);
    }

    #[test]
    fn test_entry_deserializes_with_missing_stations() {
        // Older documents may predate some fields entirely
        let json = r#"{
            "entry_id": "abc",
            "name": "Drawing",
            "purpose": [{"text": "I lose track of time", "weight": "high"}],
            "created_at": 1700000000,
            "updated_at": 1700000000
        }"#;
        let entry: JourneyEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.purpose.len(), 1);
        assert!(entry.power.is_empty());
        assert!(entry.solutions.is_none());
        assert!(entry.has_answers());
    }

    #[test]
    fn test_station_answers_accessor() {
        let mut entry = JourneyEntry::new("Chess");
        entry.problems.push(StationAnswer {
            text: "No local club".to_string(),
            weight: AnswerWeight::Low,
        });
        assert_eq!(entry.station_answers(Station::Problems).len(), 1);
        assert!(entry.station_answers(Station::Power).is_empty());
    }
}
