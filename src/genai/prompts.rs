// The five fixed prompt templates of the journey. Each render function
// substitutes the {placeholders} of its template and pairs the prompt with
// the JSON schema the API validates the reply against.

use serde_json::{json, Value};

use crate::models::{JourneyEntry, Language, PassionResults, Station, StationAnswer};

use super::client::PromptRequest;

/// System instruction shared by every template.
const SYSTEM_INSTRUCTION: &str = "You are the guide of a passion discovery journey: a structured self-assessment where a person evaluates candidate passions across five stations (Purpose, Power, Proof, Problems, Possibilities). You MUST respond with valid JSON only, matching the requested schema exactly. Do not include any text outside the JSON object.";

const ARABIC_OUTPUT: &str =
    "Write every human-readable field of the JSON in Modern Standard Arabic.";
const ENGLISH_OUTPUT: &str = "Write every human-readable field of the JSON in English.";

fn language_instruction(language: Language) -> &'static str {
    match language {
        Language::Ar => ARABIC_OUTPUT,
        Language::En => ENGLISH_OUTPUT,
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

const RANKING_TEMPLATE: &str = r#"Rank the candidate passions below.

Score each passion from 0 to 100 as a fixed weighted sum over its five stations:
{weight_table}

Rate each station from 0 to 100 from its answers, counting every answer with its qualitative weight: high = 3, medium = 2, low = 1. A station with no answers scores 0. For the Problems station, fewer and more solvable problems mean a HIGHER station score.

Give every passion a short justification of 2 to 3 sentences naming its strongest and weakest stations.

{language_instruction}

CANDIDATE PASSIONS:
{entries_json}

Return a JSON object with a "rankings" array ordered from highest score to lowest. Use each passion's name exactly as given above."#;

pub fn ranking_request(entries: &[JourneyEntry], language: Language) -> PromptRequest {
    let prompt = RANKING_TEMPLATE
        .replace("{weight_table}", &weight_table())
        .replace("{language_instruction}", language_instruction(language))
        .replace("{entries_json}", &entries_payload(entries));

    PromptRequest {
        system: SYSTEM_INSTRUCTION.to_string(),
        prompt,
        response_schema: ranking_schema(),
    }
}

fn ranking_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "rankings": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": {"type": "STRING"},
                        "score": {"type": "NUMBER"},
                        "justification": {"type": "STRING"}
                    },
                    "required": ["name", "score", "justification"]
                }
            }
        },
        "required": ["rankings"]
    })
}

// ---------------------------------------------------------------------------
// Solutions (single passion and whole journey)
// ---------------------------------------------------------------------------

const SOLUTIONS_TEMPLATE: &str = r#"The passion "{name}" has these recorded problems, each with the importance its owner assigned:
{problems_json}

Suggest 3 to 5 practical, concrete solutions a motivated person could start on their own. Address the heavier problems first.

{language_instruction}

Return a JSON object with a "solutions" array of strings."#;

pub fn solutions_request(entry: &JourneyEntry, language: Language) -> PromptRequest {
    let prompt = SOLUTIONS_TEMPLATE
        .replace("{name}", &entry.name)
        .replace("{problems_json}", &answers_payload(&entry.problems))
        .replace("{language_instruction}", language_instruction(language));

    PromptRequest {
        system: SYSTEM_INSTRUCTION.to_string(),
        prompt,
        response_schema: solutions_schema(),
    }
}

fn solutions_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "solutions": {
                "type": "ARRAY",
                "items": {"type": "STRING"}
            }
        },
        "required": ["solutions"]
    })
}

const BATCH_SOLUTIONS_TEMPLATE: &str = r#"Each passion below lists its recorded problems with the importance its owner assigned:
{entries_json}

For every passion, suggest 3 to 5 practical, concrete solutions a motivated person could start on their own.

{language_instruction}

Return a JSON object with an "entries" array; each element carries the passion's "entry_id" EXACTLY as given above and its "solutions" array of strings."#;

pub fn batch_solutions_request(entries: &[&JourneyEntry], language: Language) -> PromptRequest {
    let payload: Vec<Value> = entries
        .iter()
        .map(|entry| {
            json!({
                "entry_id": entry.entry_id,
                "name": entry.name,
                "problems": answers_value(&entry.problems),
            })
        })
        .collect();

    let prompt = BATCH_SOLUTIONS_TEMPLATE
        .replace("{entries_json}", &to_pretty(&Value::Array(payload)))
        .replace("{language_instruction}", language_instruction(language));

    PromptRequest {
        system: SYSTEM_INSTRUCTION.to_string(),
        prompt,
        response_schema: batch_solutions_schema(),
    }
}

fn batch_solutions_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "entries": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "entry_id": {"type": "STRING"},
                        "solutions": {
                            "type": "ARRAY",
                            "items": {"type": "STRING"}
                        }
                    },
                    "required": ["entry_id", "solutions"]
                }
            }
        },
        "required": ["entries"]
    })
}

// ---------------------------------------------------------------------------
// Narrative report
// ---------------------------------------------------------------------------

const REPORT_TEMPLATE: &str = r#"{name} finished the passion discovery journey. The final ranking was:
{rankings_json}

Write a warm, personal narrative report of 4 to 6 paragraphs addressed directly to {name}: what the journey revealed, why the top passion stands out, how its runner-ups relate to it, and concrete first steps to nurture the top passion. Close with genuine encouragement. Do not mention scores as raw numbers.

{language_instruction}

Return a JSON object with a single "report" string."#;

pub fn report_request(name: &str, results: &PassionResults, language: Language) -> PromptRequest {
    let rankings: Vec<Value> = results
        .rankings
        .iter()
        .map(|r| {
            json!({
                "name": r.name,
                "score": r.score,
                "justification": r.justification,
            })
        })
        .collect();

    let prompt = REPORT_TEMPLATE
        .replace("{name}", name)
        .replace("{rankings_json}", &to_pretty(&Value::Array(rankings)))
        .replace("{language_instruction}", language_instruction(language));

    PromptRequest {
        system: SYSTEM_INSTRUCTION.to_string(),
        prompt,
        response_schema: report_schema(),
    }
}

fn report_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "report": {"type": "STRING"}
        },
        "required": ["report"]
    })
}

// ---------------------------------------------------------------------------
// Station hint
// ---------------------------------------------------------------------------

const HINT_TEMPLATE: &str = r#"Explain the "{station}" station of the passion discovery journey to someone about to answer it. In 2 to 3 sentences, say what the station asks about and why it matters, then give one short example answer for a sample passion. This station contributes {weight}% of the final score.

{language_instruction}

Return a JSON object with a single "hint" string."#;

pub fn hint_request(station: Station, language: Language) -> PromptRequest {
    let prompt = HINT_TEMPLATE
        .replace("{station}", station.label(Language::En))
        .replace("{weight}", &station.score_weight().to_string())
        .replace("{language_instruction}", language_instruction(language));

    PromptRequest {
        system: SYSTEM_INSTRUCTION.to_string(),
        prompt,
        response_schema: hint_schema(),
    }
}

fn hint_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "hint": {"type": "STRING"}
        },
        "required": ["hint"]
    })
}

// ---------------------------------------------------------------------------
// Payload helpers
// ---------------------------------------------------------------------------

fn weight_table() -> String {
    Station::ALL
        .iter()
        .map(|s| format!("- {}: {}%", s.label(Language::En), s.score_weight()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn answers_value(answers: &[StationAnswer]) -> Value {
    Value::Array(
        answers
            .iter()
            .map(|a| json!({"text": a.text, "weight": a.weight}))
            .collect(),
    )
}

fn answers_payload(answers: &[StationAnswer]) -> String {
    to_pretty(&answers_value(answers))
}

fn entries_payload(entries: &[JourneyEntry]) -> String {
    let payload: Vec<Value> = entries
        .iter()
        .map(|entry| {
            json!({
                "name": entry.name,
                "stations": {
                    "purpose": answers_value(&entry.purpose),
                    "power": answers_value(&entry.power),
                    "proof": answers_value(&entry.proof),
                    "problems": answers_value(&entry.problems),
                    "possibilities": answers_value(&entry.possibilities),
                }
            })
        })
        .collect();
    to_pretty(&Value::Array(payload))
}

fn to_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerWeight, PassionRanking};

    fn entry_with_problems(name: &str) -> JourneyEntry {
        let mut entry = JourneyEntry::new(name);
        entry.purpose.push(StationAnswer {
            text: "It gives my week direction".to_string(),
            weight: AnswerWeight::High,
        });
        entry.problems.push(StationAnswer {
            text: "Gear is expensive".to_string(),
            weight: AnswerWeight::Medium,
        });
        entry
    }

    #[test]
    fn test_ranking_prompt_contains_weights_and_entries() {
        let entries = vec![entry_with_problems("Photography")];
        let request = ranking_request(&entries, Language::En);
        assert!(request.prompt.contains("- Purpose: 25%"));
        assert!(request.prompt.contains("- Possibilities: 15%"));
        assert!(request.prompt.contains("Photography"));
        assert!(request.prompt.contains("It gives my week direction"));
        assert!(request.prompt.contains(ENGLISH_OUTPUT));
        assert!(!request.prompt.contains("{weight_table}"));
        assert!(!request.prompt.contains("{entries_json}"));
    }

    #[test]
    fn test_ranking_schema_shape() {
        let schema = ranking_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["rankings"]["type"], "ARRAY");
        let required = &schema["properties"]["rankings"]["items"]["required"];
        assert_eq!(required.as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_solutions_prompt_uses_arabic_instruction_by_request() {
        let entry = entry_with_problems("Gardening");
        let request = solutions_request(&entry, Language::Ar);
        assert!(request.prompt.contains("Gardening"));
        assert!(request.prompt.contains("Gear is expensive"));
        assert!(request.prompt.contains(ARABIC_OUTPUT));
        assert!(!request.prompt.contains("{name}"));
    }

    #[test]
    fn test_batch_prompt_carries_every_entry_id() {
        let first = entry_with_problems("Chess");
        let second = entry_with_problems("Baking");
        let entries = vec![&first, &second];
        let request = batch_solutions_request(&entries, Language::En);
        assert!(request.prompt.contains(&first.entry_id));
        assert!(request.prompt.contains(&second.entry_id));
        assert!(request.response_schema["properties"]["entries"].is_object());
    }

    #[test]
    fn test_report_prompt_addresses_user() {
        let results = PassionResults {
            rankings: vec![PassionRanking {
                name: "Astronomy".to_string(),
                score: 88.0,
                justification: "Purpose and proof are strong".to_string(),
            }],
            narrative: None,
            language: "en".to_string(),
            generated_at: 0,
        };
        let request = report_request("Lina", &results, Language::En);
        assert!(request.prompt.contains("Lina finished"));
        assert!(request.prompt.contains("Astronomy"));
        assert!(!request.prompt.contains("{rankings_json}"));
    }

    #[test]
    fn test_hint_prompt_names_station_and_weight() {
        let request = hint_request(Station::Problems, Language::En);
        assert!(request.prompt.contains("\"Problems\" station"));
        assert!(request.prompt.contains("15%"));
        let request = hint_request(Station::Purpose, Language::Ar);
        assert!(request.prompt.contains("25%"));
        assert!(request.prompt.contains(ARABIC_OUTPUT));
    }
}
