// Generative model integration. Every model call in the service goes
// through this module; handlers and services never build prompts or talk
// to the hosted API themselves.
pub mod client;
pub mod prompts;
pub mod types;

pub use client::{GenAi, GeminiBackend, GenerativeBackend, PromptRequest};

/// Strips markdown code fences from a model reply. The API is asked for
/// raw JSON, but replies still occasionally arrive wrapped in a fenced
/// block.
pub fn strip_json_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_json_fence() {
        let fenced = "```json\n{\"hint\": \"ok\"}\n```";
        assert_eq!(strip_json_fences(fenced), "{\"hint\": \"ok\"}");
    }

    #[test]
    fn test_strips_bare_fence() {
        let fenced = "```\n[1, 2]\n```";
        assert_eq!(strip_json_fences(fenced), "[1, 2]");
    }

    #[test]
    fn test_leaves_plain_json_alone() {
        let plain = "  {\"solutions\": []} ";
        assert_eq!(strip_json_fences(plain), "{\"solutions\": []}");
    }
}
