//! Tutor reply and turn report types.
//!
//! `TutorReply` is the structured shape the model is asked to return when
//! structured output is enabled; `TurnReport` is what one processed prompt
//! hands back to the caller.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::chat::Turn;

/// Canned prompts offered while a transcript is still empty.
pub const SUGGESTIONS: [&str; 3] = [
    "Explain what a 'dictionary' is in Python",
    "What are SQL Joins?",
    "Explain recursion with an example",
];

/// How the model is asked to signal an illustrative image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptMode {
    /// Free-text markdown with an optional `[SEARCH_IMAGE: ...]` marker.
    Marker,
    /// A JSON object matching [`TutorReply`].
    Structured,
}

/// Structured tutor reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TutorReply {
    /// The four-section markdown explanation shown to the learner.
    pub answer: String,
    /// A stock-photo search phrase, when an image would help.
    #[serde(default)]
    pub image_query: Option<String>,
}

/// Outcome of processing one prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnReport {
    pub user_turn: Turn,
    pub assistant_turn: Turn,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_query: Option<String>,
    pub image_lookup_attempted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestions_are_the_three_starters() {
        assert_eq!(SUGGESTIONS.len(), 3);
        assert_eq!(SUGGESTIONS[1], "What are SQL Joins?");
    }

    #[test]
    fn test_tutor_reply_missing_image_query_defaults() {
        let reply: TutorReply = serde_json::from_str(r#"{"answer":"hi"}"#).unwrap();
        assert_eq!(reply.answer, "hi");
        assert!(reply.image_query.is_none());
    }

    #[test]
    fn test_tutor_reply_schema_has_both_fields() {
        let schema = schemars::schema_for!(TutorReply);
        let value = serde_json::to_value(schema).unwrap();
        assert!(value["properties"].get("answer").is_some());
        assert!(value["properties"].get("image_query").is_some());
    }
}
