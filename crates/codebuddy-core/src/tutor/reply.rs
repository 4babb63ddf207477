//! Turning a raw completion into a [`TutorReply`].
//!
//! In structured mode the completion should be a JSON object matching the
//! `TutorReply` schema. Anything that does not parse falls back to marker
//! scanning, so a provider that ignores `response_format` still works.

use codebuddy_types::llm::{OutputConfig, OutputFormat, OutputJsonSchema};
use codebuddy_types::tutor::{PromptMode, TutorReply};

use super::marker::extract_image_marker;

/// Build the structured output configuration for `TutorReply`.
pub fn tutor_reply_output_config() -> OutputConfig {
    OutputConfig {
        format: OutputFormat {
            type_field: "json_schema".to_string(),
            json_schema: OutputJsonSchema {
                name: "TutorReply".to_string(),
                schema: tutor_reply_schema(),
                strict: Some(true),
            },
        },
    }
}

/// JSON schema for `TutorReply` in strict form: every property required,
/// no additional properties, no `$schema` meta key.
pub fn tutor_reply_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(TutorReply);
    let mut value = serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({}));

    if let Some(obj) = value.as_object_mut() {
        obj.remove("$schema");
        let required: Vec<serde_json::Value> = obj
            .get("properties")
            .and_then(|p| p.as_object())
            .map(|props| {
                props
                    .keys()
                    .map(|k| serde_json::Value::String(k.clone()))
                    .collect()
            })
            .unwrap_or_default();
        obj.insert("required".to_string(), serde_json::Value::Array(required));
        obj.insert(
            "additionalProperties".to_string(),
            serde_json::Value::Bool(false),
        );
    }

    value
}

/// Resolve a raw completion into the visible answer and optional image query.
pub fn resolve_reply(raw: &str, mode: PromptMode) -> TutorReply {
    if mode == PromptMode::Structured {
        if let Some(reply) = parse_structured(raw) {
            return finish(reply.answer, normalize_query(reply.image_query));
        }
        tracing::debug!("structured reply did not parse, falling back to marker scan");
    }

    finish(raw.to_string(), None)
}

/// Strip any embedded marker; a structured query wins over a marker phrase.
fn finish(answer: String, image_query: Option<String>) -> TutorReply {
    match extract_image_marker(&answer) {
        Some(marker) => {
            let marker_query = marker.search_query().map(str::to_string);
            TutorReply {
                answer: marker.visible_text,
                image_query: image_query.or(marker_query),
            }
        }
        None => TutorReply {
            answer: answer.trim().to_string(),
            image_query,
        },
    }
}

fn parse_structured(raw: &str) -> Option<TutorReply> {
    let body = strip_code_fence(raw.trim());
    serde_json::from_str::<TutorReply>(body).ok()
}

/// Models sometimes wrap JSON in a ```json fence despite the schema.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn normalize_query(query: Option<String>) -> Option<String> {
    query
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
}
