//! Strict decoding of JSON embedded in model replies.
//!
//! Replies may wrap the object in markdown fences or surround it with prose.
//! Only `serde_json` ever interprets the text.

use super::types::{QuestionOption, SuggestedQuestions, VehicleInformation};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const MAX_SUGGESTED_QUESTIONS: usize = 4;

/// Removes a surrounding ```` ``` ```` / ```` ```json ```` fence, if any.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `JSON`, ...) up to the first newline.
    let body = match rest.find('\n') {
        Some(newline) if rest[..newline].chars().all(|c| c.is_ascii_alphanumeric()) => {
            &rest[newline + 1..]
        }
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Extracts and parses the JSON object contained in a model reply.
pub fn decode_json_object(text: &str) -> Result<Value> {
    let body = strip_code_fences(text);
    if body.is_empty() {
        return Err(Error::parse("model returned an empty reply"));
    }

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(body) {
        return Ok(value);
    }

    // Fall back to the outermost braces when the object is wrapped in prose.
    let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) else {
        return Err(Error::parse("model reply does not contain a JSON object"));
    };
    if end < start {
        return Err(Error::parse("model reply does not contain a JSON object"));
    }
    match serde_json::from_str::<Value>(&body[start..=end]) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(Error::parse("model reply JSON is not an object")),
        Err(e) => Err(Error::parse(format!("model reply is not valid JSON: {}", e))),
    }
}

pub fn decode_as<T: DeserializeOwned>(text: &str) -> Result<T> {
    let value = decode_json_object(text)?;
    serde_json::from_value(value)
        .map_err(|e| Error::parse(format!("unexpected JSON shape: {}", e)))
}

/// Decodes the VIN extraction reply. A reply with `status: "error"` becomes
/// [`Error::Recognition`] carrying the model's message.
pub fn decode_vehicle_information(text: &str) -> Result<VehicleInformation> {
    let value = decode_json_object(text)?;

    if value.get("status").and_then(Value::as_str) == Some("error") {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("VIN could not be identified");
        return Err(Error::recognition(message));
    }

    serde_json::from_value(value)
        .map_err(|e| Error::parse(format!("unexpected vehicle information shape: {}", e)))
}

/// Decodes suggested questions, keeping at most four and making sure every
/// option list ends with a free-text entry.
pub fn decode_suggestions(text: &str) -> Result<SuggestedQuestions> {
    let mut suggestions: SuggestedQuestions = decode_as(text)?;
    enforce_suggestion_rules(&mut suggestions);
    Ok(suggestions)
}

pub fn enforce_suggestion_rules(suggestions: &mut SuggestedQuestions) {
    suggestions
        .suggested_questions
        .retain(|q| !q.question_text.trim().is_empty());
    suggestions
        .suggested_questions
        .truncate(MAX_SUGGESTED_QUESTIONS);

    for question in &mut suggestions.suggested_questions {
        let ends_with_free_text = question
            .question_options
            .last()
            .is_some_and(QuestionOption::is_free_text);
        if !ends_with_free_text {
            question.question_options.push(QuestionOption::free_text());
        }
    }
}
