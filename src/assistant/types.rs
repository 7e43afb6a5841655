use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Vehicle attributes read off a VIN plate or registration photo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleInformation {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub model_year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub assembly_plant: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Any further keys the model chose to report.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accepts any scalar; the model is loose about `model_year`.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

impl VehicleInformation {
    /// Short text used as search context for the later steps.
    pub fn summary(&self) -> String {
        fn field(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("unknown")
        }

        format!(
            "Vehicle overview: {} Vehicle Make: {} Vehicle Model: {}",
            field(&self.overview),
            field(&self.make),
            field(&self.model)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIntent {
    pub intent: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub vin_information: Option<Value>,
    #[serde(default)]
    pub expanded_query: Option<String>,
}

/// A selectable answer to a suggested question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionOption {
    Text(String),
    /// Named inputs, e.g. `{"VIN_number": "free text", "VIN_image": "File Upload"}`.
    Fields(Map<String, Value>),
}

pub const FREE_TEXT_OPTION: &str = "free text";

impl QuestionOption {
    pub fn free_text() -> Self {
        Self::Text(FREE_TEXT_OPTION.to_string())
    }

    pub fn is_free_text(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().eq_ignore_ascii_case(FREE_TEXT_OPTION),
            Self::Fields(fields) => fields
                .keys()
                .any(|key| key.eq_ignore_ascii_case("free_text")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedQuestion {
    pub question_text: String,
    #[serde(default, deserialize_with = "lenient_options")]
    pub question_options: Vec<QuestionOption>,
}

/// Scalars become text options, `null` entries are dropped and a missing
/// list is empty.
fn lenient_options<'de, D>(deserializer: D) -> std::result::Result<Vec<QuestionOption>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            Value::Null => None,
            Value::String(text) => Some(QuestionOption::Text(text)),
            Value::Object(fields) => Some(QuestionOption::Fields(fields)),
            other => Some(QuestionOption::Text(other.to_string())),
        })
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestedQuestions {
    #[serde(default)]
    pub suggested_questions: Vec<SuggestedQuestion>,
}

/// One entry of prior conversation, forwarded to the model untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationTurn(pub Value);

impl ConversationTurn {
    /// Parses form-encoded history: a JSON array becomes one turn per element,
    /// anything else is kept as a single opaque turn.
    pub fn parse_history(raw: &str) -> Vec<ConversationTurn> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Vec::new();
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(turns)) => turns.into_iter().map(ConversationTurn).collect(),
            Ok(Value::Null) => Vec::new(),
            Ok(other) => vec![ConversationTurn(other)],
            Err(_) => vec![ConversationTurn(Value::String(raw.to_string()))],
        }
    }

    /// Renders history for inclusion in a prompt.
    pub fn render_all(turns: &[ConversationTurn]) -> String {
        if turns.is_empty() {
            return "none".to_string();
        }
        serde_json::to_string(turns).unwrap_or_else(|_| "none".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Maps a declared content type onto the allow-list.
    pub fn from_content_type(content_type: &str) -> Result<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/png" => Ok(Self::Png),
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            _ => Err(Error::invalid_input(
                "Invalid file type. Only PNG and JPEG images are supported.",
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Input of one orchestrated assistant call.
#[derive(Debug, Clone, Default)]
pub struct AssistantRequest {
    pub image: Option<UploadedImage>,
    pub search_string: Option<String>,
    pub previous_messages: Vec<ConversationTurn>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantResponse {
    pub assistant_answer: Option<String>,
    pub intent: Option<String>,
    pub suggested_questions: Vec<SuggestedQuestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_information: Option<VehicleInformation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin_error: Option<String>,
}
