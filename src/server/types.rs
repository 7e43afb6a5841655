use crate::assistant::ConversationTurn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `/suggest-questions/` and `/find-answer/`.
#[derive(Debug, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<Vec<Value>>,
    #[serde(default)]
    pub previous_messages: Option<Vec<ConversationTurn>>,
}

impl QueryRequest {
    /// The query records as prompt text, or `None` when there are none.
    pub fn query_text(&self) -> Option<String> {
        self.query
            .as_ref()
            .filter(|records| !records.is_empty())
            .and_then(|records| serde_json::to_string(records).ok())
    }

    pub fn history(&self) -> &[ConversationTurn] {
        self.previous_messages.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
