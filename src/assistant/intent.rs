use super::{
    decode::decode_as,
    prompts::INTENT_PROMPT,
    types::{UserIntent, VehicleInformation},
};
use crate::{
    Result,
    llm::{ChatCompletionRequest, ChatMessage, LlmClient, ResponseFormat},
};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct IntentClassifier {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl IntentClassifier {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Returns the model's JSON reply as text, shaped like
    /// `{intent, query, vin_information, expanded_query}`.
    pub async fn classify(
        &self,
        query: &str,
        vehicle: Option<&VehicleInformation>,
    ) -> Result<String> {
        let context = match vehicle {
            Some(info) => serde_json::to_string(info)?,
            None => "none".to_string(),
        };

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(INTENT_PROMPT),
                ChatMessage::user(format!(
                    "User query: {}. Provided VIN information as context: {}\nReturn as JSON object.",
                    query, context
                )),
            ],
            response_format: Some(ResponseFormat::JsonObject),
            max_tokens: None,
            temperature: None,
        };

        let response = self.llm.create_chat_completion(request).await?;
        let intent = response.first_content()?.to_string();
        debug!("Intent response: {}", intent);

        // Returned verbatim either way; a mismatch is only worth a log line.
        if let Err(e) = decode_as::<UserIntent>(&intent) {
            warn!("Intent reply does not match the expected shape: {}", e);
        }

        Ok(intent)
    }
}
