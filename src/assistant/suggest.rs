use super::{
    decode::decode_suggestions,
    prompts::SUGGEST_QUESTIONS_PROMPT,
    types::{ConversationTurn, SuggestedQuestions},
};
use crate::{
    Result,
    llm::{ChatCompletionRequest, ChatMessage, LlmClient, ResponseFormat},
};
use std::sync::Arc;
use tracing::debug;

pub struct QuestionSuggester {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl QuestionSuggester {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    pub async fn suggest(
        &self,
        query: Option<&str>,
        previous_messages: &[ConversationTurn],
    ) -> Result<SuggestedQuestions> {
        let history = ConversationTurn::render_all(previous_messages);
        let user_message = match query.filter(|q| !q.trim().is_empty()) {
            Some(query) => format!(
                "Original user query: {}.\nPrevious conversation: {}\nSuggest questions as JSON object, as specified.",
                query, history
            ),
            None => format!(
                "No query provided yet.\nPrevious conversation: {}\nSuggest a basic first question about my vehicle or my VIN as JSON object, as specified.",
                history
            ),
        };

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SUGGEST_QUESTIONS_PROMPT),
                ChatMessage::user(user_message),
            ],
            response_format: Some(ResponseFormat::JsonObject),
            max_tokens: None,
            temperature: None,
        };

        let response = self.llm.create_chat_completion(request).await?;
        let content = response.first_content()?;
        debug!("Suggested questions: {}", content);

        decode_suggestions(content)
    }
}
