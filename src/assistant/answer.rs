use super::{prompts::answer_prompt, types::ConversationTurn};
use crate::{
    Result,
    llm::{ChatCompletionRequest, ChatMessage, LlmClient},
};
use std::sync::Arc;
use tracing::debug;

pub struct AnswerGenerator {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl AnswerGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Natural-language answer, returned exactly as the model wrote it.
    pub async fn answer(
        &self,
        query: Option<&str>,
        previous_messages: &[ConversationTurn],
    ) -> Result<String> {
        let query = query.filter(|q| !q.trim().is_empty()).unwrap_or("none");

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(answer_prompt()),
                ChatMessage::user(format!(
                    "User query: {}. Previous conversation: {}.",
                    query,
                    ConversationTurn::render_all(previous_messages)
                )),
            ],
            response_format: None,
            max_tokens: None,
            temperature: None,
        };

        let response = self.llm.create_chat_completion(request).await?;
        let answer = response.first_content()?.to_string();
        debug!("Answer from assistant: {}", answer);

        Ok(answer)
    }
}
