use async_trait::async_trait;
use daparto_assistant::{
    Error, Result,
    llm::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, LlmClient},
};
use std::sync::{Arc, Mutex};

/// Replies handed out in call order; `Err` entries simulate upstream failures.
type MockReply = std::result::Result<String, String>;

/// Mock LLM client for testing
#[derive(Debug, Default)]
pub struct MockLlmClient {
    pub replies: Arc<Mutex<Vec<MockReply>>>,
    pub requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, content: &str) -> Self {
        self.replies.lock().unwrap().push(Ok(content.to_string()));
        self
    }

    pub fn with_failure(self, error: &str) -> Self {
        self.replies.lock().unwrap().push(Err(error.to_string()));
        self
    }

    pub fn get_requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Models used, in call order.
    pub fn models(&self) -> Vec<String> {
        self.get_requests().into_iter().map(|r| r.model).collect()
    }

    /// Content of the last message of the `index`-th call.
    pub fn user_message(&self, index: usize) -> String {
        self.get_requests()[index]
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.requests.lock().unwrap().push(request);

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(Error::upstream("No more mock responses available"));
        }

        match replies.remove(0) {
            Ok(content) => Ok(create_mock_chat_response(&content)),
            Err(error) => Err(Error::upstream(error)),
        }
    }
}

pub fn create_mock_chat_response(content: &str) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: "test-id".to_string(),
        model: "test-model".to_string(),
        choices: vec![Choice {
            index: 0,
            message: ChatMessage::assistant(content),
            finish_reason: Some("stop".to_string()),
        }],
        usage: None,
    }
}
