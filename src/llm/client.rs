use super::types::*;
use crate::{Error, Result, config::LlmConfig};
use async_openai::{Client, config::OpenAIConfig, types as openai_types};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;
}

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    default_model: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key.clone());

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url.clone());
        }

        let mut http = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            http = http.timeout(Duration::from_secs(config.timeout_secs));
        }

        // Retries are driven by `max_retries` below, so the client's own backoff is off.
        let no_backoff = backoff::ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        let client = Client::with_config(openai_config)
            .with_http_client(http.build()?)
            .with_backoff(no_backoff);

        Ok(Self {
            client,
            default_model: config.answer_model.clone(),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    fn build_request(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<openai_types::CreateChatCompletionRequest> {
        let mut messages = Vec::new();
        for msg in &request.messages {
            messages.push(msg.to_openai_message()?);
        }

        let model = if request.model.is_empty() {
            self.default_model.as_str()
        } else {
            request.model.as_str()
        };

        let mut request_builder = openai_types::CreateChatCompletionRequestArgs::default();
        request_builder.model(model).messages(messages);

        if let Some(temperature) = request.temperature {
            request_builder.temperature(temperature);
        }

        if let Some(format) = request.response_format {
            request_builder.response_format(openai_types::ResponseFormat::from(format));
        }

        if let Some(max_tokens) = request.max_tokens {
            request_builder.max_tokens(max_tokens as u32);
        }

        Ok(request_builder.build()?)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        debug!(
            "Creating chat completion with {} messages",
            request.messages.len()
        );

        let openai_request = self.build_request(request)?;

        let mut attempt = 0;
        let response = loop {
            match self.client.chat().create(openai_request.clone()).await {
                Ok(response) => break response,
                Err(e) => {
                    let err = Error::from(e);
                    if attempt >= self.max_retries || !err.is_retryable() {
                        return Err(err);
                    }
                    attempt += 1;
                    warn!(
                        "Chat completion failed (attempt {}/{}): {}",
                        attempt,
                        self.max_retries + 1,
                        err
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
            }
        };

        debug!(
            "Received chat completion response with {} choices",
            response.choices.len()
        );

        let choices: Vec<Choice> = response
            .choices
            .into_iter()
            .map(|choice| Choice {
                index: choice.index,
                message: ChatMessage::assistant(choice.message.content.unwrap_or_default()),
                finish_reason: choice.finish_reason.map(|fr| format!("{fr:?}")),
            })
            .collect();

        let usage = response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatCompletionResponse {
            id: response.id,
            model: response.model,
            choices,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageContent,
    };
    use pretty_assertions::assert_eq;

    fn create_test_config() -> LlmConfig {
        LlmConfig {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: "test-api-key".to_string(),
            ..LlmConfig::default()
        }
    }

    fn request(model: &str, messages: Vec<ChatMessage>) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: model.to_string(),
            messages,
            response_format: None,
            max_tokens: None,
            temperature: None,
        }
    }

    #[test]
    fn test_openai_client_creation() {
        let client = OpenAiClient::new(&create_test_config()).unwrap();
        assert_eq!(client.default_model, "gpt-4o");
        assert_eq!(client.max_retries, 0);
    }

    #[test]
    fn test_empty_model_falls_back_to_default() {
        let client = OpenAiClient::new(&create_test_config()).unwrap();
        let built = client
            .build_request(request("", vec![ChatMessage::user("hi")]))
            .unwrap();
        assert_eq!(built.model, "gpt-4o");

        let built = client
            .build_request(request("gpt-4o-mini", vec![ChatMessage::user("hi")]))
            .unwrap();
        assert_eq!(built.model, "gpt-4o-mini");
    }

    #[test]
    fn test_json_response_format_is_forwarded() {
        let client = OpenAiClient::new(&create_test_config()).unwrap();
        let mut req = request("gpt-4o-mini", vec![ChatMessage::user("hi")]);
        req.response_format = Some(ResponseFormat::JsonObject);

        let built = client.build_request(req).unwrap();
        assert!(matches!(
            built.response_format,
            Some(openai_types::ResponseFormat::JsonObject)
        ));
    }

    #[test]
    fn test_chat_message_to_openai_system() {
        let openai_msg = ChatMessage::system("You are DAPARTO Assistant")
            .to_openai_message()
            .unwrap();
        assert!(matches!(
            openai_msg,
            ChatCompletionRequestMessage::System(_)
        ));
    }

    #[test]
    fn test_user_message_with_image_uses_content_parts() {
        let openai_msg = ChatMessage::user("Read the VIN")
            .with_image("data:image/png;base64,AAAA")
            .to_openai_message()
            .unwrap();

        match openai_msg {
            ChatCompletionRequestMessage::User(user) => match user.content {
                ChatCompletionRequestUserMessageContent::Array(parts) => {
                    assert_eq!(parts.len(), 2)
                }
                other => panic!("expected content parts, got {:?}", other),
            },
            other => panic!("expected user message, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_user_message_is_text() {
        let openai_msg = ChatMessage::user("Hello").to_openai_message().unwrap();
        match openai_msg {
            ChatCompletionRequestMessage::User(user) => assert!(matches!(
                user.content,
                ChatCompletionRequestUserMessageContent::Text(_)
            )),
            other => panic!("expected user message, got {:?}", other),
        }
    }

    #[test]
    fn test_chat_message_invalid_role() {
        let msg = ChatMessage {
            role: "tool".to_string(),
            content: "This should fail".to_string(),
            images: Vec::new(),
        };

        let result = msg.to_openai_message();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Unknown message role")
        );
    }

    #[test]
    fn test_first_content_requires_a_choice() {
        let response = ChatCompletionResponse {
            id: "chatcmpl-1".to_string(),
            model: "gpt-4o".to_string(),
            choices: vec![],
            usage: None,
        };
        assert!(matches!(response.first_content(), Err(Error::Upstream(_))));
    }
}
