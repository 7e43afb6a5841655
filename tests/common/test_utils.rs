use super::mocks::MockLlmClient;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use daparto_assistant::{
    assistant::Assistant,
    config::{Config, LlmConfig, ServerConfig},
    server::{self, handlers::AppState},
};
use image::{ImageBuffer, ImageFormat, Rgb};
use serde_json::Value;
use std::{io::Cursor, sync::Arc};

pub const VISION_MODEL: &str = "test-vision";
pub const INTENT_MODEL: &str = "test-intent";
pub const ANSWER_MODEL: &str = "test-answer";
pub const SUGGESTION_MODEL: &str = "test-suggest";

pub const BOUNDARY: &str = "daparto-test-boundary";

pub const VIN_SUCCESS_REPLY: &str = r#"```json
{
  "status": "success",
  "overview": "2017 Volkswagen Jetta 1.4 TSI sedan",
  "make": "Volkswagen",
  "model": "Jetta",
  "model_year": "2017",
  "engine": "1.4L TSI",
  "assembly_plant": "Puebla, Mexico",
  "serial_number": "123456",
  "vin": "3VWDB7AJ5HM123456"
}
```"#;

pub const VIN_ERROR_REPLY: &str =
    r#"{"status": "error", "message": "Vin is not correctly identified and may be wrong."}"#;

pub const INTENT_REPLY: &str = r#"{"intent": "searching_for_a_part", "query": "brake pad for my Jetta", "vin_information": null, "expanded_query": "front brake pads for a Volkswagen Jetta"}"#;

pub const ANSWER_REPLY: &str = "You asked for brake pads for your Jetta. Part 1K0698151 fits: https://www.daparto.de/Teilenummernsuche/Teile/Alle-Hersteller/1K0698151?ref=fulltext";

pub const SUGGESTIONS_REPLY: &str = r#"{
  "suggested_questions": [
    {"question_text": "I need to provide the model year of my Jetta.", "question_options": ["2015", "2016", "2017", "free text"]},
    {"question_text": "I can upload a photo of my VIN.", "question_options": [{"VIN_number": "free text", "VIN_image": "File Upload", "Free_text": "free text"}]}
  ]
}"#;

pub fn create_test_llm_config() -> LlmConfig {
    LlmConfig {
        api_key: "test-api-key".to_string(),
        vision_model: VISION_MODEL.to_string(),
        intent_model: INTENT_MODEL.to_string(),
        answer_model: ANSWER_MODEL.to_string(),
        suggestion_model: SUGGESTION_MODEL.to_string(),
        ..LlmConfig::default()
    }
}

pub fn create_test_config() -> Config {
    Config {
        llm: create_test_llm_config(),
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            ..ServerConfig::default()
        },
    }
}

pub fn create_assistant(mock: Arc<MockLlmClient>) -> Assistant {
    Assistant::new(mock, &create_test_llm_config())
}

pub fn create_test_app(mock: Arc<MockLlmClient>) -> Router {
    create_test_app_with(mock, &create_test_config())
}

pub fn create_test_app_with(mock: Arc<MockLlmClient>, config: &Config) -> Router {
    let state = AppState {
        assistant: Arc::new(Assistant::new(mock, &config.llm)),
    };
    server::router(state, &config.server).unwrap()
}

pub fn sample_image(format: ImageFormat) -> Vec<u8> {
    let img = ImageBuffer::from_pixel(8, 8, Rgb([20u8, 40, 200]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

pub fn sample_png() -> Vec<u8> {
    sample_image(ImageFormat::Png)
}

/// One part of a hand-built multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
