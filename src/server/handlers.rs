use super::types::{ErrorResponse, QueryRequest, WelcomeResponse};
use crate::{
    Error,
    assistant::{
        Assistant, AssistantRequest, AssistantResponse, ConversationTurn, SuggestedQuestions,
        UploadedImage,
    },
};
use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn error_response(e: Error) -> HandlerError {
    let status = e.status_code();
    if status.is_server_error() {
        error!("Request failed: {}", e);
    } else {
        warn!("Request rejected: {}", e);
    }
    (status, Json(ErrorResponse {
        error: e.to_string(),
    }))
}

fn multipart_error(e: MultipartError) -> HandlerError {
    warn!("Malformed multipart request: {}", e);
    (e.status(), Json(ErrorResponse {
        error: e.body_text(),
    }))
}

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to DAPARTO Assistant!".to_string(),
    })
}

pub async fn daparto_assistant(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AssistantResponse>, HandlerError> {
    let request = read_assistant_form(multipart).await?;
    info!(
        "Received assistant request (image: {}, search string: {})",
        request.image.is_some(),
        request.search_string.is_some()
    );

    state
        .assistant
        .run(request)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn read_assistant_form(mut multipart: Multipart) -> Result<AssistantRequest, HandlerError> {
    let mut request = AssistantRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty part when no file was chosen.
                if filename.as_deref().unwrap_or_default().is_empty() && bytes.is_empty() {
                    continue;
                }
                request.image = Some(UploadedImage {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "search_string" => {
                let text = field.text().await.map_err(multipart_error)?;
                request.search_string = Some(text);
            }
            "previous_messages" => {
                let text = field.text().await.map_err(multipart_error)?;
                request.previous_messages = ConversationTurn::parse_history(&text);
            }
            other => warn!("Ignoring unexpected form field: {}", other),
        }
    }

    Ok(request)
}

pub async fn suggest_questions(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<SuggestedQuestions>, HandlerError> {
    let query = request.query_text();
    state
        .assistant
        .suggest_questions(query.as_deref(), request.history())
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn find_answer(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<String>, HandlerError> {
    let query = request.query_text();
    state
        .assistant
        .find_answer(query.as_deref(), request.history())
        .await
        .map(Json)
        .map_err(error_response)
}
