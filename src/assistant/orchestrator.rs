use super::{
    answer::AnswerGenerator,
    intent::IntentClassifier,
    suggest::QuestionSuggester,
    types::{
        AssistantRequest, AssistantResponse, ConversationTurn, ImageKind, SuggestedQuestions,
    },
    vin::VinExtractor,
};
use crate::{Error, Result, config::LlmConfig, llm::LlmClient};
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

pub const COMBINED_INPUT_SEPARATOR: &str = " AND ";

/// Runs VIN extraction, intent classification, answering and question
/// suggestion for one request, strictly in that order.
pub struct Assistant {
    vin: VinExtractor,
    intent: IntentClassifier,
    answers: AnswerGenerator,
    suggestions: QuestionSuggester,
}

impl Assistant {
    pub fn new(llm: Arc<dyn LlmClient>, config: &LlmConfig) -> Self {
        Self {
            vin: VinExtractor::new(llm.clone(), config.vision_model.clone()),
            intent: IntentClassifier::new(llm.clone(), config.intent_model.clone()),
            answers: AnswerGenerator::new(llm.clone(), config.answer_model.clone()),
            suggestions: QuestionSuggester::new(llm, config.suggestion_model.clone()),
        }
    }

    pub async fn run(&self, request: AssistantRequest) -> Result<AssistantResponse> {
        // Blank input counts as absent, but the text is forwarded as given.
        let search_string = request
            .search_string
            .as_deref()
            .filter(|s| !s.trim().is_empty());

        if request.image.is_none() && search_string.is_none() {
            return Err(Error::invalid_input(
                "You must provide either an image or a search string.",
            ));
        }
        if let Some(image) = &request.image {
            ImageKind::from_content_type(&image.content_type)?;
        }

        let span = info_span!("assistant", request_id = %Uuid::new_v4());
        async {
            info!(
                "Processing request: image={}, search_string={}, previous_messages={}",
                request.image.is_some(),
                search_string.is_some(),
                request.previous_messages.len()
            );

            let mut combined_search_input = String::new();
            let mut vehicle_information = None;
            let mut vin_error = None;

            if let Some(image) = &request.image {
                match self.vin.extract(image).await {
                    Ok(info) => {
                        combined_search_input.push_str(&info.summary());
                        vehicle_information = Some(info);
                    }
                    Err(Error::Recognition(message)) => {
                        warn!("VIN not recognised, continuing without vehicle context");
                        vin_error = Some(message);
                    }
                    Err(e) if search_string.is_none() => return Err(e),
                    Err(e) => {
                        warn!("VIN extraction failed, continuing with search string: {}", e);
                        vin_error = Some(e.to_string());
                    }
                }
            }

            let mut intent = None;
            if let Some(query) = search_string {
                match self.intent.classify(query, vehicle_information.as_ref()).await {
                    Ok(classified) => intent = Some(classified),
                    Err(e) => error!("Intent classification failed: {}", e),
                }
                let text = intent.as_deref().unwrap_or(query);
                combined_search_input = combine_search_input(&combined_search_input, text);
            }

            let assistant_answer = match self
                .answers
                .answer(search_string, &request.previous_messages)
                .await
            {
                Ok(answer) => Some(answer),
                Err(e) => {
                    error!("Answer generation failed: {}", e);
                    None
                }
            };

            let suggested_questions = match self
                .suggest_questions(Some(combined_search_input.as_str()), &request.previous_messages)
                .await
            {
                Ok(suggestions) => suggestions.suggested_questions,
                Err(e) => {
                    error!("Question suggestion failed: {}", e);
                    Vec::new()
                }
            };

            info!(
                "Request complete: answer={}, intent={}, {} suggested questions",
                assistant_answer.is_some(),
                intent.is_some(),
                suggested_questions.len()
            );

            Ok(AssistantResponse {
                assistant_answer,
                intent,
                suggested_questions,
                vehicle_information,
                vin_error,
            })
        }
        .instrument(span)
        .await
    }

    pub async fn find_answer(
        &self,
        query: Option<&str>,
        previous_messages: &[ConversationTurn],
    ) -> Result<String> {
        self.answers.answer(query, previous_messages).await
    }

    pub async fn suggest_questions(
        &self,
        query: Option<&str>,
        previous_messages: &[ConversationTurn],
    ) -> Result<SuggestedQuestions> {
        self.suggestions.suggest(query, previous_messages).await
    }
}

/// Joins the image summary and the intent text with `" AND "` when both exist.
pub fn combine_search_input(image_summary: &str, intent: &str) -> String {
    if image_summary.is_empty() {
        intent.to_string()
    } else {
        format!("{}{}{}", image_summary, COMBINED_INPUT_SEPARATOR, intent)
    }
}
