mod answer;
pub mod decode;
mod intent;
mod orchestrator;
pub mod prompts;
mod suggest;
mod types;
mod vin;

pub use answer::AnswerGenerator;
pub use intent::IntentClassifier;
pub use orchestrator::{Assistant, COMBINED_INPUT_SEPARATOR, combine_search_input};
pub use suggest::QuestionSuggester;
pub use types::*;
pub use vin::{VinExtractor, encode_png_data_url};
