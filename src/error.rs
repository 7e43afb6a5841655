use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("VIN recognition failed: {0}")]
    Recognition(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("OpenAI error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn recognition(msg: impl Into<String>) -> Self {
        Self::Recognition(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status reported to clients for this error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::Image(_) => StatusCode::BAD_REQUEST,
            Self::Recognition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream(_) | Self::Parse(_) | Self::Network(_) | Self::OpenAi(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether a call that failed with this error may succeed when repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::OpenAi(async_openai::error::OpenAIError::Reqwest(e)) => {
                e.is_timeout() || e.is_connect()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_codes_by_kind() {
        assert_eq!(
            Error::invalid_input("no file").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::recognition("unreadable").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::upstream("500").status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(Error::parse("not json").status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            Error::config("missing key").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_local_errors_are_not_retryable() {
        assert!(!Error::invalid_input("x").is_retryable());
        assert!(!Error::parse("x").is_retryable());
        assert!(!Error::upstream("x").is_retryable());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::recognition("VIN is blurry").to_string(),
            "VIN recognition failed: VIN is blurry"
        );
        assert_eq!(
            Error::invalid_input("bad type").to_string(),
            "Invalid input: bad type"
        );
    }
}
