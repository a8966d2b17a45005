//! Error handling for the job tailor application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobTailorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid title rule: {0}")]
    Rule(#[from] regex::Error),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("PDF rendering error: {0}")]
    Pdf(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, JobTailorError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for JobTailorError {
    fn from(err: anyhow::Error) -> Self {
        JobTailorError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_error_converts_to_rule() {
        let err: JobTailorError = regex::Regex::new(r"\b(ai").unwrap_err().into();
        assert!(matches!(err, JobTailorError::Rule(_)));
        assert!(err.to_string().starts_with("Invalid title rule"));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: JobTailorError = anyhow::anyhow!("bad jobs file").into();
        assert_eq!(err.to_string(), "Invalid input: bad jobs file");
    }
}
