use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Gemini API key is not configured. Save a key or set GEMINI_API_KEY first.")]
    MissingApiKey,
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("Parse error in {file_name}: {message}")]
    Parse { file_name: String, message: String },
    #[error("No valid resumes processed.")]
    NoValidResumes,
    #[error("No shortlist data to export.")]
    EmptyShortlist,
}

impl CoreError {
    /// Validation failures are reported to the user before any work starts.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidRequest(_) | CoreError::MissingApiKey | CoreError::NoValidResumes
        )
    }
}

/// Failures of the remote scorer. Every variant is recovered by the keyword fallback.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini API request failed with status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("model returned no text content")]
    EmptyContent,
    #[error("model output is not a JSON object")]
    NotJson,
    #[error("model output is missing field {0}")]
    MissingField(&'static str),
    #[error("model output has a non-numeric score: {0}")]
    InvalidScore(String),
    #[error("model output has a wrongly typed field {0}")]
    InvalidField(&'static str),
    #[error("model output has an unknown overallFit label: {0}")]
    InvalidFit(String),
}
