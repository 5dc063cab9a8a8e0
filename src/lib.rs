pub mod core;

pub use crate::core::errors::{CoreError, ScoringError};
pub use crate::core::gemini::{GeminiScorer, RemoteScorer};
pub use crate::core::keyword_matcher::{fallback_match, tokenize};
pub use crate::core::models::{DocumentText, MatchResult, ResumeUpload};
pub use crate::core::service::MatcherService;
pub use crate::core::session::MatchSession;
pub use crate::core::text_normalizer::clean_text;
