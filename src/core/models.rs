use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Plain text extracted from one uploaded document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentText {
    pub file_name: String,
    pub text: String,
    pub size: u64,
    pub mime_type: String,
}

/// Raw bytes of a resume handed to the parser, with the type reported by the caller if any.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

impl ResumeUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Unique normalized tokens in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    tokens: Vec<String>,
    index: HashSet<String>,
}

impl KeywordSet {
    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut set = Self::default();
        for token in tokens {
            if set.index.insert(token.clone()) {
                set.tokens.push(token);
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FallbackMatch {
    pub score: u8,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// A usable answer from the remote scorer, already normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AiAssessment {
    pub score: u8,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub summary: String,
    pub overall_fit: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Ai,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub candidate: String,
    pub score: u8,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub summary: String,
    pub recommendation: String,
    pub source: ScoreSource,
}

/// One CSV line of the exported shortlist.
#[derive(Debug, Clone, Serialize)]
pub struct ShortlistRow {
    #[serde(rename = "Candidate")]
    pub candidate: String,
    #[serde(rename = "Score")]
    pub score: u8,
    #[serde(rename = "Matched_Keywords")]
    pub matched_keywords: String,
    #[serde(rename = "Missing_Keywords")]
    pub missing_keywords: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Recommendation")]
    pub recommendation: String,
}

impl From<&MatchResult> for ShortlistRow {
    fn from(result: &MatchResult) -> Self {
        Self {
            candidate: result.candidate.clone(),
            score: result.score,
            matched_keywords: result.matched_keywords.join(" | "),
            missing_keywords: result.missing_keywords.join(" | "),
            summary: result.summary.clone(),
            recommendation: result.recommendation.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDocument {
    pub file_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingPassSummary {
    pub scored: usize,
    pub fallback_count: usize,
    pub skipped: Vec<SkippedDocument>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_seconds: f64,
}

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_TABLE_KEYWORD_LIMIT: usize = 30;

/// Runtime knobs for one invocation. Supplied by flags or environment, never written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherSettings {
    pub model: String,
    pub api_base_url: String,
    pub request_timeout_seconds: u64,
    pub table_keyword_limit: usize,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            table_keyword_limit: DEFAULT_TABLE_KEYWORD_LIMIT,
        }
    }
}

impl MatcherSettings {
    pub fn sanitized(self) -> Self {
        Self {
            model: non_blank_or(self.model, DEFAULT_MODEL),
            api_base_url: non_blank_or(
                self.api_base_url.trim_end_matches('/').to_string(),
                DEFAULT_API_BASE_URL,
            ),
            request_timeout_seconds: self.request_timeout_seconds.max(1),
            table_keyword_limit: self.table_keyword_limit.max(1),
        }
    }
}

fn non_blank_or(value: String, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}
