use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::errors::ScoringError;
use super::models::{AiAssessment, MatcherSettings};
use super::prompts::{build_match_prompt, FIT_LABELS};

static JSON_BLOCK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());
static KEYWORD_DELIMITER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[;,|]").unwrap());

/// Anything that can grade a resume against a job description.
#[async_trait]
pub trait RemoteScorer: Send + Sync {
    async fn score(
        &self,
        job_description: &str,
        resume_text: &str,
    ) -> Result<AiAssessment, ScoringError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiScorer {
    client: Client,
    api_key: String,
    model: String,
    api_base_url: String,
}

impl GeminiScorer {
    pub fn new(client: Client, settings: &MatcherSettings, api_key: String) -> Self {
        Self {
            client,
            api_key,
            model: settings.model.clone(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one prompt and returns the concatenated text of the first candidate.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, ScoringError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base_url, self.model
        );
        let payload = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ScoringError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = candidate_text(&body)?;
        debug!(model = %self.model, chars = text.len(), "gemini response received");
        Ok(text)
    }
}

#[async_trait]
impl RemoteScorer for GeminiScorer {
    async fn score(
        &self,
        job_description: &str,
        resume_text: &str,
    ) -> Result<AiAssessment, ScoringError> {
        let prompt = build_match_prompt(job_description, resume_text);
        let text = self.generate_content(&prompt).await?;
        parse_assessment(&text)
    }
}

fn candidate_text(body: &str) -> Result<String, ScoringError> {
    let parsed =
        serde_json::from_str::<GenerateContentResponse>(body).map_err(|_| ScoringError::NotJson)?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ScoringError::EmptyContent);
    }

    Ok(text)
}

/// Turns raw model output into an assessment, or reports why it is unusable.
pub fn parse_assessment(text: &str) -> Result<AiAssessment, ScoringError> {
    let object = parse_json_object(text)?;

    let score = match object.get("matchScore") {
        None | Some(Value::Null) => return Err(ScoringError::MissingField("matchScore")),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| ScoringError::InvalidScore(n.to_string()))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ScoringError::InvalidScore(s.clone()))?,
        Some(other) => return Err(ScoringError::InvalidScore(other.to_string())),
    };
    if !score.is_finite() {
        return Err(ScoringError::InvalidScore(score.to_string()));
    }

    Ok(AiAssessment {
        score: score.round().clamp(0.0, 100.0) as u8,
        matched_keywords: keyword_list(&object, "matchedKeywords")?,
        missing_keywords: keyword_list(&object, "missingKeywords")?,
        summary: summary_text(&object)?,
        overall_fit: fit_label(&object)?,
    })
}

fn parse_json_object(text: &str) -> Result<Map<String, Value>, ScoringError> {
    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(text.trim()) {
        return Ok(object);
    }

    // Models sometimes wrap the object in prose or code fences.
    let block = JSON_BLOCK_RE.find(text).ok_or(ScoringError::NotJson)?;
    match serde_json::from_str::<Value>(block.as_str()) {
        Ok(Value::Object(object)) => Ok(object),
        _ => Err(ScoringError::NotJson),
    }
}

fn keyword_list(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, ScoringError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(ScoringError::MissingField(field)),
        Some(Value::Array(items)) => Ok(items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()),
        Some(Value::String(s)) => Ok(KEYWORD_DELIMITER_RE
            .split(s)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()),
        Some(_) => Err(ScoringError::InvalidField(field)),
    }
}

fn summary_text(object: &Map<String, Value>) -> Result<String, ScoringError> {
    match object.get("shortSummary") {
        None | Some(Value::Null) => Err(ScoringError::MissingField("shortSummary")),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(ScoringError::InvalidField("shortSummary")),
    }
}

/// Accepts one of the prompt's labels, ignoring case, and returns its canonical spelling.
fn fit_label(object: &Map<String, Value>) -> Result<String, ScoringError> {
    let raw = match object.get("overallFit") {
        None | Some(Value::Null) => return Err(ScoringError::MissingField("overallFit")),
        Some(Value::String(s)) => s.trim(),
        Some(other) => return Err(ScoringError::InvalidFit(other.to_string())),
    };

    FIT_LABELS
        .iter()
        .find(|label| label.eq_ignore_ascii_case(raw))
        .map(|label| label.to_string())
        .ok_or_else(|| ScoringError::InvalidFit(raw.to_string()))
}
