use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{FallbackMatch, KeywordSet};

/// Only the first tokens of a document take part in matching.
pub const MAX_TOKENS: usize = 400;
pub const MIN_TOKEN_LEN: usize = 3;

static DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9+#.\-\s]").unwrap());

pub fn tokenize(text: &str) -> KeywordSet {
    let lowered = text.to_lowercase();
    let cleaned = DISALLOWED_RE.replace_all(&lowered, " ");

    KeywordSet::from_tokens(
        cleaned
            .split_whitespace()
            .filter(|token| token.len() >= MIN_TOKEN_LEN)
            .take(MAX_TOKENS)
            .map(str::to_string),
    )
}

/// Scores how many job-description keywords appear in the resume.
///
/// Resume-only tokens do not affect the score. An empty job description scores 0.
pub fn fallback_match(jd_text: &str, resume_text: &str) -> FallbackMatch {
    let jd_set = tokenize(jd_text);
    let resume_set = tokenize(resume_text);

    let (matched, missing): (Vec<String>, Vec<String>) = jd_set
        .iter()
        .map(str::to_string)
        .partition(|token| resume_set.contains(token));

    let ratio = matched.len() as f64 / jd_set.len().max(1) as f64;
    let score = (ratio * 100.0).round().clamp(0.0, 100.0) as u8;

    FallbackMatch {
        score,
        matched,
        missing,
    }
}
