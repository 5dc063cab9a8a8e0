use chrono::Utc;
use tracing::{info, warn};

use super::document_parser::DocumentParser;
use super::errors::{CoreError, ScoringError};
use super::gemini::RemoteScorer;
use super::keyword_matcher;
use super::models::{
    AiAssessment, DocumentText, MatchResult, MatchingPassSummary, ResumeUpload, ScoreSource,
    SkippedDocument,
};
use super::session::MatchSession;

pub const PROCEED_THRESHOLD: u8 = 60;
pub const PROCEED_LABEL: &str = "Proceed to interview";
pub const NEEDS_REVIEW_LABEL: &str = "Hold / needs review";
pub const FALLBACK_SUMMARY: &str = "Automatic fallback summary based on keyword overlap.";

pub fn fallback_recommendation(score: u8) -> &'static str {
    if score >= PROCEED_THRESHOLD {
        PROCEED_LABEL
    } else {
        NEEDS_REVIEW_LABEL
    }
}

/// Keyword-overlap result used when the remote scorer gives nothing usable.
pub fn fallback_result(document: &DocumentText, job_description: &str) -> MatchResult {
    let fallback = keyword_matcher::fallback_match(job_description, &document.text);

    MatchResult {
        candidate: document.file_name.clone(),
        score: fallback.score,
        matched_keywords: fallback.matched,
        missing_keywords: fallback.missing,
        summary: FALLBACK_SUMMARY.to_string(),
        recommendation: fallback_recommendation(fallback.score).to_string(),
        source: ScoreSource::Fallback,
    }
}

fn ai_result(document: &DocumentText, assessment: AiAssessment) -> MatchResult {
    MatchResult {
        candidate: document.file_name.clone(),
        score: assessment.score.min(100),
        matched_keywords: assessment.matched_keywords,
        missing_keywords: assessment.missing_keywords,
        summary: assessment.summary,
        recommendation: assessment.overall_fit,
        source: ScoreSource::Ai,
    }
}

/// Resolves one remote outcome into a record: the AI answer when usable, otherwise the fallback.
pub fn resolve_outcome(
    document: &DocumentText,
    job_description: &str,
    outcome: Result<AiAssessment, ScoringError>,
) -> MatchResult {
    match outcome {
        Ok(assessment) => ai_result(document, assessment),
        Err(err) => {
            warn!(candidate = %document.file_name, error = %err, "remote scoring failed, using keyword fallback");
            fallback_result(document, job_description)
        }
    }
}

pub async fn score_resume<S>(
    scorer: &S,
    document: &DocumentText,
    job_description: &str,
) -> MatchResult
where
    S: RemoteScorer + ?Sized,
{
    let outcome = scorer.score(job_description, &document.text).await;
    resolve_outcome(document, job_description, outcome)
}

/// Parses every upload, skipping the ones that cannot be read.
pub fn parse_uploads(
    parser: &DocumentParser,
    uploads: &[ResumeUpload],
) -> (Vec<DocumentText>, Vec<SkippedDocument>) {
    let mut documents = Vec::with_capacity(uploads.len());
    let mut skipped = Vec::new();

    for upload in uploads {
        match parser.parse_resume(upload) {
            Ok(document) => documents.push(document),
            Err(err) => {
                match &err {
                    CoreError::UnsupportedFileType(_) => {
                        warn!(file = %upload.file_name, "unsupported file skipped")
                    }
                    _ => warn!(file = %upload.file_name, error = %err, "error reading resume"),
                }
                skipped.push(SkippedDocument {
                    file_name: upload.file_name.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    (documents, skipped)
}

/// Rejects a pass with no job description or no resumes. Returns the trimmed description.
pub fn check_request(job_description: &str, resume_count: usize) -> Result<&str, CoreError> {
    let job_description = job_description.trim();
    if job_description.is_empty() {
        return Err(CoreError::InvalidRequest(
            "Please provide the job description (text or file).".to_string(),
        ));
    }
    if resume_count == 0 {
        return Err(CoreError::InvalidRequest(
            "Please upload at least one resume (.pdf, .txt, .docx).".to_string(),
        ));
    }
    Ok(job_description)
}

/// Runs one matching pass over `uploads`, one resume at a time, in input order.
///
/// The session's previous shortlist is replaced. Remote failures never abort the pass.
pub async fn run_matching_pass<S>(
    scorer: &S,
    parser: &DocumentParser,
    session: &mut MatchSession,
    job_description: &str,
    uploads: &[ResumeUpload],
) -> Result<MatchingPassSummary, CoreError>
where
    S: RemoteScorer + ?Sized,
{
    let job_description = check_request(job_description, uploads.len())?;

    let started_at = Utc::now();
    let (documents, skipped) = parse_uploads(parser, uploads);
    if documents.is_empty() {
        return Err(CoreError::NoValidResumes);
    }

    info!(
        resumes = documents.len(),
        skipped = skipped.len(),
        "processed resumes, matching"
    );

    session.set_job_description(job_description);
    session.begin_pass(documents.clone());

    let mut fallback_count = 0;
    for document in &documents {
        let result = score_resume(scorer, document, job_description).await;
        if result.source == ScoreSource::Fallback {
            fallback_count += 1;
        }
        session.push_result(result);
    }

    let completed_at = Utc::now();
    info!(
        scored = documents.len(),
        fallback = fallback_count,
        "matching complete"
    );

    Ok(MatchingPassSummary {
        scored: documents.len(),
        fallback_count,
        skipped,
        started_at,
        completed_at,
        duration_seconds: (completed_at - started_at).num_milliseconds() as f64 / 1000.0,
    })
}
