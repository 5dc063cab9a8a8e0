use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use super::csv_export;
use super::document_parser::DocumentParser;
use super::errors::CoreError;
use super::gemini::{GeminiScorer, RemoteScorer};
use super::matching;
use super::models::{MatcherSettings, MatchingPassSummary, ResumeUpload, SkippedDocument};
use super::report;
use super::secret_store::{self, ApiKeyStore, API_KEY_ENV};
use super::session::MatchSession;

pub struct MatcherService {
    settings: MatcherSettings,
    api_key_store: ApiKeyStore,
    parser: DocumentParser,
}

impl MatcherService {
    pub fn new(settings: MatcherSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            api_key_store: ApiKeyStore::new(),
            parser: DocumentParser::default(),
        }
    }

    pub fn settings(&self) -> &MatcherSettings {
        &self.settings
    }

    /// Fills the session credential from the environment or the keychain.
    pub fn load_api_key(&self, session: &mut MatchSession) -> anyhow::Result<bool> {
        let resolved =
            secret_store::resolve_api_key(std::env::var(API_KEY_ENV).ok(), &self.api_key_store)?;

        match resolved {
            Some(key) => {
                session.set_api_key(key);
                Ok(session.api_key().is_some())
            }
            None => Ok(false),
        }
    }

    pub fn save_api_key(&self, session: &mut MatchSession, api_key: &str) -> anyhow::Result<()> {
        let trimmed = api_key.trim();
        if trimmed.is_empty() {
            return Err(
                CoreError::InvalidRequest("Please enter your Gemini API key.".to_string()).into(),
            );
        }

        self.api_key_store.save(trimmed)?;
        session.set_api_key(trimmed);
        info!("API key saved to keychain");
        Ok(())
    }

    pub fn clear_api_key(&self) -> anyhow::Result<()> {
        self.api_key_store.clear()?;
        info!("API key removed from keychain");
        Ok(())
    }

    pub fn api_key_configured(&self) -> anyhow::Result<bool> {
        Ok(
            secret_store::resolve_api_key(std::env::var(API_KEY_ENV).ok(), &self.api_key_store)?
                .is_some(),
        )
    }

    pub fn load_job_description(&self, file_name: &str, data: &[u8]) -> anyhow::Result<String> {
        Ok(self.parser.parse_job_description(file_name, data)?)
    }

    /// Reads resume files from disk. Paths that cannot be read come back as skipped entries.
    pub async fn read_resume_files(paths: &[PathBuf]) -> (Vec<ResumeUpload>, Vec<SkippedDocument>) {
        let mut uploads = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();

        for path in paths {
            let file_name = file_name_of(path);
            match tokio::fs::read(path).await {
                Ok(bytes) => uploads.push(ResumeUpload::new(file_name, bytes)),
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "error reading resume");
                    skipped.push(SkippedDocument {
                        file_name,
                        reason: format!("failed to read file: {err}"),
                    });
                }
            }
        }

        (uploads, skipped)
    }

    /// Scores resume files with Gemini using the session credential.
    pub async fn match_files(
        &self,
        session: &mut MatchSession,
        job_description: &str,
        paths: &[PathBuf],
    ) -> anyhow::Result<MatchingPassSummary> {
        let api_key = session
            .api_key()
            .map(str::to_string)
            .ok_or(CoreError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("ResumeMatcher/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(self.settings.request_timeout_seconds))
            .build()
            .context("failed to build HTTP client")?;
        let scorer = GeminiScorer::new(client, &self.settings, api_key);
        info!(model = %scorer.model(), resumes = paths.len(), "starting matching pass");

        self.match_files_with(&scorer, session, job_description, paths)
            .await
    }

    /// Reads and scores resume files with any scorer. Unreadable files are reported
    /// ahead of the ones the parser rejected.
    pub async fn match_files_with<S>(
        &self,
        scorer: &S,
        session: &mut MatchSession,
        job_description: &str,
        paths: &[PathBuf],
    ) -> anyhow::Result<MatchingPassSummary>
    where
        S: RemoteScorer + ?Sized,
    {
        matching::check_request(job_description, paths.len())?;

        let (uploads, mut unreadable) = Self::read_resume_files(paths).await;
        if uploads.is_empty() {
            return Err(CoreError::NoValidResumes.into());
        }

        let mut summary =
            matching::run_matching_pass(scorer, &self.parser, session, job_description, &uploads)
                .await?;
        unreadable.append(&mut summary.skipped);
        summary.skipped = unreadable;
        Ok(summary)
    }

    pub fn render_table(&self, session: &MatchSession) -> String {
        report::render_table(session.shortlist(), self.settings.table_keyword_limit)
    }

    pub async fn export_csv(&self, session: &MatchSession, path: &Path) -> anyhow::Result<()> {
        csv_export::export_shortlist(session.shortlist(), path).await?;
        info!(path = %path.display(), rows = session.shortlist().len(), "shortlist exported");
        Ok(())
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|v| v.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::core::errors::ScoringError;
    use crate::core::models::{AiAssessment, ScoreSource};

    struct OfflineScorer;

    #[async_trait]
    impl RemoteScorer for OfflineScorer {
        async fn score(
            &self,
            _job_description: &str,
            _resume_text: &str,
        ) -> Result<AiAssessment, ScoringError> {
            Err(ScoringError::EmptyContent)
        }
    }

    #[tokio::test]
    async fn unreadable_path_is_reported_as_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("alice.txt");
        std::fs::write(&present, "I know Python well").unwrap();
        let missing = dir.path().join("ghost.txt");

        let service = MatcherService::new(MatcherSettings::default());
        let mut session = MatchSession::with_api_key("key");
        let summary = service
            .match_files_with(
                &OfflineScorer,
                &mut session,
                "Python Java",
                &[missing, present],
            )
            .await
            .unwrap();

        assert_eq!(summary.scored, 1);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].file_name, "ghost.txt");
        assert!(summary.skipped[0].reason.starts_with("failed to read file"));
        assert_eq!(session.shortlist()[0].candidate, "alice.txt");
        assert_eq!(session.shortlist()[0].source, ScoreSource::Fallback);
    }

    #[tokio::test]
    async fn all_paths_unreadable_is_no_valid_resumes() {
        let dir = tempfile::tempdir().unwrap();
        let service = MatcherService::new(MatcherSettings::default());
        let mut session = MatchSession::with_api_key("key");

        let err = service
            .match_files_with(
                &OfflineScorer,
                &mut session,
                "Python",
                &[dir.path().join("a.txt"), dir.path().join("b.pdf")],
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::NoValidResumes)
        ));
        assert!(session.shortlist().is_empty());
    }

    #[tokio::test]
    async fn blank_description_is_checked_before_reading_files() {
        let service = MatcherService::new(MatcherSettings::default());
        let mut session = MatchSession::with_api_key("key");

        let err = service
            .match_files_with(
                &OfflineScorer,
                &mut session,
                "  ",
                &[PathBuf::from("/nonexistent/resume.txt")],
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::InvalidRequest(_))
        ));
    }

    #[test]
    fn sanitizes_settings_on_construction() {
        let service = MatcherService::new(MatcherSettings {
            model: " ".to_string(),
            request_timeout_seconds: 0,
            ..MatcherSettings::default()
        });
        assert_eq!(service.settings().model, crate::core::models::DEFAULT_MODEL);
        assert_eq!(service.settings().request_timeout_seconds, 1);
    }
}
