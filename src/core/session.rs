use super::models::{DocumentText, MatchResult};

/// Everything one user's matching workflow carries between steps.
///
/// Owned by the caller and passed by reference into the pass, the table renderer
/// and the CSV exporter.
#[derive(Debug, Default)]
pub struct MatchSession {
    api_key: Option<String>,
    job_description: Option<String>,
    resumes: Vec<DocumentText>,
    shortlist: Vec<MatchResult>,
}

impl MatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let mut session = Self::default();
        session.set_api_key(api_key);
        session
    }

    /// Blank keys are treated as absent.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        let key = api_key.into();
        let trimmed = key.trim();
        self.api_key = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn job_description(&self) -> Option<&str> {
        self.job_description.as_deref()
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = Some(text.into());
    }

    /// Documents scored by the latest pass, in input order.
    pub fn resumes(&self) -> &[DocumentText] {
        &self.resumes
    }

    pub fn shortlist(&self) -> &[MatchResult] {
        &self.shortlist
    }

    pub(crate) fn begin_pass(&mut self, resumes: Vec<DocumentText>) {
        self.resumes = resumes;
        self.shortlist.clear();
    }

    pub(crate) fn push_result(&mut self, result: MatchResult) {
        self.shortlist.push(result);
    }

    /// Drops documents and results; the cached credential survives.
    pub fn clear(&mut self) {
        self.job_description = None;
        self.resumes.clear();
        self.shortlist.clear();
    }
}
