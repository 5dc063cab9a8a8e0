//! End-to-end matching passes with stubbed remote scorers.

use std::io::{Cursor, Write};
use std::sync::Mutex;

use async_trait::async_trait;
use zip::write::SimpleFileOptions;

use resume_matcher_lib::core::csv_export;
use resume_matcher_lib::core::document_parser::DocumentParser;
use resume_matcher_lib::core::gemini::parse_assessment;
use resume_matcher_lib::core::matching::{
    self, FALLBACK_SUMMARY, NEEDS_REVIEW_LABEL, PROCEED_LABEL,
};
use resume_matcher_lib::core::models::{AiAssessment, ScoreSource};
use resume_matcher_lib::{CoreError, MatchSession, RemoteScorer, ResumeUpload, ScoringError};

/// Replays canned model outputs in order and records the resumes it saw.
struct ScriptedScorer {
    replies: Mutex<Vec<Option<&'static str>>>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedScorer {
    fn new(replies: Vec<Option<&'static str>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RemoteScorer for ScriptedScorer {
    async fn score(
        &self,
        _job_description: &str,
        resume_text: &str,
    ) -> Result<AiAssessment, ScoringError> {
        self.seen.lock().unwrap().push(resume_text.to_string());
        let reply = self.replies.lock().unwrap().pop().flatten();
        match reply {
            Some(text) => parse_assessment(text),
            None => Err(ScoringError::Api {
                status: 503,
                body: "unavailable".to_string(),
            }),
        }
    }
}

fn docx(text: &str) -> Vec<u8> {
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:body></w:document>"#
    );
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(
            "word/document.xml",
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored),
        )
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

const JD: &str = "Backend engineer: Python, Django, PostgreSQL, Docker";

#[tokio::test]
async fn mixes_ai_and_fallback_results_in_input_order() {
    let scorer = ScriptedScorer::new(vec![
        Some(r#"{"matchScore": 88, "matchedKeywords": ["Python"], "missingKeywords": [], "shortSummary": "Strong", "overallFit": "Strong Fit"}"#),
        Some("Sorry, I can't produce JSON today."),
        None,
    ]);
    let parser = DocumentParser::default();
    let mut session = MatchSession::with_api_key("test-key");
    let uploads = vec![
        ResumeUpload::new("alice.txt", b"Python Django PostgreSQL Docker".to_vec()),
        ResumeUpload::new("bob.docx", docx("Python and Docker on weekends")),
        ResumeUpload::new("carol.txt", b"Ruby on Rails".to_vec()),
    ];

    let summary = matching::run_matching_pass(&scorer, &parser, &mut session, JD, &uploads)
        .await
        .unwrap();

    assert_eq!(summary.scored, 3);
    assert_eq!(summary.fallback_count, 2);
    assert!(summary.skipped.is_empty());

    let shortlist = session.shortlist();
    let names: Vec<&str> = shortlist.iter().map(|r| r.candidate.as_str()).collect();
    assert_eq!(names, vec!["alice.txt", "bob.docx", "carol.txt"]);

    assert_eq!(shortlist[0].source, ScoreSource::Ai);
    assert_eq!(shortlist[0].score, 88);
    assert_eq!(shortlist[0].recommendation, "Strong Fit");

    // jd keywords: backend engineer python django postgresql docker
    assert_eq!(shortlist[1].source, ScoreSource::Fallback);
    assert_eq!(shortlist[1].matched_keywords, vec!["python", "docker"]);
    assert_eq!(shortlist[1].score, 33);
    assert_eq!(shortlist[1].summary, FALLBACK_SUMMARY);
    assert_eq!(shortlist[1].recommendation, NEEDS_REVIEW_LABEL);

    assert_eq!(shortlist[2].score, 0);
    assert_eq!(shortlist[2].missing_keywords.len(), 6);

    let seen = scorer.seen.lock().unwrap();
    assert_eq!(seen[1], "Python and Docker on weekends");

    let resumes = session.resumes();
    assert_eq!(resumes.len(), 3);
    assert_eq!(resumes[1].file_name, "bob.docx");
    assert_eq!(resumes[1].text, "Python and Docker on weekends");
}

#[tokio::test]
async fn unsupported_and_corrupt_files_are_skipped() {
    let scorer = ScriptedScorer::new(vec![None]);
    let parser = DocumentParser::default();
    let mut session = MatchSession::new();
    let uploads = vec![
        ResumeUpload::new("photo.png", vec![0x89, 0x50]),
        ResumeUpload::new("broken.docx", b"definitely not a zip".to_vec()),
        ResumeUpload::new(
            "dana.txt",
            b"Backend engineer Python Django PostgreSQL Docker".to_vec(),
        ),
    ];

    let summary = matching::run_matching_pass(&scorer, &parser, &mut session, JD, &uploads)
        .await
        .unwrap();

    assert_eq!(summary.scored, 1);
    let skipped: Vec<&str> = summary
        .skipped
        .iter()
        .map(|s| s.file_name.as_str())
        .collect();
    assert_eq!(skipped, vec!["photo.png", "broken.docx"]);
    assert_eq!(session.shortlist().len(), 1);
    assert_eq!(session.shortlist()[0].score, 100);
    assert_eq!(session.shortlist()[0].recommendation, PROCEED_LABEL);
}

#[tokio::test]
async fn validation_errors_stop_before_scoring() {
    let scorer = ScriptedScorer::new(Vec::new());
    let parser = DocumentParser::default();
    let mut session = MatchSession::new();
    let resumes = vec![ResumeUpload::new("a.txt", b"python".to_vec())];

    let err = matching::run_matching_pass(&scorer, &parser, &mut session, "   ", &resumes)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidRequest(_)));

    let err = matching::run_matching_pass(&scorer, &parser, &mut session, JD, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidRequest(_)));

    let only_bad = vec![ResumeUpload::new("x.exe", vec![1])];
    let err = matching::run_matching_pass(&scorer, &parser, &mut session, JD, &only_bad)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NoValidResumes));

    assert!(scorer.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn new_pass_replaces_shortlist_and_exports_csv() {
    let parser = DocumentParser::default();
    let mut session = MatchSession::new();

    let first = ScriptedScorer::new(vec![None, None]);
    let uploads = vec![
        ResumeUpload::new("one.txt", b"python".to_vec()),
        ResumeUpload::new("two.txt", b"docker".to_vec()),
    ];
    matching::run_matching_pass(&first, &parser, &mut session, JD, &uploads)
        .await
        .unwrap();
    assert_eq!(session.shortlist().len(), 2);

    let second = ScriptedScorer::new(vec![Some(
        r#"{"matchScore": 45, "matchedKeywords": "Python, SQL", "missingKeywords": "Go", "shortSummary": "Okay, not great", "overallFit": "Weak Fit"}"#,
    )]);
    let uploads = vec![ResumeUpload::new("x,y.txt", b"python sql".to_vec())];
    matching::run_matching_pass(&second, &parser, &mut session, JD, &uploads)
        .await
        .unwrap();
    assert_eq!(session.shortlist().len(), 1);
    assert_eq!(session.resumes().len(), 1);
    assert_eq!(session.resumes()[0].file_name, "x,y.txt");
    assert_eq!(session.job_description(), Some(JD));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shortlist.csv");
    csv_export::export_shortlist(session.shortlist(), &path)
        .await
        .unwrap();
    let csv = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        csv,
        "Candidate,Score,Matched_Keywords,Missing_Keywords,Summary,Recommendation\n\
         \"x,y.txt\",45,Python | SQL,Go,\"Okay, not great\",Weak Fit"
    );

    session.clear();
    assert!(session.shortlist().is_empty());
    assert!(session.resumes().is_empty());
    assert!(csv_export::shortlist_to_csv(session.shortlist()).is_err());
}
