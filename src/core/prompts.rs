/// Labels the model may use for `overallFit`.
pub const FIT_LABELS: [&str; 4] = ["Strong Fit", "Moderate Fit", "Weak Fit", "Needs Review"];

pub fn build_match_prompt(job_description: &str, resume_text: &str) -> String {
    format!(
        r#"
You are an expert HR screening assistant. Analyze the following job description and resume. Return ONLY a JSON object with these exact fields:

{{
  "matchScore": number (0-100),
  "matchedKeywords": string[],
  "missingKeywords": string[],
  "shortSummary": string,
  "overallFit": {labels}
}}

Focus on skills, experience, certifications, and domain keywords. Consider seniority, relevant achievements, and tech stack alignment. Avoid PII extraction.

JOB_DESCRIPTION:
{job_description}

RESUME:
{resume_text}

Return strictly valid JSON with no explanations.
"#,
        labels = FIT_LABELS
            .iter()
            .map(|label| format!("\"{label}\""))
            .collect::<Vec<_>>()
            .join(" | "),
    )
}
