use std::fmt::Write;

use super::models::MatchResult;

const HEADERS: [&str; 6] = [
    "Candidate",
    "Score",
    "Matched",
    "Missing",
    "Summary",
    "Recommendation",
];

fn keyword_cell(keywords: &[String], limit: usize) -> String {
    keywords
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Plain-text results table, one row per candidate in shortlist order.
pub fn render_table(results: &[MatchResult], keyword_limit: usize) -> String {
    let rows: Vec<[String; 6]> = results
        .iter()
        .map(|result| {
            [
                result.candidate.clone(),
                result.score.to_string(),
                keyword_cell(&result.matched_keywords, keyword_limit),
                keyword_cell(&result.missing_keywords, keyword_limit),
                result.summary.replace('\n', " "),
                result.recommendation.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize; 6]) {
    let line = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "{}", line.trim_end());
}
