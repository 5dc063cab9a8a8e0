use std::path::Path;

use anyhow::Context;

use super::errors::CoreError;
use super::models::{MatchResult, ShortlistRow};

/// Renders the shortlist as CSV with a header row, quoting only where needed.
pub fn shortlist_to_csv(results: &[MatchResult]) -> anyhow::Result<String> {
    if results.is_empty() {
        return Err(CoreError::EmptyShortlist.into());
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for result in results {
        writer.serialize(ShortlistRow::from(result))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("failed to flush CSV writer: {err}"))?;
    let mut csv = String::from_utf8(bytes).context("CSV output is not valid UTF-8")?;
    if csv.ends_with('\n') {
        csv.pop();
    }

    Ok(csv)
}

pub async fn export_shortlist(results: &[MatchResult], path: &Path) -> anyhow::Result<()> {
    let csv = shortlist_to_csv(results)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    tokio::fs::write(path, csv)
        .await
        .with_context(|| format!("failed to write CSV file {}", path.display()))?;
    Ok(())
}
