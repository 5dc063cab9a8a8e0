use anyhow::Context;

/// Reads the text layer of a PDF. Scanned documents without one come back empty.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_text(&self, data: &[u8]) -> anyhow::Result<String> {
        let text = pdf_extract::extract_text_from_mem(data).context("failed to read PDF text")?;
        Ok(text.trim().to_string())
    }
}
