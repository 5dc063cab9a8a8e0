use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::errors::CoreError;
use super::models::{DocumentText, ResumeUpload};
use super::pdf::PdfTextExtractor;
use super::text_normalizer::{self, MIME_DOCX, MIME_PDF, MIME_TEXT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Picks the format from the file name suffix, then from the MIME type when the
    /// name carries no extension at all.
    pub fn detect(file_name: &str, mime_type: Option<&str>) -> Option<Self> {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".txt") {
            return Some(Self::Text);
        }
        if lower.ends_with(".pdf") {
            return Some(Self::Pdf);
        }
        if lower.ends_with(".docx") {
            return Some(Self::Docx);
        }
        if std::path::Path::new(file_name).extension().is_some() {
            return None;
        }

        match mime_type.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some(MIME_TEXT) => Some(Self::Text),
            Some(MIME_PDF) => Some(Self::Pdf),
            Some(MIME_DOCX) => Some(Self::Docx),
            _ => None,
        }
    }
}

pub struct DocumentParser {
    pdf_text_extractor: PdfTextExtractor,
}

impl DocumentParser {
    pub fn new(pdf_text_extractor: PdfTextExtractor) -> Self {
        Self { pdf_text_extractor }
    }

    /// Extracts and normalizes resume text from a txt, pdf or docx upload.
    pub fn parse_resume(&self, upload: &ResumeUpload) -> Result<DocumentText, CoreError> {
        let format = DocumentFormat::detect(&upload.file_name, upload.mime_type.as_deref())
            .ok_or_else(|| CoreError::UnsupportedFileType(upload.file_name.clone()))?;

        let raw = self.extract(&upload.file_name, format, &upload.bytes)?;
        let mime_type = upload
            .mime_type
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| text_normalizer::guess_mime(&upload.file_name).to_string());

        Ok(DocumentText {
            file_name: upload.file_name.clone(),
            text: text_normalizer::clean_text(&raw),
            size: upload.bytes.len() as u64,
            mime_type,
        })
    }

    /// Job descriptions may only come from text or PDF files.
    pub fn parse_job_description(&self, file_name: &str, data: &[u8]) -> Result<String, CoreError> {
        match DocumentFormat::detect(file_name, None) {
            Some(format @ (DocumentFormat::Text | DocumentFormat::Pdf)) => {
                Ok(self.extract(file_name, format, data)?.trim().to_string())
            }
            _ => Err(CoreError::UnsupportedFileType(file_name.to_string())),
        }
    }

    fn extract(
        &self,
        file_name: &str,
        format: DocumentFormat,
        data: &[u8],
    ) -> Result<String, CoreError> {
        let extracted = match format {
            DocumentFormat::Text => Ok(String::from_utf8_lossy(data).into_owned()),
            DocumentFormat::Pdf => self.pdf_text_extractor.extract_text(data),
            DocumentFormat::Docx => extract_docx_text(data),
        };

        extracted.map_err(|err| CoreError::Parse {
            file_name: file_name.to_string(),
            message: format!("{err:#}"),
        })
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new(PdfTextExtractor::new())
    }
}

fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut document_file = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    document_file.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:tab" if in_paragraph => current.push('\t'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" if in_paragraph => current.push('\t'),
                b"w:br" if in_paragraph => current.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"w:p" {
                    if !current.trim().is_empty() {
                        lines.push(current.trim().to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_paragraph {
                    let value = e.xml_content()?.into_owned();
                    current.push_str(&value);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_paragraph {
                    if let Some(ch) = e.resolve_char_ref()? {
                        current.push(ch);
                    } else {
                        let name = e.decode()?;
                        if let Some(value) = quick_xml::escape::resolve_predefined_entity(&name) {
                            current.push_str(value);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {}
        }

        buf.clear();
    }

    Ok(lines.join("\n"))
}
