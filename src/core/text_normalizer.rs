use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\x00]+").unwrap());

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TEXT: &str = "text/plain";
pub const MIME_UNKNOWN: &str = "application/octet-stream";

/// Collapses whitespace runs and NUL characters to single spaces and trims the ends.
pub fn clean_text(text: &str) -> String {
    WHITESPACE_RUN_RE.replace_all(text, " ").trim().to_string()
}

pub fn guess_mime(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        MIME_PDF
    } else if lower.ends_with(".docx") {
        MIME_DOCX
    } else if lower.ends_with(".txt") {
        MIME_TEXT
    } else {
        MIME_UNKNOWN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_nul_and_whitespace() {
        assert_eq!(clean_text("a\u{0000}b   c\n\nd"), "a b c d");
    }

    #[test]
    fn trims_and_handles_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \t\n "), "");
        assert_eq!(clean_text("  Senior\tRust  engineer \r\n"), "Senior Rust engineer");
    }

    #[test]
    fn guesses_mime_from_extension() {
        assert_eq!(guess_mime("CV.PDF"), MIME_PDF);
        assert_eq!(guess_mime("cv.docx"), MIME_DOCX);
        assert_eq!(guess_mime("notes.txt"), MIME_TEXT);
        assert_eq!(guess_mime("photo.png"), MIME_UNKNOWN);
    }
}
