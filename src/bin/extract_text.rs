use std::path::Path;

use resume_matcher_lib::core::document_parser::DocumentParser;
use resume_matcher_lib::core::models::ResumeUpload;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: extract_text <path-to-resume.txt|pdf|docx>");
        std::process::exit(1);
    }

    let path = &args[1];
    if !Path::new(path).exists() {
        eprintln!("File not found: {path}");
        std::process::exit(2);
    }

    let file_name = Path::new(path)
        .file_name()
        .and_then(|v| v.to_str())
        .unwrap_or("resume.txt")
        .to_string();

    let bytes = tokio::fs::read(path).await?;
    let parser = DocumentParser::default();
    let document = parser.parse_resume(&ResumeUpload::new(file_name, bytes))?;

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
