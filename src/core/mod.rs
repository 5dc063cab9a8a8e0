pub mod csv_export;
pub mod document_parser;
pub mod errors;
pub mod gemini;
pub mod keyword_matcher;
pub mod matching;
pub mod models;
pub mod pdf;
pub mod prompts;
pub mod report;
pub mod secret_store;
pub mod service;
pub mod session;
pub mod text_normalizer;
