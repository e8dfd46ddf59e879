//! JSON question-set loading.
//!
//! Decodes raw bytes or files into JSON and runs the schema validator over
//! the result. Decoding failures become `MalformedInput`; schema failures
//! become `SchemaViolation` with every violation found.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::error::QuizError;
use crate::model::QuestionSet;
use crate::schema::{validate, ValidationOutcome};

/// Decode raw bytes as JSON.
pub fn decode(bytes: &[u8]) -> Result<Value, QuizError> {
    serde_json::from_slice(bytes).map_err(QuizError::from)
}

/// Decode and validate, keeping the full report even when valid.
pub fn check_question_set_bytes(bytes: &[u8]) -> Result<ValidationOutcome, QuizError> {
    let raw = decode(bytes)?;
    Ok(validate(&raw))
}

/// Decode and validate a question set held in memory.
pub fn parse_question_set_bytes(bytes: &[u8]) -> Result<QuestionSet, QuizError> {
    let set = check_question_set_bytes(bytes)?.into_result()?;
    tracing::debug!(questions = set.len(), "question set accepted");
    Ok(set)
}

/// Decode and validate a question set held in a string (useful for testing).
pub fn parse_question_set_str(content: &str) -> Result<QuestionSet, QuizError> {
    parse_question_set_bytes(content.as_bytes())
}

/// Read a file as raw bytes. I/O failures are not quiz errors.
pub fn read_question_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("failed to read question set file: {}", path.display()))
}

/// Read, decode and validate a question set file.
///
/// The outer `Result` carries I/O failures; the inner one carries the
/// user-facing decoding and schema errors.
pub fn load_question_set(path: &Path) -> Result<Result<QuestionSet, QuizError>> {
    let bytes = read_question_file(path)?;
    Ok(parse_question_set_bytes(&bytes))
}
