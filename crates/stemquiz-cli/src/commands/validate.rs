//! The `stemquiz validate` command.

use std::path::PathBuf;

use anyhow::Result;

use stemquiz_core::{parser, schema};

pub fn execute(questions_path: PathBuf) -> Result<()> {
    let bytes = parser::read_question_file(&questions_path)?;
    let raw = parser::decode(&bytes)?;
    let outcome = schema::validate(&raw);

    let count = raw.as_array().map_or(0, Vec::len);
    println!("Question set: {count} questions");

    let messages = outcome.report.messages();
    for message in &messages {
        println!("  ERROR: {message}");
    }

    if outcome.report.valid {
        println!("Question set valid.");
        Ok(())
    } else {
        println!("\n{} violation(s) found.", messages.len());
        anyhow::bail!("question set {} is invalid", questions_path.display())
    }
}
