//! Subcommand implementations.

pub mod init;
pub mod preview;
pub mod take;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use stemquiz_core::model::QuestionSet;
use stemquiz_core::parser;

/// Load a question set, listing every problem on stderr when it is unusable.
pub(crate) fn load_questions(path: &Path) -> Result<QuestionSet> {
    match parser::load_question_set(path)? {
        Ok(set) => Ok(set),
        Err(err) => {
            for message in err.messages() {
                eprintln!("  {message}");
            }
            Err(anyhow::Error::new(err))
                .with_context(|| format!("cannot use question set {}", path.display()))
        }
    }
}
