//! CSV transcript export.

use std::path::Path;

use anyhow::{Context, Result};
use ::csv::{QuoteStyle, Terminator, WriterBuilder};

use stemquiz_core::model::AnswerRecord;

/// Column headers, in row order.
pub const CSV_HEADER: [&str; 6] = [
    "Question ID",
    "Topic",
    "Concept",
    "Time Spent (s)",
    "Correct",
    "User Answer",
];

/// Render seconds with exactly two decimals, rounding half-up on the
/// shortest decimal form of the value (`1.005` becomes `1.01`).
///
/// Negative and non-finite inputs render as `0.00`.
pub fn format_seconds(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };
    // f64's Display never uses exponent notation.
    let repr = seconds.to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(2))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes().get(2).is_some_and(|&d| d >= b'5') {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, 1);
                break;
            }
            i -= 1;
            if digits[i] == 9 {
                digits[i] = 0;
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let split = digits.len() - 2;
    let render = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    format!("{}.{}", render(&digits[..split]), render(&digits[split..]))
}

/// Serialize a transcript: the header, then one row per answer in order.
///
/// Rows are separated by `\n` with no trailing newline. Fields are quoted
/// only when they contain a comma, a quote or a line break.
pub fn export_csv(answers: &[AnswerRecord]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .context("failed to write CSV header")?;
    for answer in answers {
        writer
            .write_record([
                answer.question_id.to_string(),
                answer.topic.clone(),
                answer.concept.clone(),
                format_seconds(answer.time_spent_seconds),
                answer.is_correct.to_string(),
                answer.selected_index.to_string(),
            ])
            .with_context(|| format!("failed to write CSV row for question {}", answer.question_id))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("failed to flush CSV output")?;
    let mut out = String::from_utf8(bytes).context("CSV output is not UTF-8")?;
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// Write the CSV export of a transcript to a file.
pub fn write_csv_report(answers: &[AnswerRecord], path: &Path) -> Result<()> {
    let csv = export_csv(answers)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, csv)
        .with_context(|| format!("failed to write CSV to {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows = answers.len(), "wrote CSV results");
    Ok(())
}
