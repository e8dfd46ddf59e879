//! The `stemquiz take` command.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::{Cell, Table};

use stemquiz_core::config::{load_config_from, OutputFormat, StemquizConfig};
use stemquiz_core::engine::{parse_selection, SessionEngine};
use stemquiz_core::error::QuizError;
use stemquiz_core::model::QuestionSet;
use stemquiz_core::report::SessionReport;
use stemquiz_report::csv::write_csv_report;
use stemquiz_report::html::{write_html_report, HtmlRenderer};

use crate::terminal::TerminalRenderer;

pub fn execute(
    questions_path: PathBuf,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let questions = super::load_questions(&questions_path)?;
    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let format = format.unwrap_or(config.default_format);
    let renderer = TerminalRenderer::from_config(&config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut engine = SessionEngine::start(questions.clone());
    run_session(&mut engine, &renderer, &mut stdin.lock(), &mut out)?;

    let transcript = engine.into_transcript().map_err(QuizError::from)?;
    let report = SessionReport::from_transcript(
        transcript,
        Some(questions_path.display().to_string()),
    );
    print_results(&report, &mut out)?;
    save_outputs(&report, &questions, &config, &output, format)?;

    Ok(())
}

/// Drive a session to completion, reading one selection per question.
///
/// Selections are 1-based option numbers. Anything else is re-prompted;
/// running out of input before the last question is an error.
pub fn run_session<R: BufRead, W: Write>(
    engine: &mut SessionEngine,
    renderer: &TerminalRenderer,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let (_, total) = engine.progress();
    tracing::info!(questions = total, "quiz started");

    while let Some(question) = engine.current_question() {
        let (answered, _) = engine.progress();
        writeln!(out, "\nQuestion {}/{}", answered + 1, total)?;
        write!(out, "{}", renderer.question(question))?;

        let option_count = question.options.len();
        let selected = prompt_selection(input, out, option_count, answered, total)?;
        engine.submit_answer(selected).map_err(QuizError::from)?;
    }

    tracing::info!(questions = total, "quiz complete");
    Ok(())
}

fn prompt_selection<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    option_count: usize,
    answered: usize,
    total: usize,
) -> Result<usize> {
    loop {
        write!(out, "Your answer [1-{option_count}]: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("input ended before the quiz was complete ({answered}/{total} answered)");
        }

        match parse_selection(&line) {
            Ok(index) if index < option_count => return Ok(index),
            Ok(_) => {}
            Err(e) => tracing::debug!("{e}"),
        }
        writeln!(out, "Please enter a number between 1 and {option_count}.")?;
    }
}

/// Print the results screen.
pub fn print_results<W: Write>(report: &SessionReport, out: &mut W) -> Result<()> {
    let summary = &report.summary;
    writeln!(out, "\nQuiz Results")?;
    writeln!(
        out,
        "Correct Answers: {}/{}",
        summary.correct, report.question_count
    )?;
    writeln!(
        out,
        "Average Time per Question: {:.2} seconds",
        summary.average_time_seconds
    )?;

    if report.answers.is_empty() {
        return Ok(());
    }

    let mut answers = Table::new();
    answers.set_header(vec!["Question", "Topic", "Concept", "Time (s)", "Correct"]);
    for (point, answer) in summary.time_series.iter().zip(&report.answers) {
        answers.add_row(vec![
            Cell::new(&point.label),
            Cell::new(&answer.topic),
            Cell::new(&answer.concept),
            Cell::new(format!("{:.2}", point.seconds)),
            Cell::new(if answer.is_correct { "yes" } else { "no" }),
        ]);
    }
    writeln!(out, "\n{answers}")?;

    let mut topics = Table::new();
    topics.set_header(vec!["Topic", "Correct", "Accuracy", "Avg Time (s)"]);
    for group in &summary.per_topic {
        topics.add_row(vec![
            Cell::new(&group.name),
            Cell::new(format!("{}/{}", group.correct, group.answered)),
            Cell::new(format!("{:.1}%", group.accuracy() * 100.0)),
            Cell::new(format!("{:.2}", group.average_time_seconds)),
        ]);
    }
    writeln!(out, "\n{topics}")?;
    Ok(())
}

fn save_outputs(
    report: &SessionReport,
    questions: &QuestionSet,
    config: &StemquizConfig,
    output: &Path,
    format: OutputFormat,
) -> Result<()> {
    std::fs::create_dir_all(output)?;
    let csv_path = output.join(&config.csv_filename);

    if format.includes_csv() {
        write_csv_report(&report.answers, &csv_path)?;
        eprintln!("Results saved to: {}", csv_path.display());
    }
    if format.includes_json() {
        let path = csv_path.with_extension("json");
        report.save_json(&path)?;
        eprintln!("JSON report: {}", path.display());
    }
    if format.includes_html() {
        let path = csv_path.with_extension("html");
        write_html_report(
            report,
            Some(questions),
            &HtmlRenderer::from_config(config),
            &path,
        )?;
        eprintln!("HTML report: {}", path.display());
    }

    tracing::info!(output = %output.display(), %format, "results written");
    Ok(())
}
