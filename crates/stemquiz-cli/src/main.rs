//! stemquiz CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use stemquiz_core::config::OutputFormat;
use tracing_subscriber::EnvFilter;

mod commands;
mod terminal;

#[derive(Parser)]
#[command(
    name = "stemquiz",
    version,
    about = "Timed multiple-choice STEM quizzes from JSON question sets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a question set file against the question schema
    Validate {
        /// Path to the question set JSON file
        #[arg(long)]
        questions: PathBuf,
    },

    /// Show topic and concept statistics for a question set
    Preview {
        /// Path to the question set JSON file
        #[arg(long)]
        questions: PathBuf,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Take a quiz, answering each question on stdin
    Take {
        /// Path to the question set JSON file
        #[arg(long)]
        questions: PathBuf,

        /// Output directory (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: csv, json, html, all (default: from config)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question set
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stemquiz=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Preview { questions, json } => commands::preview::execute(questions, json),
        Commands::Take {
            questions,
            output,
            format,
            config,
        } => commands::take::execute(questions, output, format, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
