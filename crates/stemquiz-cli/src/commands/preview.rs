//! The `stemquiz preview` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use stemquiz_core::statistics::{aggregate, QuestionSetStats};

pub fn execute(questions_path: PathBuf, json: bool) -> Result<()> {
    let set = super::load_questions(&questions_path)?;
    let stats = aggregate(&set);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_overview(&stats);
    }
    Ok(())
}

fn print_overview(stats: &QuestionSetStats) {
    println!("Question Set Overview");
    println!("Total Questions: {}", stats.total_questions);
    println!("Number of Topics: {}", stats.topics.len());
    println!("Number of Concepts: {}", stats.concepts.len());

    if stats.total_questions == 0 {
        return;
    }

    let mut topics = Table::new();
    topics.set_header(vec!["Topic", "Questions"]);
    for entry in &stats.topic_distribution {
        topics.add_row(vec![Cell::new(&entry.topic), Cell::new(entry.count)]);
    }
    println!("\n{topics}");

    let mut concepts = Table::new();
    concepts.set_header(vec!["Concept", "Questions"]);
    for entry in &stats.concept_distribution {
        concepts.add_row(vec![Cell::new(&entry.concept), Cell::new(entry.count)]);
    }
    println!("\n{concepts}");
}
