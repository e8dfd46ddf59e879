//! The `stemquiz init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create stemquiz.toml
    if Path::new("stemquiz.toml").exists() {
        println!("stemquiz.toml already exists, skipping.");
    } else {
        std::fs::write("stemquiz.toml", SAMPLE_CONFIG)?;
        println!("Created stemquiz.toml");
    }

    // Create example question set
    std::fs::create_dir_all("question-sets")?;
    let example_path = Path::new("question-sets/example.json");
    if example_path.exists() {
        println!("question-sets/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTION_SET)?;
        println!("Created question-sets/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: stemquiz validate --questions question-sets/example.json");
    println!("  2. Run: stemquiz preview --questions question-sets/example.json");
    println!("  3. Run: stemquiz take --questions question-sets/example.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# stemquiz configuration

# Where `stemquiz take` writes its results.
output_dir = "./stemquiz-results"
csv_filename = "quiz_results.csv"

# csv, json, html or all
default_format = "csv"

# Character that wraps inline math in question text.
math_delimiter = "$"

chart_width = 400
chart_height = 300
"#;

const EXAMPLE_QUESTION_SET: &str = r#"[
  {
    "id": 1,
    "question": "What is the maximum value in the graph?",
    "latex": "f(x) = x^2",
    "options": ["2", "4", "6", "8"],
    "correct": 2,
    "topic": "Functions",
    "concept": "Maximum Values",
    "graph": {
      "type": "line",
      "data": [
        {"x": 0, "y": 0},
        {"x": 1, "y": 1},
        {"x": 2, "y": 4},
        {"x": 3, "y": 6}
      ]
    }
  },
  {
    "id": 2,
    "question": "Solve $2x + 3 = 11$ for $x$.",
    "options": ["$x = 3$", "$x = 4$", "$x = 7$"],
    "correct": 1,
    "topic": "Algebra",
    "concept": "Linear Equations"
  },
  {
    "id": 3,
    "question": "Which month had the most rainfall?",
    "options": ["March", "April", "May"],
    "correct": 1,
    "topic": "Statistics",
    "concept": "Reading Charts",
    "graph": {
      "type": "bar",
      "data": [
        {"x": "March", "y": 42},
        {"x": "April", "y": 87},
        {"x": "May", "y": 55}
      ]
    }
  },
  {
    "id": 4,
    "question": "What is the density of the sample with the largest mass?",
    "latex": "\\rho = \\frac{m}{V}",
    "options": ["1.5", "2", "2.5", "4"],
    "correct": 2,
    "topic": "Physics",
    "concept": "Density",
    "graph": {
      "type": "table",
      "data": [
        {"sample": "A", "mass (g)": 12, "volume (cm^3)": 8},
        {"sample": "B", "mass (g)": 20, "volume (cm^3)": 8},
        {"sample": "C", "mass (g)": 9, "volume (cm^3)": 6}
      ]
    }
  },
  {
    "id": 5,
    "question": "If $y = 3x$, what is $y$ when $x = 4$?",
    "options": ["7", "12", "34"],
    "correct": 1,
    "topic": "Algebra",
    "concept": "Linear Equations",
    "graph": {
      "type": "scatter",
      "data": [
        {"x": 1, "y": 3},
        {"x": 2, "y": 6},
        {"x": 3, "y": 9}
      ]
    }
  }
]
"#;
