//! Core data model types for stemquiz.
//!
//! These are the types every other module passes around: validated
//! questions, their optional graphs, and the answer records a session
//! produces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One record of a graph's data series, keyed by attribute name.
pub type SeriesRecord = serde_json::Map<String, serde_json::Value>;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within its question set.
    pub id: i64,
    /// Display text; may contain inline math between delimiters.
    #[serde(rename = "question")]
    pub question_text: String,
    /// Optional standalone math expression shown under the question text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latex: Option<String>,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    #[serde(rename = "correct")]
    pub correct_index: usize,
    pub topic: String,
    pub concept: String,
    /// Optional visual shown with the question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphSpec>,
}

impl Question {
    /// Returns `true` if `selected` is the correct option.
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index
    }
}

/// A graph attached to a question. Passed through to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSpec {
    #[serde(rename = "type")]
    pub kind: GraphKind,
    #[serde(rename = "data", default)]
    pub series: Vec<SeriesRecord>,
}

/// The visual shapes a renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Line,
    Bar,
    Scatter,
    Table,
    /// Any other `type` value. Renders as no visual.
    #[serde(other)]
    Unsupported,
}

impl GraphKind {
    /// Returns `true` for kinds a renderer can draw.
    pub fn is_supported(&self) -> bool {
        !matches!(self, GraphKind::Unsupported)
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphKind::Line => write!(f, "line"),
            GraphKind::Bar => write!(f, "bar"),
            GraphKind::Scatter => write!(f, "scatter"),
            GraphKind::Table => write!(f, "table"),
            GraphKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// An ordered, validated collection of questions.
///
/// Only the schema validator constructs these, so every instance satisfies
/// the question-set contract: unique ids, at least two options per question
/// and an in-range correct index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub(crate) fn from_validated(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

/// The outcome of answering one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: i64,
    pub topic: String,
    pub concept: String,
    /// Seconds between the question being shown and the answer; never negative.
    pub time_spent_seconds: f64,
    pub is_correct: bool,
    /// The option index the user picked. May be out of range.
    pub selected_index: usize,
}
