//! Question-set schema validation.
//!
//! The question contract is described as data ([`QUESTION_SCHEMA`]) and
//! walked uniformly for every question, so adding a field means adding a
//! row. Validation never stops at the first bad question: every violation in
//! the set is reported in one pass. Within a question, the options checks
//! gate the correct-index check so it never indexes a bad option list.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::QuizError;
use crate::model::{GraphSpec, Question, QuestionSet};

/// Minimum number of answer options per question.
pub const MIN_OPTIONS: usize = 2;

/// The shape a question field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Integer,
    Text,
    /// A list of at least [`MIN_OPTIONS`] strings.
    Options,
    /// An integer index into the question's options.
    Index,
    /// A graph spec; malformed graphs are dropped, never rejected.
    Graph,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Integer => write!(f, "an integer"),
            FieldKind::Text => write!(f, "a string"),
            FieldKind::Options => write!(f, "an array"),
            FieldKind::Index => write!(f, "an index into options"),
            FieldKind::Graph => write!(f, "a graph object"),
        }
    }
}

/// One row of the question schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn required(name: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule {
        name,
        kind,
        required: true,
    }
}

const fn optional(name: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule {
        name,
        kind,
        required: false,
    }
}

/// The question contract, in the order fields are checked and reported.
pub const QUESTION_SCHEMA: &[FieldRule] = &[
    required("id", FieldKind::Integer),
    required("question", FieldKind::Text),
    required("options", FieldKind::Options),
    required("correct", FieldKind::Index),
    required("topic", FieldKind::Text),
    required("concept", FieldKind::Text),
    optional("latex", FieldKind::Text),
    optional("graph", FieldKind::Graph),
];

/// A single schema rule failure. `question` numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum Violation {
    #[error("Question set must be an array")]
    NotAnArray,

    #[error("Question {question} must be an object")]
    NotAnObject { question: usize },

    #[error("Question {question} is missing the {field} field")]
    MissingField {
        question: usize,
        field: &'static str,
    },

    #[error("Question {question} {field} must be {expected}")]
    WrongKind {
        question: usize,
        field: &'static str,
        expected: FieldKind,
    },

    #[error("Question {question} must have at least 2 options")]
    TooFewOptions { question: usize },

    #[error("Question {question} option {option} must be a string")]
    OptionNotText { question: usize, option: usize },

    #[error("Question {question} has an invalid correct answer index")]
    InvalidCorrectIndex { question: usize },

    #[error("Question {question} reuses id {id} from question {first}")]
    DuplicateId {
        question: usize,
        id: i64,
        first: usize,
    },
}

/// The user-facing summary of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Violation messages in the order they were found.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

/// A validation report plus the typed question set when the input was valid.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub report: ValidationReport,
    pub questions: Option<QuestionSet>,
}

impl ValidationOutcome {
    /// Collapse into the set, or a `SchemaViolation` carrying every violation.
    pub fn into_result(self) -> Result<QuestionSet, QuizError> {
        match self.questions {
            Some(set) if self.report.valid => Ok(set),
            _ => Err(QuizError::SchemaViolation(self.report.violations)),
        }
    }
}

/// Validate a decoded JSON payload against the question-set contract.
pub fn validate(raw: &Value) -> ValidationOutcome {
    let Some(items) = raw.as_array() else {
        return ValidationOutcome {
            report: ValidationReport {
                valid: false,
                violations: vec![Violation::NotAnArray],
            },
            questions: None,
        };
    };

    let mut violations = Vec::new();
    let mut questions = Vec::with_capacity(items.len());
    let mut first_use: HashMap<i64, usize> = HashMap::new();

    for (idx, item) in items.iter().enumerate() {
        let number = idx + 1;
        let (mut found, draft) = check_question(number, item);

        if let Some(id) = draft.id {
            if let Some(&first) = first_use.get(&id) {
                found.push(Violation::DuplicateId {
                    question: number,
                    id,
                    first,
                });
            } else {
                first_use.insert(id, number);
            }
        }

        if found.is_empty() {
            if let Some(question) = draft.finish() {
                questions.push(question);
            }
        } else {
            violations.extend(found);
        }
    }

    tracing::debug!(
        questions = items.len(),
        violations = violations.len(),
        "validated question set"
    );

    let valid = violations.is_empty();
    ValidationOutcome {
        report: ValidationReport { valid, violations },
        questions: valid.then(|| QuestionSet::from_validated(questions)),
    }
}

/// Typed field values collected while walking one question.
#[derive(Debug, Default)]
struct QuestionDraft {
    id: Option<i64>,
    question_text: Option<String>,
    latex: Option<String>,
    options: Option<Vec<String>>,
    /// Length of a well-formed options array, even if some entries are bad.
    option_count: Option<usize>,
    correct_index: Option<usize>,
    topic: Option<String>,
    concept: Option<String>,
    graph: Option<GraphSpec>,
}

impl QuestionDraft {
    fn set_integer(&mut self, field: &str, value: i64) {
        if field == "id" {
            self.id = Some(value);
        }
    }

    fn set_text(&mut self, field: &str, value: String) {
        match field {
            "question" => self.question_text = Some(value),
            "latex" => self.latex = Some(value),
            "topic" => self.topic = Some(value),
            "concept" => self.concept = Some(value),
            _ => {}
        }
    }

    fn finish(self) -> Option<Question> {
        Some(Question {
            id: self.id?,
            question_text: self.question_text?,
            latex: self.latex,
            options: self.options?,
            correct_index: self.correct_index?,
            topic: self.topic?,
            concept: self.concept?,
            graph: self.graph,
        })
    }
}

fn check_question(number: usize, item: &Value) -> (Vec<Violation>, QuestionDraft) {
    let mut draft = QuestionDraft::default();
    let Some(fields) = item.as_object() else {
        return (vec![Violation::NotAnObject { question: number }], draft);
    };

    let mut violations: Vec<Violation> = QUESTION_SCHEMA
        .iter()
        .filter(|rule| rule.required && !fields.contains_key(rule.name))
        .map(|rule| Violation::MissingField {
            question: number,
            field: rule.name,
        })
        .collect();

    // Index rules depend on the option count, so they run after the rest.
    let (index_rules, other_rules): (Vec<&FieldRule>, Vec<&FieldRule>) = QUESTION_SCHEMA
        .iter()
        .partition(|rule| rule.kind == FieldKind::Index);

    for rule in other_rules {
        if let Some(value) = fields.get(rule.name) {
            check_field(number, rule, value, &mut draft, &mut violations);
        }
    }
    for rule in index_rules {
        if let Some(value) = fields.get(rule.name) {
            check_field(number, rule, value, &mut draft, &mut violations);
        }
    }

    (violations, draft)
}

fn check_field(
    number: usize,
    rule: &FieldRule,
    value: &Value,
    draft: &mut QuestionDraft,
    violations: &mut Vec<Violation>,
) {
    let wrong_kind = Violation::WrongKind {
        question: number,
        field: rule.name,
        expected: rule.kind,
    };

    match rule.kind {
        FieldKind::Integer => match value.as_i64() {
            Some(number) => draft.set_integer(rule.name, number),
            None => violations.push(wrong_kind),
        },
        FieldKind::Text => match value.as_str() {
            Some(text) => draft.set_text(rule.name, text.to_string()),
            None => violations.push(wrong_kind),
        },
        FieldKind::Options => {
            let Some(items) = value.as_array() else {
                violations.push(wrong_kind);
                return;
            };
            if items.len() < MIN_OPTIONS {
                violations.push(Violation::TooFewOptions { question: number });
                return;
            }
            draft.option_count = Some(items.len());
            let mut options = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(text) => options.push(text.to_string()),
                    None => violations.push(Violation::OptionNotText {
                        question: number,
                        option: idx + 1,
                    }),
                }
            }
            if options.len() == items.len() {
                draft.options = Some(options);
            }
        }
        FieldKind::Index => {
            // Only meaningful once the options passed their own checks.
            let Some(count) = draft.option_count else {
                return;
            };
            match value.as_u64().and_then(|i| usize::try_from(i).ok()) {
                Some(index) if index < count => draft.correct_index = Some(index),
                _ => violations.push(Violation::InvalidCorrectIndex { question: number }),
            }
        }
        FieldKind::Graph => match serde_json::from_value::<GraphSpec>(value.clone()) {
            Ok(graph) => draft.graph = Some(graph),
            Err(e) => {
                tracing::warn!("question {number}: ignoring malformed graph: {e}");
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn good(id: i64) -> Value {
        json!({
            "id": id,
            "question": "Q",
            "options": ["a", "b"],
            "correct": 1,
            "topic": "T",
            "concept": "C"
        })
    }

    fn messages(raw: &Value) -> Vec<String> {
        validate(raw).report.messages()
    }

    #[test]
    fn accepts_minimal_question() {
        let outcome = validate(&json!([good(1)]));
        assert!(outcome.report.valid);
        assert!(outcome.report.violations.is_empty());
        let set = outcome.questions.unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().correct_index, 1);
        assert_eq!(set.get(0).unwrap().question_text, "Q");
    }

    #[test]
    fn accepts_empty_set() {
        let outcome = validate(&json!([]));
        assert!(outcome.report.valid);
        assert!(outcome.questions.unwrap().is_empty());
    }

    #[test]
    fn rejects_non_array_top_level() {
        assert_eq!(
            messages(&json!({"id": 1})),
            vec!["Question set must be an array"]
        );
        let outcome = validate(&json!("nope"));
        assert!(!outcome.report.valid);
        assert!(outcome.questions.is_none());
    }

    #[test]
    fn reports_every_missing_field() {
        let raw = json!([{ "id": 1, "options": ["a", "b"], "correct": 0 }]);
        assert_eq!(
            messages(&raw),
            vec![
                "Question 1 is missing the question field",
                "Question 1 is missing the topic field",
                "Question 1 is missing the concept field",
            ]
        );
    }

    #[test]
    fn legacy_rule_messages() {
        let mut not_array = good(1);
        not_array["options"] = json!("a,b");
        let mut too_few = good(2);
        too_few["options"] = json!(["only"]);
        too_few["correct"] = json!(0);
        let mut out_of_range = good(3);
        out_of_range["correct"] = json!(2);
        let mut negative = good(4);
        negative["correct"] = json!(-1);
        let mut not_number = good(5);
        not_number["correct"] = json!("1");

        assert_eq!(
            messages(&json!([not_array, too_few, out_of_range, negative, not_number])),
            vec![
                "Question 1 options must be an array",
                "Question 2 must have at least 2 options",
                "Question 3 has an invalid correct answer index",
                "Question 4 has an invalid correct answer index",
                "Question 5 has an invalid correct answer index",
            ]
        );
    }

    #[test]
    fn one_message_per_defective_question() {
        let mut missing = good(1);
        missing.as_object_mut().unwrap().remove("topic");
        let mut bad_options = good(2);
        bad_options["options"] = json!(42);
        let mut bad_index = good(3);
        bad_index["correct"] = json!(9);
        let mut bad_text = good(4);
        bad_text["concept"] = json!(["C"]);
        let defective = json!([missing, bad_options, bad_index, bad_text]);

        let outcome = validate(&defective);
        assert!(!outcome.report.valid);
        assert_eq!(outcome.report.violations.len(), 4);
        assert!(outcome.questions.is_none());
    }

    #[test]
    fn bad_options_skip_index_check() {
        let mut q = good(1);
        q["options"] = json!({"a": 1});
        q["correct"] = json!(99);
        assert_eq!(messages(&json!([q])), vec!["Question 1 options must be an array"]);
    }

    #[test]
    fn wrong_scalar_kinds() {
        let mut q = good(1);
        q["id"] = json!("one");
        q["topic"] = json!(3);
        assert_eq!(
            messages(&json!([q])),
            vec![
                "Question 1 id must be an integer",
                "Question 1 topic must be a string",
            ]
        );
    }

    #[test]
    fn non_string_option() {
        let mut q = good(1);
        q["options"] = json!(["a", 2, "c"]);
        assert_eq!(
            messages(&json!([q])),
            vec!["Question 1 option 2 must be a string"]
        );
    }

    #[test]
    fn bad_option_entry_does_not_shrink_index_range() {
        let mut q = good(1);
        q["options"] = json!(["a", 2, "c"]);
        q["correct"] = json!(2);
        assert_eq!(
            messages(&json!([q])),
            vec!["Question 1 option 2 must be a string"]
        );

        let mut q = good(2);
        q["options"] = json!(["a", 2]);
        q["correct"] = json!(1);
        assert_eq!(
            messages(&json!([q])),
            vec!["Question 1 option 2 must be a string"]
        );

        let mut q = good(3);
        q["options"] = json!(["a", 2]);
        q["correct"] = json!(2);
        assert_eq!(
            messages(&json!([q])),
            vec![
                "Question 1 option 2 must be a string",
                "Question 1 has an invalid correct answer index",
            ]
        );
    }

    #[test]
    fn non_object_question() {
        assert_eq!(
            messages(&json!([good(1), 5])),
            vec!["Question 2 must be an object"]
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        assert_eq!(
            messages(&json!([good(1), good(2), good(1)])),
            vec!["Question 3 reuses id 1 from question 1"]
        );
    }

    #[test]
    fn graph_and_latex_are_carried_through() {
        let mut q = good(1);
        q["latex"] = json!("f(x) = x^2");
        q["graph"] = json!({"type": "bar", "data": [{"x": "a", "y": 2}]});
        let set = validate(&json!([q])).questions.unwrap();
        let question = set.get(0).unwrap();
        assert_eq!(question.latex.as_deref(), Some("f(x) = x^2"));
        let graph = question.graph.as_ref().unwrap();
        assert_eq!(graph.kind, crate::model::GraphKind::Bar);
        assert_eq!(graph.series[0]["y"], json!(2));
    }

    #[test]
    fn malformed_graph_is_dropped_not_rejected() {
        let mut q = good(1);
        q["graph"] = json!({"type": "line", "data": "not a list"});
        let outcome = validate(&json!([q]));
        assert!(outcome.report.valid);
        assert!(outcome.questions.unwrap().get(0).unwrap().graph.is_none());
    }

    #[test]
    fn into_result_carries_violations() {
        let err = validate(&json!([{}])).into_result().unwrap_err();
        match err {
            QuizError::SchemaViolation(v) => assert_eq!(v.len(), 6),
            other => panic!("unexpected error: {other}"),
        }
    }
}
