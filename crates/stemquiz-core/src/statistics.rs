//! Question-set and session statistics.
//!
//! Everything here preserves first-seen order: topics and concepts are
//! listed in the order they first appear in the questions (or answers).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerRecord, QuestionSet};

/// How many questions share one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

/// How many questions share one concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptCount {
    pub concept: String,
    pub count: usize,
}

/// Overview of a question set, shown before a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSetStats {
    pub total_questions: usize,
    pub topics: Vec<String>,
    pub concepts: Vec<String>,
    pub topic_distribution: Vec<TopicCount>,
    pub concept_distribution: Vec<ConceptCount>,
}

/// Count occurrences in one pass, keeping first-seen order.
fn tally<'a>(names: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for name in names {
        match position.get(name) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                position.insert(name, counts.len());
                counts.push((name, 1));
            }
        }
    }
    counts
}

/// Compute topic and concept distributions for a question set.
pub fn aggregate(questions: &QuestionSet) -> QuestionSetStats {
    let topics = tally(questions.iter().map(|q| q.topic.as_str()));
    let concepts = tally(questions.iter().map(|q| q.concept.as_str()));

    QuestionSetStats {
        total_questions: questions.len(),
        topics: topics.iter().map(|(name, _)| name.to_string()).collect(),
        concepts: concepts.iter().map(|(name, _)| name.to_string()).collect(),
        topic_distribution: topics
            .iter()
            .map(|&(topic, count)| TopicCount {
                topic: topic.to_string(),
                count,
            })
            .collect(),
        concept_distribution: concepts
            .iter()
            .map(|&(concept, count)| ConceptCount {
                concept: concept.to_string(),
                count,
            })
            .collect(),
    }
}

/// Time spent on one question, labelled for charting (`Q1`, `Q2`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub label: String,
    pub seconds: f64,
}

/// Accuracy and timing for one topic or concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPerformance {
    pub name: String,
    pub answered: usize,
    pub correct: usize,
    pub average_time_seconds: f64,
}

impl GroupPerformance {
    pub fn accuracy(&self) -> f64 {
        if self.answered == 0 {
            0.0
        } else {
            self.correct as f64 / self.answered as f64
        }
    }
}

/// Results of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub answered: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub total_time_seconds: f64,
    /// Zero when nothing was answered.
    pub average_time_seconds: f64,
    pub time_series: Vec<TimePoint>,
    pub per_topic: Vec<GroupPerformance>,
    pub per_concept: Vec<GroupPerformance>,
}

fn group_performance<'a>(
    answers: &'a [AnswerRecord],
    key: impl Fn(&'a AnswerRecord) -> &'a str,
) -> Vec<GroupPerformance> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(GroupPerformance, f64)> = Vec::new();

    for answer in answers {
        let name = key(answer);
        let idx = *position.entry(name).or_insert_with(|| {
            groups.push((
                GroupPerformance {
                    name: name.to_string(),
                    answered: 0,
                    correct: 0,
                    average_time_seconds: 0.0,
                },
                0.0,
            ));
            groups.len() - 1
        });
        let (group, total_time) = &mut groups[idx];
        group.answered += 1;
        if answer.is_correct {
            group.correct += 1;
        }
        *total_time += answer.time_spent_seconds;
    }

    groups
        .into_iter()
        .map(|(mut group, total_time)| {
            group.average_time_seconds = total_time / group.answered as f64;
            group
        })
        .collect()
}

/// Summarize a transcript.
pub fn summarize(answers: &[AnswerRecord]) -> PerformanceSummary {
    let answered = answers.len();
    let correct = answers.iter().filter(|a| a.is_correct).count();
    let total_time_seconds: f64 = answers.iter().map(|a| a.time_spent_seconds).sum();

    let (accuracy, average_time_seconds) = if answered == 0 {
        (0.0, 0.0)
    } else {
        (
            correct as f64 / answered as f64,
            total_time_seconds / answered as f64,
        )
    };

    let time_series = answers
        .iter()
        .enumerate()
        .map(|(i, a)| TimePoint {
            label: format!("Q{}", i + 1),
            seconds: a.time_spent_seconds,
        })
        .collect();

    PerformanceSummary {
        answered,
        correct,
        accuracy,
        total_time_seconds,
        average_time_seconds,
        time_series,
        per_topic: group_performance(answers, |a| a.topic.as_str()),
        per_concept: group_performance(answers, |a| a.concept.as_str()),
    }
}
