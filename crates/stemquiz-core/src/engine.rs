//! Quiz session state machine.
//!
//! A session walks a validated question set one question at a time. Each
//! `submit_answer` records exactly one [`AnswerRecord`] for the current
//! question, then either moves to the next question (restarting its timer)
//! or completes the session. There is no skipping, going back, or timeout.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::error::TransitionError;
use crate::model::{AnswerRecord, Question, QuestionSet};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    InProgress { current_index: usize },
    Complete,
}

/// Mutable state of one session. Only [`SessionState::advance`] changes it.
///
/// The current question index lives in [`Phase::InProgress`] alone.
#[derive(Debug, Clone)]
pub(crate) struct SessionState {
    answers: Vec<AnswerRecord>,
    question_started_at: Instant,
    phase: Phase,
}

impl SessionState {
    /// Initial state for a set of `total` questions started at `now`.
    ///
    /// An empty set has nothing to answer and starts out complete.
    pub(crate) fn initial(total: usize, now: Instant) -> Self {
        let phase = if total == 0 {
            Phase::Complete
        } else {
            Phase::InProgress { current_index: 0 }
        };
        Self {
            answers: Vec::with_capacity(total),
            question_started_at: now,
            phase,
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub(crate) fn into_answers(self) -> Vec<AnswerRecord> {
        self.answers
    }

    /// The transition function: answer the current question with option
    /// `selected` at instant `now`.
    pub(crate) fn advance(
        &mut self,
        questions: &QuestionSet,
        selected: usize,
        now: Instant,
    ) -> Result<&AnswerRecord, TransitionError> {
        let Phase::InProgress { current_index } = self.phase else {
            return Err(TransitionError::SessionComplete);
        };
        let question = questions
            .get(current_index)
            .ok_or(TransitionError::SessionComplete)?;

        let elapsed = match now.checked_duration_since(self.question_started_at) {
            Some(elapsed) => elapsed,
            None => {
                tracing::warn!(
                    question_id = question.id,
                    "clock went backwards; recording zero time spent"
                );
                std::time::Duration::ZERO
            }
        };

        let record = AnswerRecord {
            question_id: question.id,
            topic: question.topic.clone(),
            concept: question.concept.clone(),
            time_spent_seconds: elapsed.as_secs_f64(),
            is_correct: question.is_correct(selected),
            selected_index: selected,
        };
        tracing::debug!(
            question_id = record.question_id,
            correct = record.is_correct,
            seconds = record.time_spent_seconds,
            "answer recorded"
        );
        self.answers.push(record);

        let next = current_index + 1;
        if next >= questions.len() {
            self.phase = Phase::Complete;
        } else {
            self.phase = Phase::InProgress {
                current_index: next,
            };
            self.question_started_at = now;
        }

        // Just pushed, so the list is non-empty.
        self.answers.last().ok_or(TransitionError::SessionComplete)
    }
}

/// Drives one quiz session over a validated question set.
pub struct SessionEngine {
    questions: QuestionSet,
    state: SessionState,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("questions", &self.questions.len())
            .field("state", &self.state)
            .finish()
    }
}

impl SessionEngine {
    /// Start a session timed by the system clock.
    pub fn start(questions: QuestionSet) -> Self {
        Self::start_with_clock(questions, Arc::new(SystemClock))
    }

    /// Start a session with an injected clock.
    pub fn start_with_clock(questions: QuestionSet, clock: Arc<dyn Clock>) -> Self {
        let state = SessionState::initial(questions.len(), clock.now());
        tracing::debug!(questions = questions.len(), "session started");
        Self {
            questions,
            state,
            clock,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == Phase::Complete
    }

    /// The question awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase() {
            Phase::InProgress { current_index } => self.questions.get(current_index),
            Phase::Complete => None,
        }
    }

    /// `(answered, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (self.state.answers().len(), self.questions.len())
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        self.state.answers()
    }

    /// Answer the current question with option `selected`.
    ///
    /// The index is not range-checked; an out-of-range pick is recorded as
    /// incorrect.
    pub fn submit_answer(&mut self, selected: usize) -> Result<&AnswerRecord, TransitionError> {
        let now = self.clock.now();
        self.state.advance(&self.questions, selected, now)
    }

    /// Consume a completed session, returning its transcript.
    pub fn into_transcript(self) -> Result<Vec<AnswerRecord>, TransitionError> {
        if !self.is_complete() {
            let (answered, total) = self.progress();
            return Err(TransitionError::SessionInProgress { answered, total });
        }
        Ok(self.state.into_answers())
    }
}

/// Parse a 1-based option number as typed by a user into a 0-based index.
///
/// Anything that is not a positive integer is a structurally invalid
/// selection.
pub fn parse_selection(input: &str) -> Result<usize, TransitionError> {
    let trimmed = input.trim();
    match trimmed.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(TransitionError::InvalidSelection(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::schema::validate;
    use serde_json::json;
    use std::time::Duration;

    fn question_set(ids: &[i64]) -> QuestionSet {
        let raw: Vec<_> = ids
            .iter()
            .map(|id| {
                json!({
                    "id": id,
                    "question": format!("Question {id}"),
                    "options": ["a", "b", "c"],
                    "correct": 1,
                    "topic": "T",
                    "concept": "C"
                })
            })
            .collect();
        validate(&json!(raw)).questions.unwrap()
    }

    fn engine(ids: &[i64]) -> (Arc<ManualClock>, SessionEngine) {
        let clock = Arc::new(ManualClock::new());
        let engine = SessionEngine::start_with_clock(question_set(ids), clock.clone());
        (clock, engine)
    }

    #[test]
    fn records_one_answer_per_question_in_order() {
        let ids = [10, 3, 7, 1];
        let (_clock, mut engine) = engine(&ids);

        let mut phases = vec![engine.phase()];
        for _ in &ids {
            engine.submit_answer(0).unwrap();
            phases.push(engine.phase());
        }

        assert_eq!(
            phases,
            vec![
                Phase::InProgress { current_index: 0 },
                Phase::InProgress { current_index: 1 },
                Phase::InProgress { current_index: 2 },
                Phase::InProgress { current_index: 3 },
                Phase::Complete,
            ]
        );
        let transcript = engine.into_transcript().unwrap();
        let recorded: Vec<i64> = transcript.iter().map(|a| a.question_id).collect();
        assert_eq!(recorded, ids);
    }

    #[test]
    fn scores_against_correct_index() {
        let (_clock, mut engine) = engine(&[1, 2, 3, 4]);
        assert!(engine.submit_answer(1).unwrap().is_correct);
        assert!(!engine.submit_answer(0).unwrap().is_correct);
        assert!(!engine.submit_answer(2).unwrap().is_correct);
        let out_of_range = engine.submit_answer(99).unwrap();
        assert!(!out_of_range.is_correct);
        assert_eq!(out_of_range.selected_index, 99);
    }

    #[test]
    fn timer_restarts_per_question() {
        let (clock, mut engine) = engine(&[1, 2]);
        clock.advance(Duration::from_millis(2500));
        let first = engine.submit_answer(1).unwrap().time_spent_seconds;
        clock.advance(Duration::from_millis(750));
        let second = engine.submit_answer(1).unwrap().time_spent_seconds;

        assert!((first - 2.5).abs() < 1e-9);
        assert!((second - 0.75).abs() < 1e-9);
    }

    #[test]
    fn backwards_clock_clamps_to_zero() {
        let (clock, mut engine) = engine(&[1]);
        clock.rewind(Duration::from_secs(5));
        let record = engine.submit_answer(1).unwrap();
        assert_eq!(record.time_spent_seconds, 0.0);
    }

    #[test]
    fn submit_after_complete_is_rejected() {
        let (_clock, mut engine) = engine(&[1]);
        engine.submit_answer(1).unwrap();
        assert_eq!(
            engine.submit_answer(0).unwrap_err(),
            TransitionError::SessionComplete
        );
        assert_eq!(engine.answers().len(), 1);
    }

    #[test]
    fn transcript_requires_completion() {
        let (_clock, mut engine) = engine(&[1, 2]);
        engine.submit_answer(0).unwrap();
        assert_eq!(
            engine.into_transcript().unwrap_err(),
            TransitionError::SessionInProgress {
                answered: 1,
                total: 2
            }
        );
    }

    #[test]
    fn empty_set_starts_complete() {
        let (_clock, mut engine) = engine(&[]);
        assert!(engine.is_complete());
        assert!(engine.current_question().is_none());
        assert_eq!(engine.progress(), (0, 0));
        assert_eq!(
            engine.submit_answer(0).unwrap_err(),
            TransitionError::SessionComplete
        );
        assert!(engine.into_transcript().unwrap().is_empty());
    }

    #[test]
    fn current_question_follows_progress() {
        let (_clock, mut engine) = engine(&[5, 6]);
        assert_eq!(engine.current_question().unwrap().id, 5);
        engine.submit_answer(1).unwrap();
        assert_eq!(engine.current_question().unwrap().id, 6);
        assert_eq!(engine.progress(), (1, 2));
    }

    #[test]
    fn state_transitions_carry_index_in_phase() {
        let questions = question_set(&[4, 8]);
        let start = Instant::now();
        let mut state = SessionState::initial(questions.len(), start);
        assert_eq!(state.phase(), Phase::InProgress { current_index: 0 });

        let later = start + Duration::from_secs(3);
        assert_eq!(state.advance(&questions, 1, later).unwrap().question_id, 4);
        assert_eq!(state.phase(), Phase::InProgress { current_index: 1 });

        let record = state.advance(&questions, 0, later).unwrap();
        assert_eq!(record.question_id, 8);
        assert_eq!(record.time_spent_seconds, 0.0);
        assert_eq!(state.phase(), Phase::Complete);
        assert_eq!(state.answers().len(), 2);
        assert_eq!(
            state.advance(&questions, 0, later).unwrap_err(),
            TransitionError::SessionComplete
        );
    }

    #[test]
    fn parse_selection_accepts_one_based_numbers() {
        assert_eq!(parse_selection("1"), Ok(0));
        assert_eq!(parse_selection(" 3\n"), Ok(2));
        assert!(matches!(
            parse_selection("0"),
            Err(TransitionError::InvalidSelection(_))
        ));
        assert!(parse_selection("-2").is_err());
        assert!(parse_selection("b").is_err());
        assert!(parse_selection("1.5").is_err());
    }
}
