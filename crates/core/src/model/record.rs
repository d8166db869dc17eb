use thiserror::Error;

use crate::model::{Answer, QuestionKey, QuestionSet};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur when finalizing a response record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("question has no answer: {0}")]
    UnansweredQuestion(String),

    #[error("elapsed time was never captured")]
    MissingElapsed,

    #[error("predicted time was never captured")]
    MissingEstimate,

    #[error("elapsed seconds cannot be negative")]
    NegativeElapsed,
}

//
// ─── RESPONSE RECORD ──────────────────────────────────────────────────────────
//

const NAME_COLUMN: &str = "Name";
const AGE_COLUMN: &str = "Age";
const ELAPSED_COLUMN: &str = "Time since started";
const PREDICTED_COLUMN: &str = "Predicted Time";

/// One respondent's answers, assembled incrementally over a session.
///
/// The record holds one slot per question key, in question order. Every
/// slot starts unanswered and the record only converts into a
/// [`CompletedResponse`] once each slot is filled and both timing fields
/// are captured. Partial records are never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRecord {
    name: String,
    age: String,
    slots: Vec<(QuestionKey, Option<Answer>)>,
    elapsed_secs: Option<f64>,
    predicted_time: Option<String>,
}

impl ResponseRecord {
    /// Create an empty record with one unanswered slot per question.
    #[must_use]
    pub fn for_questions(questions: &QuestionSet) -> Self {
        Self {
            name: String::new(),
            age: String::new(),
            slots: questions.iter().map(|q| (q.key().clone(), None)).collect(),
            elapsed_secs: None,
            predicted_time: None,
        }
    }

    pub(crate) fn set_identity(&mut self, name: String, age: String) {
        self.name = name;
        self.age = age;
    }

    pub(crate) fn set_answer(&mut self, index: usize, answer: Answer) {
        if let Some((_, slot)) = self.slots.get_mut(index) {
            *slot = Some(answer);
        }
    }

    pub(crate) fn set_elapsed(&mut self, secs: f64) {
        self.elapsed_secs = Some(secs);
    }

    pub(crate) fn set_predicted(&mut self, raw: String) {
        self.predicted_time = Some(raw);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn age(&self) -> &str {
        &self.age
    }

    /// The answer slot at a zero-based question position.
    #[must_use]
    pub fn answer_at(&self, index: usize) -> Option<Answer> {
        self.slots.get(index).and_then(|(_, slot)| *slot)
    }

    #[must_use]
    pub fn answer_for(&self, key: &QuestionKey) -> Option<Answer> {
        self.slots
            .iter()
            .find(|(slot_key, _)| slot_key == key)
            .and_then(|(_, slot)| *slot)
    }

    /// Number of slots that hold an answer.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.slots.iter().filter(|(_, slot)| slot.is_some()).count()
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.elapsed_secs
    }

    #[must_use]
    pub fn predicted_time(&self) -> Option<&str> {
        self.predicted_time.as_deref()
    }

    /// Resolve every sentinel slot into a completed response.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::UnansweredQuestion` naming the first empty
    /// slot, or `RecordError::MissingElapsed` / `RecordError::MissingEstimate`
    /// if a timing field was never captured.
    pub fn finalize(&self) -> Result<CompletedResponse, RecordError> {
        let mut answers = Vec::with_capacity(self.slots.len());
        for (key, slot) in &self.slots {
            let answer = slot.ok_or_else(|| RecordError::UnansweredQuestion(key.to_string()))?;
            answers.push((key.clone(), answer));
        }
        let elapsed_secs = self.elapsed_secs.ok_or(RecordError::MissingElapsed)?;
        let predicted_time = self
            .predicted_time
            .clone()
            .ok_or(RecordError::MissingEstimate)?;

        CompletedResponse::from_parts(
            self.name.clone(),
            self.age.clone(),
            answers,
            elapsed_secs,
            predicted_time,
        )
    }
}

//
// ─── COMPLETED RESPONSE ───────────────────────────────────────────────────────
//

/// A finalized response, ready for the results file.
///
/// `columns()` and `values()` are parallel: the writer derives the header
/// from `columns()` when it creates the file and appends `values()` as one
/// row. Answers serialize as 0 (No) / 1 (Yes), elapsed time is written with
/// two decimal places, and the predicted time is the respondent's input
/// verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedResponse {
    name: String,
    age: String,
    answers: Vec<(QuestionKey, Answer)>,
    elapsed_secs: f64,
    predicted_time: String,
}

impl CompletedResponse {
    /// Assemble a completed response from already-resolved parts.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::NegativeElapsed` if the elapsed time is below
    /// zero.
    pub fn from_parts(
        name: impl Into<String>,
        age: impl Into<String>,
        answers: Vec<(QuestionKey, Answer)>,
        elapsed_secs: f64,
        predicted_time: impl Into<String>,
    ) -> Result<Self, RecordError> {
        if elapsed_secs < 0.0 {
            return Err(RecordError::NegativeElapsed);
        }
        Ok(Self {
            name: name.into(),
            age: age.into(),
            answers,
            elapsed_secs,
            predicted_time: predicted_time.into(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn age(&self) -> &str {
        &self.age
    }

    #[must_use]
    pub fn answers(&self) -> &[(QuestionKey, Answer)] {
        &self.answers
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    #[must_use]
    pub fn predicted_time(&self) -> &str {
        &self.predicted_time
    }

    /// Field names, in results-file column order.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.answers.len() + 4);
        columns.push(NAME_COLUMN.to_string());
        columns.push(AGE_COLUMN.to_string());
        columns.extend(self.answers.iter().map(|(key, _)| key.to_string()));
        columns.push(ELAPSED_COLUMN.to_string());
        columns.push(PREDICTED_COLUMN.to_string());
        columns
    }

    /// Row cells, parallel to `columns()`.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        let mut values = Vec::with_capacity(self.answers.len() + 4);
        values.push(self.name.clone());
        values.push(self.age.clone());
        values.extend(
            self.answers
                .iter()
                .map(|(_, answer)| answer.as_u8().to_string()),
        );
        values.push(format!("{:.2}", self.elapsed_secs));
        values.push(self.predicted_time.clone());
        values
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
