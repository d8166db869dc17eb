use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tempo_core::model::{CompletedResponse, Question, QuestionError, QuestionKey, QuestionSet};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("malformed question file: {0}")]
    MalformedQuestionFile(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<csv::Error> for StorageError {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => StorageError::Io(io),
            _ => StorageError::Serialization(message),
        }
    }
}

/// Persisted shape for one question definition.
///
/// This mirrors the domain `Question` so repositories can read and write
/// rows without leaking file-format concerns into the domain layer. The
/// serde renames fix the on-disk column names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRow {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Question")]
    pub question: String,
}

impl QuestionRow {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            key: question.key().as_str().to_owned(),
            question: question.text().to_owned(),
        }
    }

    /// Convert the row back into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the key or text fail validation.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(QuestionKey::new(self.key)?, self.question)
    }
}

/// Repository contract for the question definitions.
pub trait QuestionRepository: Send + Sync {
    /// Load the full question set. A store that has never been written
    /// loads as an empty set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::MalformedQuestionFile` if the persisted data
    /// exists but does not match the expected shape, or other storage
    /// errors.
    fn load(&self) -> Result<QuestionSet, StorageError>;

    /// Replace the persisted question set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the set cannot be stored.
    fn save(&self, questions: &QuestionSet) -> Result<(), StorageError>;
}

/// Repository contract for the append-only results table.
pub trait ResultsRepository: Send + Sync {
    /// Append one completed response. The first append fixes the column
    /// set; later appends are written without re-validating it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be written.
    fn append(&self, response: &CompletedResponse) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<QuestionSet>>,
    responses: Arc<Mutex<Vec<CompletedResponse>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            questions: Arc::new(Mutex::new(QuestionSet::new())),
            responses: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of every appended response, in call order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the store lock is poisoned.
    pub fn appended(&self) -> Result<Vec<CompletedResponse>, StorageError> {
        let guard = self
            .responses
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }
}

impl QuestionRepository for InMemoryRepository {
    fn load(&self) -> Result<QuestionSet, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, questions: &QuestionSet) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = questions.clone();
        Ok(())
    }
}

impl ResultsRepository for InMemoryRepository {
    fn append(&self, response: &CompletedResponse) -> Result<(), StorageError> {
        let mut guard = self
            .responses
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        guard.push(response.clone());
        Ok(())
    }
}

/// Aggregates the question store and results sink behind trait objects for
/// easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub results: Arc<dyn ResultsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultsRepository> = Arc::new(repo);
        Self { questions, results }
    }
}
