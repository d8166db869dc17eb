use std::sync::Arc;

use storage::repository::QuestionRepository;
use tempo_core::model::{Question, QuestionKey, QuestionSet};

use crate::error::SettingsError;

/// Orchestrates question management: every mutation is load, change, save,
/// so the persisted file always matches what the settings screen shows.
#[derive(Clone)]
pub struct SettingsService {
    questions: Arc<dyn QuestionRepository>,
}

impl SettingsService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>) -> Self {
        Self { questions }
    }

    /// Current questions, in prompt order.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Storage` if the store cannot be read.
    pub fn list(&self) -> Result<QuestionSet, SettingsError> {
        Ok(self.questions.load()?)
    }

    /// Add a question, or overwrite the text when the key already exists.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Question` for an empty key or text, or
    /// `SettingsError::Storage` if persistence fails.
    pub fn add(&self, key: &str, text: &str) -> Result<(), SettingsError> {
        let question = Question::new(QuestionKey::new(key)?, text)?;
        let mut questions = self.questions.load()?;
        questions.upsert(question);
        self.questions.save(&questions)?;
        Ok(())
    }

    /// Replace the text of an existing question.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Question` for an unknown key or empty text,
    /// or `SettingsError::Storage` if persistence fails.
    pub fn edit(&self, key: &QuestionKey, text: &str) -> Result<(), SettingsError> {
        let mut questions = self.questions.load()?;
        questions.edit(key, text)?;
        self.questions.save(&questions)?;
        Ok(())
    }

    /// Delete a question. Rows already recorded under its column are left
    /// untouched in the results file.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Question` for an unknown key, or
    /// `SettingsError::Storage` if persistence fails.
    pub fn delete(&self, key: &QuestionKey) -> Result<(), SettingsError> {
        let mut questions = self.questions.load()?;
        questions.remove(key)?;
        self.questions.save(&questions)?;
        Ok(())
    }
}
