use std::sync::Arc;

use storage::repository::{QuestionRepository, ResultsRepository};
use tempo_core::model::{Answer, SurveySession};

use crate::Clock;
use crate::error::SurveyError;

/// Orchestrates survey sessions over the question store and results sink.
///
/// The session state machine itself lives in `tempo-core`; this service
/// injects the clock into its transitions and owns the one storage write
/// at the end of a session.
#[derive(Clone)]
pub struct SurveyService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    results: Arc<dyn ResultsRepository>,
}

impl SurveyService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionRepository>,
        results: Arc<dyn ResultsRepository>,
    ) -> Self {
        Self {
            clock,
            questions,
            results,
        }
    }

    /// Load the current questions and open a session at intake.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Session` when no questions are configured, or
    /// `SurveyError::Storage` if the question store cannot be read.
    pub fn start_survey(&self) -> Result<SurveySession, SurveyError> {
        let questions = self.questions.load()?;
        Ok(SurveySession::new(questions)?)
    }

    /// Capture the respondent's name and age; starts the session timer.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Session` if the session is past intake.
    pub fn submit_intake(
        &self,
        session: &mut SurveySession,
        name: &str,
        age: &str,
    ) -> Result<(), SurveyError> {
        session.submit_intake(name, age, self.clock.now())?;
        Ok(())
    }

    /// Select (or replace) the answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Session` if no question is being asked.
    pub fn choose(&self, session: &mut SurveySession, answer: Answer) -> Result<(), SurveyError> {
        session.choose(answer)?;
        Ok(())
    }

    /// Advance past the current question.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Session` wrapping `SessionError::Unanswered`
    /// when the current question has no answer yet; the session does not
    /// move.
    pub fn advance(&self, session: &mut SurveySession) -> Result<(), SurveyError> {
        session.advance(self.clock.now())?;
        Ok(())
    }

    /// Store the respondent's self-estimated duration, verbatim.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Session` outside of estimate capture.
    pub fn submit_estimate(
        &self,
        session: &mut SurveySession,
        raw: &str,
    ) -> Result<(), SurveyError> {
        session.submit_estimate(raw)?;
        Ok(())
    }

    /// Append the completed record and mark the session submitted.
    ///
    /// Safe to call again after a storage failure: the session stays in
    /// `Finalizing` with its record intact until an append succeeds, and a
    /// session that already submitted is left alone.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Storage` if the append fails.
    pub fn finalize(&self, session: &mut SurveySession) -> Result<(), SurveyError> {
        if session.is_submitted() {
            return Ok(());
        }
        let response = session.finalize()?;
        self.results.append(&response)?;
        session.mark_submitted()?;
        Ok(())
    }
}
