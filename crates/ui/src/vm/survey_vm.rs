use services::{SurveyError, SurveyService};
use tempo_core::model::{Answer, SessionError, SurveySession, SurveyStage};

use crate::views::ViewError;

/// User actions a survey view can dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurveyIntent {
    SubmitIntake { name: String, age: String },
    Choose(Answer),
    Advance,
    SubmitEstimate { raw: String },
    Finalize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Moved,
    NeedsAnswer,
}

pub struct SurveyVm {
    session: SurveySession,
}

impl SurveyVm {
    #[must_use]
    pub fn new(session: SurveySession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn stage(&self) -> SurveyStage {
        self.session.stage()
    }

    #[must_use]
    pub fn question_text(&self) -> Option<&str> {
        self.session
            .current_question()
            .map(|question| question.text())
    }

    /// One-based position for the progress label.
    #[must_use]
    pub fn question_number(&self) -> Option<usize> {
        match self.session.stage() {
            SurveyStage::Asking(index) => Some(index + 1),
            _ => None,
        }
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.session.total_questions()
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<Answer> {
        self.session.current_answer()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_submitted()
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` for service failures.
    pub fn submit_intake(
        &mut self,
        service: &SurveyService,
        name: &str,
        age: &str,
    ) -> Result<(), ViewError> {
        service
            .submit_intake(&mut self.session, name, age)
            .map_err(|err| map_survey_error(&err))
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` for service failures.
    pub fn choose(&mut self, service: &SurveyService, answer: Answer) -> Result<(), ViewError> {
        service
            .choose(&mut self.session, answer)
            .map_err(|err| map_survey_error(&err))
    }

    /// Move past the current question. An unanswered question is not an
    /// error panel; it surfaces as `AdvanceOutcome::NeedsAnswer` so the
    /// view can warn inline.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` for service failures.
    pub fn advance(&mut self, service: &SurveyService) -> Result<AdvanceOutcome, ViewError> {
        match service.advance(&mut self.session) {
            Ok(()) => Ok(AdvanceOutcome::Moved),
            Err(SurveyError::Session(SessionError::Unanswered)) => Ok(AdvanceOutcome::NeedsAnswer),
            Err(err) => Err(map_survey_error(&err)),
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` for service failures.
    pub fn submit_estimate(&mut self, service: &SurveyService, raw: &str) -> Result<(), ViewError> {
        service
            .submit_estimate(&mut self.session, raw)
            .map_err(|err| map_survey_error(&err))
    }

    /// Write the finished record. Failures leave the session ready for a
    /// retry with the same answers.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the append fails.
    pub fn finalize(&mut self, service: &SurveyService) -> Result<(), ViewError> {
        service
            .finalize(&mut self.session)
            .map_err(|err| map_survey_error(&err))
    }
}

fn map_survey_error(err: &SurveyError) -> ViewError {
    match err {
        SurveyError::Session(SessionError::NoQuestions) => ViewError::NoQuestions,
        _ => ViewError::Unknown,
    }
}

/// # Errors
///
/// Returns `ViewError::NoQuestions` when no questions are configured.
/// Returns `ViewError::Unknown` for other failures.
pub fn start_survey(service: &SurveyService) -> Result<SurveyVm, ViewError> {
    let session = service.start_survey().map_err(|err| map_survey_error(&err))?;
    Ok(SurveyVm::new(session))
}
