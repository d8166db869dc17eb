use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Answer, CompletedResponse, Question, QuestionSet, RecordError, ResponseRecord};
use crate::time;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors emitted by survey session transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions are configured")]
    NoQuestions,

    #[error("the current question has not been answered")]
    Unanswered,

    #[error("operation is not valid in the current stage")]
    WrongStage,

    #[error(transparent)]
    Record(#[from] RecordError),
}

//
// ─── STAGE ────────────────────────────────────────────────────────────────────
//

/// Observable position of a survey session.
///
/// Stages only move forward, from `Intake` through `Asking(0..n)` and
/// `EstimateCapture` to `Finalizing` and `Complete`. There is no idle
/// stage; an idle application simply holds no session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyStage {
    /// Waiting for the respondent's name and age.
    Intake,
    /// Asking the question at the zero-based index.
    Asking(usize),
    /// Waiting for the respondent's own duration estimate.
    EstimateCapture,
    /// Record is complete but not yet written; a failed write stays here.
    Finalizing,
    /// Record was written; the session is over.
    Complete,
}

//
// ─── SURVEY SESSION ───────────────────────────────────────────────────────────
//

/// One respondent's pass through the survey, from intake to submission.
///
/// The session owns a snapshot of the questions plus the in-progress
/// response record, and enforces the stage order. It never reads a clock
/// and never touches storage: callers inject timestamps and drive
/// persistence (see the services crate). Dropping a session before
/// `Complete` abandons it; nothing is ever written for a partial record.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveySession {
    questions: QuestionSet,
    stage: SurveyStage,
    record: ResponseRecord,
    started_at: Option<DateTime<Utc>>,
}

impl SurveySession {
    /// Start a session over a snapshot of the current questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestions` if the set is empty.
    pub fn new(questions: QuestionSet) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        let record = ResponseRecord::for_questions(&questions);
        Ok(Self {
            questions,
            stage: SurveyStage::Intake,
            record,
            started_at: None,
        })
    }

    /// Capture the respondent's name and age and start the timer.
    ///
    /// Both values are stored verbatim; `now` becomes the session start
    /// timestamp that elapsed time is measured from.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongStage` outside of `Intake`.
    pub fn submit_intake(
        &mut self,
        name: impl Into<String>,
        age: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.stage != SurveyStage::Intake {
            return Err(SessionError::WrongStage);
        }
        self.record.set_identity(name.into(), age.into());
        self.started_at = Some(now);
        self.stage = SurveyStage::Asking(0);
        Ok(())
    }

    /// Select (or replace) the answer for the question being asked.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongStage` outside of `Asking`.
    pub fn choose(&mut self, answer: Answer) -> Result<(), SessionError> {
        let SurveyStage::Asking(index) = self.stage else {
            return Err(SessionError::WrongStage);
        };
        self.record.set_answer(index, answer);
        Ok(())
    }

    /// Move past the current question, or into estimate capture after the
    /// last one. Leaving the last question captures the elapsed time.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Unanswered` (stage unchanged) if the current
    /// question has no answer yet, `SessionError::WrongStage` outside of
    /// `Asking`.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        let SurveyStage::Asking(index) = self.stage else {
            return Err(SessionError::WrongStage);
        };
        if self.record.answer_at(index).is_none() {
            return Err(SessionError::Unanswered);
        }

        let next = index + 1;
        if next < self.questions.len() {
            self.stage = SurveyStage::Asking(next);
            return Ok(());
        }

        let Some(started) = self.started_at else {
            return Err(SessionError::WrongStage);
        };
        self.record.set_elapsed(time::elapsed_seconds(started, now));
        self.stage = SurveyStage::EstimateCapture;
        Ok(())
    }

    /// Store the respondent's self-estimated duration, verbatim.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongStage` outside of `EstimateCapture`.
    pub fn submit_estimate(&mut self, raw: impl Into<String>) -> Result<(), SessionError> {
        if self.stage != SurveyStage::EstimateCapture {
            return Err(SessionError::WrongStage);
        }
        self.record.set_predicted(raw.into());
        self.stage = SurveyStage::Finalizing;
        Ok(())
    }

    /// Resolve the record for persistence.
    ///
    /// The stage stays `Finalizing` until [`SurveySession::mark_submitted`],
    /// so a failed write leaves the record intact for a retry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongStage` outside of `Finalizing`.
    pub fn finalize(&self) -> Result<CompletedResponse, SessionError> {
        if self.stage != SurveyStage::Finalizing {
            return Err(SessionError::WrongStage);
        }
        Ok(self.record.finalize()?)
    }

    /// Mark the record as written; the session is over.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongStage` outside of `Finalizing`.
    pub fn mark_submitted(&mut self) -> Result<(), SessionError> {
        if self.stage != SurveyStage::Finalizing {
            return Err(SessionError::WrongStage);
        }
        self.stage = SurveyStage::Complete;
        Ok(())
    }

    #[must_use]
    pub fn stage(&self) -> SurveyStage {
        self.stage
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    /// The question being asked, when the session is in `Asking`.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.stage {
            SurveyStage::Asking(index) => self.questions.at(index),
            _ => None,
        }
    }

    /// The answer currently selected for the question being asked.
    #[must_use]
    pub fn current_answer(&self) -> Option<Answer> {
        match self.stage {
            SurveyStage::Asking(index) => self.record.answer_at(index),
            _ => None,
        }
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn record(&self) -> &ResponseRecord {
        &self.record
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.stage == SurveyStage::Complete
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, QuestionKey};
    use crate::time::fixed_now;
    use chrono::Duration;

    fn questions(keys: &[&str]) -> QuestionSet {
        let mut set = QuestionSet::new();
        for key in keys {
            let question =
                Question::new(QuestionKey::new(*key).unwrap(), format!("{key}?")).unwrap();
            set.upsert(question);
        }
        set
    }

    fn session(keys: &[&str]) -> SurveySession {
        SurveySession::new(questions(keys)).unwrap()
    }

    #[test]
    fn empty_question_set_is_rejected() {
        let err = SurveySession::new(QuestionSet::new()).unwrap_err();
        assert!(matches!(err, SessionError::NoQuestions));
    }

    #[test]
    fn intake_starts_the_question_flow() {
        let mut session = session(&["a", "b"]);
        assert_eq!(session.stage(), SurveyStage::Intake);
        assert!(session.current_question().is_none());

        session.submit_intake("Taro", "20", fixed_now()).unwrap();

        assert_eq!(session.stage(), SurveyStage::Asking(0));
        assert_eq!(session.record().name(), "Taro");
        assert_eq!(session.record().age(), "20");
        assert_eq!(session.started_at(), Some(fixed_now()));
        assert_eq!(session.current_question().unwrap().key().as_str(), "a");
    }

    #[test]
    fn operations_outside_their_stage_are_rejected() {
        let mut session = session(&["a"]);

        assert!(matches!(
            session.choose(Answer::Yes).unwrap_err(),
            SessionError::WrongStage
        ));
        assert!(matches!(
            session.advance(fixed_now()).unwrap_err(),
            SessionError::WrongStage
        ));
        assert!(matches!(
            session.submit_estimate("30").unwrap_err(),
            SessionError::WrongStage
        ));
        assert!(matches!(
            session.finalize().unwrap_err(),
            SessionError::WrongStage
        ));

        session.submit_intake("Taro", "20", fixed_now()).unwrap();
        assert!(matches!(
            session.submit_intake("again", "21", fixed_now()).unwrap_err(),
            SessionError::WrongStage
        ));
    }

    #[test]
    fn advancing_without_an_answer_warns_and_stays_put() {
        let mut session = session(&["a", "b"]);
        session.submit_intake("Taro", "20", fixed_now()).unwrap();

        let err = session.advance(fixed_now()).unwrap_err();

        assert!(matches!(err, SessionError::Unanswered));
        assert_eq!(session.stage(), SurveyStage::Asking(0));
        assert!(session.current_answer().is_none());
    }

    #[test]
    fn choosing_again_replaces_the_answer() {
        let mut session = session(&["a"]);
        session.submit_intake("Taro", "20", fixed_now()).unwrap();

        session.choose(Answer::Yes).unwrap();
        session.choose(Answer::No).unwrap();

        assert_eq!(session.current_answer(), Some(Answer::No));
    }

    #[test]
    fn alternating_answers_land_in_question_order() {
        let mut session = session(&["a", "b", "c", "d"]);
        session.submit_intake("Taro", "20", fixed_now()).unwrap();

        for index in 0..4 {
            let answer = if index % 2 == 0 { Answer::Yes } else { Answer::No };
            session.choose(answer).unwrap();
            session.advance(fixed_now()).unwrap();
        }

        assert_eq!(session.stage(), SurveyStage::EstimateCapture);
        let record = session.record();
        assert_eq!(record.answer_at(0), Some(Answer::Yes));
        assert_eq!(record.answer_at(1), Some(Answer::No));
        assert_eq!(record.answer_at(2), Some(Answer::Yes));
        assert_eq!(record.answer_at(3), Some(Answer::No));
    }

    #[test]
    fn leaving_the_last_question_captures_elapsed_time() {
        let mut session = session(&["a", "b"]);
        let start = fixed_now();
        session.submit_intake("Taro", "20", start).unwrap();

        session.choose(Answer::Yes).unwrap();
        session.advance(start + Duration::seconds(10)).unwrap();
        assert!(session.record().elapsed_secs().is_none());

        session.choose(Answer::No).unwrap();
        session
            .advance(start + Duration::milliseconds(30_125))
            .unwrap();

        assert_eq!(session.stage(), SurveyStage::EstimateCapture);
        assert_eq!(session.record().elapsed_secs(), Some(30.13));
    }

    #[test]
    fn estimate_is_stored_verbatim() {
        let mut session = session(&["a"]);
        session.submit_intake("Taro", "20", fixed_now()).unwrap();
        session.choose(Answer::Yes).unwrap();
        session.advance(fixed_now()).unwrap();

        session.submit_estimate("  30分ぐらい ").unwrap();

        assert_eq!(session.stage(), SurveyStage::Finalizing);
        assert_eq!(session.record().predicted_time(), Some("  30分ぐらい "));
    }

    #[test]
    fn finalize_then_mark_submitted_completes_the_session() {
        let mut session = session(&["a", "b"]);
        let start = fixed_now();
        session.submit_intake("Taro", "20", start).unwrap();
        session.choose(Answer::Yes).unwrap();
        session.advance(start + Duration::seconds(12)).unwrap();
        session.choose(Answer::No).unwrap();
        session.advance(start + Duration::seconds(30)).unwrap();
        session.submit_estimate("30").unwrap();

        let completed = session.finalize().unwrap();
        assert_eq!(completed.values(), ["Taro", "20", "1", "0", "30.00", "30"]);

        // A failed write would leave the stage here for a retry.
        assert_eq!(session.stage(), SurveyStage::Finalizing);
        session.finalize().unwrap();

        session.mark_submitted().unwrap();
        assert!(session.is_submitted());
        assert!(matches!(
            session.finalize().unwrap_err(),
            SessionError::WrongStage
        ));
        assert!(matches!(
            session.mark_submitted().unwrap_err(),
            SessionError::WrongStage
        ));
    }
}
