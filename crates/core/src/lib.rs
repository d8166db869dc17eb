#![forbid(unsafe_code)]

pub mod model;
pub mod time;

pub use time::{Clock, fixed_clock, fixed_now};

pub use model::{
    Answer, AnswerError, CompletedResponse, Question, QuestionError, QuestionKey, QuestionSet,
    RecordError, ResponseRecord, SessionError, SurveySession, SurveyStage,
};
