mod answer;
mod question;
mod record;
mod survey;

pub use answer::{Answer, AnswerError};
pub use question::{Question, QuestionError, QuestionKey, QuestionSet};
pub use record::{CompletedResponse, RecordError, ResponseRecord};
pub use survey::{SessionError, SurveySession, SurveyStage};
