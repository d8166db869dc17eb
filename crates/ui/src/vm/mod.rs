mod survey_vm;

pub use survey_vm::{AdvanceOutcome, SurveyIntent, SurveyVm, start_survey};
