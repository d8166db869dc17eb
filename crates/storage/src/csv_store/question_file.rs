//! Load/save for the question definitions file.

use std::fs;
use std::path::Path;

use tempo_core::model::{QuestionError, QuestionSet};

use crate::repository::{QuestionRow, StorageError};

const HEADER: [&str; 2] = ["Key", "Question"];

/// Read the question file, or an empty set when the file is absent.
pub(crate) fn load(path: &Path) -> Result<QuestionSet, StorageError> {
    if !path.exists() {
        return Ok(QuestionSet::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    if headers != HEADER {
        return Err(StorageError::MalformedQuestionFile(format!(
            "expected header Key,Question, found: {}",
            headers.join(",")
        )));
    }

    let mut questions = QuestionSet::new();
    for row in reader.deserialize::<QuestionRow>() {
        let question = row?.into_question().map_err(malformed)?;
        questions.upsert(question);
    }
    Ok(questions)
}

/// Overwrite the question file: fixed `Key,Question` header, one row per
/// question, UTF-8. The parent directory is created if needed.
pub(crate) fn save(path: &Path, questions: &QuestionSet) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(HEADER)?;
    for question in questions.iter() {
        writer.serialize(QuestionRow::from_question(question))?;
    }
    writer.flush()?;
    Ok(())
}

fn malformed(err: QuestionError) -> StorageError {
    StorageError::MalformedQuestionFile(err.to_string())
}
