use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempo_core::model::{CompletedResponse, QuestionSet};

use crate::repository::{QuestionRepository, ResultsRepository, Storage, StorageError};

mod question_file;
mod results_file;

/// Relative location of the question definitions, under the data directory.
pub const QUESTION_FILE: &str = "questions.csv";

/// Relative location of the results table, under the data directory.
pub const RESULTS_FILE: &str = "output/survey_data.csv";

/// Encoding for the results file.
///
/// `ShiftJis` matches the narrow encoding legacy spreadsheet tools expect
/// on Japanese systems. Question definitions are always UTF-8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputEncoding {
    #[default]
    Utf8,
    ShiftJis,
}

/// CSV-backed repositories rooted at a data directory.
#[derive(Debug, Clone)]
pub struct CsvRepository {
    questions_path: PathBuf,
    results_path: PathBuf,
    encoding: OutputEncoding,
}

impl CsvRepository {
    /// Build a repository over `<data_dir>/questions.csv` and
    /// `<data_dir>/output/survey_data.csv`. Nothing is touched on disk
    /// until the first load, save, or append.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, encoding: OutputEncoding) -> Self {
        let data_dir = data_dir.into();
        Self {
            questions_path: data_dir.join(QUESTION_FILE),
            results_path: data_dir.join(RESULTS_FILE),
            encoding,
        }
    }

    #[must_use]
    pub fn questions_path(&self) -> &Path {
        &self.questions_path
    }

    #[must_use]
    pub fn results_path(&self) -> &Path {
        &self.results_path
    }

    #[must_use]
    pub fn encoding(&self) -> OutputEncoding {
        self.encoding
    }
}

impl QuestionRepository for CsvRepository {
    fn load(&self) -> Result<QuestionSet, StorageError> {
        question_file::load(&self.questions_path)
    }

    fn save(&self, questions: &QuestionSet) -> Result<(), StorageError> {
        question_file::save(&self.questions_path, questions)
    }
}

impl ResultsRepository for CsvRepository {
    fn append(&self, response: &CompletedResponse) -> Result<(), StorageError> {
        results_file::append(&self.results_path, self.encoding, response)
    }
}

impl Storage {
    /// Build a `Storage` backed by CSV files under the data directory.
    #[must_use]
    pub fn csv(data_dir: impl Into<PathBuf>, encoding: OutputEncoding) -> Self {
        let repo = CsvRepository::new(data_dir, encoding);
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultsRepository> = Arc::new(repo);
        Self { questions, results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CsvRepository>();
    }

    #[test]
    fn paths_hang_off_the_data_directory() {
        let repo = CsvRepository::new("/tmp/tempo", OutputEncoding::Utf8);
        assert!(repo.questions_path().ends_with("questions.csv"));
        assert!(repo.results_path().ends_with("output/survey_data.csv"));
    }
}
