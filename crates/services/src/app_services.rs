use std::path::PathBuf;
use std::sync::Arc;

use storage::csv_store::OutputEncoding;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::settings_service::SettingsService;
use crate::survey_service::SurveyService;

/// Assembles the app-facing services over a storage backend.
#[derive(Clone)]
pub struct AppServices {
    survey: Arc<SurveyService>,
    settings: Arc<SettingsService>,
}

impl AppServices {
    /// Build services backed by CSV files under the data directory.
    ///
    /// Probes the question file once so a malformed file fails at launch
    /// rather than mid-survey.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if the question file exists but
    /// cannot be read.
    pub fn new_csv(
        data_dir: impl Into<PathBuf>,
        encoding: OutputEncoding,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::csv(data_dir, encoding);
        storage.questions.load()?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over any storage aggregate.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let survey = Arc::new(SurveyService::new(
            clock,
            Arc::clone(&storage.questions),
            Arc::clone(&storage.results),
        ));
        let settings = Arc::new(SettingsService::new(Arc::clone(&storage.questions)));
        Self { survey, settings }
    }

    #[must_use]
    pub fn survey(&self) -> Arc<SurveyService> {
        Arc::clone(&self.survey)
    }

    #[must_use]
    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings)
    }
}
