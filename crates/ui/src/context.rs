use std::sync::Arc;

use services::{SettingsService, SurveyService};

pub trait UiApp: Send + Sync {
    fn survey(&self) -> Arc<SurveyService>;
    fn settings(&self) -> Arc<SettingsService>;
}

#[derive(Clone)]
pub struct AppContext {
    survey: Arc<SurveyService>,
    settings: Arc<SettingsService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            survey: app.survey(),
            settings: app.settings(),
        }
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
