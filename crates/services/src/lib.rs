#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod settings_service;
pub mod survey_service;

pub use tempo_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, SettingsError, SurveyError};
pub use settings_service::SettingsService;
pub use survey_service::SurveyService;
