mod home;
mod settings;
mod state;
mod survey;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use home::HomeView;
pub use settings::SettingsView;
pub use state::{view_state_from_resource, ViewError, ViewState};
pub use survey::SurveyView;
