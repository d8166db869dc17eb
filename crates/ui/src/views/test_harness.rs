use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AppServices, SettingsService, SurveyService};
use storage::repository::{InMemoryRepository, QuestionRepository, Storage};
use tempo_core::model::{Question, QuestionKey, QuestionSet};
use tempo_core::time::fixed_clock;

use crate::context::{UiApp, build_app_context};
use crate::views::survey::SurveyTestHandles;
use crate::views::{HomeView, SettingsView, SurveyView};

#[derive(Clone)]
struct TestApp {
    survey: Arc<SurveyService>,
    settings: Arc<SettingsService>,
}

impl UiApp for TestApp {
    fn survey(&self) -> Arc<SurveyService> {
        Arc::clone(&self.survey)
    }

    fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Survey,
    Settings,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    survey_handles: Option<SurveyTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.survey_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Survey => rsx! { SurveyView {} },
        ViewKind::Settings => rsx! { SettingsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub repo: InMemoryRepository,
    pub survey_handles: Option<SurveyTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn seeded_questions(entries: &[(&str, &str)]) -> QuestionSet {
    let mut questions = QuestionSet::new();
    for (key, text) in entries {
        let question = Question::new(QuestionKey::new(*key).unwrap(), *text).unwrap();
        questions.upsert(question);
    }
    questions
}

pub fn setup_view_harness(view: ViewKind, entries: &[(&str, &str)]) -> ViewHarness {
    let repo = InMemoryRepository::new();
    if !entries.is_empty() {
        repo.save(&seeded_questions(entries)).expect("seed questions");
    }
    let storage = Storage {
        questions: Arc::new(repo.clone()),
        results: Arc::new(repo.clone()),
    };
    setup_view_harness_with_storage(view, storage, repo)
}

pub fn setup_view_harness_with_storage(
    view: ViewKind,
    storage: Storage,
    repo: InMemoryRepository,
) -> ViewHarness {
    let services = AppServices::from_storage(&storage, fixed_clock());
    let app = Arc::new(TestApp {
        survey: services.survey(),
        settings: services.settings(),
    });

    let survey_handles = match view {
        ViewKind::Survey => Some(SurveyTestHandles::default()),
        _ => None,
    };

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            survey_handles: survey_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        repo,
        survey_handles,
    }
}
