use std::sync::Arc;

use storage::repository::{
    InMemoryRepository, QuestionRepository, ResultsRepository, Storage, StorageError,
};
use tempo_core::model::{Answer, CompletedResponse, SurveyStage};

use crate::vm::{SurveyIntent, SurveyVm};

use super::survey::QuitIntent;
use super::test_harness::{
    ViewKind, drive_dom, seeded_questions, setup_view_harness, setup_view_harness_with_storage,
};

const QUESTIONS: &[(&str, &str)] = &[("gender", "性別は?"), ("likes_sports", "スポーツは好き?")];

#[tokio::test(flavor = "current_thread")]
async fn home_view_shows_question_count_and_actions() {
    let mut harness = setup_view_harness(ViewKind::Home, QUESTIONS);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("2 questions"), "missing count in {html}");
    assert!(html.contains("Start Survey"), "missing start button in {html}");
    assert!(html.contains("Edit Questions"), "missing edit button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_hints_when_there_are_no_questions() {
    let mut harness = setup_view_harness(ViewKind::Home, &[]);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("No questions yet. Add questions before starting a survey."),
        "missing empty hint in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn settings_view_lists_questions_and_add_form() {
    let mut harness = setup_view_harness(ViewKind::Settings, QUESTIONS);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("gender"), "missing key in {html}");
    assert!(html.contains("性別は?"), "missing question text in {html}");
    assert!(html.contains("スポーツは好き?"), "missing second question in {html}");
    assert!(html.contains("Add a question"), "missing add form in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn survey_view_walks_a_session_to_completion() {
    let mut harness = setup_view_harness(ViewKind::Survey, QUESTIONS);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Before we begin"), "missing intake in {html}");

    let handles = harness.survey_handles.clone().expect("survey handles");
    let dispatch = handles.dispatch();

    dispatch.call(SurveyIntent::SubmitIntake {
        name: "Taro".into(),
        age: "20".into(),
    });
    drive_dom(&mut harness.dom);
    let html = harness.render();
    assert!(html.contains("性別は?"), "missing first question in {html}");
    assert!(html.contains("Question 1 / 2"), "missing progress in {html}");

    dispatch.call(SurveyIntent::Choose(Answer::Yes));
    dispatch.call(SurveyIntent::Advance);
    drive_dom(&mut harness.dom);
    let html = harness.render();
    assert!(html.contains("スポーツは好き?"), "missing second question in {html}");
    assert!(html.contains("Question 2 / 2"), "missing progress in {html}");

    dispatch.call(SurveyIntent::Choose(Answer::No));
    dispatch.call(SurveyIntent::Advance);
    drive_dom(&mut harness.dom);
    let html = harness.render();
    assert!(
        html.contains("How many seconds do you think that took?"),
        "missing estimate prompt in {html}"
    );

    dispatch.call(SurveyIntent::SubmitEstimate { raw: "30".into() });
    drive_dom(&mut harness.dom);
    let html = harness.render();
    assert!(html.contains("Thank you!"), "missing completion in {html}");

    let rows = harness.repo.appended().expect("read appended rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].values(), ["Taro", "20", "1", "0", "0.00", "30"]);
}

#[tokio::test(flavor = "current_thread")]
async fn survey_view_requires_an_answer_before_advancing() {
    let mut harness = setup_view_harness(ViewKind::Survey, QUESTIONS);
    harness.rebuild();
    harness.drive_async().await;

    let handles = harness.survey_handles.clone().expect("survey handles");
    let dispatch = handles.dispatch();

    dispatch.call(SurveyIntent::SubmitIntake {
        name: "Taro".into(),
        age: "20".into(),
    });
    dispatch.call(SurveyIntent::Advance);
    drive_dom(&mut harness.dom);

    let html = harness.render();
    assert!(
        html.contains("Please choose an answer before continuing."),
        "missing warning in {html}"
    );
    assert!(html.contains("性別は?"), "should still show the question in {html}");

    let vm = handles.vm();
    let stage = vm.read().as_ref().map(SurveyVm::stage);
    assert_eq!(stage, Some(SurveyStage::Asking(0)));
}

#[tokio::test(flavor = "current_thread")]
async fn survey_view_asks_before_quitting_and_can_resume() {
    let mut harness = setup_view_harness(ViewKind::Survey, QUESTIONS);
    harness.rebuild();
    harness.drive_async().await;

    let handles = harness.survey_handles.clone().expect("survey handles");
    let dispatch = handles.dispatch();
    let quit = handles.quit();

    dispatch.call(SurveyIntent::SubmitIntake {
        name: "Taro".into(),
        age: "20".into(),
    });
    drive_dom(&mut harness.dom);

    quit.call(QuitIntent::Request);
    drive_dom(&mut harness.dom);
    let html = harness.render();
    assert!(html.contains("Leave the survey?"), "missing confirm in {html}");
    assert!(
        html.contains("Answers entered so far will be discarded."),
        "missing discard note in {html}"
    );

    quit.call(QuitIntent::Stay);
    drive_dom(&mut harness.dom);
    let html = harness.render();
    assert!(
        !html.contains("Leave the survey?"),
        "confirm should close in {html}"
    );
    assert!(html.contains("性別は?"), "should still show the question in {html}");

    let vm = handles.vm();
    let stage = vm.read().as_ref().map(SurveyVm::stage);
    assert_eq!(stage, Some(SurveyStage::Asking(0)));
}

#[tokio::test(flavor = "current_thread")]
async fn survey_view_quit_confirm_discards_the_session() {
    let mut harness = setup_view_harness(ViewKind::Survey, QUESTIONS);
    harness.rebuild();
    harness.drive_async().await;

    let handles = harness.survey_handles.clone().expect("survey handles");
    let dispatch = handles.dispatch();
    let quit = handles.quit();

    dispatch.call(SurveyIntent::SubmitIntake {
        name: "Taro".into(),
        age: "20".into(),
    });
    dispatch.call(SurveyIntent::Choose(Answer::Yes));
    drive_dom(&mut harness.dom);

    quit.call(QuitIntent::Request);
    quit.call(QuitIntent::Leave);
    drive_dom(&mut harness.dom);

    let html = harness.render();
    assert!(
        !html.contains("Leave the survey?"),
        "confirm should close in {html}"
    );
    assert!(!html.contains("性別は?"), "question should be gone in {html}");

    assert!(handles.vm().read().is_none(), "session should be discarded");
    assert!(harness.repo.appended().expect("read appended rows").is_empty());
}

struct FailingResultsSink;

impl ResultsRepository for FailingResultsSink {
    fn append(&self, _response: &CompletedResponse) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("sink offline".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn survey_view_offers_retry_when_append_fails() {
    let repo = InMemoryRepository::new();
    repo.save(&seeded_questions(QUESTIONS)).expect("seed questions");
    let storage = Storage {
        questions: Arc::new(repo.clone()),
        results: Arc::new(FailingResultsSink),
    };
    let mut harness = setup_view_harness_with_storage(ViewKind::Survey, storage, repo);
    harness.rebuild();
    harness.drive_async().await;

    let handles = harness.survey_handles.clone().expect("survey handles");
    let dispatch = handles.dispatch();

    dispatch.call(SurveyIntent::SubmitIntake {
        name: "Taro".into(),
        age: "20".into(),
    });
    for _ in 0..QUESTIONS.len() {
        dispatch.call(SurveyIntent::Choose(Answer::Yes));
        dispatch.call(SurveyIntent::Advance);
    }
    dispatch.call(SurveyIntent::SubmitEstimate { raw: "30".into() });
    drive_dom(&mut harness.dom);

    let html = harness.render();
    assert!(html.contains("Try Again"), "missing retry button in {html}");
    assert!(
        html.contains("Your answers are kept. Saving can be retried."),
        "missing retry hint in {html}"
    );
    assert!(!html.contains("Thank you"), "unexpected completion in {html}");

    let vm = handles.vm();
    let stage = vm.read().as_ref().map(SurveyVm::stage);
    assert_eq!(stage, Some(SurveyStage::Finalizing));

    assert!(harness.repo.appended().expect("read appended rows").is_empty());
}
