use dioxus::prelude::*;
use dioxus_router::use_navigator;

use tempo_core::model::{Answer, SurveyStage};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AdvanceOutcome, SurveyIntent, SurveyVm, start_survey};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Quit flow for an active session. `Leave` discards the unsaved record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum QuitIntent {
    Request,
    Stay,
    Leave,
}

#[component]
pub fn SurveyView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let survey_service = ctx.survey();

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<SurveyVm>);
    let needs_answer = use_signal(|| false);
    let mut name = use_signal(String::new);
    let mut age = use_signal(String::new);
    let mut estimate = use_signal(String::new);
    let mut show_quit_modal = use_signal(|| false);

    let service_for_resource = survey_service.clone();
    let resource = use_resource(move || {
        let service = service_for_resource.clone();
        let mut error = error;
        let mut vm = vm;

        async move {
            let started = start_survey(&service)?;
            vm.set(Some(started));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch_intent = {
        let survey_service = survey_service.clone();
        use_callback(move |intent: SurveyIntent| {
            let mut vm = vm;
            let mut error = error;
            let mut needs_answer = needs_answer;

            let result = {
                let mut guard = vm.write();
                let Some(vm_value) = guard.as_mut() else {
                    error.set(Some(ViewError::Unknown));
                    return;
                };

                match intent {
                    SurveyIntent::SubmitIntake { name, age } => {
                        vm_value.submit_intake(&survey_service, &name, &age)
                    }
                    SurveyIntent::Choose(answer) => {
                        needs_answer.set(false);
                        vm_value.choose(&survey_service, answer)
                    }
                    SurveyIntent::Advance => match vm_value.advance(&survey_service) {
                        Ok(AdvanceOutcome::Moved) => {
                            needs_answer.set(false);
                            Ok(())
                        }
                        Ok(AdvanceOutcome::NeedsAnswer) => {
                            needs_answer.set(true);
                            Ok(())
                        }
                        Err(err) => Err(err),
                    },
                    SurveyIntent::SubmitEstimate { raw } => vm_value
                        .submit_estimate(&survey_service, &raw)
                        .and_then(|()| vm_value.finalize(&survey_service)),
                    SurveyIntent::Finalize => vm_value.finalize(&survey_service),
                }
            };

            match result {
                Ok(()) => error.set(None),
                Err(err) => error.set(Some(err)),
            }
        })
    };

    let quit_intent = use_callback(move |intent: QuitIntent| {
        let mut vm = vm;
        let mut error = error;
        let mut needs_answer = needs_answer;

        match intent {
            QuitIntent::Request => show_quit_modal.set(true),
            QuitIntent::Stay => show_quit_modal.set(false),
            QuitIntent::Leave => {
                show_quit_modal.set(false);
                needs_answer.set(false);
                error.set(None);
                vm.set(None);
                let _ = navigator.push(Route::Home {});
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<SurveyTestHandles>() {
                handles.register(dispatch_intent, quit_intent, vm);
            }
        }
    }

    let vm_guard = vm.read();
    let stage = vm_guard.as_ref().map(SurveyVm::stage);
    let question_text = vm_guard
        .as_ref()
        .and_then(SurveyVm::question_text)
        .map(str::to_owned);
    let progress_label = vm_guard.as_ref().and_then(|vm| {
        vm.question_number()
            .map(|number| format!("Question {number} / {}", vm.total_questions()))
    });
    let selected = vm_guard.as_ref().and_then(SurveyVm::selected_answer);
    let in_progress = stage.is_some_and(|stage| stage != SurveyStage::Complete);
    let error_value = *error.read();

    rsx! {
        div { class: "page survey-page",
            div { class: "survey-overlay",
                div {
                    class: "survey-modal",
                    role: "dialog",
                    aria_modal: "true",
                    aria_labelledby: "survey-modal-title",
                    header { class: "survey-modal__header",
                        h2 { class: "survey-modal__title", id: "survey-modal-title", "Survey" }
                        button {
                            class: "survey-modal__quit",
                            r#type: "button",
                            onclick: move |_| {
                                if in_progress {
                                    quit_intent.call(QuitIntent::Request);
                                } else {
                                    let _ = navigator.push(Route::Home {});
                                }
                            },
                            "Quit"
                        }
                    }
                    div { class: "survey-modal__body",
                        match state {
                            ViewState::Idle => rsx! {
                                p { "Idle" }
                            },
                            ViewState::Loading => rsx! {
                                p { "Loading..." }
                            },
                            ViewState::Error(err) => rsx! {
                                p { "{err.message()}" }
                                if err == ViewError::NoQuestions {
                                    button {
                                        class: "btn btn-secondary",
                                        r#type: "button",
                                        onclick: move |_| {
                                            let _ = navigator.push(Route::Settings {});
                                        },
                                        "Add Questions"
                                    }
                                } else {
                                    button {
                                        class: "btn btn-secondary",
                                        r#type: "button",
                                        onclick: move |_| {
                                            let mut resource = resource;
                                            resource.restart();
                                        },
                                        "Retry"
                                    }
                                }
                            },
                            ViewState::Ready(()) => rsx! {
                                if let Some(err) = error_value {
                                    if stage != Some(SurveyStage::Finalizing) {
                                        p { class: "survey-error", "{err.message()}" }
                                    }
                                }
                                match stage {
                                    Some(SurveyStage::Intake) => rsx! {
                                        div { class: "survey-intake",
                                            h3 { class: "survey-heading", "Before we begin" }
                                            label { class: "survey-field",
                                                span { "Name" }
                                                input {
                                                    class: "survey-input",
                                                    r#type: "text",
                                                    value: "{name()}",
                                                    oninput: move |evt| name.set(evt.value()),
                                                }
                                            }
                                            label { class: "survey-field",
                                                span { "Age" }
                                                input {
                                                    class: "survey-input",
                                                    r#type: "text",
                                                    value: "{age()}",
                                                    oninput: move |evt| age.set(evt.value()),
                                                }
                                            }
                                            button {
                                                class: "btn btn-primary",
                                                r#type: "button",
                                                onclick: move |_| {
                                                    dispatch_intent.call(SurveyIntent::SubmitIntake {
                                                        name: name(),
                                                        age: age(),
                                                    });
                                                },
                                                "Begin"
                                            }
                                        }
                                    },
                                    Some(SurveyStage::Asking(_)) => rsx! {
                                        div { class: "survey-question",
                                            if let Some(text) = question_text.as_deref() {
                                                h3 { class: "survey-prompt", "{text}" }
                                            }
                                            div { class: "survey-answers",
                                                AnswerButton {
                                                    label: "Yes",
                                                    answer: Answer::Yes,
                                                    selected: selected == Some(Answer::Yes),
                                                    on_intent: dispatch_intent,
                                                }
                                                AnswerButton {
                                                    label: "No",
                                                    answer: Answer::No,
                                                    selected: selected == Some(Answer::No),
                                                    on_intent: dispatch_intent,
                                                }
                                            }
                                            if needs_answer() {
                                                p { class: "survey-warning", "Please choose an answer before continuing." }
                                            }
                                            button {
                                                class: "btn btn-primary survey-next",
                                                r#type: "button",
                                                onclick: move |_| dispatch_intent.call(SurveyIntent::Advance),
                                                "Next"
                                            }
                                        }
                                    },
                                    Some(SurveyStage::EstimateCapture) => rsx! {
                                        div { class: "survey-estimate",
                                            h3 { class: "survey-heading", "One last thing" }
                                            p { class: "survey-prompt", "How many seconds do you think that took?" }
                                            input {
                                                class: "survey-input",
                                                r#type: "text",
                                                placeholder: "e.g. 30",
                                                value: "{estimate()}",
                                                oninput: move |evt| estimate.set(evt.value()),
                                            }
                                            button {
                                                class: "btn btn-primary",
                                                r#type: "button",
                                                onclick: move |_| {
                                                    dispatch_intent.call(SurveyIntent::SubmitEstimate {
                                                        raw: estimate(),
                                                    });
                                                },
                                                "Submit"
                                            }
                                        }
                                    },
                                    Some(SurveyStage::Finalizing) => rsx! {
                                        div { class: "survey-finalizing",
                                            if let Some(err) = error_value {
                                                p { class: "survey-error", "{err.message()}" }
                                                p { class: "survey-hint", "Your answers are kept. Saving can be retried." }
                                                button {
                                                    class: "btn btn-primary",
                                                    r#type: "button",
                                                    onclick: move |_| dispatch_intent.call(SurveyIntent::Finalize),
                                                    "Try Again"
                                                }
                                            } else {
                                                p { "Saving..." }
                                            }
                                        }
                                    },
                                    Some(SurveyStage::Complete) => rsx! {
                                        div { class: "survey-complete",
                                            h3 { class: "survey-complete__title", "That's the end of the survey. Thank you!" }
                                            p { class: "survey-complete__subtitle", "Your answers were saved." }
                                            button {
                                                class: "btn btn-primary",
                                                r#type: "button",
                                                onclick: move |_| {
                                                    let _ = navigator.push(Route::Home {});
                                                },
                                                "Back to Home"
                                            }
                                        }
                                    },
                                    None => rsx! {
                                        p { "No survey is running." }
                                    },
                                }
                            },
                        }
                    }
                    footer { class: "survey-modal__footer",
                        if let Some(label) = progress_label {
                            span { class: "survey-footer__item", "{label}" }
                        }
                    }
                }
            }
            if show_quit_modal() {
                div {
                    class: "survey-modal-overlay",
                    onclick: move |_| quit_intent.call(QuitIntent::Stay),
                    div {
                        class: "survey-confirm",
                        onclick: move |evt| evt.stop_propagation(),
                        h3 { class: "survey-confirm__title", "Leave the survey?" }
                        p { class: "survey-confirm__body",
                            "Nothing is saved until the final step. Answers entered so far will be discarded."
                        }
                        div { class: "survey-confirm__actions",
                            button {
                                class: "btn survey-confirm__cancel",
                                r#type: "button",
                                onclick: move |_| quit_intent.call(QuitIntent::Stay),
                                "Keep Going"
                            }
                            button {
                                class: "btn survey-confirm__confirm",
                                r#type: "button",
                                onclick: move |_| quit_intent.call(QuitIntent::Leave),
                                "Leave"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AnswerButton(
    label: &'static str,
    answer: Answer,
    selected: bool,
    on_intent: EventHandler<SurveyIntent>,
) -> Element {
    rsx! {
        button {
            class: if selected {
                "survey-answer survey-answer--selected"
            } else {
                "survey-answer"
            },
            r#type: "button",
            onclick: move |_| on_intent.call(SurveyIntent::Choose(answer)),
            "{label}"
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SurveyTestHandles {
    dispatch: Rc<RefCell<Option<Callback<SurveyIntent>>>>,
    quit: Rc<RefCell<Option<Callback<QuitIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<SurveyVm>>>>>,
}

#[cfg(test)]
impl SurveyTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<SurveyIntent>,
        quit: Callback<QuitIntent>,
        vm: Signal<Option<SurveyVm>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.quit.borrow_mut() = Some(quit);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<SurveyIntent> {
        (*self.dispatch.borrow()).expect("survey dispatch registered")
    }

    pub(crate) fn quit(&self) -> Callback<QuitIntent> {
        (*self.quit.borrow()).expect("survey quit registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<SurveyVm>> {
        (*self.vm.borrow()).expect("survey vm registered")
    }
}
