use dioxus::prelude::*;

use services::SettingsError;
use tempo_core::model::QuestionKey;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
struct QuestionRow {
    key: String,
    text: String,
}

#[derive(Clone, Debug, PartialEq)]
struct SettingsData {
    rows: Vec<QuestionRow>,
}

fn describe_add_error(err: &SettingsError) -> &'static str {
    match err {
        SettingsError::Question(_) => "Key and question text are required.",
        _ => ViewError::Unknown.message(),
    }
}

fn describe_edit_error(err: &SettingsError) -> &'static str {
    match err {
        SettingsError::Question(_) => "Question text is required.",
        _ => ViewError::Unknown.message(),
    }
}

#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<AppContext>();
    let settings = ctx.settings();

    let mut new_key = use_signal(String::new);
    let mut new_text = use_signal(String::new);
    let add_error = use_signal(|| None::<&'static str>);
    let mut edit_target = use_signal(|| None::<QuestionRow>);
    let mut edit_text = use_signal(String::new);
    let edit_error = use_signal(|| None::<&'static str>);
    let mut delete_target = use_signal(|| None::<QuestionRow>);
    let delete_error = use_signal(|| None::<&'static str>);

    let settings_for_resource = settings.clone();
    let resource = use_resource(move || {
        let settings = settings_for_resource.clone();
        async move {
            let questions = settings.list().map_err(|_| ViewError::Unknown)?;
            let rows = questions
                .iter()
                .map(|question| QuestionRow {
                    key: question.key().as_str().to_string(),
                    text: question.text().to_string(),
                })
                .collect::<Vec<_>>();
            Ok::<_, ViewError>(SettingsData { rows })
        }
    });
    let state = view_state_from_resource(&resource);

    let on_add = {
        let settings = settings.clone();
        use_callback(move |()| {
            let mut add_error = add_error;
            let mut new_key = new_key;
            let mut new_text = new_text;
            let mut resource = resource;
            match settings.add(&new_key(), &new_text()) {
                Ok(()) => {
                    add_error.set(None);
                    new_key.set(String::new());
                    new_text.set(String::new());
                    resource.restart();
                }
                Err(err) => add_error.set(Some(describe_add_error(&err))),
            }
        })
    };

    let on_save_edit = {
        let settings = settings.clone();
        use_callback(move |()| {
            let mut edit_error = edit_error;
            let mut edit_target = edit_target;
            let mut resource = resource;
            let Some(target) = edit_target() else {
                return;
            };
            let key = match QuestionKey::new(target.key) {
                Ok(key) => key,
                Err(_) => {
                    edit_error.set(Some(ViewError::Unknown.message()));
                    return;
                }
            };
            match settings.edit(&key, &edit_text()) {
                Ok(()) => {
                    edit_error.set(None);
                    edit_target.set(None);
                    resource.restart();
                }
                Err(err) => edit_error.set(Some(describe_edit_error(&err))),
            }
        })
    };

    let on_confirm_delete = {
        let settings = settings.clone();
        use_callback(move |()| {
            let mut delete_error = delete_error;
            let mut delete_target = delete_target;
            let mut resource = resource;
            let Some(target) = delete_target() else {
                return;
            };
            let key = match QuestionKey::new(target.key) {
                Ok(key) => key,
                Err(_) => {
                    delete_error.set(Some(ViewError::Unknown.message()));
                    return;
                }
            };
            match settings.delete(&key) {
                Ok(()) => {
                    delete_error.set(None);
                    delete_target.set(None);
                    resource.restart();
                }
                Err(_) => delete_error.set(Some(ViewError::Unknown.message())),
            }
        })
    };

    rsx! {
        div { class: "page settings-page",
            header { class: "view-header",
                h2 { class: "view-title", "Questions" }
                p { class: "view-subtitle", "Every survey asks these, in this order." }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(data) => {
                    let rows = data.rows.iter().map(|row| {
                        let row_for_edit = row.clone();
                        let row_for_delete = row.clone();
                        let mut edit_target = edit_target;
                        let mut edit_text = edit_text;
                        let mut edit_error = edit_error;
                        let mut delete_target = delete_target;
                        let mut delete_error = delete_error;
                        rsx! {
                            li { class: "question-row",
                                div { class: "question-row__text",
                                    span { class: "question-row__key", "{row.key}" }
                                    span { class: "question-row__prompt", "{row.text}" }
                                }
                                div { class: "question-row__actions",
                                    button {
                                        class: "btn btn-secondary",
                                        r#type: "button",
                                        onclick: move |_| {
                                            edit_error.set(None);
                                            edit_text.set(row_for_edit.text.clone());
                                            edit_target.set(Some(row_for_edit.clone()));
                                        },
                                        "Edit"
                                    }
                                    button {
                                        class: "btn btn-danger",
                                        r#type: "button",
                                        onclick: move |_| {
                                            delete_error.set(None);
                                            delete_target.set(Some(row_for_delete.clone()));
                                        },
                                        "Delete"
                                    }
                                }
                            }
                        }
                    });
                    rsx! {
                        section { class: "question-add",
                            h3 { class: "question-add__title", "Add a question" }
                            input {
                                class: "question-add__input",
                                r#type: "text",
                                placeholder: "key",
                                value: "{new_key()}",
                                oninput: move |evt| new_key.set(evt.value()),
                            }
                            input {
                                class: "question-add__input",
                                r#type: "text",
                                placeholder: "Question text",
                                value: "{new_text()}",
                                oninput: move |evt| new_text.set(evt.value()),
                            }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| on_add.call(()),
                                "Add"
                            }
                            if let Some(message) = add_error() {
                                p { class: "question-add__error", "{message}" }
                            }
                            p { class: "question-add__hint",
                                "The key becomes the column header in the results file."
                            }
                        }
                        section { class: "question-list",
                            if data.rows.is_empty() {
                                p { class: "question-list__empty", "No questions yet. The survey needs at least one." }
                            } else {
                                ul { {rows} }
                            }
                        }
                    }
                }
            }
            if let Some(target) = edit_target() {
                div {
                    class: "survey-modal-overlay",
                    onclick: move |_| edit_target.set(None),
                    div {
                        class: "survey-confirm",
                        onclick: move |evt| evt.stop_propagation(),
                        h3 { class: "survey-confirm__title", "Edit question" }
                        p { class: "survey-confirm__body", "{target.key}" }
                        input {
                            class: "question-add__input",
                            r#type: "text",
                            value: "{edit_text()}",
                            oninput: move |evt| edit_text.set(evt.value()),
                        }
                        if let Some(message) = edit_error() {
                            p { class: "question-add__error", "{message}" }
                        }
                        div { class: "survey-confirm__actions",
                            button {
                                class: "btn survey-confirm__cancel",
                                r#type: "button",
                                onclick: move |_| edit_target.set(None),
                                "Cancel"
                            }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| on_save_edit.call(()),
                                "Save"
                            }
                        }
                    }
                }
            }
            if let Some(target) = delete_target() {
                div {
                    class: "survey-modal-overlay",
                    onclick: move |_| delete_target.set(None),
                    div {
                        class: "survey-confirm",
                        onclick: move |evt| evt.stop_propagation(),
                        h3 { class: "survey-confirm__title", "Delete question?" }
                        p { class: "survey-confirm__body",
                            "New surveys stop asking \"{target.text}\". Responses already saved keep their recorded answers."
                        }
                        if let Some(message) = delete_error() {
                            p { class: "question-add__error", "{message}" }
                        }
                        div { class: "survey-confirm__actions",
                            button {
                                class: "btn survey-confirm__cancel",
                                r#type: "button",
                                onclick: move |_| delete_target.set(None),
                                "Cancel"
                            }
                            button {
                                class: "btn btn-danger",
                                r#type: "button",
                                onclick: move |_| on_confirm_delete.call(()),
                                "Delete"
                            }
                        }
                    }
                }
            }
        }
    }
}
