use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let settings = ctx.settings();

    let resource = use_resource(move || {
        let settings = settings.clone();
        async move {
            let questions = settings.list().map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(questions.len())
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page home-page",
            header { class: "view-header",
                h2 { class: "view-title", "Welcome" }
                p { class: "view-subtitle", "Run a short survey and keep every response in one place." }
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
                ViewState::Ready(count) => {
                    let count_label = if count == 1 {
                        "1 question".to_string()
                    } else {
                        format!("{count} questions")
                    };
                    let empty_hint = ViewError::NoQuestions.message();
                    rsx! {
                        p { class: "home-count", "{count_label}" }
                        div { class: "home-actions",
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                disabled: count == 0,
                                onclick: move |_| {
                                    let _ = navigator.push(Route::Survey {});
                                },
                                "Start Survey"
                            }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| {
                                    let _ = navigator.push(Route::Settings {});
                                },
                                "Edit Questions"
                            }
                        }
                        if count == 0 {
                            p { class: "home-empty", "{empty_hint}" }
                        }
                    }
                }
            }
        }
    }
}
