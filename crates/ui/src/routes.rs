use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{HomeView, SettingsView, SurveyView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/settings", SettingsView)] Settings {},
    #[end_layout]
    // The survey owns the whole window: no sidebar, so an active session can
    // only be left through the survey's quit confirmation.
    #[route("/survey", SurveyView)] Survey {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Tempo" }
            ul {
                li { Link { to: Route::Home {}, "Home" } }
                li { Link { to: Route::Settings {}, "Questions" } }
            }
        }
    }
}
