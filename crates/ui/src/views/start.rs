use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn StartView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let service = ctx.test_service();
    let question_count = service.questions().len();
    let minutes = service.settings().time_budget_minutes();
    let department = service.settings().department().to_string();

    rsx! {
        div { class: "page start-page",
            h2 { "{department} Test" }
            ul { class: "start-facts",
                li { "{question_count} questions" }
                li { "{minutes} minutes" }
            }
            div { class: "start-instructions",
                h3 { "Instructions" }
                ul {
                    li { "Pick one option per question. You can change it until you finish." }
                    li { "Use Previous, Next or the numbered buttons to move between questions." }
                    li { "Keys 1-4 or A-D select an option; arrow keys move between questions." }
                    li { "The test is submitted automatically when the timer reaches zero." }
                }
            }
            button {
                id: "start-test",
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| {
                    let _ = navigator.push(Route::Test {});
                },
                "Start Test"
            }
        }
    }
}
