use dioxus::prelude::*;

use crate::context::AppContext;

#[component]
pub fn Header() -> Element {
    let ctx = use_context::<AppContext>();
    let student = ctx.student_name().to_string();
    let department = ctx.department().to_string();

    rsx! {
        header { class: "header",
            h1 { class: "header__title", "MCQ Test" }
            div { class: "header__student",
                span { class: "header__name", "{student}" }
                span { class: "header__department", "{department}" }
            }
        }
    }
}
