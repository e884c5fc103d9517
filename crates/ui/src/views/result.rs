use dioxus::prelude::*;
use mcq_core::model::TestOutcome;

use crate::vm::ResultVm;

#[component]
pub fn ResultPanel(outcome: TestOutcome, on_restart: EventHandler<()>) -> Element {
    let vm = ResultVm::from_outcome(&outcome);
    let reason_class = if vm.timed_out {
        "result__reason result__reason--expired"
    } else {
        "result__reason"
    };

    rsx! {
        section { class: "result",
            h2 { "Test Complete" }
            p { class: "{reason_class}", "{vm.reason_label}" }
            p { class: "result__score", "{vm.score_label}" }
            p { class: "result__performance", "{vm.performance_label}" }
            p { class: "result__answered", "{vm.answered_label}" }
            p { class: "result__correct", "{vm.correct_label}" }
            p { class: "result__meta", "Time taken: {vm.time_taken_label}" }
            p { class: "result__meta", "Finished {vm.completed_at_label}" }
            button {
                id: "result-restart",
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| on_restart.call(()),
                "Back to Start"
            }
        }
    }
}
