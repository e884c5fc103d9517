use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use mcq_core::model::TestOutcome;
use tokio::time::MissedTickBehavior;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ResultPanel, ViewError};
use crate::vm::{TestIntent, TestVm, option_for_key};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[component]
pub fn TestView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let service = ctx.test_service();
    let department = ctx.department().to_string();

    let vm = use_signal(|| TestVm::start(&service));
    let error = use_signal(|| None::<ViewError>);
    let outcome = use_signal(|| None::<TestOutcome>);

    let dispatch_intent = use_callback(move |intent: TestIntent| {
        let mut vm = vm;
        let mut error = error;
        let mut outcome = outcome;
        if outcome.peek().is_some() {
            return;
        }

        let result = vm.write().dispatch(intent);
        match result {
            Ok(finished) => {
                error.set(None);
                if let Some(finished) = finished {
                    outcome.set(Some(finished));
                }
            }
            Err(err) => {
                tracing::debug!(?intent, %err, "intent rejected");
                error.set(Some(ViewError::from(err)));
            }
        }
    });

    let on_tick = use_callback(move |()| {
        let mut vm = vm;
        let mut outcome = outcome;
        if outcome.peek().is_some() {
            return;
        }
        let expired = vm.write().tick();
        if let Some(expired) = expired {
            outcome.set(Some(expired));
        }
    });

    // Scoped to this component: leaving the screen drops the countdown with it.
    use_future(move || async move {
        let mut interval = tokio::time::interval(TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;
        loop {
            interval.tick().await;
            if vm.peek().is_finished() {
                break;
            }
            on_tick.call(());
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<TestViewHandles>() {
                handles.register(dispatch_intent, on_tick, vm);
            }
        }
    }

    use_effect(move || {
        let _ = eval("document.getElementById('test-root')?.focus();");
    });

    let on_key = use_callback(move |evt: KeyboardEvent| {
        if outcome.peek().is_some() {
            return;
        }
        let intent = match evt.data.key() {
            Key::ArrowRight => Some(TestIntent::Next),
            Key::ArrowLeft => Some(TestIntent::Previous),
            Key::Enter => {
                let screen = vm.peek().screen();
                (screen.is_last && screen.can_finish).then_some(TestIntent::Finish)
            }
            Key::Character(value) => option_for_key(&value).map(TestIntent::Select),
            _ => None,
        };
        if let Some(intent) = intent {
            evt.prevent_default();
            dispatch_intent.call(intent);
        }
    });

    let on_back = use_callback(move |()| {
        tracing::debug!("test abandoned");
        let _ = navigator.push(Route::Start {});
    });

    if let Some(outcome) = outcome() {
        return rsx! {
            div { class: "page test-page",
                ResultPanel {
                    outcome,
                    on_restart: move |()| {
                        let _ = navigator.push(Route::Start {});
                    },
                }
            }
        };
    }

    let screen = vm.read().screen();
    let error_message = error().map(ViewError::message);
    let answered_badge = if screen.question_answered {
        "question-card__badge question-card__badge--answered"
    } else {
        "question-card__badge"
    };
    let answered_text = if screen.question_answered {
        "Answered"
    } else {
        "Not answered"
    };

    rsx! {
        div { class: "page test-page", id: "test-root", tabindex: "0", onkeydown: on_key,
            div { class: "test-header",
                h2 { "{department} Test" }
                span { class: "test-header__position", "{screen.position_label}" }
                span { class: "test-header__timer", id: "test-timer", "{screen.timer_label}" }
                span { class: "test-header__answered", "{screen.answered_label}" }
            }
            div { class: "progress",
                div {
                    class: "progress__bar",
                    style: "width: {screen.percent_complete}%",
                }
            }
            section { class: "question-card",
                span { class: "{answered_badge}", "{answered_text}" }
                h3 { class: "question-card__text", "{screen.question_text}" }
                div { class: "options",
                    for option in screen.options.iter().cloned() {
                        button {
                            key: "{option.index}",
                            class: option.class(),
                            r#type: "button",
                            onclick: move |_| dispatch_intent.call(TestIntent::Select(option.index)),
                            span { class: "option__label", "{option.label}" }
                            span { class: "option__text", "{option.text}" }
                        }
                    }
                }
            }
            if let Some(message) = error_message {
                p { class: "test-error", "{message}" }
            }
            nav { class: "test-nav",
                button {
                    id: "test-previous",
                    class: "btn",
                    r#type: "button",
                    disabled: screen.is_first,
                    onclick: move |_| dispatch_intent.call(TestIntent::Previous),
                    "Previous"
                }
                div { class: "nav-dots",
                    for dot in screen.nav.iter().copied() {
                        button {
                            key: "{dot.index}",
                            class: dot.class(),
                            r#type: "button",
                            onclick: move |_| dispatch_intent.call(TestIntent::GoTo(dot.index)),
                            "{dot.number}"
                        }
                    }
                }
                if screen.is_last {
                    button {
                        id: "test-finish",
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: !screen.can_finish,
                        onclick: move |_| dispatch_intent.call(TestIntent::Finish),
                        "Finish Test"
                    }
                } else {
                    button {
                        id: "test-next",
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| dispatch_intent.call(TestIntent::Next),
                        "Next"
                    }
                }
            }
            button {
                id: "test-back",
                class: "btn btn-link",
                r#type: "button",
                onclick: move |_| on_back.call(()),
                "Back to Start"
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct TestViewHandles {
    dispatch: Rc<RefCell<Option<Callback<TestIntent>>>>,
    tick: Rc<RefCell<Option<Callback<()>>>>,
    vm: Rc<RefCell<Option<Signal<TestVm>>>>,
}

#[cfg(test)]
impl TestViewHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<TestIntent>,
        tick: Callback<()>,
        vm: Signal<TestVm>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.tick.borrow_mut() = Some(tick);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<TestIntent> {
        (*self.dispatch.borrow()).expect("test dispatch registered")
    }

    pub(crate) fn tick(&self) -> Callback<()> {
        (*self.tick.borrow()).expect("test tick registered")
    }

    pub(crate) fn vm(&self) -> Signal<TestVm> {
        (*self.vm.borrow()).expect("test vm registered")
    }
}
