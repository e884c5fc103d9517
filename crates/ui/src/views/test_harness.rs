use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use mcq_core::time::fixed_clock;
use services::TestService;

use crate::context::{UiApp, build_app_context};
use crate::views::test_screen::TestViewHandles;
use crate::views::{Header, StartView, TestView};

#[derive(Clone)]
struct TestApp {
    student_name: String,
    test_service: Arc<TestService>,
}

impl UiApp for TestApp {
    fn student_name(&self) -> String {
        self.student_name.clone()
    }

    fn test_service(&self) -> Arc<TestService> {
        Arc::clone(&self.test_service)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Start,
    Test,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    test_handles: Option<TestViewHandles>,
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
    if let Some(handles) = props.test_handles.clone() {
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
    rsx! {
        Header {}
        match view {
            ViewKind::Start => rsx! { StartView {} },
            ViewKind::Test => rsx! { TestView {} },
        }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub test_handles: Option<TestViewHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn drive(&mut self) {
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn handles(&self) -> &TestViewHandles {
        self.test_handles.as_ref().expect("test view handles installed")
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, time_budget_secs: u32) -> ViewHarness {
    let test_service = TestService::computer_science(
        fixed_clock(),
        time_budget_secs,
        "Computer Science",
    )
    .expect("test service");

    let test_handles = match view {
        ViewKind::Test => Some(TestViewHandles::default()),
        ViewKind::Start => None,
    };

    let app = Arc::new(TestApp {
        student_name: "Alex Student".to_string(),
        test_service: Arc::new(test_service),
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            test_handles: test_handles.clone(),
        },
    );

    ViewHarness { dom, test_handles }
}
