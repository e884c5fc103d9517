use dioxus::prelude::*;

use crate::vm::TestIntent;

use super::test_harness::{ViewKind, setup_view_harness};

const ANSWER_KEY: [usize; 5] = [1, 1, 1, 2, 1];

#[tokio::test(flavor = "current_thread")]
async fn start_view_smoke_renders_overview() {
    let mut harness = setup_view_harness(ViewKind::Start, 1800);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Computer Science Test"), "missing title in {html}");
    assert!(html.contains("5 questions"), "missing count in {html}");
    assert!(html.contains("30 minutes"), "missing minutes in {html}");
    assert!(html.contains("Start Test"), "missing start button in {html}");
    assert!(html.contains("Alex Student"), "missing student in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_view_smoke_renders_first_question() {
    let mut harness = setup_view_harness(ViewKind::Test, 1800);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Question 1 of 5"), "missing position in {html}");
    assert!(html.contains("30:00"), "missing timer in {html}");
    assert!(html.contains("0/5 answered"), "missing badge in {html}");
    assert!(
        html.contains("What is the time complexity of binary search algorithm?"),
        "missing question in {html}"
    );
    assert!(html.contains("O(log n)"), "missing option in {html}");
    assert!(html.contains("Next"), "missing next in {html}");
    assert!(!html.contains("Finish Test"), "finish shown early in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_view_smoke_selection_updates_badge() {
    let mut harness = setup_view_harness(ViewKind::Test, 1800);
    harness.rebuild();
    let dispatch = harness.handles().dispatch();

    dispatch.call(TestIntent::Select(1));
    harness.drive();
    let html = harness.render();
    assert!(html.contains("1/5 answered"), "missing badge in {html}");
    assert!(html.contains("option--selected"), "missing selection in {html}");

    dispatch.call(TestIntent::Next);
    harness.drive();
    let html = harness.render();
    assert!(html.contains("Question 2 of 5"), "missing position in {html}");
    assert!(html.contains("nav-dot--answered"), "missing answered dot in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_view_smoke_finish_shows_result() {
    let mut harness = setup_view_harness(ViewKind::Test, 1800);
    harness.rebuild();
    let dispatch = harness.handles().dispatch();

    for (index, option) in ANSWER_KEY.into_iter().enumerate() {
        dispatch.call(TestIntent::GoTo(index));
        dispatch.call(TestIntent::Select(option));
    }
    harness.drive();
    let html = harness.render();
    assert!(html.contains("Finish Test"), "missing finish in {html}");

    dispatch.call(TestIntent::Finish);
    harness.drive();
    let html = harness.render();
    assert!(html.contains("Test Complete"), "missing result in {html}");
    assert!(html.contains("100%"), "missing score in {html}");
    assert!(html.contains("Excellent!"), "missing band in {html}");
    assert!(
        html.contains("You answered 5 out of 5 questions"),
        "missing answered in {html}"
    );
    assert!(html.contains("Time taken: "), "missing elapsed in {html}");
    assert!(html.contains("Finished "), "missing finish time in {html}");
    assert!(!html.contains('\u{b7}'), "non-ASCII separator in {html}");
    assert!(harness.handles().vm().peek().is_finished());
}

#[tokio::test(flavor = "current_thread")]
async fn test_view_smoke_expiry_shows_time_up() {
    let mut harness = setup_view_harness(ViewKind::Test, 2);
    harness.rebuild();
    let handles = harness.handles().clone();

    handles.dispatch().call(TestIntent::Select(0));
    handles.tick().call(());
    harness.drive();
    assert!(harness.render().contains("0:01"), "timer did not count down");

    handles.tick().call(());
    harness.drive();
    let html = harness.render();
    assert!(html.contains("Time's up"), "missing expiry in {html}");
    assert!(html.contains("0%"), "missing score in {html}");
    assert!(
        html.contains("You answered 1 out of 5 questions"),
        "missing answered in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_view_smoke_rejected_option_shows_message() {
    let mut harness = setup_view_harness(ViewKind::Test, 1800);
    harness.rebuild();
    harness.handles().dispatch().call(TestIntent::Select(7));
    harness.drive();
    let html = harness.render();
    assert!(
        html.contains("That choice is not available"),
        "missing error in {html}"
    );
    assert!(html.contains("0/5 answered"), "state changed in {html}");
}
