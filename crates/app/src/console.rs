//! Terminal front end: one timed attempt driven by line commands.

use std::io::{self, Write};
use std::sync::PoisonError;

use mcq_core::model::{CompletionReason, SessionError, TestOutcome, option_label};
use mcq_core::time::format_countdown;
use services::{SessionTimer, SharedController, TestService, TestSessionController};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleCommand {
    Select(usize),
    GoTo(usize),
    Next,
    Previous,
    Show,
    Finish,
    Help,
}

impl ConsoleCommand {
    /// `a`-`d` select, `n`/`p` move, `go <number>` jumps (1-based).
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim().to_ascii_lowercase();
        let mut parts = line.split_whitespace();
        let head = parts.next()?;
        let command = match head {
            "a" | "b" | "c" | "d" => {
                let index = usize::from(head.as_bytes()[0] - b'a');
                Self::Select(index)
            }
            "n" | "next" => Self::Next,
            "p" | "prev" | "previous" => Self::Previous,
            "go" | "g" => {
                let number: usize = parts.next()?.parse().ok()?;
                Self::GoTo(number.checked_sub(1)?)
            }
            "s" | "show" => Self::Show,
            "f" | "finish" => Self::Finish,
            "h" | "help" | "?" => Self::Help,
            _ => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(command)
    }

    fn apply(self, controller: &mut TestSessionController) -> Result<(), SessionError> {
        match self {
            Self::Select(option) => {
                controller.select_answer(option)?;
            }
            Self::GoTo(index) => {
                controller.go_to_question(index)?;
            }
            Self::Next => {
                controller.go_next();
            }
            Self::Previous => {
                controller.go_previous();
            }
            Self::Finish => {
                controller.finish();
            }
            Self::Show | Self::Help => {}
        }
        Ok(())
    }
}

const HELP: &str = "Commands: a-d select | n next | p previous | go <n> jump | s show | f finish";

/// Normal output goes to `out` and is suppressed in JSON mode, where
/// diagnostics move to `err` so `out` carries only the outcome.
struct Output<W, E> {
    out: W,
    err: E,
    json: bool,
}

impl<W: Write, E: Write> Output<W, E> {
    fn info(&mut self, text: &str) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        writeln!(self.out, "{}", text.trim_end())
    }

    fn diagnostic(&mut self, text: &str) -> io::Result<()> {
        if self.json {
            writeln!(self.err, "{text}")
        } else {
            writeln!(self.out, "{text}")
        }
    }
}

fn render_question(controller: &TestSessionController) -> String {
    let progress = controller.progress();
    let mut out = format!(
        "\nQuestion {} of {} | {} left | {}/{} answered\n",
        progress.position,
        progress.total,
        format_countdown(controller.time_remaining_secs()),
        progress.answered,
        progress.total,
    );
    if let Some(question) = controller.current_question() {
        let selected = controller.answer_sheet().get(controller.current_index());
        out.push_str(question.text());
        out.push('\n');
        for (index, text) in question.options().iter().enumerate() {
            let marker = if selected == Some(index) { '*' } else { ' ' };
            let label = option_label(index).unwrap_or('?');
            out.push_str(&format!(" {marker}{label}) {text}\n"));
        }
    }
    out
}

fn render_outcome(outcome: &TestOutcome) -> String {
    let reason = match outcome.reason {
        CompletionReason::Submitted => "submitted",
        CompletionReason::TimeExpired => "time's up",
    };
    format!(
        "Score: {} ({})\nAnswered {} of {} | {} correct | {reason}",
        outcome.score,
        outcome.score.performance().label(),
        outcome.answered,
        outcome.total,
        outcome.correct,
    )
}

fn with_controller<T>(
    controller: &SharedController,
    f: impl FnOnce(&mut TestSessionController) -> T,
) -> T {
    let mut guard = controller.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Runs one attempt against `input` until it is submitted, times out, or
/// the input closes. Closing the input submits the test.
pub async fn run<R, W, E>(
    service: &TestService,
    student_name: &str,
    json: bool,
    input: R,
    out: W,
    err: E,
) -> Result<TestOutcome, Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    E: Write,
{
    let mut output = Output { out, err, json };
    let (controller, guard, mut completion) = service.start_timed(SessionTimer::every_second());

    output.info(&format!(
        "{student_name} | {} | {} questions, {} minutes",
        service.settings().department(),
        service.questions().len(),
        service.settings().time_budget_minutes(),
    ))?;
    output.info(HELP)?;
    output.info(&with_controller(&controller, |c| render_question(c)))?;

    let mut lines = input.lines();
    let mut input_open = true;

    let outcome = loop {
        tokio::select! {
            biased;
            outcome = &mut completion => break outcome?,
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    with_controller(&controller, |c| c.finish());
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let Some(command) = ConsoleCommand::parse(&line) else {
                    output.diagnostic(&format!("unrecognised command: {}", line.trim()))?;
                    output.diagnostic(HELP)?;
                    continue;
                };
                if command == ConsoleCommand::Help {
                    output.info(HELP)?;
                    continue;
                }
                let rendered = with_controller(&controller, |c| {
                    command.apply(c).map(|()| render_question(c))
                });
                match rendered {
                    Ok(text) => output.info(&text)?,
                    Err(err) => output.diagnostic(&err.to_string())?,
                }
            }
        }
    };
    guard.stop();

    if json {
        writeln!(output.out, "{}", serde_json::to_string_pretty(&outcome)?)?;
    } else {
        writeln!(output.out, "\n{}", render_outcome(&outcome))?;
    }
    Ok(outcome)
}
