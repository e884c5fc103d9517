use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use mcq_core::model::{DEFAULT_DEPARTMENT, DEFAULT_TIME_BUDGET_SECS};
use services::{Clock, TestService};
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, fmt as log_fmt, prelude::*};
use ui::{App, UiApp, build_app_context};

mod console;

const DEFAULT_STUDENT_NAME: &str = "Alex Student";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTimeBudget { origin: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTimeBudget { origin, raw } => {
                write!(f, "invalid {origin} value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    student_name: String,
    test_service: Arc<TestService>,
}

impl UiApp for DesktopApp {
    fn student_name(&self) -> String {
        self.student_name.clone()
    }

    fn test_service(&self) -> Arc<TestService> {
        Arc::clone(&self.test_service)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    student_name: String,
    department: String,
    time_budget_secs: u32,
    json: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui      [--student <name>] [--department <name>] [--time-budget <secs>]");
    eprintln!("  cargo run -p app -- console [--student <name>] [--department <name>] [--time-budget <secs>] [--json]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --student \"{DEFAULT_STUDENT_NAME}\"");
    eprintln!("  --department \"{DEFAULT_DEPARTMENT}\"");
    eprintln!("  --time-budget {DEFAULT_TIME_BUDGET_SECS}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MCQ_STUDENT_NAME, MCQ_DEPARTMENT, MCQ_TIME_BUDGET_SECS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Console,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "console" => Some(Self::Console),
            _ => None,
        }
    }
}

impl Args {
    fn from_env() -> Result<Self, ArgsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` finds under the `MCQ_*` keys.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ArgsError> {
        let time_budget_secs = match lookup("MCQ_TIME_BUDGET_SECS") {
            Some(raw) => parse_time_budget("MCQ_TIME_BUDGET_SECS", raw)?,
            None => DEFAULT_TIME_BUDGET_SECS,
        };

        Ok(Self {
            student_name: lookup("MCQ_STUDENT_NAME")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STUDENT_NAME.to_string()),
            department: lookup("MCQ_DEPARTMENT")
                .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string()),
            time_budget_secs,
            json: false,
        })
    }

    fn parse(
        cmd: Command,
        defaults: Self,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = defaults;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--student" => {
                    parsed.student_name = require_value(args, "--student")?;
                }
                "--department" => {
                    parsed.department = require_value(args, "--department")?;
                }
                "--time-budget" => {
                    let value = require_value(args, "--time-budget")?;
                    parsed.time_budget_secs = parse_time_budget("--time-budget", value)?;
                }
                "--json" if cmd == Command::Console => {
                    parsed.json = true;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn parse_time_budget(origin: &'static str, raw: String) -> Result<u32, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidTimeBudget { origin, raw })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so `console --json` keeps stdout machine-readable.
    let _ = tracing_subscriber::registry()
        .with(
            log_fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::from_env()
        .and_then(|defaults| Args::parse(cmd, defaults, &mut iter))
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;

    init_tracing();

    let service = TestService::computer_science(
        Clock::system(),
        parsed.time_budget_secs,
        parsed.department,
    )?;
    tracing::info!(
        command = ?cmd,
        department = service.settings().department(),
        budget_secs = service.settings().time_budget_secs(),
        "starting"
    );

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                student_name: parsed.student_name,
                test_service: Arc::new(service),
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("MCQ Test")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Console => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(console::run(
                &service,
                &parsed.student_name,
                parsed.json,
                BufReader::new(tokio::io::stdin()),
                std::io::stdout(),
                std::io::stderr(),
            ))?;
            Ok(())
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
