//! Line-oriented front end for the calculator engine.
//!
//! Each plain input line is treated like a dictated expression: it replaces
//! the pending expression, runs through debounced mode classification, and
//! is evaluated. `:`-prefixed commands drive the rest of the keypad.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use omnicalc::ai::{RuleBasedClassifier, UnavailableSolver};
use omnicalc::auth::FixedUser;
use omnicalc::history::{HistoryRecorder, HistoryStore, MemoryHistory, run_recorder};
use omnicalc::mode::{next_outcome, run_classifier};
use omnicalc::{CalculatorConfig, CalculatorMode, InputSession, Key};

#[derive(Parser, Debug)]
#[command(name = "omnicalc", about = "All-in-one calculator engine")]
struct Cli {
    /// Initial mode: standard or scientific.
    #[arg(long, default_value = "standard")]
    mode: String,

    /// Sign in as this user to enable calculation history.
    #[arg(long)]
    user: Option<String>,

    /// Config file path (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Teacher Mode: ask the step solver before evaluating.
    #[arg(long)]
    teacher: bool,
}

fn parse_mode(value: &str) -> Option<CalculatorMode> {
    match value.to_lowercase().as_str() {
        "standard" | "std" => Some(CalculatorMode::Standard),
        "scientific" | "sci" => Some(CalculatorMode::Scientific),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CalculatorConfig::load_from(path),
        None => CalculatorConfig::load(),
    };

    let store = Arc::new(MemoryHistory::new());
    let (recorder, history_rx) = HistoryRecorder::channel();
    tokio::spawn(run_recorder(store.clone(), history_rx));

    let (ticket_tx, ticket_rx) = flume::unbounded();
    let (outcome_tx, outcome_rx) = flume::unbounded();
    tokio::spawn(run_classifier(
        RuleBasedClassifier,
        config.debounce(),
        ticket_rx,
        outcome_tx,
    ));

    let mut session = InputSession::new(&config).with_recorder(recorder);
    if let Some(user) = &cli.user {
        session = session.with_identity(Arc::new(FixedUser(user.clone())));
    }
    if let Some(mode) = parse_mode(&cli.mode) {
        session.select_mode(mode);
    }

    let solver = UnavailableSolver;
    let stdin = std::io::stdin();

    println!("omnicalc - type an expression, :help for commands");
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(command) = input.strip_prefix(':') {
            match run_command(command, &mut session, store.as_ref(), &cli.user) {
                CommandOutcome::Continue => {}
                CommandOutcome::Quit => break,
            }
            continue;
        }

        session.set_expression(input);

        // Debounced classification; the wait is bounded so a stalled
        // classifier cannot hold up input. The outcome is staleness-checked
        // and suppression-checked before it can flip the mode.
        if let Some(ticket) = session.classification_ticket() {
            ticket_tx.send_async(ticket).await.ok();
            let wait = config.debounce() + Duration::from_millis(100);
            if let Some((ticket, mode)) = next_outcome(&outcome_rx, wait).await
                && session.apply_classification(&ticket, mode)
            {
                println!("[mode: {}]", session.mode());
            }
        }

        if cli.teacher {
            if let Some(solution) = session.calculate_with_steps(&solver).await {
                for (i, step) in solution.steps.iter().enumerate() {
                    println!("  {}. {}: {}", i + 1, step.step, step.explanation);
                    println!("     = {}", step.result);
                }
            }
        } else {
            session.press(Key::Equals);
        }

        report(&mut session);
    }

    Ok(())
}

enum CommandOutcome {
    Continue,
    Quit,
}

fn run_command(
    command: &str,
    session: &mut InputSession,
    store: &MemoryHistory,
    user: &Option<String>,
) -> CommandOutcome {
    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("quit" | "q"), _) => return CommandOutcome::Quit,
        (Some("clear"), _) => session.press(Key::Clear),
        (Some("back"), _) => session.press(Key::Backspace),
        (Some("bin"), _) => {
            session.press(Key::ToBinary);
            report(session);
        }
        (Some("mode"), Some(value)) => match parse_mode(value) {
            Some(mode) => {
                session.select_mode(mode);
                println!("[mode: {}]", session.mode());
            }
            None => println!("unknown mode {value:?}"),
        },
        (Some("mode"), None) => println!("[mode: {}]", session.mode()),
        (Some("key"), _) => {
            for value in command.split_whitespace().skip(1) {
                match Key::from_keypad(value) {
                    Some(key) => session.press(key),
                    None => println!("unknown key {value:?}"),
                }
            }
            report(session);
        }
        (Some("history"), Some("clear")) => match user {
            Some(user) => store.clear(user),
            None => println!("sign in with --user to use history"),
        },
        (Some("history"), None) => match user {
            Some(user) => {
                for record in store.snapshot(user) {
                    println!("  {} = {}", record.expression, record.result);
                }
            }
            None => println!("sign in with --user to use history"),
        },
        (Some("help"), _) => {
            println!(":mode [standard|scientific]  :key <buttons>  :bin  :back  :clear");
            println!(":history [clear]  :quit");
        }
        _ => println!("unknown command :{command}"),
    }
    CommandOutcome::Continue
}

fn report(session: &mut InputSession) {
    if let Some(display) = session.display() {
        println!("  {}", session.expression());
        println!("= {display}");
    }
    if let Some(notice) = session.take_notice() {
        println!("[{}: {}]", notice.title, notice.description);
    }
}
