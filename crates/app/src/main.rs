mod commands;

use std::fmt;
use std::path::{Path, PathBuf};

use practice_core::model::{ProblemBank, SessionSummary, StepProblem};
use services::{
    BankLoader, LoadedBank, OptionStatus, SessionBuilder, SessionController, SessionError,
    SolverSession,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::{PracticeCommand, SolverCommand};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBankPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBankPath { raw } => write!(f, "invalid --bank value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- practice [--bank <file.json>] [--shuffle]");
    eprintln!("  cargo run -p app -- solve    [--bank <file.json>]");
    eprintln!();
    eprintln!("Practice commands: <option number>, n(ext), h(int), r(eset), q(uit)");
    eprintln!("Solve commands:    a <answer>, n(ext step), p(rev step), h(int), r(eset),");
    eprintln!("                   s <problem id>, q(uit)");
    eprintln!();
    eprintln!("Without --bank the built-in problems are used.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PRACTICE_BANK, PRACTICE_SHUFFLE, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Practice,
    Solve,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "practice" => Some(Self::Practice),
            "solve" => Some(Self::Solve),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    bank_path: Option<PathBuf>,
    shuffle: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut bank_path = std::env::var("PRACTICE_BANK")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let mut shuffle = std::env::var("PRACTICE_SHUFFLE")
            .ok()
            .is_some_and(|value| matches!(value.trim(), "1" | "true" | "yes"));

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => {
                    let value = require_value(args, "--bank")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidBankPath { raw: value });
                    }
                    bank_path = Some(PathBuf::from(value));
                }
                "--shuffle" => shuffle = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { bank_path, shuffle })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads the bank file, or falls back to the built-in problems.
async fn load_bank(path: Option<&Path>) -> Result<LoadedBank, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        debug!("using built-in problem bank");
        return Ok(LoadedBank {
            problems: ProblemBank::sample(),
            step_problems: StepProblem::samples(),
        });
    };

    let raw = tokio::fs::read_to_string(path).await?;
    let loaded = BankLoader::from_json_str(&raw)?;
    info!(path = %path.display(), problems = loaded.problems.len(), "problem bank read");
    Ok(loaded)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Practice,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Practice,
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
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    let bank = load_bank(parsed.bank_path.as_deref()).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    match cmd {
        Command::Practice => {
            let session = SessionBuilder::new(&bank.problems)
                .with_shuffle(parsed.shuffle)
                .start()?;
            practice_loop(session, &mut lines).await
        }
        Command::Solve => {
            let solver = SolverSession::new(bank.step_problems)?;
            solve_loop(solver, &mut lines).await
        }
    }
}

fn render_problem(session: &SessionController) {
    let state = session.state();
    let progress = session.progress();
    let problem = state.current_problem();

    println!();
    println!(
        "Question {}/{}  Score {}/{}  [{:.0}%]",
        progress.position,
        progress.total,
        progress.score,
        progress.total,
        progress.fraction * 100.0
    );
    println!("{}", problem.question());
    for option in state.option_feedback() {
        let marker = match option.status {
            OptionStatus::Neutral => " ",
            OptionStatus::Correct => "✓",
            OptionStatus::Incorrect => "✗",
            OptionStatus::Dimmed => "·",
        };
        println!("  {marker} {}. {}", option.index + 1, option.text);
    }

    if let Some(explanation) = state.current_explanation() {
        let verdict = if state.is_correct() { "Correct!" } else { "Incorrect" };
        println!("{verdict} {explanation}");
    }
    if let Some(hint) = state.current_hint() {
        println!("Hint: {hint}");
    }
}

async fn practice_loop(
    mut session: SessionController,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<(), Box<dyn std::error::Error>> {
    render_problem(&session);

    while let Some(line) = lines.next_line().await? {
        let Some(command) = PracticeCommand::parse(&line) else {
            println!("unrecognized command: {}", line.trim());
            continue;
        };

        let outcome = match command {
            PracticeCommand::Select(0) => Err(SessionError::OutOfRange {
                index: 0,
                len: session.state().current_problem().option_count(),
            }),
            PracticeCommand::Select(choice) => session.select_answer(choice - 1).map(|_| ()),
            PracticeCommand::Next => session.advance(),
            PracticeCommand::Hint => {
                session.toggle_hint();
                Ok(())
            }
            PracticeCommand::Reset => {
                session.reset();
                Ok(())
            }
            PracticeCommand::Quit => break,
        };

        match outcome {
            Ok(()) => render_problem(&session),
            Err(SessionError::InvalidState { .. }) => println!("already answered; press n for next"),
            Err(SessionError::OutOfRange { .. }) if command == PracticeCommand::Next => {
                println!("this is the last problem");
            }
            Err(err) => println!("{err}"),
        }

        if session.state().is_complete() {
            println!("{}", completion_message(session.summary()));
        }
    }

    Ok(())
}

fn completion_message(summary: Result<SessionSummary, SessionError>) -> String {
    match summary {
        Ok(summary) => format!(
            "Session complete: {}/{} correct ({:.0}%). Press r to start over or q to quit.",
            summary.correct(),
            summary.total(),
            summary.accuracy() * 100.0
        ),
        Err(err) => {
            format!("Session complete, no summary: {err}. Press r to start over or q to quit.")
        }
    }
}

fn render_solver(solver: &SolverSession) {
    let problem = solver.problem();
    println!();
    println!("[{}] {}: {}", problem.id(), problem.kind(), problem.question());
    if let Some(aid) = problem.visual_aid() {
        println!("Visual aid: {aid}");
    }
    for (index, step) in solver.revealed_steps().iter().enumerate() {
        println!("  {}. {step}", index + 1);
    }
    if let Some(hint) = solver.hint() {
        println!("Hint: {hint}");
    }
    match solver.verdict() {
        Some(true) => println!("Correct! Well done! {}", solver.explanation().unwrap_or_default()),
        Some(false) => println!("Not quite right. Try again!"),
        None => {}
    }
}

async fn solve_loop(
    mut solver: SolverSession,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Problems:");
    for problem in solver.problems() {
        println!("  {} - {}: {}", problem.id(), problem.kind(), problem.description());
    }
    render_solver(&solver);

    while let Some(line) = lines.next_line().await? {
        let Some(command) = SolverCommand::parse(&line) else {
            println!("unrecognized command: {}", line.trim());
            continue;
        };

        match command {
            SolverCommand::Answer(text) => {
                solver.set_answer(text);
                solver.submit();
            }
            SolverCommand::NextStep => {
                if !solver.next_step() {
                    println!("no more steps");
                }
            }
            SolverCommand::PreviousStep => {
                if !solver.previous_step() {
                    println!("already at the first step");
                }
            }
            SolverCommand::Hint => {
                solver.toggle_hint();
            }
            SolverCommand::Reset => solver.reset(),
            SolverCommand::Select(id) => {
                if let Err(err) = solver.select_problem(id) {
                    println!("{err}");
                    continue;
                }
            }
            SolverCommand::Quit => break,
        }
        render_solver(&solver);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
