//! Bayes Dice - Bayesian belief updating demo
//!
//! The main entry point for bayes-dice, handling:
//! - Interactive play: roll a hidden die and watch the belief converge
//! - Non-interactive simulation with reproducible seeds
//! - One-shot posterior computation from explicit rolls
//! - Settings inspection and validation

use std::io::{BufRead, Write};
use std::path::PathBuf;

use bd_config::{load_settings, validate_settings, LoadedSettings, RollRange, ValidationError};
use bd_core::exit_codes::ExitCode;
use bd_core::inference::{BeliefEngine, BeliefError};
use bd_core::logging::{init_logging, LogConfig, LogLevel};
use bd_core::output::{
    envelope, format_percent, render_banner, render_ledger, render_posterior, render_roll,
    render_summary, OutputFormat, OUTPUT_SCHEMA_VERSION,
};
use bd_core::session::{RollOutcome, Session, SessionError, SessionOptions};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, error, warn};

/// Bayes Dice - guess a hidden die from its rolls with Bayesian updating
#[derive(Parser)]
#[command(name = "bayes-dice")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to settings.json (overrides env and XDG lookup)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "human")]
    format: OutputFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// RNG seed for a reproducible session
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Posterior probability required for a guess
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Die side-counts in the box (comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    hypotheses: Vec<u32>,

    /// Roll rule: inclusive ([1, sides]) or exclusive-upper ([1, sides))
    #[arg(long, global = true)]
    roll_range: Option<RollRange>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session: press ENTER to roll, x to stop (default)
    Play,

    /// Run a session without prompting
    Simulate(SimulateArgs),

    /// Compute the belief for an explicit list of rolls
    Posterior(PosteriorArgs),

    /// Settings management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Number of rolls (defaults to max_rolls from settings)
    #[arg(long, short = 'n')]
    rolls: Option<u32>,

    /// Stop as soon as a die reaches the guess threshold
    #[arg(long)]
    stop_on_guess: bool,
}

#[derive(Args, Debug)]
struct PosteriorArgs {
    /// Observed roll values, in order
    #[arg(required = true, num_args = 1..)]
    rolls: Vec<u32>,

    /// Record every roll first and update once
    #[arg(long)]
    batch: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show effective settings and where they came from
    Show,
    /// Validate a settings file
    Validate {
        /// Path to settings file (defaults to the resolved location)
        path: Option<PathBuf>,
    },
}

fn main() {
    // clap's own usage-error code (2) would collide with ExitCode::Undecided.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Correct
            };
            let _ = e.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Off)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, None));

    let exit_code = match &cli.command {
        None | Some(Commands::Play) => run_play(&cli.global),
        Some(Commands::Simulate(args)) => run_simulate(&cli.global, args),
        Some(Commands::Posterior(args)) => run_posterior(&cli.global, args),
        Some(Commands::Config(args)) => run_config(&cli.global, args),
        Some(Commands::Version) => print_version(&cli.global),
    };

    debug!(exit_code = %exit_code, "exiting");
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Settings
// ============================================================================

/// Resolve settings, then apply CLI overrides and re-validate.
fn effective_settings(global: &GlobalOpts) -> Result<LoadedSettings, ValidationError> {
    let mut loaded = load_settings(global.config.as_deref())?;
    let settings = &mut loaded.settings;
    if let Some(seed) = global.seed {
        settings.seed = Some(seed);
    }
    if let Some(threshold) = global.threshold {
        settings.guess_threshold = threshold;
    }
    if !global.hypotheses.is_empty() {
        settings.hypotheses = global.hypotheses.clone();
    }
    if let Some(roll_range) = global.roll_range {
        settings.roll_range = roll_range;
    }
    validate_settings(settings)?;
    Ok(loaded)
}

// ============================================================================
// Commands
// ============================================================================

fn run_play(global: &GlobalOpts) -> ExitCode {
    let loaded = match effective_settings(global) {
        Ok(l) => l,
        Err(e) => return output_config_error(global, &e),
    };
    let settings = &loaded.settings;
    let mut session = match Session::new(SessionOptions::from(settings)) {
        Ok(s) => s,
        Err(e) => return output_session_error(global, &e),
    };

    let machine = global.format.is_machine();
    if !machine {
        println!("\n-------------------------------------\n");
        println!("{}\n", render_banner(session.engine().hypotheses()));
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    match prompt(&mut input, machine, "Press enter to roll.") {
        Ok(Some(_)) => {}
        Ok(None) => return finish_session(global, session),
        Err(e) => return output_io_error(global, &e),
    }

    loop {
        let outcome = match session.roll() {
            Ok(o) => o,
            Err(e) => return output_session_error(global, &e),
        };
        if let Err(code) = emit_roll(global, &outcome, session.guess_threshold()) {
            return code;
        }

        if session.rolls() >= settings.max_rolls as usize {
            debug!(max_rolls = settings.max_rolls, "roll limit reached");
            break;
        }
        match prompt(&mut input, machine, "\nPress ENTER to roll. (x to exit)") {
            Ok(Some(line)) if line.trim().eq_ignore_ascii_case("x") => break,
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => return output_io_error(global, &e),
        }
    }

    finish_session(global, session)
}

fn run_simulate(global: &GlobalOpts, args: &SimulateArgs) -> ExitCode {
    let loaded = match effective_settings(global) {
        Ok(l) => l,
        Err(e) => return output_config_error(global, &e),
    };
    let mut session = match Session::new(SessionOptions::from(&loaded.settings)) {
        Ok(s) => s,
        Err(e) => return output_session_error(global, &e),
    };
    let rolls = args.rolls.unwrap_or(loaded.settings.max_rolls);

    let mut outcomes = Vec::new();
    for _ in 0..rolls {
        let outcome = match session.roll() {
            Ok(o) => o,
            Err(e) => return output_session_error(global, &e),
        };
        let decided = outcome.guess.is_some();
        if global.format == OutputFormat::Json {
            outcomes.push(outcome);
        } else if let Err(code) = emit_roll(global, &outcome, session.guess_threshold()) {
            return code;
        }
        if args.stop_on_guess && decided {
            break;
        }
    }

    let summary = session.finish();
    let printed = match global.format {
        OutputFormat::Json => {
            let payload = serde_json::json!({ "summary": &summary, "rolls": outcomes });
            print_json(&envelope("simulate", &payload))
        }
        OutputFormat::Jsonl => print_jsonl(&summary),
        OutputFormat::Human => {
            println!("{}", render_summary(&summary));
            Ok(())
        }
    };
    printed.err().unwrap_or_else(|| ExitCode::from(summary.verdict))
}

#[derive(Serialize)]
struct PosteriorReport {
    table: bd_core::inference::BeliefTable,
    guess: Option<u32>,
    guess_threshold: f64,
    ruled_out: Vec<u32>,
    batch: bool,
}

fn run_posterior(global: &GlobalOpts, args: &PosteriorArgs) -> ExitCode {
    let loaded = match effective_settings(global) {
        Ok(l) => l,
        Err(e) => return output_config_error(global, &e),
    };
    let settings = &loaded.settings;

    let result = (|| -> Result<BeliefEngine, BeliefError> {
        let mut engine = BeliefEngine::new(&settings.hypotheses)?;
        for &roll in &args.rolls {
            engine.observe(roll)?;
            if !args.batch {
                engine.update_belief()?;
            }
        }
        if args.batch {
            engine.update_belief()?;
        }
        Ok(engine)
    })();

    let engine = match result {
        Ok(e) => e,
        Err(e) => return output_session_error(global, &SessionError::from(e)),
    };

    let threshold = settings.guess_threshold;
    let report = PosteriorReport {
        table: engine.table(),
        guess: engine.best_guess(threshold),
        guess_threshold: threshold,
        ruled_out: engine.ruled_out(),
        batch: args.batch,
    };

    let printed = match global.format {
        OutputFormat::Json => print_json(&envelope("posterior", &report)),
        OutputFormat::Jsonl => print_jsonl(&report),
        OutputFormat::Human => {
            print!("{}", render_ledger(&report.table));
            println!();
            print!("{}", render_posterior(&report.table, threshold));
            match report.guess {
                Some(sides) => println!("\nGuess: {}-sided die", sides),
                None => println!(
                    "\nNo confident guess yet (threshold {}%)",
                    format_percent(threshold)
                ),
            }
            Ok(())
        }
    };
    printed.err().unwrap_or(ExitCode::Correct)
}

fn run_config(global: &GlobalOpts, args: &ConfigArgs) -> ExitCode {
    match &args.command {
        ConfigCommands::Show => run_config_show(global),
        ConfigCommands::Validate { path } => run_config_validate(global, path.as_ref()),
    }
}

fn run_config_show(global: &GlobalOpts) -> ExitCode {
    let loaded = match effective_settings(global) {
        Ok(l) => l,
        Err(e) => return output_config_error(global, &e),
    };

    let printed = match global.format {
        OutputFormat::Json => print_json(&envelope("config show", &loaded)),
        OutputFormat::Jsonl => print_jsonl(&loaded),
        OutputFormat::Human => {
            let s = &loaded.settings;
            println!("source: {}", loaded.source);
            if let Some(path) = &loaded.path {
                println!("path: {}", path.display());
            }
            println!("hypotheses: {:?}", s.hypotheses);
            println!("guess_threshold: {}", s.guess_threshold);
            println!("roll_range: {}", s.roll_range);
            match s.seed {
                Some(seed) => println!("seed: {}", seed),
                None => println!("seed: (random)"),
            }
            println!("max_rolls: {}", s.max_rolls);
            Ok(())
        }
    };
    printed.err().unwrap_or(ExitCode::Correct)
}

fn run_config_validate(global: &GlobalOpts, path: Option<&PathBuf>) -> ExitCode {
    let target = path.or(global.config.as_ref());
    let loaded = match load_settings(target.map(|p| p.as_path())) {
        Ok(l) => l,
        Err(e) => return output_config_error(global, &e),
    };

    let location = loaded
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "builtin defaults".to_string());
    let printed = match global.format {
        OutputFormat::Human => {
            println!("valid: {}", location);
            Ok(())
        }
        _ => {
            let payload = serde_json::json!({
                "valid": true,
                "path": loaded.path,
                "source": loaded.source,
                "hash": loaded.hash,
            });
            print_json(&envelope("config validate", &payload))
        }
    };
    printed.err().unwrap_or(ExitCode::Correct)
}

fn print_version(global: &GlobalOpts) -> ExitCode {
    let version_info = serde_json::json!({
        "schema_version": OUTPUT_SCHEMA_VERSION,
        "bayes_dice_version": env!("CARGO_PKG_VERSION"),
    });

    match global.format {
        OutputFormat::Human => {
            println!("bayes-dice {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", OUTPUT_SCHEMA_VERSION);
            ExitCode::Correct
        }
        _ => print_json(&version_info).err().unwrap_or(ExitCode::Correct),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Print a prompt and read one line. `None` on end of input.
fn prompt(input: &mut impl BufRead, machine: bool, message: &str) -> std::io::Result<Option<String>> {
    if machine {
        eprintln!("{}", message);
    } else {
        println!("{}", message);
        std::io::stdout().flush()?;
    }
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn emit_roll(global: &GlobalOpts, outcome: &RollOutcome, threshold: f64) -> Result<(), ExitCode> {
    match global.format {
        OutputFormat::Human => {
            println!("\n{}", render_roll(outcome, threshold));
            Ok(())
        }
        _ => print_jsonl(outcome),
    }
}

fn finish_session(global: &GlobalOpts, session: Session) -> ExitCode {
    let summary = session.finish();
    let printed = match global.format {
        OutputFormat::Human => {
            println!("{}", render_summary(&summary));
            Ok(())
        }
        _ => print_jsonl(&summary),
    };
    printed.err().unwrap_or_else(|| ExitCode::from(summary.verdict))
}

/// Pretty-print a payload; a serialization failure is an internal error.
fn print_json<T: Serialize>(value: &T) -> Result<(), ExitCode> {
    let s = serde_json::to_string_pretty(value).map_err(serialization_failed)?;
    println!("{}", s);
    Ok(())
}

fn print_jsonl<T: Serialize>(value: &T) -> Result<(), ExitCode> {
    let s = serde_json::to_string(value).map_err(serialization_failed)?;
    println!("{}", s);
    Ok(())
}

fn serialization_failed(e: serde_json::Error) -> ExitCode {
    error!(error = %e, "failed to serialize output");
    ExitCode::InternalError
}

fn output_error(global: &GlobalOpts, code: ExitCode, message: &str) -> ExitCode {
    if code.is_internal_error() {
        error!(code = %code, detail = message, "command failed");
    } else if code.is_user_error() {
        warn!(code = %code, detail = message, "command rejected");
    }

    match global.format {
        OutputFormat::Human => eprintln!("bayes-dice: {}", message),
        _ => {
            let payload = serde_json::json!({
                "schema_version": OUTPUT_SCHEMA_VERSION,
                "error": {
                    "code": code.as_i32(),
                    "code_name": code.code_name(),
                    "message": message,
                }
            });
            if let Err(internal) = print_json(&payload) {
                return internal;
            }
        }
    }
    code
}

fn output_config_error(global: &GlobalOpts, e: &ValidationError) -> ExitCode {
    debug!(validation_code = e.code(), "settings rejected");
    output_error(global, ExitCode::ConfigError, &e.to_string())
}

fn output_session_error(global: &GlobalOpts, e: &SessionError) -> ExitCode {
    let code = match e {
        SessionError::Belief(BeliefError::DegenerateBelief { .. }) => ExitCode::DegenerateBelief,
        SessionError::Belief(_) => ExitCode::ArgsError,
        SessionError::InvalidThreshold(_) | SessionError::UnrollableDie { .. } => {
            ExitCode::ArgsError
        }
    };
    output_error(global, code, &e.to_string())
}

fn output_io_error(global: &GlobalOpts, e: &std::io::Error) -> ExitCode {
    output_error(global, ExitCode::IoError, &e.to_string())
}
