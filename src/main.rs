use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process,
    sync::{Arc, Mutex},
    time::Duration,
};

use clap::{Args, Parser, Subcommand};
use tokio::{runtime::Runtime, signal};

use typist::animator::{AnimationHandle, StopReason, TextAnimator};
use typist::config::{self, AnimationConfig, ConfigOverrides, RevealConfig, Script};
use typist::error::AppError;
use typist::scheduler::{lock, TokioScheduler};
use typist::sink::TerminalSink;
use typist::{logging, tui};

/// How often a foreground command checks whether its animation finished.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Explicit subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Type and delete each entry in turn on the current line
    Loop(LoopArgs),
    /// Type a block of text once, then exit
    Reveal(RevealArgs),
    /// Full-screen demo of the typewriter effects
    Showcase,
}

#[derive(Args)]
struct LoopArgs {
    /// Entries to cycle through (overrides the script's entries)
    entries: Vec<String>,
    /// YAML or JSON file with `entries` and optional timing fields
    #[arg(long)]
    script: Option<PathBuf>,
    /// Milliseconds between typed characters
    #[arg(long, allow_negative_numbers = true)]
    typing_delay_ms: Option<i64>,
    /// Milliseconds between deleted characters
    #[arg(long, allow_negative_numbers = true)]
    deleting_delay_ms: Option<i64>,
    /// Milliseconds to wait once an entry is fully typed
    #[arg(long = "pause-ms", allow_negative_numbers = true)]
    pause_after_typed_ms: Option<i64>,
    /// Milliseconds before the first character
    #[arg(long, allow_negative_numbers = true)]
    start_delay_ms: Option<i64>,
    /// Stop after this many passes over the entries
    #[arg(long)]
    cycles: Option<u32>,
}

#[derive(Args)]
struct RevealArgs {
    /// Text to reveal
    text: Option<String>,
    /// Read the text from a file instead
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,
    /// Milliseconds between characters
    #[arg(long, default_value_t = config::DEFAULT_REVEAL_DELAY_MS, allow_negative_numbers = true)]
    delay_ms: i64,
    /// Milliseconds before the first character
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    start_delay_ms: i64,
}

#[derive(Parser)]
#[command(
    name = "typist",
    version,
    about = "A terminal typewriter: cycles and reveals text one character at a time",
    after_help = "EXAMPLES:\n  typist loop \"ellie git commit\" \"ellie start-day\"\n  typist loop --script commands.yaml --cycles 2\n  typist reveal --file transcript.txt --delay-ms 15\n  typist showcase\n\nSet TYPIST_LOG=debug for diagnostics."
)]
struct Cli {
    /// Write diagnostics to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = dispatch(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<(), AppError> {
    // The showcase owns the screen; only log there when sent to a file.
    if cli.log_file.is_some() || !matches!(cli.command, Commands::Showcase) {
        logging::init(cli.log_file.as_deref())?;
    }

    let runtime = build_runtime()?;
    let animator = TextAnimator::new(TokioScheduler::new(runtime.handle().clone()));

    match cli.command {
        Commands::Loop(args) => run_loop(&runtime, &animator, args),
        Commands::Reveal(args) => run_reveal(&runtime, &animator, args),
        Commands::Showcase => tui::run_showcase(animator),
    }
}

/// Timer callbacks run on a single worker so ticks never run in parallel.
fn build_runtime() -> Result<Runtime, AppError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("typist-timers")
        .enable_all()
        .build()?;
    Ok(runtime)
}

fn run_loop(
    runtime: &Runtime,
    animator: &TextAnimator<TokioScheduler>,
    args: LoopArgs,
) -> Result<(), AppError> {
    let (entries, config) = resolve_loop_input(&args)?;
    let sink = Arc::new(Mutex::new(TerminalSink::new(io::stdout())));
    let handle = animator.start(entries, &sink, &config)?;
    runtime.block_on(wait_for(&handle));
    end_line(&sink, &handle)
}

/// Entries and timing for `loop`: defaults, then script, then flags.
fn resolve_loop_input(args: &LoopArgs) -> Result<(Vec<String>, AnimationConfig), AppError> {
    let (script_entries, base) = match args.script.as_deref() {
        Some(path) => {
            let script = Script::load(path)?;
            let base = script.animation_config();
            (script.entries, base)
        }
        None => (Vec::new(), AnimationConfig::default()),
    };

    let entries = if args.entries.is_empty() {
        script_entries
    } else {
        args.entries.clone()
    };
    if entries.is_empty() && args.script.is_none() {
        return Err(AppError::MissingInput);
    }

    let overrides = ConfigOverrides {
        typing_delay_ms: args.typing_delay_ms,
        deleting_delay_ms: args.deleting_delay_ms,
        pause_after_typed_ms: args.pause_after_typed_ms,
        start_delay_ms: args.start_delay_ms,
        cycles: args.cycles,
    };
    Ok((entries, overrides.apply(base)))
}

fn run_reveal(
    runtime: &Runtime,
    animator: &TextAnimator<TokioScheduler>,
    args: RevealArgs,
) -> Result<(), AppError> {
    let text = match (args.text, args.file.as_deref()) {
        (Some(text), _) => text,
        (None, Some(path)) => read_reveal_file(path)?,
        (None, None) => return Err(AppError::MissingInput),
    };
    let config = RevealConfig {
        delay_ms: args.delay_ms,
        start_delay_ms: args.start_delay_ms,
    };

    let sink = Arc::new(Mutex::new(TerminalSink::new(io::stdout())));
    let handle = animator.reveal(text, &sink, &config)?;
    runtime.block_on(wait_for(&handle));
    end_line(&sink, &handle)
}

/// Terminate the animated line unless the output has already gone away.
fn end_line<W: Write + Send + 'static>(
    sink: &Mutex<TerminalSink<W>>,
    handle: &AnimationHandle,
) -> Result<(), AppError> {
    if handle.outcome() == Some(StopReason::SinkDetached) {
        return Ok(());
    }
    match lock(sink).finish_line() {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("output closed before the final newline");
            Ok(())
        }
        result => Ok(result?),
    }
}

/// File contents without the trailing newline, which `finish_line` adds back.
fn read_reveal_file(path: &Path) -> Result<String, AppError> {
    let mut text = config::read_file(path)?;
    let trimmed = text.trim_end_matches(['\n', '\r']).len();
    text.truncate(trimmed);
    Ok(text)
}

/// Wait until the animation ends on its own or the user presses Ctrl-C.
async fn wait_for(handle: &AnimationHandle) {
    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ticker = tokio::time::interval(POLL_INTERVAL);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                handle.stop();
                break;
            }
            _ = ticker.tick() => {
                if !handle.is_running() {
                    break;
                }
            }
        }
    }

    match handle.outcome() {
        Some(StopReason::SinkDetached) => tracing::debug!("output closed, animation stopped"),
        outcome => tracing::debug!(?outcome, "animation finished"),
    }
}
