//! scrawl entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use core_config::load_from;
use core_events::ShutdownFlag;
use scrawl::{ExitReason, bootstrap, install_signal_handlers, run_script, status_line};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "scrawl.log";

#[derive(Parser, Debug)]
#[command(name = "scrawl", version, about = "scrawl modal text editor (headless driver)")]
struct Args {
    /// File to open. A missing file starts an empty document with that name.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `scrawl.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Event script to replay; reads stdin when omitted.
    #[arg(long = "script")]
    pub script: Option<PathBuf>,
    /// Print the document to stdout after the run.
    #[arg(long = "print")]
    pub print: bool,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let mut config = load_from(args.config.clone())?;
    let mut model = bootstrap(args.path.as_deref(), &mut config);

    let script: Box<dyn BufRead> = match &args.script {
        Some(p) => Box::new(BufReader::new(
            File::open(p).with_context(|| format!("opening script {}", p.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let shutdown = ShutdownFlag::new();
    install_signal_handlers(&shutdown).context("installing signal handlers")?;
    let summary = run_script(&mut model, &mut config, script, &shutdown)?;
    info!(
        target: "runtime",
        reason = ?summary.reason,
        events = summary.events,
        rejected = summary.rejected_lines,
        "shutdown"
    );

    let mut out = io::stdout().lock();
    if args.print {
        model.state().document().write_lines(&mut out)?;
    }
    writeln!(out, "{}", status_line(&model))?;
    if summary.reason == ExitReason::Quit && model.state().document().is_dirty() {
        info!(target: "runtime", "quit_with_unsaved_changes");
    }
    Ok(())
}
