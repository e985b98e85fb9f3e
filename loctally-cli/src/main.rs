mod app;
mod ui;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser};
use color_eyre::{Result, eyre::bail};
use loctally_core::{ExtensionFilter, ScanConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{AppState, ScanOutcome};
use ui::{ProgressLine, Theme, render_outcome};

/// Redraw cadence of the progress line
const TICK: Duration = Duration::from_millis(50);

/// loctally - count lines, blanks and comments in source trees
#[derive(Parser, Debug)]
#[command(name = "loctally")]
#[command(about = "Count lines, blank lines and comment lines of the code in your projects")]
#[command(version, arg_required_else_help = true)]
struct Args {
    /// Paths to your projects (scanned concurrently)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// -v: lines per extension, -vv: lines per file plus the per-extension section
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,

    /// Comma-separated extensions or file names overriding the defaults (e.g. .rs,.go,Makefile)
    #[arg(short = 'e', long = "exts", value_name = "EXTS")]
    exts: Option<String>,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,

    /// Worker threads per path (0 = number of CPUs)
    #[arg(short = 'j', long, default_value_t = 0)]
    threads: usize,

    /// Hide the progress line
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn scan_config(&self) -> Result<ScanConfig> {
        let extensions = match &self.exts {
            Some(list) => {
                let filter = ExtensionFilter::parse_list(list);
                if filter.is_empty() {
                    bail!("no extensions given to -e: {list:?}");
                }
                filter
            }
            None => ExtensionFilter::default(),
        };

        Ok(ScanConfig {
            extensions,
            per_extension: self.verbose >= 1,
            per_file: self.verbose >= 2,
            num_threads: self.threads,
            ..ScanConfig::default()
        })
    }
}

fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("loctally_core=debug,loctally_cli=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.debug);

    let config = args.scan_config()?;
    info!(
        paths = args.paths.len(),
        patterns = config.extensions.patterns().len(),
        "starting"
    );

    let show_progress = !args.quiet && std::io::stderr().is_terminal();
    let outcomes = run_scans(&args.paths, &config, show_progress)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        let theme = Theme::detect();
        for outcome in &outcomes {
            print!("{}", render_outcome(outcome, &theme));
        }
    }

    if outcomes.iter().any(ScanOutcome::is_failure) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Scan every path concurrently, redrawing progress until all are done
fn run_scans(paths: &[PathBuf], config: &ScanConfig, show_progress: bool) -> Result<Vec<ScanOutcome>> {
    let theme = Theme::detect();
    let mut progress = ProgressLine::new(&theme, show_progress);
    let mut state = AppState::start(paths, config);

    loop {
        state.poll();
        if state.is_finished() {
            break;
        }
        progress.draw(&state)?;
        std::thread::sleep(TICK);
        state.tick_spinner();
    }
    progress.clear()?;

    Ok(state.into_outcomes())
}
