//! aurup - Interactive upgrade selector for pacman and the AUR
//!
//! Lists pending upgrades from the sync databases and the AUR in one
//! numbered list, asks which ones to take and prints the resulting plan.

use aurup::cli::CliArgs;
use aurup::config::Settings;
use aurup::output::{create_formatter, OutputConfig, TextFormatter, Verbosity};
use aurup::progress::Progress;
use aurup::selection::{parse_selection, read_selection, resolve_targets};
use aurup::source::{AurClient, HttpClient, PacmanDb, VcsFile};
use aurup::upgrade::{list_upgrades, Sources, UpgradeOptions};
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args);

    if args.no_color {
        colored::control::set_override(false);
    }

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, honouring RUST_LOG over the verbosity flags
fn init_tracing(args: &CliArgs) {
    let default_level = if args.quiet {
        "error"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let settings = Settings::load(&args)?;
    debug!(?settings, "resolved settings");

    let client = HttpClient::new()?;
    let sources = Sources::new(
        Arc::new(PacmanDb::new(&settings.db_path).with_ignore(settings.ignore.clone())),
        Arc::new(AurClient::with_base_url(client, &settings.aur_url)),
        Arc::new(VcsFile::new(&settings.vcs_file)),
    );
    let options = UpgradeOptions::default()
        .with_devel(settings.devel)
        .with_time_update(settings.time_update);

    let mut progress = Progress::new(args.show_progress());
    progress.spinner("Searching databases for updates...");
    let report = list_upgrades(&sources, options).await;
    progress.finish_and_clear();
    let report = report?;

    let output_config = OutputConfig::from_args(&args);
    let color = output_config.color;
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format_upgrades(&report, &mut stdout)?;

    let tokens = if args.should_prompt() && !report.is_empty() {
        let prompt = TextFormatter::with_color(Verbosity::Normal, color).format_prompt();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;
        read_selection(&mut io::stdin().lock())?
    } else {
        Vec::new()
    };

    let totals = report.totals();
    let selection = parse_selection(&tokens, totals).resolve(totals);
    let targets = resolve_targets(&report.repo, &report.foreign, &selection);
    debug!(repo = targets.repo.len(), foreign = targets.foreign.len(), "resolved selection");

    formatter.format_plan(&report, &targets, &mut stdout)?;
    stdout.flush()?;

    if report.has_errors() {
        // Partial success - some sources failed
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
