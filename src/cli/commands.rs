//! Command implementation for the auditor CLI
//!
//! Sets up logging, layers the configuration, runs the audit and prints a
//! console summary.

use anyhow::{Context, Result};
use colored::*;
use indicatif::HumanDuration;
use tracing::{debug, info};

use crate::cli::args::Args;
use crate::config::AuditConfig;
use crate::runner::{AuditRunner, RunSummary};

/// Main command runner
pub async fn run(args: Args) -> Result<RunSummary> {
    setup_logging(&args);

    info!("Starting GHCN-Daily audit");
    debug!("Command line arguments: {:?}", args);

    let request = args.request().context("Invalid audit request")?;
    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let runner = AuditRunner::new(config)
        .context("Invalid configuration")?
        .with_progress(args.show_progress());
    let summary = runner.run(&request).await?;

    if !args.quiet {
        print_summary(&summary);
    }
    Ok(summary)
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ghcnd_audit={}", log_level)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init();

    match installed {
        Ok(()) => debug!("Logging initialized at level: {}", log_level),
        Err(e) => debug!("Keeping existing tracing subscriber: {}", e),
    }
}

/// Load configuration using layered approach (defaults -> file -> args)
fn load_configuration(args: &Args) -> Result<AuditConfig> {
    if let Some(path) = &args.config {
        info!("Using config file: {}", path.display());
    }
    let config = AuditConfig::load_layered(args.config.as_deref())
        .context("Failed to load configuration")?;
    Ok(args.apply_overrides(config))
}

/// Colored console summary of a finished run
fn print_summary(summary: &RunSummary) {
    let report = &summary.report;

    println!();
    println!(
        "{} {} {}",
        "Audit complete:".bright_green().bold(),
        report.element.to_string().bright_cyan(),
        report.range.to_string().bright_white()
    );
    println!(
        "  Stations audited: {}",
        summary.station_ids.len().to_string().bright_yellow()
    );
    if let Some(fetch) = &summary.fetch {
        println!(
            "  Station files: {} cached, {} downloaded, {} unavailable",
            fetch.already_cached,
            fetch.downloaded,
            fetch.failed.len().to_string().bright_red()
        );
    }
    println!(
        "  Without data: {}",
        report.stats.stations_without_data.to_string().bright_red()
    );
    if report.stats.decode_failures > 0 {
        println!(
            "  Malformed lines skipped: {}",
            report.stats.decode_failures.to_string().yellow()
        );
    }
    match report.mean_percent_missing() {
        Some(mean) => println!("  Mean daily missing: {}", format!("{:.1}%", mean).bright_yellow()),
        None => println!("  Mean daily missing: {}", "N/A".bright_black()),
    }
    println!(
        "  Stations with gaps: {}",
        report.gaps.len().to_string().bright_yellow()
    );

    println!();
    println!("{}", "Output files:".bright_green());
    for path in [
        &summary.exported.summary,
        &summary.exported.gaps,
        &summary.exported.selected,
    ] {
        println!("  {}", path.display().to_string().bright_cyan());
    }
    println!(
        "{}",
        format!("Finished in {}", HumanDuration(summary.elapsed)).bright_black()
    );
}
