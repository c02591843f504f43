mod actions;
mod error;
mod export;
mod queue;
mod transform;

use std::future::{pending, Future};
use std::process::ExitCode;
use anyhow::Result;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use actions::process_queue;
use export::{prepare_output_dir, BadgeStats};
use queue::{badge_queue, check_output_dir};


#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "circularizer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    debug!("Logging initialized...");

    // Interrupt drops the remaining queue, the badge in flight finishes on its own
    tokio::select! {
        r = run() => exit_code(r),
        _ = interrupted(tokio::signal::ctrl_c()) => cancelled(),
    }
}

async fn run() -> Result<BadgeStats> {
    let config = Config::new()?;

    debug!("Config loaded...");

    run_with(&config).await
}

async fn run_with(config: &Config) -> Result<BadgeStats> {
    // Queue first, it fails on a missing source dir before the output dir gets created
    let queue = badge_queue(config)?;

    let source_dir = config.source_dir();
    let output_dir = config.output_dir();

    prepare_output_dir(&output_dir).await?;
    check_output_dir(&source_dir, &output_dir)?;

    info!("Processing {} badges...", queue.len());
    info!("Source folder: {}", source_dir.display());
    info!("Output folder: {}", output_dir.display());

    let mut stats = process_queue(queue).await;
    stats.output_dir = Some(output_dir);

    Ok(stats)
}

/// Resolves when the user interrupts. Never resolves if the handler can't be installed.
async fn interrupted<F>(signal: F)
where F: Future<Output = std::io::Result<()>> {
    if let Err(e) = signal.await {
        error!("Failed to listen for interrupt signal, processing can't be cancelled: {}", e);
        pending::<()>().await
    }
}

fn exit_code(result: Result<BadgeStats>) -> ExitCode {
    match result {
        Ok(stats) => {
            report(&stats);
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn cancelled() -> ExitCode {
    warn!("Processing cancelled by user");
    ExitCode::SUCCESS
}

fn report(stats: &BadgeStats) {
    // Report missing
    if !stats.skipped.is_empty() {
        warn!("Skipped {} missing badges", stats.skipped.len());

        for (i, s) in stats.skipped.iter().enumerate() {
            warn!("{}: {}", i, s);
        }
    }

    // Report errors
    if !stats.failed.is_empty() {
        error!("Circularizer failed for {} badges", stats.failed.len());

        for (i, e) in stats.failed.iter().enumerate() {
            error!("{}: {}", i, e);
        }
    }

    info!("Processing completed: {} badges", stats.tally());

    if let Some(ref d) = stats.output_dir {
        info!("Circular badges saved to {}", d.display());
    }
}
