//! Headless runner for the Fungi petri dish.

mod frame;
mod runner;
mod telemetry;

use anyhow::{Context, Result};
use fungi_core::{RunId, RunnerConfig};
use tokio::signal;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration
    let config = load_config()?;

    telemetry::init_telemetry(config.json_logs)?;

    let run_id = RunId::new();
    info!(
        run_id = %run_id,
        size = %config.dish.size,
        capacity = config.dish.capacity,
        growth_rate = config.dish.growth_rate,
        "Starting Fungi runner"
    );

    let mut sink = frame::HeadlessFrames::default();
    let summary = runner::run(config, run_id, &mut sink, shutdown_signal()).await?;

    info!(
        frames = sink.frames,
        population = summary.population,
        "Shutting down runner"
    );

    Ok(())
}

/// Configuration from the first argument or `FUNGI_CONFIG`, then environment overrides
fn load_config() -> Result<RunnerConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("FUNGI_CONFIG").ok());

    let config = match path {
        Some(path) => RunnerConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => RunnerConfig::default(),
    };

    apply_overrides(
        config,
        std::env::var("FUNGI_SEED").ok().as_deref(),
        std::env::var("FUNGI_MAX_TICKS").ok().as_deref(),
    )
}

fn apply_overrides(
    mut config: RunnerConfig,
    seed: Option<&str>,
    max_ticks: Option<&str>,
) -> Result<RunnerConfig> {
    if let Some(seed) = seed {
        config.dish.seed = seed
            .parse()
            .with_context(|| format!("invalid FUNGI_SEED: {}", seed))?;
    }

    if let Some(max_ticks) = max_ticks {
        config.max_ticks = Some(
            max_ticks
                .parse()
                .with_context(|| format!("invalid FUNGI_MAX_TICKS: {}", max_ticks))?,
        );
    }

    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
