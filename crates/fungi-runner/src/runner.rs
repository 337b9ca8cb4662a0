//! Paced tick loop driving a dish.

use crate::frame::{draw_dish, FrameSink};
use anyhow::Result;
use fungi_core::{DishStats, RunId, RunnerConfig};
use fungi_world::Dish;
use std::future::Future;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, instrument, warn};

/// Outcome of a finished run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub population: usize,
    pub capacity: u32,
    pub stats: DishStats,
}

/// Seed a dish from `config` and tick it once per frame until the tick limit
/// is reached or `shutdown` resolves.
#[instrument(skip_all, fields(run_id = %run_id))]
pub async fn run<S, F>(
    config: RunnerConfig,
    run_id: RunId,
    sink: &mut S,
    shutdown: F,
) -> Result<RunSummary>
where
    S: FrameSink,
    F: Future<Output = ()>,
{
    let mut dish = Dish::from_config(&config.dish)?;

    let accepted = dish.seed(&config.seeds);
    if accepted < config.seeds.len() {
        warn!(
            requested = config.seeds.len(),
            accepted,
            "Some seeds were rejected"
        );
    }

    info!(
        seed = config.dish.seed,
        population = dish.len(),
        frame_delay_ms = config.frame_delay_ms,
        max_ticks = ?config.max_ticks,
        "Starting run"
    );

    // A zero period would make the interval panic.
    let mut frames = interval(Duration::from_millis(config.frame_delay_ms.max(1)));
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        if let Some(max_ticks) = config.max_ticks {
            if dish.tick_count() >= max_ticks {
                info!(max_ticks, "Tick limit reached");
                break;
            }
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!(tick = dish.tick_count(), "Stopping run");
                break;
            }
            _ = frames.tick() => {}
        }

        draw_dish(&dish, sink);
        let report = dish.tick();

        if config.metrics_interval > 0 && report.tick % config.metrics_interval == 0 {
            emit_population_metrics(&dish);
        }
    }

    let summary = RunSummary {
        ticks: dish.tick_count(),
        population: dish.len(),
        capacity: dish.capacity(),
        stats: dish.stats().clone(),
    };
    emit_run_summary(&summary);

    Ok(summary)
}

fn emit_population_metrics(dish: &Dish) {
    let stats = dish.stats();
    info!(
        event = "population_metrics",
        tick = dish.tick_count(),
        population = dish.len(),
        capacity = dish.capacity(),
        growth_events = stats.growth_events,
        spawn_attempts = stats.spawn_attempts,
        spawns_accepted = stats.spawns_accepted,
        rejected_occupied = stats.rejected_occupied,
        rejected_out_of_bounds = stats.rejected_out_of_bounds,
        rejected_full = stats.rejected_full,
        spawn_success_rate = format!("{:.2}%", stats.spawn_success_rate()),
        "Population metrics snapshot"
    );
}

fn emit_run_summary(summary: &RunSummary) {
    let stats = &summary.stats;
    info!(
        event = "run_summary",
        total_ticks = summary.ticks,
        final_population = summary.population,
        capacity = summary.capacity,
        seeded = stats.seeded,
        spawns_accepted = stats.spawns_accepted,
        spawns_rejected = stats.total_rejected(),
        spawn_success_rate = format!("{:.2}%", stats.spawn_success_rate()),
        "Run complete"
    );
}
