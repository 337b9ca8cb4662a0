//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::{Color, DishSize, Location};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 11;

/// Largest accepted growth rate (a percentage)
pub const MAX_GROWTH_RATE: u8 = 100;

/// Dish configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DishConfig {
    /// Maximum number of fungi the dish will ever hold
    pub capacity: u32,
    /// Size of the dish grid
    pub size: DishSize,
    /// Chance (0 to 100) that a fungus gains a growth point in a tick
    pub growth_rate: u8,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for DishConfig {
    fn default() -> Self {
        let size = DishSize::default();
        Self {
            capacity: size.area(),
            size,
            growth_rate: 4,
            seed: DEFAULT_SEED,
        }
    }
}

impl DishConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::Validation("Dish capacity must be non-zero".to_string()));
        }

        if self.size.area() == 0 {
            return Err(Error::Validation(format!(
                "Dish must have a non-zero area, got {}",
                self.size
            )));
        }

        if self.growth_rate > MAX_GROWTH_RATE {
            return Err(Error::Validation(format!(
                "Growth rate {} exceeds {}",
                self.growth_rate, MAX_GROWTH_RATE
            )));
        }

        Ok(())
    }
}

/// A fungus placed in the dish before the first tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSpec {
    pub location: Location,
    pub color: Color,
}

impl SeedSpec {
    pub fn new(location: Location, color: Color) -> Self {
        Self { location, color }
    }
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Dish parameters
    pub dish: DishConfig,
    /// Initial population
    pub seeds: Vec<SeedSpec>,
    /// Delay between ticks (milliseconds)
    pub frame_delay_ms: u64,
    /// Stop after this many ticks; run until interrupted when unset
    pub max_ticks: Option<u64>,
    /// Emit population metrics every N ticks (0 disables)
    pub metrics_interval: u64,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            dish: DishConfig::default(),
            seeds: vec![
                SeedSpec::new(Location::new(0, 0), Color::RED),
                SeedSpec::new(Location::new(0, 1), Color::GREEN),
                SeedSpec::new(Location::new(0, 2), Color::BLUE),
            ],
            frame_delay_ms: 10,
            max_ticks: None,
            metrics_interval: 100,
            json_logs: false,
        }
    }
}

impl RunnerConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RunnerConfig = serde_json::from_str(json)?;
        config.dish.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading runner configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
