//! Population statistics tracking for a dish.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a fungus was turned away from the dish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// Target cell already holds a fungus
    Occupied,
    /// Target cell lies outside the dish
    OutOfBounds,
    /// Registry has no free slot left
    Full,
}

impl Rejection {
    pub fn from_error(err: &Error) -> Option<Self> {
        match err {
            Error::Occupied { .. } => Some(Rejection::Occupied),
            Error::OutOfBounds { .. } => Some(Rejection::OutOfBounds),
            Error::CapacityExhausted { .. } => Some(Rejection::Full),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::Occupied => "occupied",
            Rejection::OutOfBounds => "out_of_bounds",
            Rejection::Full => "full",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifetime counters for a dish
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishStats {
    /// Ticks simulated
    pub ticks: u64,
    /// Fungi accepted outside of reproduction
    pub seeded: u64,
    /// Growth points handed out
    pub growth_events: u64,
    /// Children produced by reproducing fungi
    pub spawn_attempts: u64,
    /// Children that made it into the dish
    pub spawns_accepted: u64,
    pub rejected_occupied: u64,
    pub rejected_out_of_bounds: u64,
    pub rejected_full: u64,
}

impl DishStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the outcome of one spawn attempt into the counters
    pub fn record_spawn(&mut self, outcome: Result<(), Rejection>) {
        self.spawn_attempts += 1;
        match outcome {
            Ok(()) => self.spawns_accepted += 1,
            Err(rejection) => self.record_rejection(rejection),
        }
    }

    pub fn record_rejection(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::Occupied => self.rejected_occupied += 1,
            Rejection::OutOfBounds => self.rejected_out_of_bounds += 1,
            Rejection::Full => self.rejected_full += 1,
        }
    }

    pub fn total_rejected(&self) -> u64 {
        self.rejected_occupied + self.rejected_out_of_bounds + self.rejected_full
    }

    /// Percentage of spawn attempts that were accepted
    pub fn spawn_success_rate(&self) -> f64 {
        if self.spawn_attempts > 0 {
            (self.spawns_accepted as f64 / self.spawn_attempts as f64) * 100.0
        } else {
            0.0
        }
    }
}
