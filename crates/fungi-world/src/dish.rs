//! Simulation engine for a petri dish.

use crate::fungus::Fungus;
use crate::grid::Grid;
use crate::growth;
use crate::registry::Registry;
use fungi_core::{
    DishConfig, DishSize, DishStats, Error, FungusId, Location, Rejection, Result, SeedSpec,
    DEFAULT_SEED,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Summary of a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Fungi that gained a growth point
    pub grown: u32,
    /// Children accepted into the dish
    pub spawned: u32,
    /// Children turned away
    pub rejected: u32,
}

/// Owns the grid and the registry and is the only thing that mutates them.
#[derive(Debug)]
pub struct Dish {
    grid: Grid,
    registry: Registry,
    growth_rate: u8,
    rng: ChaCha8Rng,
    tick: u64,
    stats: DishStats,
}

impl Dish {
    /// Create a dish seeded with the default random seed
    pub fn new(capacity: u32, width: u16, height: u16, growth_rate: u8) -> Result<Self> {
        Self::from_config(&DishConfig {
            capacity,
            size: DishSize::new(width, height),
            growth_rate,
            seed: DEFAULT_SEED,
        })
    }

    pub fn from_config(config: &DishConfig) -> Result<Self> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(config.seed))
    }

    /// Create a dish drawing from the given generator; `config.seed` is ignored
    pub fn with_rng(config: &DishConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;

        info!(
            capacity = config.capacity,
            width = config.size.width,
            height = config.size.height,
            growth_rate = config.growth_rate,
            "Creating dish"
        );

        Ok(Self {
            grid: Grid::new(config.size),
            registry: Registry::new(config.capacity),
            growth_rate: config.growth_rate,
            rng,
            tick: 0,
            stats: DishStats::new(),
        })
    }

    /// Add a fungus, reporting whether it was accepted
    pub fn add(&mut self, fungus: Fungus) -> bool {
        self.try_add(fungus).is_ok()
    }

    /// Add a fungus, reporting why it was turned away
    pub fn try_add(&mut self, fungus: Fungus) -> Result<FungusId> {
        let result = self.insert(fungus);
        match &result {
            Ok(_) => self.stats.seeded += 1,
            Err(err) => {
                if let Some(rejection) = Rejection::from_error(err) {
                    self.stats.record_rejection(rejection);
                }
            }
        }
        result
    }

    /// Add every seed, returning how many were accepted
    pub fn seed(&mut self, seeds: &[SeedSpec]) -> usize {
        seeds
            .iter()
            .filter(|seed| self.add(Fungus::new(seed.location, seed.color)))
            .count()
    }

    /// Advance the simulation by one step.
    ///
    /// Only fungi alive when the tick starts are grown; children spawned during
    /// the tick wait for the next one.
    pub fn tick(&mut self) -> TickReport {
        self.tick += 1;
        let mut report = TickReport {
            tick: self.tick,
            ..Default::default()
        };

        let live = self.registry.ids();

        for id in live {
            let Some(fungus) = self.registry.get_mut(id) else {
                continue;
            };

            if growth::should_grow(&mut self.rng, self.growth_rate) {
                fungus.add_growth(1);
                report.grown += 1;
            }

            if !fungus.is_ready_to_spawn() {
                continue;
            }

            let parent = fungus.location();
            let child = fungus.spawn_child();
            let outcome = match child {
                Some(child) => self.insert(child).map(|_| ()).map_err(|err| {
                    Rejection::from_error(&err).unwrap_or(Rejection::OutOfBounds)
                }),
                None => Err(Rejection::OutOfBounds),
            };

            match outcome {
                Ok(()) => report.spawned += 1,
                Err(rejection) => {
                    report.rejected += 1;
                    trace!(
                        event = "spawn_rejected",
                        reason = %rejection,
                        parent_x = parent.x,
                        parent_y = parent.y,
                        tick = self.tick,
                        "Child discarded"
                    );
                }
            }
            self.stats.record_spawn(outcome);
        }

        self.stats.ticks += 1;
        self.stats.growth_events += u64::from(report.grown);

        debug!(
            tick = report.tick,
            grown = report.grown,
            spawned = report.spawned,
            rejected = report.rejected,
            population = self.registry.len(),
            "Tick complete"
        );

        report
    }

    /// Live fungi in registry order
    pub fn live_entities(&self) -> impl Iterator<Item = &Fungus> + '_ {
        self.registry.iter().map(|(_, fungus)| fungus)
    }

    pub fn fungus_at(&self, location: Location) -> Option<&Fungus> {
        self.grid
            .get(location)
            .and_then(|id| self.registry.get(id))
    }

    pub fn get(&self, id: FungusId) -> Option<&Fungus> {
        self.registry.get(id)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn capacity(&self) -> u32 {
        self.registry.capacity()
    }

    pub fn is_full(&self) -> bool {
        self.registry.is_full()
    }

    pub fn size(&self) -> DishSize {
        self.grid.size()
    }

    pub fn growth_rate(&self) -> u8 {
        self.growth_rate
    }

    pub fn stats(&self) -> &DishStats {
        &self.stats
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Place a fungus in both the grid and the registry, or in neither.
    fn insert(&mut self, fungus: Fungus) -> Result<FungusId> {
        let location = fungus.location();

        if !self.grid.contains(location) {
            return Err(Error::OutOfBounds {
                location,
                size: self.grid.size(),
            });
        }

        if self.grid.occupied(location) {
            return Err(Error::Occupied { location });
        }

        let id = self.registry.next_free().ok_or(Error::CapacityExhausted {
            capacity: self.registry.capacity(),
        })?;

        self.grid.place(location, id)?;

        match self.registry.insert(fungus) {
            Ok(inserted) => {
                debug_assert_eq!(inserted, id);
                if self.registry.is_full() {
                    info!(
                        capacity = self.registry.capacity(),
                        tick = self.tick,
                        "Dish reached capacity"
                    );
                }
                Ok(inserted)
            }
            // Unreachable while `next_free` above agrees with `insert`; the
            // grid must never keep a handle the registry does not own.
            Err(err) => {
                self.grid.clear(location);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fungus::SPAWN_THRESHOLD;
    use fungi_core::Color;

    fn fungus_at(x: u16, y: u16) -> Fungus {
        Fungus::new(Location::new(x, y), Color::RED)
    }

    fn occupied_cells(dish: &Dish) -> Vec<(Location, FungusId)> {
        dish.grid().iter().collect()
    }

    /// Every registry entry is reachable from exactly its grid cell and nothing else is in the grid.
    pub(crate) fn assert_consistent(dish: &Dish) {
        assert_eq!(dish.grid().occupied_count(), dish.registry().len());
        for (id, fungus) in dish.registry().iter() {
            assert_eq!(dish.grid().get(fungus.location()), Some(id));
        }
        for (location, id) in dish.grid().iter() {
            assert_eq!(dish.get(id).map(Fungus::location), Some(location));
        }
    }

    #[test]
    fn test_dish_creation() {
        let dish = Dish::new(100, 10, 10, 50).unwrap();
        assert_eq!(dish.capacity(), 100);
        assert_eq!(dish.size(), DishSize::new(10, 10));
        assert_eq!(dish.growth_rate(), 50);
        assert!(dish.is_empty());
        assert_eq!(dish.tick_count(), 0);
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(Dish::new(0, 10, 10, 4), Err(Error::Validation(_))));
        assert!(matches!(Dish::new(10, 0, 10, 4), Err(Error::Validation(_))));
        assert!(matches!(Dish::new(10, 10, 0, 4), Err(Error::Validation(_))));
        assert!(matches!(Dish::new(10, 10, 10, 101), Err(Error::Validation(_))));
    }

    #[test]
    fn test_add_to_occupied_cell() {
        let mut dish = Dish::new(10, 10, 10, 0).unwrap();

        assert!(dish.add(fungus_at(1, 1)));
        let before = occupied_cells(&dish);

        let second = Fungus::new(Location::new(1, 1), Color::BLUE);
        assert!(matches!(dish.try_add(second), Err(Error::Occupied { .. })));

        assert_eq!(dish.len(), 1);
        assert_eq!(occupied_cells(&dish), before);
        assert_eq!(dish.fungus_at(Location::new(1, 1)).unwrap().color(), Color::RED);
        assert_eq!(dish.stats().rejected_occupied, 1);
    }

    #[test]
    fn test_add_when_full_leaves_grid_untouched() {
        let mut dish = Dish::new(2, 10, 10, 0).unwrap();
        assert!(dish.add(fungus_at(0, 0)));
        assert!(dish.add(fungus_at(5, 5)));
        let before = occupied_cells(&dish);

        let result = dish.try_add(fungus_at(3, 3));
        assert!(matches!(result, Err(Error::CapacityExhausted { capacity: 2 })));

        assert_eq!(occupied_cells(&dish), before);
        assert!(!dish.grid().occupied(Location::new(3, 3)));
        assert_eq!(dish.len(), 2);
        assert_consistent(&dish);
    }

    #[test]
    fn test_capacity_far_above_area() {
        let mut dish = Dish::new(u32::MAX, 1, 1, 100).unwrap();
        assert_eq!(dish.capacity(), u32::MAX);

        assert!(dish.add(fungus_at(0, 0)));
        assert!(!dish.add(fungus_at(0, 0)));
        assert!(!dish.add(fungus_at(1, 0)));

        for _ in 0..SPAWN_THRESHOLD {
            dish.tick();
        }

        assert_eq!(dish.len(), 1);
        assert!(!dish.is_full());
        assert_eq!(dish.stats().rejected_out_of_bounds, 2);
        assert_consistent(&dish);
    }

    #[test]
    fn test_add_out_of_bounds() {
        let mut dish = Dish::new(10, 10, 10, 0).unwrap();
        assert!(!dish.add(fungus_at(10, 3)));
        assert!(!dish.add(fungus_at(3, 10)));
        assert!(dish.is_empty());
        assert_eq!(dish.stats().rejected_out_of_bounds, 2);
    }

    #[test]
    fn test_seed() {
        let mut dish = Dish::new(10, 10, 10, 0).unwrap();
        let seeds = [
            SeedSpec::new(Location::new(0, 0), Color::RED),
            SeedSpec::new(Location::new(0, 0), Color::GREEN),
            SeedSpec::new(Location::new(0, 1), Color::BLUE),
        ];

        assert_eq!(dish.seed(&seeds), 2);
        assert_eq!(dish.stats().seeded, 2);
        assert_consistent(&dish);
    }

    #[test]
    fn test_zero_growth_rate_never_grows() {
        let mut dish = Dish::new(10, 10, 10, 0).unwrap();
        dish.add(fungus_at(0, 0));
        dish.add(fungus_at(4, 4));

        for _ in 0..500 {
            let report = dish.tick();
            assert_eq!(report.grown, 0);
            assert_eq!(report.spawned, 0);
        }

        assert!(dish.live_entities().all(|f| f.growth_points() == 0));
        assert_eq!(dish.len(), 2);
        assert_eq!(dish.stats().spawn_attempts, 0);
    }

    #[test]
    fn test_full_growth_spawns_after_threshold() {
        let mut dish = Dish::new(10, 10, 10, 100).unwrap();
        dish.add(fungus_at(2, 2));

        for tick in 1..SPAWN_THRESHOLD {
            let report = dish.tick();
            assert_eq!(report.spawned, 0);
            assert_eq!(
                dish.fungus_at(Location::new(2, 2)).unwrap().growth_points(),
                tick
            );
        }

        let report = dish.tick();
        assert_eq!(report.spawned, 1);
        assert_eq!(dish.len(), 2);

        let parent = dish.fungus_at(Location::new(2, 2)).unwrap();
        assert!(parent.growth_points() < SPAWN_THRESHOLD);

        let child = dish.fungus_at(Location::new(3, 3)).unwrap();
        assert_eq!(child.color(), Color::RED);
        // Spawned this tick, so not grown yet.
        assert_eq!(child.growth_points(), 0);
    }

    #[test]
    fn test_three_seeds_with_room_for_children() {
        let mut dish = Dish::new(6, 10, 10, 100).unwrap();
        dish.add(Fungus::new(Location::new(0, 0), Color::RED));
        dish.add(Fungus::new(Location::new(0, 1), Color::GREEN));
        dish.add(Fungus::new(Location::new(0, 2), Color::BLUE));

        for _ in 0..SPAWN_THRESHOLD {
            dish.tick();
        }

        assert_eq!(dish.len(), 6);
        assert_eq!(dish.fungus_at(Location::new(1, 1)).unwrap().color(), Color::RED);
        assert_eq!(dish.fungus_at(Location::new(1, 2)).unwrap().color(), Color::GREEN);
        assert_eq!(dish.fungus_at(Location::new(1, 3)).unwrap().color(), Color::BLUE);
        assert!(dish.is_full());

        let before = occupied_cells(&dish);
        assert!(!dish.add(fungus_at(9, 9)));
        assert_eq!(occupied_cells(&dish), before);
        assert_consistent(&dish);
    }

    #[test]
    fn test_three_seeds_at_capacity() {
        let mut dish = Dish::new(3, 10, 10, 100).unwrap();
        dish.add(fungus_at(0, 0));
        dish.add(fungus_at(0, 1));
        dish.add(fungus_at(0, 2));
        let before = occupied_cells(&dish);

        let mut rejected = 0;
        for _ in 0..SPAWN_THRESHOLD {
            rejected += dish.tick().rejected;
        }

        assert_eq!(rejected, 3);
        assert_eq!(dish.stats().rejected_full, 3);
        assert_eq!(dish.len(), 3);
        assert_eq!(occupied_cells(&dish), before);
        assert!(!dish.grid().occupied(Location::new(1, 1)));
        assert_consistent(&dish);
    }

    #[test]
    fn test_colliding_spawn_is_discarded() {
        let mut dish = Dish::new(10, 10, 10, 100).unwrap();
        dish.add(Fungus::new(Location::new(0, 0), Color::RED));
        dish.add(Fungus::new(Location::new(1, 1), Color::GREEN));

        for _ in 0..SPAWN_THRESHOLD {
            dish.tick();
        }

        // (0, 0) aims at (1, 1), which is taken; (1, 1) spawns into (2, 2).
        assert_eq!(dish.len(), 3);
        assert_eq!(dish.fungus_at(Location::new(1, 1)).unwrap().color(), Color::GREEN);
        assert_eq!(dish.fungus_at(Location::new(2, 2)).unwrap().color(), Color::GREEN);
        assert_eq!(dish.stats().rejected_occupied, 1);
        assert_eq!(dish.stats().spawns_accepted, 1);
        assert_consistent(&dish);
    }

    #[test]
    fn test_spawn_past_edge_is_discarded() {
        let mut dish = Dish::new(10, 10, 10, 100).unwrap();
        dish.add(fungus_at(9, 4));

        for _ in 0..SPAWN_THRESHOLD {
            dish.tick();
        }

        assert_eq!(dish.len(), 1);
        assert_eq!(dish.stats().rejected_out_of_bounds, 1);
        assert_eq!(dish.fungus_at(Location::new(9, 4)).unwrap().growth_points(), 0);
    }

    #[test]
    fn test_children_grow_from_next_tick() {
        let mut dish = Dish::new(100, 50, 50, 100).unwrap();
        dish.add(fungus_at(0, 0));

        for _ in 0..SPAWN_THRESHOLD {
            dish.tick();
        }
        assert_eq!(dish.len(), 2);

        dish.tick();
        assert_eq!(dish.fungus_at(Location::new(1, 1)).unwrap().growth_points(), 1);
        assert_eq!(dish.fungus_at(Location::new(0, 0)).unwrap().growth_points(), 1);
    }

    #[test]
    fn test_tick_report_and_stats() {
        let mut dish = Dish::new(100, 50, 50, 100).unwrap();
        dish.add(fungus_at(0, 0));
        dish.add(fungus_at(10, 0));

        let report = dish.tick();
        assert_eq!(report.tick, 1);
        assert_eq!(report.grown, 2);

        for _ in 1..SPAWN_THRESHOLD {
            dish.tick();
        }

        let stats = dish.stats();
        assert_eq!(stats.ticks, 10);
        assert_eq!(stats.growth_events, 20);
        assert_eq!(stats.spawn_attempts, 2);
        assert_eq!(stats.spawns_accepted, 2);
        assert_eq!(stats.spawn_success_rate(), 100.0);
    }

    #[test]
    fn test_same_seed_same_dish() {
        let config = DishConfig {
            capacity: 500,
            size: DishSize::new(40, 40),
            growth_rate: 30,
            seed: 99,
        };

        let run = || {
            let mut dish = Dish::from_config(&config).unwrap();
            dish.add(fungus_at(0, 0));
            dish.add(fungus_at(0, 5));
            dish.add(fungus_at(7, 2));
            for _ in 0..200 {
                dish.tick();
            }
            let fungi: Vec<Fungus> = dish.live_entities().cloned().collect();
            (occupied_cells(&dish), fungi)
        };

        let first = run();
        assert!(first.0.len() > 3);
        assert_eq!(first, run());
    }

    #[test]
    fn test_with_rng_ignores_config_seed() {
        let config = DishConfig {
            capacity: 100,
            size: DishSize::new(20, 20),
            growth_rate: 50,
            seed: 1,
        };

        let mut a = Dish::with_rng(&config, ChaCha8Rng::seed_from_u64(5)).unwrap();
        let mut b = Dish::from_config(&DishConfig { seed: 5, ..config.clone() }).unwrap();
        a.add(fungus_at(0, 0));
        b.add(fungus_at(0, 0));

        for _ in 0..30 {
            assert_eq!(a.tick(), b.tick());
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn grid_and_registry_stay_consistent(
                seed in any::<u64>(),
                growth_rate in 0u8..=100,
                capacity in 1u32..64,
                starts in prop::collection::vec((0u16..12, 0u16..12), 1..10),
                ticks in 0usize..80,
            ) {
                let config = DishConfig {
                    capacity,
                    size: DishSize::new(12, 12),
                    growth_rate,
                    seed,
                };
                let mut dish = Dish::from_config(&config).unwrap();
                for (x, y) in starts {
                    dish.add(fungus_at(x, y));
                }

                for _ in 0..ticks {
                    let before = dish.len();
                    let report = dish.tick();
                    prop_assert_eq!(dish.len(), before + report.spawned as usize);
                    prop_assert!(dish.len() <= capacity as usize);
                    prop_assert!(dish.live_entities().all(|f| f.growth_points() < SPAWN_THRESHOLD));
                }

                assert_consistent(&dish);
            }

            #[test]
            fn occupied_add_never_changes_population(
                x in 0u16..8,
                y in 0u16..8,
            ) {
                let mut dish = Dish::new(16, 8, 8, 0).unwrap();
                prop_assert!(dish.add(fungus_at(x, y)));
                prop_assert!(!dish.add(fungus_at(x, y)));
                prop_assert_eq!(dish.len(), 1);
                assert_consistent(&dish);
            }
        }
    }
}
