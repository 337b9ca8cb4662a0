//! 2D occupancy grid for the dish.

use fungi_core::{DishSize, Error, FungusId, Location, Result};

/// Maps every cell of the dish to at most one fungus.
///
/// The grid only holds registry handles; it never owns a fungus.
#[derive(Debug, Clone)]
pub struct Grid {
    size: DishSize,
    cells: Vec<Option<FungusId>>,
    occupied: usize,
}

impl Grid {
    pub fn new(size: DishSize) -> Self {
        Self {
            size,
            cells: vec![None; size.area() as usize],
            occupied: 0,
        }
    }

    pub fn size(&self) -> DishSize {
        self.size
    }

    pub fn contains(&self, location: Location) -> bool {
        self.size.contains(location)
    }

    /// Whether a fungus lives at `location`. Cells outside the dish are never occupied.
    pub fn occupied(&self, location: Location) -> bool {
        self.get(location).is_some()
    }

    /// Handle of the fungus at `location`, if any
    pub fn get(&self, location: Location) -> Option<FungusId> {
        self.index(location).and_then(|index| self.cells[index])
    }

    /// Record `id` as living at `location`
    pub fn place(&mut self, location: Location, id: FungusId) -> Result<()> {
        let index = self.index(location).ok_or(Error::OutOfBounds {
            location,
            size: self.size,
        })?;

        let cell = &mut self.cells[index];
        if cell.is_some() {
            return Err(Error::Occupied { location });
        }

        *cell = Some(id);
        self.occupied += 1;
        Ok(())
    }

    /// Empty a cell, returning the handle that was there
    pub fn clear(&mut self, location: Location) -> Option<FungusId> {
        let index = self.index(location)?;
        let previous = self.cells[index].take();
        if previous.is_some() {
            self.occupied -= 1;
        }
        previous
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Iterator over occupied cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Location, FungusId)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.map(|id| (self.index_to_location(i), id)))
    }

    fn index(&self, location: Location) -> Option<usize> {
        if self.size.contains(location) {
            Some(location.y as usize * self.size.width as usize + location.x as usize)
        } else {
            None
        }
    }

    fn index_to_location(&self, index: usize) -> Location {
        let width = self.size.width as usize;
        Location::new((index % width) as u16, (index / width) as u16)
    }
}
