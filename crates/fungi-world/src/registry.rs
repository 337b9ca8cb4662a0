//! Fixed-capacity population arena.

use crate::fungus::Fungus;
use fungi_core::{Error, FungusId, Result};

/// Owns every live fungus, up to a fixed capacity.
///
/// Fungi are never removed, so slots fill in order and grow only as fungi
/// arrive; the first free slot is always `len()`.
#[derive(Debug, Clone)]
pub struct Registry {
    slots: Vec<Fungus>,
    capacity: u32,
}

impl Registry {
    pub fn new(capacity: u32) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity as usize
    }

    /// Slot the next insert will use
    pub fn next_free(&self) -> Option<FungusId> {
        if self.is_full() {
            None
        } else {
            Some(FungusId(self.slots.len() as u32))
        }
    }

    /// Take ownership of a fungus, storing it in the first empty slot
    pub fn insert(&mut self, fungus: Fungus) -> Result<FungusId> {
        let id = self.next_free().ok_or(Error::CapacityExhausted {
            capacity: self.capacity,
        })?;

        self.slots.push(fungus);
        Ok(id)
    }

    pub fn get(&self, id: FungusId) -> Option<&Fungus> {
        self.slots.get(id.index())
    }

    pub fn get_mut(&mut self, id: FungusId) -> Option<&mut Fungus> {
        self.slots.get_mut(id.index())
    }

    /// Live fungi with their handles, in slot order
    pub fn iter(&self) -> impl Iterator<Item = (FungusId, &Fungus)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, fungus)| (FungusId(i as u32), fungus))
    }

    /// Handles of every live fungus, in slot order
    pub fn ids(&self) -> Vec<FungusId> {
        self.iter().map(|(id, _)| id).collect()
    }
}
