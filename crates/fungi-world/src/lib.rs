//! Petri dish simulation engine.
//!
//! Fungi occupy cells of a fixed-size grid, slowly gather growth points and
//! spawn children into the neighbouring cell once they have grown enough.

pub mod fungus;
pub mod grid;
pub mod registry;
pub mod growth;
pub mod dish;

pub use fungus::Fungus;
pub use grid::Grid;
pub use registry::Registry;
pub use dish::{Dish, TickReport};
