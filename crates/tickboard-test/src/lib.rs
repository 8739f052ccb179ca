//! tickboard Test Harness - deterministic worlds for integration testing
//!
//! This crate provides:
//! - Straight-line grid movement
//! - Stockpile resource providers
//! - Seeded chaos: per-tick agent order shuffling, recurring chores
//! - Reservation consistency checks
//! - A scenario builder for villages of households and workplaces

pub mod chaos;
pub mod invariants;
pub mod movement;
pub mod providers;
pub mod scenario;

pub use chaos::*;
pub use invariants::*;
pub use movement::*;
pub use providers::*;
pub use scenario::*;
