//! tickboard Board - authoritative ticket storage
//!
//! This crate implements the board side of the marketplace:
//! - Board: sole mutator of its tickets (create, reserve, start, touch,
//!   abandon, complete, fail, prune, reclaim stale reservations)
//! - Inventory: per-board resource stock that fetch work delivers into
//! - BoardSet: boards keyed by stable id, with their inventories

pub mod board;
pub mod inventory;
pub mod registry;

pub use board::*;
pub use inventory::*;
pub use registry::*;
