//! tickboard Time - discrete clock and tick scheduling
//!
//! This crate implements simulated time:
//! - TickClock: converts wall-clock time into whole ticks at a fixed rate,
//!   with a speed multiplier and a per-update catch-up cap
//! - WallClock: feeds a TickClock from the monotonic OS clock
//! - Scheduler: ordered list of tickable components invoked once per tick

pub mod clock;
pub mod scheduler;

pub use clock::*;
pub use scheduler::*;
