//! tickboard Runtime - the top-level simulation driver
//!
//! This crate wires everything together:
//! - World: the explicit context (boards, providers, modifiers, agents)
//!   handed to every phase instead of global registries
//! - Simulation: clock + scheduler + world, with init and teardown
//! - Producers: tickable ticket sources such as inventory audits
//! - Config: JSON-loadable tuning for every component
//! - Telemetry: tracing subscriber setup

pub mod config;
pub mod producer;
pub mod simulation;
pub mod telemetry;
pub mod world;

pub use config::*;
pub use producer::*;
pub use simulation::*;
pub use telemetry::*;
pub use world::*;
