//! tickboard Policy - who may take what, and how much it is worth
//!
//! This crate implements:
//! - Eligibility: pure claim/read/visit predicates over ownership groups
//! - Modifiers: world multiplier rules that external systems toggle at runtime
//! - Scoring: aged priority x world multiplier x personal affinity, plus
//!   deterministic candidate ranking

pub mod eligibility;
pub mod modifiers;
pub mod scoring;

pub use eligibility::*;
pub use modifiers::*;
pub use scoring::*;
