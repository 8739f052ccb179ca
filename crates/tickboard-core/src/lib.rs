//! tickboard core - Fundamental types and primitives
//!
//! This crate defines the types shared by every other tickboard crate:
//! - Identifiers (TicketId, AgentId, BoardId, GroupId)
//! - Discrete time (Tick) and world positions
//! - Ticket record, categories and lifecycle states
//! - Agent identity and reservation memory
//! - Error taxonomy for board operations

pub mod agent;
pub mod error;
pub mod id;
pub mod kind;
pub mod position;
pub mod ticket;
pub mod time;

pub use agent::*;
pub use error::*;
pub use id::*;
pub use kind::*;
pub use position::*;
pub use ticket::*;
pub use time::*;
