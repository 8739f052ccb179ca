//! Error types for tickboard
//!
//! Board operations never panic on contention. Every refused mutation is
//! reported as a `TicketError` and guarantees that nothing changed.

use thiserror::Error;

use crate::{AgentId, TicketId, TicketState};

/// Why a board refused a ticket operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketError {
    #[error("ticket {0} not found")]
    NotFound(TicketId),

    #[error("ticket {id} is not open (state {state:?})")]
    NotOpen { id: TicketId, state: TicketState },

    #[error("agent {agent} does not hold ticket {id}")]
    NotHolder { id: TicketId, agent: AgentId },

    #[error("cannot {action} ticket {id} in state {state:?}")]
    InvalidState {
        id: TicketId,
        state: TicketState,
        action: &'static str,
    },

    #[error("ticket id {0} already exists on this board")]
    DuplicateId(TicketId),

    #[error("no ticket ids left on this board")]
    IdsExhausted,
}

/// Result type for board operations
pub type TicketResult<T> = Result<T, TicketError>;

/// Unknown enumeration name while parsing kinds, resources or scopes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {what}: {name}")]
pub struct ParseNameError {
    pub what: &'static str,
    pub name: String,
}

impl ParseNameError {
    pub fn new(what: &'static str, name: &str) -> Self {
        ParseNameError {
            what,
            name: name.to_string(),
        }
    }
}
