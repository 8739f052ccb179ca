//! Consistency checks between agent memories and board state

use std::collections::HashSet;
use std::fmt;

use tickboard_core::{AgentId, BoardId, TicketId};
use tickboard_runtime::World;

/// A mismatch found by [`check_reservations`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Two agents remember the same ticket
    SharedMemory { board: BoardId, ticket: TicketId },
    /// An agent remembers a ticket the board does not say it holds
    NotHeld {
        agent: AgentId,
        board: BoardId,
        ticket: TicketId,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::SharedMemory { board, ticket } => {
                write!(f, "ticket {ticket} on {board} remembered by two agents")
            }
            Violation::NotHeld {
                agent,
                board,
                ticket,
            } => write!(f, "{agent} remembers {ticket} on {board} without holding it"),
        }
    }
}

/// Check that every remembered reservation is real and unshared
///
/// Meant to run between ticks. Returns the number of busy agents.
pub fn check_reservations(world: &World) -> Result<usize, Violation> {
    let mut seen = HashSet::new();
    for agent in &world.agents {
        let Some(r) = agent.memory().reservation() else {
            continue;
        };
        if !seen.insert(r) {
            return Err(Violation::SharedMemory {
                board: r.board,
                ticket: r.ticket,
            });
        }
        let held = world
            .board(r.board)
            .and_then(|b| b.find(r.ticket))
            .map_or(false, |t| t.state.is_held() && t.is_held_by(agent.id()));
        if !held {
            return Err(Violation::NotHeld {
                agent: agent.id(),
                board: r.board,
                ticket: r.ticket,
            });
        }
    }
    Ok(seen.len())
}
