//! Scoring - how much an open ticket is worth to one agent right now
//!
//! `score = round(aged_priority x world_multiplier x personal_affinity)`
//!
//! Computation happens in `f64` from a `u64` aged priority, so long-lived
//! tickets cannot overflow; the result saturates into `i64`.
//!
//! Ranking is deterministic: higher score first, then the older ticket,
//! then the lower board id, then the lower ticket id.

use std::cmp::Ordering;

use tickboard_core::{AgentIdentity, BoardId, Tick, Ticket, TicketId};

use crate::MultiplierSource;

/// Score of `ticket` for `agent` at `now`
pub fn score(
    ticket: &Ticket,
    now: Tick,
    agent: &AgentIdentity,
    modifiers: &dyn MultiplierSource,
) -> i64 {
    let aged = ticket.aged_priority(now) as f64;
    let world = sanitize(modifiers.multiplier_for(ticket));
    let affinity = agent.affinity_for(ticket.kind);

    // `as` saturates at the i64 bounds
    (aged * world * affinity).round() as i64
}

fn sanitize(multiplier: f64) -> f64 {
    if multiplier.is_finite() {
        multiplier.max(0.0)
    } else {
        0.0
    }
}

/// A scored, claimable ticket found during a read pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub board: BoardId,
    pub ticket: TicketId,
    pub score: i64,
    pub created_at: Tick,
}

impl Candidate {
    pub fn new(board: BoardId, ticket: &Ticket, score: i64) -> Self {
        Candidate {
            board,
            ticket: ticket.id,
            score,
            created_at: ticket.created_at,
        }
    }

    /// `Less` means `self` ranks ahead of `other`
    pub fn rank_cmp(&self, other: &Candidate) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.created_at.cmp(&other.created_at))
            .then(self.board.cmp(&other.board))
            .then(self.ticket.cmp(&other.ticket))
    }
}

/// Sort candidates best-first
pub fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(Candidate::rank_cmp);
}

/// Best candidate, if any
pub fn best(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.iter().min_by(|a, b| a.rank_cmp(b))
}
