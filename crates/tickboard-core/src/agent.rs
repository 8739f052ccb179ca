//! Agent identity and reservation memory

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{AgentId, BoardId, GroupId, TicketId, TicketKind};

/// Who an agent is, as seen by eligibility and scoring
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentIdentity {
    pub id: AgentId,
    /// Group-A membership (home boards)
    pub household: GroupId,
    /// Group-B membership (work boards), `GroupId::NONE` when unemployed
    #[serde(default)]
    pub workplace: GroupId,
    /// Per-kind score multipliers, 1.0 when absent
    #[serde(default)]
    pub affinities: HashMap<TicketKind, f32>,
}

impl AgentIdentity {
    pub fn new(id: AgentId, household: GroupId) -> Self {
        AgentIdentity {
            id,
            household,
            workplace: GroupId::NONE,
            affinities: HashMap::new(),
        }
    }

    pub fn employed_at(mut self, workplace: GroupId) -> Self {
        self.workplace = workplace;
        self
    }

    pub fn with_affinity(mut self, kind: TicketKind, multiplier: f32) -> Self {
        self.affinities.insert(kind, multiplier);
        self
    }

    #[inline]
    pub fn is_employed(&self) -> bool {
        !self.workplace.is_none()
    }

    /// Personal multiplier for a kind, never negative
    pub fn affinity_for(&self, kind: TicketKind) -> f64 {
        self.affinities
            .get(&kind)
            .map(|m| (*m as f64).max(0.0))
            .unwrap_or(1.0)
    }
}

/// An agent's claim on one ticket of one board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Reservation {
    pub ticket: TicketId,
    pub board: BoardId,
}

/// Transient per-agent record of at most one active reservation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentMemory {
    reservation: Option<Reservation>,
}

impl AgentMemory {
    pub fn new() -> Self {
        AgentMemory::default()
    }

    #[inline]
    pub fn has_ticket(&self) -> bool {
        self.reservation.is_some()
    }

    #[inline]
    pub fn reservation(&self) -> Option<Reservation> {
        self.reservation
    }

    pub fn remember(&mut self, board: BoardId, ticket: TicketId) {
        self.reservation = Some(Reservation { ticket, board });
    }

    /// Forget the reservation, returning what was held
    pub fn clear(&mut self) -> Option<Reservation> {
        self.reservation.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affinity_defaults_to_one() {
        let agent = AgentIdentity::new(AgentId::new(1), GroupId::new(1))
            .with_affinity(TicketKind::Fetch, 1.5)
            .with_affinity(TicketKind::Clean, -2.0);

        assert_eq!(agent.affinity_for(TicketKind::Fetch), 1.5);
        assert_eq!(agent.affinity_for(TicketKind::Repair), 1.0);
        assert_eq!(agent.affinity_for(TicketKind::Clean), 0.0);
    }

    #[test]
    fn test_employment() {
        let agent = AgentIdentity::new(AgentId::new(1), GroupId::new(1));
        assert!(!agent.is_employed());
        assert!(agent.employed_at(GroupId::new(9)).is_employed());
    }

    #[test]
    fn test_memory_remember_and_clear() {
        let mut memory = AgentMemory::new();
        assert!(!memory.has_ticket());

        memory.remember(BoardId::new(2), TicketId::new(5));
        assert!(memory.has_ticket());
        assert_eq!(
            memory.reservation(),
            Some(Reservation {
                ticket: TicketId::new(5),
                board: BoardId::new(2)
            })
        );

        assert!(memory.clear().is_some());
        assert!(!memory.has_ticket());
        assert!(memory.clear().is_none());
    }
}
