//! Ticket record and lifecycle
//!
//! A ticket is one unit of publishable, claimable work. Its lifecycle is:
//!
//! ```text
//! Open --reserve--> Reserved --start--> InProgress
//! Reserved | InProgress --abandon / stale--> Open
//! Reserved | InProgress --complete--> Done
//! Reserved | InProgress --fail--> Failed
//! ```
//!
//! Tickets are plain values; only the owning board mutates them.

use serde::{Deserialize, Serialize};

use crate::{AgentId, ResourceKind, Tick, TicketId, TicketKind, TicketScope};

/// Fixed-point scale of priority points: 100 points = 1.00 priority unit
pub const PRIORITY_SCALE: u32 = 100;

/// Lifecycle stage of a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketState {
    #[default]
    Open,
    Reserved,
    InProgress,
    Done,
    Failed,
}

impl TicketState {
    /// Done and Failed never transition again
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, TicketState::Done | TicketState::Failed)
    }

    /// States in which a reservation holder exists
    #[inline]
    pub fn is_held(self) -> bool {
        matches!(self, TicketState::Reserved | TicketState::InProgress)
    }
}

/// A unit of work on a board
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub kind: TicketKind,
    pub resource: ResourceKind,
    pub scope: TicketScope,
    /// Work payload size (units to fetch, for fetch tickets)
    pub quantity: u32,
    pub base_priority_points: u32,
    pub aging_priority_points_per_tick: u32,
    pub created_at: Tick,
    pub state: TicketState,
    pub reserved_by: Option<AgentId>,
    pub reserved_at: Option<Tick>,
    pub last_progress: Option<Tick>,
    /// Diagnostic text only
    pub notes: String,
}

impl Ticket {
    /// Create an open, unassigned ticket
    pub fn new(
        kind: TicketKind,
        resource: ResourceKind,
        scope: TicketScope,
        quantity: u32,
        created_at: Tick,
    ) -> Self {
        Ticket {
            id: TicketId::UNASSIGNED,
            kind,
            resource,
            scope,
            quantity,
            base_priority_points: PRIORITY_SCALE,
            aging_priority_points_per_tick: 0,
            created_at,
            state: TicketState::Open,
            reserved_by: None,
            reserved_at: None,
            last_progress: None,
            notes: String::new(),
        }
    }

    pub fn with_priority(mut self, base_points: u32, aging_points_per_tick: u32) -> Self {
        self.base_priority_points = base_points;
        self.aging_priority_points_per_tick = aging_points_per_tick;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Request a specific id instead of letting the board assign one
    pub fn with_id(mut self, id: TicketId) -> Self {
        self.id = id;
        self
    }

    /// Priority points after linear aging, saturating at `u64::MAX`
    ///
    /// `base + aging * max(0, now - created_at)`
    pub fn aged_priority(&self, now: Tick) -> u64 {
        let age = now.since(self.created_at);
        (self.aging_priority_points_per_tick as u64)
            .saturating_mul(age)
            .saturating_add(self.base_priority_points as u64)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == TicketState::Open
    }

    #[inline]
    pub fn is_held_by(&self, agent: AgentId) -> bool {
        self.reserved_by == Some(agent)
    }

    /// Drop the reservation and go back to Open
    pub(crate) fn clear_reservation(&mut self) {
        self.state = TicketState::Open;
        self.reserved_by = None;
        self.reserved_at = None;
        self.last_progress = None;
    }
}

/// Reset a held ticket to Open, stamping the reason into its notes
///
/// Shared by voluntary abandonment and stale reclamation so both leave the
/// ticket in exactly the same shape.
pub fn release_to_open(ticket: &mut Ticket, reason: &str) {
    ticket.clear_reservation();
    ticket.notes = reason.to_string();
}
