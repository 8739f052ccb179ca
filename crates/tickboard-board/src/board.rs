//! Board - the authoritative store of tickets for one location
//!
//! Every mutation is a single check-then-set inside one call. A refused
//! operation returns a `TicketError` and leaves the board untouched, so
//! the first caller to reserve an open ticket wins and everyone after it
//! in the same tick simply fails.

use std::collections::BTreeMap;

use tickboard_core::{
    release_to_open, AgentId, BoardId, GroupId, Position, ResourceKind, Tick, Ticket, TicketError,
    TicketId, TicketKind, TicketResult, TicketScope, TicketState,
};

/// Ownership of a board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoardKind {
    /// Home board, owned by a household (group-A)
    Home { household: GroupId },
    /// Work board, owned by a workplace (group-B)
    Work { workplace: GroupId },
}

impl BoardKind {
    /// Owning household, if this is a home board
    pub fn household(&self) -> Option<GroupId> {
        match self {
            BoardKind::Home { household } => Some(*household),
            BoardKind::Work { .. } => None,
        }
    }

    /// Owning workplace, if this is a work board
    pub fn workplace(&self) -> Option<GroupId> {
        match self {
            BoardKind::Work { workplace } => Some(*workplace),
            BoardKind::Home { .. } => None,
        }
    }
}

/// Outcome of one maintenance cycle
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaintenanceReport {
    /// Tickets whose stale reservation was released
    pub reclaimed: Vec<TicketId>,
    /// Done tickets removed
    pub pruned: usize,
}

/// Ticket board
#[derive(Debug, Clone)]
pub struct Board {
    id: BoardId,
    kind: BoardKind,
    /// Job site of this board's work
    position: Position,
    /// Silence allowed on a held ticket before it is reclaimed
    stale_timeout_ticks: u64,
    /// Tickets indexed by id; iteration order is ascending id
    tickets: BTreeMap<TicketId, Ticket>,
    /// Next id to hand out, `None` once the id space is used up
    next_id: Option<u64>,
}

impl Board {
    pub fn new(id: BoardId, kind: BoardKind, position: Position, stale_timeout_ticks: u64) -> Self {
        Board {
            id,
            kind,
            position,
            stale_timeout_ticks,
            tickets: BTreeMap::new(),
            next_id: Some(1),
        }
    }

    pub fn id(&self) -> BoardId {
        self.id
    }

    pub fn kind(&self) -> BoardKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn stale_timeout_ticks(&self) -> u64 {
        self.stale_timeout_ticks
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Iterate over all tickets in id order
    pub fn tickets(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.values()
    }

    /// Iterate over Open tickets in id order
    pub fn open_tickets(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.values().filter(|t| t.is_open())
    }

    /// Add a ticket, assigning an id when it carries none
    ///
    /// A supplied id that collides with an existing ticket is refused.
    pub fn add_ticket(&mut self, mut ticket: Ticket) -> TicketResult<TicketId> {
        let id = if ticket.id.is_assigned() {
            if self.tickets.contains_key(&ticket.id) {
                tracing::warn!(
                    board = %self.id,
                    ticket = %ticket.id,
                    "refusing ticket with duplicate id"
                );
                return Err(TicketError::DuplicateId(ticket.id));
            }
            // keep the counter ahead of caller-chosen ids
            self.next_id = match (self.next_id, ticket.id.0.checked_add(1)) {
                (Some(next), Some(after)) => Some(next.max(after)),
                _ => None,
            };
            ticket.id
        } else {
            self.allocate_id()?
        };

        ticket.id = id;
        tracing::debug!(
            board = %self.id,
            ticket = %id,
            kind = %ticket.kind,
            resource = %ticket.resource,
            scope = %ticket.scope,
            quantity = ticket.quantity,
            "ticket added"
        );
        self.tickets.insert(id, ticket);
        Ok(id)
    }

    fn allocate_id(&mut self) -> TicketResult<TicketId> {
        let mut next = self.next_id.ok_or(TicketError::IdsExhausted)?;
        while self.tickets.contains_key(&TicketId(next)) {
            next = next.checked_add(1).ok_or(TicketError::IdsExhausted)?;
        }
        self.next_id = next.checked_add(1);
        Ok(TicketId(next))
    }

    /// Get a ticket by id
    pub fn find(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.get(&id)
    }

    /// First Open ticket matching the key, in id order
    pub fn find_open(
        &self,
        kind: TicketKind,
        resource: ResourceKind,
        scope: TicketScope,
    ) -> Option<&Ticket> {
        self.open_tickets()
            .find(|t| t.kind == kind && t.resource == resource && t.scope == scope)
    }

    /// Is there any non-terminal ticket with this key?
    ///
    /// `scope: None` matches every scope.
    pub fn has_unresolved(
        &self,
        kind: TicketKind,
        resource: ResourceKind,
        scope: Option<TicketScope>,
    ) -> bool {
        self.tickets.values().any(|t| {
            !t.state.is_terminal()
                && t.kind == kind
                && t.resource == resource
                && scope.map_or(true, |s| t.scope == s)
        })
    }

    /// Open -> Reserved
    pub fn reserve(&mut self, id: TicketId, agent: AgentId, now: Tick) -> TicketResult<()> {
        let board = self.id;
        let ticket = self.tickets.get_mut(&id).ok_or(TicketError::NotFound(id))?;
        if ticket.state != TicketState::Open {
            return Err(TicketError::NotOpen {
                id,
                state: ticket.state,
            });
        }

        ticket.state = TicketState::Reserved;
        ticket.reserved_by = Some(agent);
        ticket.reserved_at = Some(now);
        ticket.last_progress = Some(now);
        tracing::debug!(%board, ticket = %id, %agent, %now, "ticket reserved");
        Ok(())
    }

    /// Reserved -> InProgress, holder only
    pub fn start_work(&mut self, id: TicketId, agent: AgentId, now: Tick) -> TicketResult<()> {
        let board = self.id;
        let ticket = self.tickets.get_mut(&id).ok_or(TicketError::NotFound(id))?;
        if ticket.state != TicketState::Reserved {
            return Err(TicketError::InvalidState {
                id,
                state: ticket.state,
                action: "start",
            });
        }
        if !ticket.is_held_by(agent) {
            return Err(TicketError::NotHolder { id, agent });
        }

        ticket.state = TicketState::InProgress;
        ticket.last_progress = Some(now);
        tracing::debug!(%board, ticket = %id, %agent, %now, "work started");
        Ok(())
    }

    /// Refresh the staleness clock of a held ticket
    pub fn touch_progress(
        &mut self,
        id: TicketId,
        agent: AgentId,
        now: Tick,
        notes: Option<&str>,
    ) -> TicketResult<()> {
        let ticket = self.held_mut(id, agent, "touch")?;
        ticket.last_progress = Some(now);
        if let Some(notes) = notes {
            ticket.notes = notes.to_string();
        }
        Ok(())
    }

    /// Reserved | InProgress -> Open, holder only
    pub fn abandon(
        &mut self,
        id: TicketId,
        agent: AgentId,
        now: Tick,
        reason: &str,
    ) -> TicketResult<()> {
        let board = self.id;
        let ticket = self.held_mut(id, agent, "abandon")?;
        release_to_open(ticket, reason);
        tracing::info!(%board, ticket = %id, %agent, %now, reason, "ticket abandoned");
        Ok(())
    }

    /// Reserved | InProgress -> Done, holder only
    ///
    /// The holder stays recorded on the finished ticket; a second call fails
    /// because the state is already terminal.
    pub fn complete(
        &mut self,
        id: TicketId,
        agent: AgentId,
        notes: Option<&str>,
    ) -> TicketResult<()> {
        let board = self.id;
        let ticket = self.held_mut(id, agent, "complete")?;
        ticket.state = TicketState::Done;
        if let Some(notes) = notes {
            ticket.notes = notes.to_string();
        }
        tracing::info!(%board, ticket = %id, %agent, "ticket completed");
        Ok(())
    }

    /// Reserved | InProgress -> Failed, holder only
    ///
    /// Failed tickets are terminal: never reclaimed, never pruned.
    pub fn fail(&mut self, id: TicketId, agent: AgentId, reason: &str) -> TicketResult<()> {
        let board = self.id;
        let ticket = self.held_mut(id, agent, "fail")?;
        ticket.state = TicketState::Failed;
        ticket.notes = reason.to_string();
        tracing::info!(%board, ticket = %id, %agent, reason, "ticket failed");
        Ok(())
    }

    fn held_mut(
        &mut self,
        id: TicketId,
        agent: AgentId,
        action: &'static str,
    ) -> TicketResult<&mut Ticket> {
        let ticket = self.tickets.get_mut(&id).ok_or(TicketError::NotFound(id))?;
        if !ticket.state.is_held() {
            return Err(TicketError::InvalidState {
                id,
                state: ticket.state,
                action,
            });
        }
        if !ticket.is_held_by(agent) {
            return Err(TicketError::NotHolder { id, agent });
        }
        Ok(ticket)
    }

    /// Remove every Done ticket
    pub fn prune_done(&mut self) -> usize {
        let before = self.tickets.len();
        self.tickets.retain(|_, t| t.state != TicketState::Done);
        before - self.tickets.len()
    }

    /// Release held tickets whose holder has been silent too long
    ///
    /// A ticket is stale once `now - last_progress` reaches the board's
    /// timeout. The release is identical to `abandon`, minus the holder check.
    pub fn reclaim_stale(&mut self, now: Tick) -> Vec<TicketId> {
        let board = self.id;
        let timeout = self.stale_timeout_ticks;
        let mut reclaimed = Vec::new();

        for ticket in self.tickets.values_mut() {
            if !ticket.state.is_held() {
                continue;
            }
            let Some(holder) = ticket.reserved_by else {
                continue;
            };
            let anchor = ticket
                .last_progress
                .or(ticket.reserved_at)
                .unwrap_or(ticket.created_at);
            if now.since(anchor) < timeout {
                continue;
            }

            release_to_open(ticket, "stale reservation reclaimed");
            tracing::info!(
                %board,
                ticket = %ticket.id,
                agent = %holder,
                silent_for = now.since(anchor),
                "stale reservation reclaimed"
            );
            reclaimed.push(ticket.id);
        }

        reclaimed
    }

    /// One maintenance cycle: reclaim stale reservations, then prune Done
    pub fn maintain(&mut self, now: Tick) -> MaintenanceReport {
        let reclaimed = self.reclaim_stale(now);
        let pruned = self.prune_done();
        if pruned > 0 {
            tracing::debug!(board = %self.id, pruned, "pruned done tickets");
        }
        MaintenanceReport { reclaimed, pruned }
    }
}
