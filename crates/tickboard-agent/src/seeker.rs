//! Seeker state machine
//!
//! ```text
//! Idle -> GoingToBoard -> LingeringAtBoard -> Idle
//! ```
//!
//! While the agent holds a reservation the seeker is dormant: it visits
//! nothing and reads nothing until memory clears, then resumes at `Idle`.
//!
//! A read-and-reserve pass scans every readable board in range, scores
//! the claimable open tickets and reserves the best one. If the board
//! refuses (someone got there first) the next-ranked candidate is tried.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tickboard_core::{AgentIdentity, AgentMemory, BoardId, Position, Reservation, Tick};
use tickboard_policy::{can_claim, can_read, can_visit, rank, score, Candidate};

use crate::{AgentContext, Movement};

/// Seeker tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekerConfig {
    /// Boards within this distance can be read
    pub read_radius: f32,
    /// Ticks between passive reads while idle
    pub passive_read_interval: u64,
    /// Ticks between choosing a new board to walk to
    pub replan_interval: u64,
    /// Ticks spent re-reading a board after arriving
    pub linger_ticks: u64,
    /// Ticks before a visited board may be chosen again
    pub revisit_cooldown: u64,
}

impl Default for SeekerConfig {
    fn default() -> Self {
        SeekerConfig {
            read_radius: 6.0,
            passive_read_interval: 10,
            replan_interval: 20,
            linger_ticks: 15,
            revisit_cooldown: 50,
        }
    }
}

/// Where the seeker is in its visiting loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekerState {
    Idle,
    GoingToBoard(BoardId),
    LingeringAtBoard { board: BoardId, since: Tick },
}

/// Result of one read-and-reserve pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Reserved(Reservation),
    /// Nothing claimable in range
    NoCandidates,
    /// Every candidate was refused by its board
    Contended { attempts: usize },
}

/// Per-agent seeker
#[derive(Debug, Clone)]
pub struct Seeker {
    config: SeekerConfig,
    state: SeekerState,
    dormant: bool,
    /// Last successful read per board
    last_read: HashMap<BoardId, Tick>,
    /// Last arrival per board
    last_visit: HashMap<BoardId, Tick>,
    last_passive: Option<Tick>,
    last_replan: Option<Tick>,
}

impl Seeker {
    pub fn new(config: SeekerConfig) -> Self {
        Seeker {
            config,
            state: SeekerState::Idle,
            dormant: false,
            last_read: HashMap::new(),
            last_visit: HashMap::new(),
            last_passive: None,
            last_replan: None,
        }
    }

    pub fn config(&self) -> &SeekerConfig {
        &self.config
    }

    pub fn state(&self) -> SeekerState {
        self.state
    }

    pub fn is_dormant(&self) -> bool {
        self.dormant
    }

    /// Tick of the last read of `board`, if ever
    pub fn last_read(&self, board: BoardId) -> Option<Tick> {
        self.last_read.get(&board).copied()
    }

    fn due(last: Option<Tick>, now: Tick, interval: u64) -> bool {
        last.map_or(true, |t| now.since(t) >= interval)
    }

    /// Run one tick; returns the pass outcome when a pass ran
    pub fn tick(
        &mut self,
        identity: &AgentIdentity,
        memory: &mut AgentMemory,
        movement: &mut dyn Movement,
        ctx: &mut AgentContext<'_>,
    ) -> Option<PassOutcome> {
        if memory.has_ticket() {
            if !self.dormant {
                self.go_dormant();
            }
            return None;
        }
        if self.dormant {
            self.dormant = false;
            self.state = SeekerState::Idle;
        }

        let now = ctx.now;
        match self.state {
            SeekerState::Idle => {
                let mut outcome = None;
                if Self::due(self.last_passive, now, self.config.passive_read_interval) {
                    self.last_passive = Some(now);
                    let pass = self.read_and_reserve(identity, memory, movement.position(), ctx);
                    if matches!(pass, PassOutcome::Reserved(_)) {
                        self.go_dormant();
                        return Some(pass);
                    }
                    outcome = Some(pass);
                }

                if Self::due(self.last_replan, now, self.config.replan_interval) {
                    self.last_replan = Some(now);
                    if let Some((board, site)) = self.choose_target(identity, ctx) {
                        tracing::trace!(agent = %identity.id, %board, "walking to board");
                        movement.set_target(site);
                        self.state = SeekerState::GoingToBoard(board);
                    }
                }
                outcome
            }
            SeekerState::GoingToBoard(board) => {
                if ctx.boards.get(board).is_none() {
                    movement.clear_target();
                    self.state = SeekerState::Idle;
                    return None;
                }
                if !movement.is_at_target() {
                    return None;
                }
                movement.consume_arrival();
                self.last_visit.insert(board, now);
                self.state = SeekerState::LingeringAtBoard { board, since: now };
                Some(self.forced_pass(identity, memory, movement, ctx))
            }
            SeekerState::LingeringAtBoard { since, .. } => {
                if now.since(since) >= self.config.linger_ticks {
                    movement.clear_target();
                    self.state = SeekerState::Idle;
                    return None;
                }
                Some(self.forced_pass(identity, memory, movement, ctx))
            }
        }
    }

    fn forced_pass(
        &mut self,
        identity: &AgentIdentity,
        memory: &mut AgentMemory,
        movement: &mut dyn Movement,
        ctx: &mut AgentContext<'_>,
    ) -> PassOutcome {
        let pass = self.read_and_reserve(identity, memory, movement.position(), ctx);
        if matches!(pass, PassOutcome::Reserved(_)) {
            movement.clear_target();
            self.go_dormant();
        }
        pass
    }

    fn go_dormant(&mut self) {
        self.dormant = true;
        self.state = SeekerState::Idle;
    }

    /// Board with the oldest read among those worth visiting
    ///
    /// Never-read boards count as maximally stale; ties go to the lower id.
    pub fn choose_target(
        &self,
        identity: &AgentIdentity,
        ctx: &AgentContext<'_>,
    ) -> Option<(BoardId, Position)> {
        let now = ctx.now;
        let mut best: Option<(u64, BoardId, Position)> = None;

        for board in ctx.boards.iter() {
            if !can_visit(board, identity) {
                continue;
            }
            let recently_visited = self
                .last_visit
                .get(&board.id())
                .map_or(false, |t| now.since(*t) < self.config.revisit_cooldown);
            if recently_visited {
                continue;
            }

            let staleness = self
                .last_read
                .get(&board.id())
                .map_or(u64::MAX, |t| now.since(*t));
            if best.map_or(true, |(s, _, _)| staleness > s) {
                best = Some((staleness, board.id(), board.position()));
            }
        }

        best.map(|(_, id, pos)| (id, pos))
    }

    /// Scan readable boards in range and reserve the best claimable ticket
    pub fn read_and_reserve(
        &mut self,
        identity: &AgentIdentity,
        memory: &mut AgentMemory,
        position: Position,
        ctx: &mut AgentContext<'_>,
    ) -> PassOutcome {
        let now = ctx.now;
        let mut candidates = Vec::new();

        for id in ctx.boards.within_radius(position, self.config.read_radius) {
            let Some(board) = ctx.boards.get(id) else {
                continue;
            };
            if !can_read(board, identity) {
                continue;
            }
            self.last_read.insert(id, now);

            for ticket in board.open_tickets() {
                if can_claim(ticket, board, identity) {
                    let s = score(ticket, now, identity, ctx.modifiers);
                    candidates.push(Candidate::new(id, ticket, s));
                }
            }
        }

        if candidates.is_empty() {
            return PassOutcome::NoCandidates;
        }
        rank(&mut candidates);

        for candidate in &candidates {
            let Some(board) = ctx.boards.get_mut(candidate.board) else {
                continue;
            };
            match board.reserve(candidate.ticket, identity.id, now) {
                Ok(()) => {
                    memory.remember(candidate.board, candidate.ticket);
                    tracing::debug!(
                        agent = %identity.id,
                        board = %candidate.board,
                        ticket = %candidate.ticket,
                        score = candidate.score,
                        "reserved best candidate"
                    );
                    return PassOutcome::Reserved(Reservation {
                        ticket: candidate.ticket,
                        board: candidate.board,
                    });
                }
                Err(err) => {
                    tracing::debug!(agent = %identity.id, %err, "candidate refused, trying next");
                }
            }
        }

        PassOutcome::Contended {
            attempts: candidates.len(),
        }
    }
}

impl Default for Seeker {
    fn default() -> Self {
        Self::new(SeekerConfig::default())
    }
}
