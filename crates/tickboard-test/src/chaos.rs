//! Seeded chaos for deterministic stress runs
//!
//! Provides:
//! - Per-tick agent order shuffling
//! - Recurring chores posted to random boards

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tickboard_core::{BoardId, ResourceKind, Tick, Ticket, TicketKind, TicketScope};
use tickboard_runtime::World;
use tickboard_time::{TickPhase, Tickable};

/// Shuffles the agent list before the agents phase runs
pub struct AgentShuffle {
    rng: StdRng,
    /// Number of shuffles performed
    pub shuffles: u64,
}

impl AgentShuffle {
    pub fn new(seed: u64) -> Self {
        AgentShuffle {
            rng: StdRng::seed_from_u64(seed),
            shuffles: 0,
        }
    }
}

impl Tickable<World> for AgentShuffle {
    fn name(&self) -> &str {
        "agent-shuffle"
    }

    fn phase(&self) -> TickPhase {
        TickPhase::Production
    }

    fn on_tick(&mut self, _tick: Tick, world: &mut World) {
        world.agents.shuffle(&mut self.rng);
        self.shuffles += 1;
    }
}

/// Posts timed-work chores to randomly chosen boards
pub struct ChoreRoster {
    name: String,
    rng: StdRng,
    boards: Vec<(BoardId, TicketScope)>,
    kinds: Vec<TicketKind>,
    interval: u64,
    last_run: Option<Tick>,
}

impl ChoreRoster {
    pub fn new(name: impl Into<String>, seed: u64, interval: u64) -> Self {
        ChoreRoster {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
            boards: Vec::new(),
            kinds: vec![TicketKind::Repair, TicketKind::Clean, TicketKind::Tend],
            interval: interval.max(1),
            last_run: None,
        }
    }

    /// Post chores on `board` with `scope`
    pub fn with_board(mut self, board: BoardId, scope: TicketScope) -> Self {
        self.boards.push((board, scope));
        self
    }

    pub fn with_kinds(mut self, kinds: &[TicketKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    /// Try to post one chore, returning its board when one was added
    pub fn post(&mut self, now: Tick, world: &mut World) -> Option<BoardId> {
        let (board_id, scope) = *self.boards.choose(&mut self.rng)?;
        let kind = *self.kinds.choose(&mut self.rng)?;
        let base = self.rng.gen_range(80..=200);

        let board = world.boards.get_mut(board_id)?;
        if board.has_unresolved(kind, ResourceKind::None, Some(scope)) {
            return None;
        }
        let ticket = Ticket::new(kind, ResourceKind::None, scope, 1, now)
            .with_priority(base, 1)
            .with_notes(format!("{}: {}", self.name, kind));
        board.add_ticket(ticket).ok()?;
        world.stats.tickets_created += 1;
        tracing::trace!(roster = %self.name, board = %board_id, %kind, "chore posted");
        Some(board_id)
    }
}

impl Tickable<World> for ChoreRoster {
    fn name(&self) -> &str {
        &self.name
    }

    fn phase(&self) -> TickPhase {
        TickPhase::Production
    }

    fn on_tick(&mut self, tick: Tick, world: &mut World) {
        let due = self
            .last_run
            .map_or(true, |t| tick.since(t) >= self.interval);
        if due {
            self.last_run = Some(tick);
            self.post(tick, world);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickboard_agent::NoProviders;
    use tickboard_board::{Board, BoardKind, BoardSet};
    use tickboard_core::{GroupId, Position};

    fn world() -> World {
        let mut boards = BoardSet::new();
        boards.insert(Board::new(
            BoardId::new(1),
            BoardKind::Work {
                workplace: GroupId::new(7),
            },
            Position::ORIGIN,
            200,
        ));
        World::new(boards, Box::new(NoProviders))
    }

    #[test]
    fn test_roster_posts_once_per_kind() {
        let mut world = world();
        let mut roster = ChoreRoster::new("chores", 3, 1)
            .with_board(BoardId::new(1), TicketScope::Workplace)
            .with_kinds(&[TicketKind::Repair]);

        assert_eq!(roster.post(Tick::new(1), &mut world), Some(BoardId::new(1)));
        // an unresolved repair is already posted
        assert_eq!(roster.post(Tick::new(2), &mut world), None);
        assert_eq!(world.stats.tickets_created, 1);
    }

    #[test]
    fn test_roster_without_boards_posts_nothing() {
        let mut world = world();
        let mut roster = ChoreRoster::new("idle", 3, 1);
        assert_eq!(roster.post(Tick::new(1), &mut world), None);
    }

    #[test]
    fn test_same_seed_same_chores() {
        let run = |seed| {
            let mut world = world();
            let mut roster = ChoreRoster::new("chores", seed, 1)
                .with_board(BoardId::new(1), TicketScope::Workplace);
            roster.post(Tick::new(1), &mut world);
            world
                .board(BoardId::new(1))
                .and_then(|b| b.tickets().next().cloned())
                .map(|t| (t.kind, t.base_priority_points))
        };
        assert_eq!(run(42), run(42));
    }
}
