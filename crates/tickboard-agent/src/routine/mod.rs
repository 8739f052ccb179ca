//! Routines - the execution strategy bound to a ticket's kind
//!
//! Routines form a closed set dispatched by `Routine`. Which routine a kind
//! uses, and its timings, come from a data-driven `RoutineTable`.

pub mod fetch;
pub mod timed_work;

pub use fetch::*;
pub use timed_work::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tickboard_board::BoardSet;
use tickboard_core::{
    AgentId, Position, Reservation, ResourceKind, Tick, TicketId, TicketKind,
};

use crate::{Movement, ProviderDirectory};

/// Result of one routine step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineStatus {
    Running,
    Completed,
    Failed(String),
}

/// Which routine a kind runs, with its timings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "routine", rename_all = "snake_case")]
pub enum RoutineBlueprint {
    Fetch { pickup_ticks: u64, deposit_ticks: u64 },
    TimedWork { work_ticks: u64 },
}

impl RoutineBlueprint {
    /// Fetch work delivers into the board's inventory
    pub fn needs_inventory(&self) -> bool {
        matches!(self, RoutineBlueprint::Fetch { .. })
    }
}

/// Kind -> routine lookup; kinds absent from the table are unsupported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutineTable {
    blueprints: BTreeMap<TicketKind, RoutineBlueprint>,
}

impl RoutineTable {
    pub fn empty() -> Self {
        RoutineTable {
            blueprints: BTreeMap::new(),
        }
    }

    pub fn with(mut self, kind: TicketKind, blueprint: RoutineBlueprint) -> Self {
        self.insert(kind, blueprint);
        self
    }

    pub fn insert(&mut self, kind: TicketKind, blueprint: RoutineBlueprint) {
        self.blueprints.insert(kind, blueprint);
    }

    pub fn get(&self, kind: TicketKind) -> Option<RoutineBlueprint> {
        self.blueprints.get(&kind).copied()
    }

    pub fn supports(&self, kind: TicketKind) -> bool {
        self.blueprints.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TicketKind, RoutineBlueprint)> + '_ {
        self.blueprints.iter().map(|(k, b)| (*k, *b))
    }
}

impl Default for RoutineTable {
    fn default() -> Self {
        RoutineTable::empty()
            .with(
                TicketKind::Fetch,
                RoutineBlueprint::Fetch {
                    pickup_ticks: 5,
                    deposit_ticks: 5,
                },
            )
            .with(TicketKind::Repair, RoutineBlueprint::TimedWork { work_ticks: 40 })
            .with(TicketKind::Clean, RoutineBlueprint::TimedWork { work_ticks: 20 })
            .with(TicketKind::Tend, RoutineBlueprint::TimedWork { work_ticks: 30 })
    }
}

/// What the executor knows about the job being done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub ticket: TicketId,
    pub kind: TicketKind,
    pub resource: ResourceKind,
    pub quantity: u32,
}

/// Per-step view handed to a routine
pub struct RoutineContext<'a> {
    pub now: Tick,
    pub agent: AgentId,
    pub reservation: Reservation,
    pub job: Job,
    /// Job site, the position of the owning board
    pub site: Position,
    pub movement: &'a mut dyn Movement,
    pub boards: &'a mut BoardSet,
    pub providers: &'a mut dyn ProviderDirectory,
    progressed: bool,
}

impl<'a> RoutineContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        now: Tick,
        agent: AgentId,
        reservation: Reservation,
        job: Job,
        site: Position,
        movement: &'a mut dyn Movement,
        boards: &'a mut BoardSet,
        providers: &'a mut dyn ProviderDirectory,
    ) -> Self {
        RoutineContext {
            now,
            agent,
            reservation,
            job,
            site,
            movement,
            boards,
            providers,
            progressed: false,
        }
    }

    /// Refresh the ticket's progress on its board
    ///
    /// A successful mark also resets the executor's stall counter.
    pub fn mark_progress(&mut self, notes: &str) -> bool {
        let Some(board) = self.boards.get_mut(self.reservation.board) else {
            return false;
        };
        let ok = board
            .touch_progress(self.job.ticket, self.agent, self.now, Some(notes))
            .is_ok();
        self.progressed |= ok;
        ok
    }

    /// Did any mark succeed during this step?
    pub fn progressed(&self) -> bool {
        self.progressed
    }

    /// Deposit into the owning board's inventory, `None` when it has none
    pub fn deposit(&mut self, amount: u32) -> Option<u32> {
        let resource = self.job.resource;
        self.boards
            .inventory_mut(self.reservation.board)
            .map(|inv| inv.deposit(resource, amount))
    }

    /// Arrival check that also acknowledges the arrival
    pub fn arrived(&mut self) -> bool {
        if self.movement.is_at_target() {
            self.movement.consume_arrival();
            true
        } else {
            false
        }
    }
}

/// A bound routine instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routine {
    Fetch(FetchRoutine),
    TimedWork(TimedWorkRoutine),
}

impl Routine {
    pub fn from_blueprint(blueprint: RoutineBlueprint) -> Self {
        match blueprint {
            RoutineBlueprint::Fetch {
                pickup_ticks,
                deposit_ticks,
            } => Routine::Fetch(FetchRoutine::new(pickup_ticks, deposit_ticks)),
            RoutineBlueprint::TimedWork { work_ticks } => {
                Routine::TimedWork(TimedWorkRoutine::new(work_ticks))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Routine::Fetch(_) => "fetch",
            Routine::TimedWork(_) => "timed_work",
        }
    }

    pub fn begin(&mut self, ctx: &mut RoutineContext<'_>) {
        match self {
            Routine::Fetch(r) => r.begin(ctx),
            Routine::TimedWork(r) => r.begin(ctx),
        }
    }

    pub fn step(&mut self, ctx: &mut RoutineContext<'_>) -> RoutineStatus {
        match self {
            Routine::Fetch(r) => r.step(ctx),
            Routine::TimedWork(r) => r.step(ctx),
        }
    }
}
