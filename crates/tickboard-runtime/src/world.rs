//! World - the explicit context passed to every phase
//!
//! Holds what used to be ambient: boards, resource providers, world
//! modifiers and the agents themselves. Phases receive `&mut World` from
//! the scheduler and borrow the parts they need.

use tickboard_agent::{Agent, AgentContext, AgentReport, ExecutionOutcome, ProviderDirectory};
use tickboard_board::{Board, BoardSet, MaintenanceTotals};
use tickboard_core::{AgentId, BoardId, Tick};
use tickboard_policy::SharedModifiers;
use tickboard_time::{TickPhase, Tickable};

/// Running totals of a simulation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub ticks: u64,
    pub tickets_created: u64,
    pub reservations: u64,
    pub completions: u64,
    pub abandonments: u64,
    /// Reservations dropped from memory because the board no longer honoured them
    pub losses: u64,
    pub reclamations: u64,
    pub pruned: u64,
    /// Whole ticks dropped by the clock's catch-up cap
    pub clock_discarded: u64,
    pub released_on_shutdown: u64,
}

impl SimulationStats {
    fn absorb_maintenance(&mut self, totals: MaintenanceTotals) {
        self.reclamations += totals.reclaimed as u64;
        self.pruned += totals.pruned as u64;
    }

    fn absorb_agent(&mut self, report: &AgentReport) {
        if report.reserved().is_some() {
            self.reservations += 1;
        }
        match report.execution {
            ExecutionOutcome::Completed(_) => self.completions += 1,
            ExecutionOutcome::Abandoned { .. } => self.abandonments += 1,
            ExecutionOutcome::Lost(_) => self.losses += 1,
            _ => {}
        }
    }
}

/// Simulation context
pub struct World {
    pub boards: BoardSet,
    pub providers: Box<dyn ProviderDirectory>,
    pub modifiers: SharedModifiers,
    pub agents: Vec<Agent>,
    pub stats: SimulationStats,
}

impl World {
    pub fn new(boards: BoardSet, providers: Box<dyn ProviderDirectory>) -> Self {
        World {
            boards,
            providers,
            modifiers: SharedModifiers::new(),
            agents: Vec::new(),
            stats: SimulationStats::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: SharedModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn board(&self, id: BoardId) -> Option<&Board> {
        self.boards.get(id)
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    /// Agents currently holding a reservation
    pub fn busy_agents(&self) -> usize {
        self.agents.iter().filter(|a| a.memory().has_ticket()).count()
    }

    /// Run every agent once for `now`
    fn tick_agents(&mut self, now: Tick) {
        let mut ctx = AgentContext {
            now,
            boards: &mut self.boards,
            providers: self.providers.as_mut(),
            modifiers: &self.modifiers,
        };
        for agent in self.agents.iter_mut() {
            let report = agent.tick(&mut ctx);
            self.stats.absorb_agent(&report);
        }
    }

    /// Release every held ticket
    fn release_all(&mut self, now: Tick, reason: &str) -> u64 {
        let mut ctx = AgentContext {
            now,
            boards: &mut self.boards,
            providers: self.providers.as_mut(),
            modifiers: &self.modifiers,
        };
        let released = self
            .agents
            .iter_mut()
            .filter_map(|agent| agent.shutdown(&mut ctx, reason))
            .count() as u64;
        self.stats.released_on_shutdown += released;
        released
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("boards", &self.boards.len())
            .field("agents", &self.agents.len())
            .field("modifiers", &self.modifiers.len())
            .field("stats", &self.stats)
            .finish()
    }
}

/// Stale reclamation, pruning and modifier expiry for every board
#[derive(Debug, Default)]
pub struct BoardMaintenance;

impl Tickable<World> for BoardMaintenance {
    fn name(&self) -> &str {
        "board-maintenance"
    }

    fn phase(&self) -> TickPhase {
        TickPhase::Maintenance
    }

    fn on_tick(&mut self, tick: Tick, world: &mut World) {
        let totals = world.boards.maintain_all(tick);
        world.stats.absorb_maintenance(totals);
        world.modifiers.expire(tick);
    }
}

/// Seekers and executors of every agent
#[derive(Debug, Default)]
pub struct AgentPhase;

impl Tickable<World> for AgentPhase {
    fn name(&self) -> &str {
        "agents"
    }

    fn phase(&self) -> TickPhase {
        TickPhase::Agents
    }

    fn on_tick(&mut self, tick: Tick, world: &mut World) {
        world.tick_agents(tick);
    }

    fn on_shutdown(&mut self, tick: Tick, world: &mut World) {
        world.release_all(tick, "shutdown");
    }
}
