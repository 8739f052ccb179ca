//! Simulation driver
//!
//! Owns the clock, the scheduler and the world. Construction validates the
//! configuration and registers the built-in phases; `shutdown` is the
//! explicit teardown that gives every held ticket back to its board.

use std::time::Duration;

use tickboard_agent::{Agent, Movement};
use tickboard_board::{Board, BoardKind};
use tickboard_core::{AgentId, AgentIdentity, BoardId, Position, Tick};
use tickboard_time::{Scheduler, TickClock, Tickable};

use crate::{AgentPhase, BoardMaintenance, ConfigResult, SimulationConfig, SimulationStats, World};

/// Tick-driven marketplace simulation
pub struct Simulation {
    config: SimulationConfig,
    clock: TickClock,
    scheduler: Scheduler<World>,
    world: World,
    shut_down: bool,
}

impl Simulation {
    /// Validate `config` and wire the built-in phases around `world`
    pub fn new(config: SimulationConfig, world: World) -> ConfigResult<Self> {
        config.validate()?;

        let mut clock = TickClock::new(config.clock.clock_config());
        clock.set_speed(config.clock.speed);

        let mut scheduler: Scheduler<World> = Scheduler::new();
        scheduler.register(Box::new(BoardMaintenance));
        scheduler.register(Box::new(AgentPhase));

        tracing::info!(
            boards = world.boards.len(),
            agents = world.agents.len(),
            ticks_per_second = config.clock.ticks_per_second,
            "simulation initialised"
        );

        Ok(Simulation {
            config,
            clock,
            scheduler,
            world,
            shut_down: false,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut TickClock {
        &mut self.clock
    }

    /// Current tick
    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.world.stats
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Component names in per-tick invocation order
    pub fn phases(&self) -> Vec<&str> {
        self.scheduler.names()
    }

    /// Build a board with the configured stale timeout
    pub fn make_board(&self, id: BoardId, kind: BoardKind, position: Position) -> Board {
        Board::new(id, kind, position, self.config.board.stale_timeout_ticks)
    }

    /// Add an agent built from the configured seeker, executor and routines
    pub fn add_agent(&mut self, identity: AgentIdentity, movement: Box<dyn Movement>) -> AgentId {
        let id = identity.id;
        let agent = Agent::new(
            identity,
            movement,
            self.config.seeker,
            self.config.execution,
            self.config.routines.clone(),
        );
        tracing::debug!(agent = %id, "agent added");
        self.world.agents.push(agent);
        id
    }

    /// Register a ticket producer (or any other tickable)
    pub fn add_producer(&mut self, producer: Box<dyn Tickable<World>>) {
        self.scheduler.register(producer);
    }

    /// Advance by elapsed wall-clock time, returning the ticks run
    pub fn update(&mut self, elapsed: Duration) -> usize {
        if self.shut_down {
            return 0;
        }
        let advance = self.clock.update(elapsed);
        self.world.stats.clock_discarded += advance.discarded;

        let mut ran = 0;
        for tick in advance {
            self.run_tick(tick);
            ran += 1;
        }
        ran
    }

    /// Run exactly one tick regardless of speed
    ///
    /// Once shut down the clock stays put and the current tick is returned.
    pub fn step(&mut self) -> Tick {
        if self.shut_down {
            return self.clock.now();
        }
        let tick = self.clock.advance_one();
        self.run_tick(tick);
        tick
    }

    /// Run `ticks` consecutive ticks
    pub fn run_for(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    fn run_tick(&mut self, tick: Tick) {
        self.scheduler.run_tick(tick, &mut self.world);
        self.world.stats.ticks += 1;
    }

    /// Tear down: every held ticket is abandoned and every memory cleared
    ///
    /// Returns the number of tickets released. Calling twice is a no-op.
    pub fn shutdown(&mut self) -> u64 {
        if self.shut_down {
            return 0;
        }
        let before = self.world.stats.released_on_shutdown;
        self.scheduler.shutdown(self.clock.now(), &mut self.world);
        self.shut_down = true;

        let released = self.world.stats.released_on_shutdown - before;
        tracing::info!(
            tick = %self.clock.now(),
            released,
            completions = self.world.stats.completions,
            "simulation shut down"
        );
        released
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("now", &self.clock.now())
            .field("phases", &self.scheduler.names())
            .field("world", &self.world)
            .field("shut_down", &self.shut_down)
            .finish()
    }
}
