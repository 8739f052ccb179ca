//! Tick scheduler - ordered, explicit per-tick invocation
//!
//! Components are held in a list and called directly once per tick, in
//! phase order and then in registration order. There is no subscription
//! lifecycle: registering is the only way in, dropping the scheduler the
//! only way out.

use tickboard_core::Tick;

/// Coarse ordering of work within one tick
///
/// Maintenance runs before production, production before agents, so that
/// consumers always observe boards that were already cleaned up this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TickPhase {
    /// Board upkeep: stale reclamation, pruning, modifier expiry
    Maintenance = 0,
    /// Ticket producers
    Production = 1,
    /// Seekers and executors
    Agents = 2,
}

/// A component driven once per tick against a shared context
pub trait Tickable<C> {
    /// Name for logging
    fn name(&self) -> &str;

    /// Phase this component runs in
    fn phase(&self) -> TickPhase;

    /// Run one tick
    fn on_tick(&mut self, tick: Tick, ctx: &mut C);

    /// Called once when the owning simulation shuts down
    fn on_shutdown(&mut self, _tick: Tick, _ctx: &mut C) {}
}

/// Ordered list of tickable components
pub struct Scheduler<C> {
    components: Vec<Box<dyn Tickable<C>>>,
    ticks_run: u64,
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Scheduler {
            components: Vec::new(),
            ticks_run: 0,
        }
    }

    /// Register a component after every component of the same or earlier phase
    pub fn register(&mut self, component: Box<dyn Tickable<C>>) {
        let phase = component.phase();
        let pos = self
            .components
            .iter()
            .position(|c| c.phase() > phase)
            .unwrap_or(self.components.len());
        tracing::debug!(component = component.name(), ?phase, pos, "registered tickable");
        self.components.insert(pos, component);
    }

    /// Invoke every component once for `tick`
    pub fn run_tick(&mut self, tick: Tick, ctx: &mut C) {
        for component in self.components.iter_mut() {
            component.on_tick(tick, ctx);
        }
        self.ticks_run += 1;
    }

    /// Give every component its teardown call
    pub fn shutdown(&mut self, tick: Tick, ctx: &mut C) {
        for component in self.components.iter_mut() {
            component.on_shutdown(tick, ctx);
        }
    }

    /// Component names in invocation order
    pub fn names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}
