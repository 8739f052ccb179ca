//! Agent bundle: identity, memory, movement and both state machines

use tickboard_core::{AgentId, AgentIdentity, AgentMemory, Reservation};

use crate::{
    AgentContext, ExecutionConfig, ExecutionOutcome, Executor, Movement, PassOutcome,
    RoutineTable, Seeker, SeekerConfig,
};

/// Everything one agent tick produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReport {
    pub pass: Option<PassOutcome>,
    pub execution: ExecutionOutcome,
}

impl AgentReport {
    /// Reservation obtained this tick, if any
    pub fn reserved(&self) -> Option<Reservation> {
        match self.pass {
            Some(PassOutcome::Reserved(r)) => Some(r),
            _ => None,
        }
    }
}

/// An autonomous worker
pub struct Agent {
    identity: AgentIdentity,
    memory: AgentMemory,
    movement: Box<dyn Movement>,
    seeker: Seeker,
    executor: Executor,
}

impl Agent {
    pub fn new(
        identity: AgentIdentity,
        movement: Box<dyn Movement>,
        seeker: SeekerConfig,
        execution: ExecutionConfig,
        routines: RoutineTable,
    ) -> Self {
        Agent {
            identity,
            memory: AgentMemory::new(),
            movement,
            seeker: Seeker::new(seeker),
            executor: Executor::new(execution, routines),
        }
    }

    pub fn id(&self) -> AgentId {
        self.identity.id
    }

    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    pub fn memory(&self) -> &AgentMemory {
        &self.memory
    }

    pub fn movement(&self) -> &dyn Movement {
        self.movement.as_ref()
    }

    pub fn seeker(&self) -> &Seeker {
        &self.seeker
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// One tick: move, seek, then execute
    ///
    /// A reservation obtained by the seeker starts executing in the same tick.
    pub fn tick(&mut self, ctx: &mut AgentContext<'_>) -> AgentReport {
        self.movement.advance();
        let pass = self.seeker.tick(
            &self.identity,
            &mut self.memory,
            self.movement.as_mut(),
            ctx,
        );
        let execution = self.executor.tick(
            &self.identity,
            &mut self.memory,
            self.movement.as_mut(),
            ctx,
        );
        AgentReport { pass, execution }
    }

    /// Give back any held ticket and forget it
    pub fn shutdown(&mut self, ctx: &mut AgentContext<'_>, reason: &str) -> Option<Reservation> {
        let released = self
            .executor
            .release(&self.identity, &mut self.memory, ctx, reason);
        self.movement.clear_target();
        if let Some(r) = released {
            tracing::info!(
                agent = %self.identity.id,
                ticket = %r.ticket,
                board = %r.board,
                reason,
                "released on shutdown"
            );
        }
        released
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("identity", &self.identity)
            .field("memory", &self.memory)
            .field("seeker", &self.seeker.state())
            .field("routine", &self.executor.routine_name())
            .finish()
    }
}
