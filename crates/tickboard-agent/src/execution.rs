//! Execution state machine
//!
//! Drives the agent's reserved ticket, once per tick:
//!
//! 1. resolve the owning board (and its inventory, for work that needs one)
//! 2. confirm the ticket still exists and is still held by this agent
//! 3. count a stall tick, abandoning once the stall limit is exceeded
//! 4. bind the routine for the ticket's kind and start the work
//! 5. step the routine and settle the ticket on completion or failure
//!
//! Any successful progress mark inside a routine resets the stall counter.
//! Losing the ticket (stolen, reclaimed, vanished) only clears memory; the
//! board already reflects whatever happened.

use serde::{Deserialize, Serialize};
use tickboard_core::{AgentIdentity, AgentMemory, Reservation, TicketKind, TicketState};

use crate::{AgentContext, Job, Movement, Routine, RoutineContext, RoutineStatus, RoutineTable};

/// Executor tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Ticks without progress before the reservation is abandoned
    pub max_stall_ticks: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            max_stall_ticks: 300,
        }
    }
}

/// What one executor tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Nothing reserved
    Idle,
    /// No routine for this kind; retried next tick
    Unsupported(TicketKind),
    /// Routine still running
    Running,
    Completed(Reservation),
    Abandoned {
        reservation: Reservation,
        reason: String,
    },
    /// Reservation gone or unresolvable; memory cleared without touching the board
    Lost(Reservation),
}

#[derive(Debug, Clone)]
struct Bound {
    kind: TicketKind,
    routine: Routine,
}

/// Per-agent executor
#[derive(Debug, Clone)]
pub struct Executor {
    config: ExecutionConfig,
    routines: RoutineTable,
    bound: Option<Bound>,
    stall_ticks: u64,
}

impl Executor {
    pub fn new(config: ExecutionConfig, routines: RoutineTable) -> Self {
        Executor {
            config,
            routines,
            bound: None,
            stall_ticks: 0,
        }
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    pub fn stall_ticks(&self) -> u64 {
        self.stall_ticks
    }

    /// Name of the bound routine, if any
    pub fn routine_name(&self) -> Option<&'static str> {
        self.bound.as_ref().map(|b| b.routine.name())
    }

    fn reset(&mut self) {
        self.bound = None;
        self.stall_ticks = 0;
    }

    fn lose(&mut self, memory: &mut AgentMemory, reservation: Reservation) -> ExecutionOutcome {
        memory.clear();
        self.reset();
        ExecutionOutcome::Lost(reservation)
    }

    fn abandon(
        &mut self,
        identity: &AgentIdentity,
        memory: &mut AgentMemory,
        ctx: &mut AgentContext<'_>,
        reservation: Reservation,
        reason: &str,
    ) -> ExecutionOutcome {
        if let Some(board) = ctx.boards.get_mut(reservation.board) {
            if let Err(err) = board.abandon(reservation.ticket, identity.id, ctx.now, reason) {
                tracing::debug!(agent = %identity.id, %err, "abandon refused");
            }
        }
        memory.clear();
        self.reset();
        ExecutionOutcome::Abandoned {
            reservation,
            reason: reason.to_string(),
        }
    }

    /// Run one tick of execution
    pub fn tick(
        &mut self,
        identity: &AgentIdentity,
        memory: &mut AgentMemory,
        movement: &mut dyn Movement,
        ctx: &mut AgentContext<'_>,
    ) -> ExecutionOutcome {
        let Some(reservation) = memory.reservation() else {
            if self.bound.is_some() {
                self.reset();
            }
            return ExecutionOutcome::Idle;
        };
        let agent = identity.id;

        // 1. board
        let Some(board) = ctx.boards.get(reservation.board) else {
            tracing::warn!(%agent, board = %reservation.board, "remembered board not found");
            return self.lose(memory, reservation);
        };
        let site = board.position();

        // 2. ticket, still ours
        let Some(ticket) = board
            .find(reservation.ticket)
            .filter(|t| t.state.is_held() && t.is_held_by(agent))
        else {
            tracing::debug!(%agent, ticket = %reservation.ticket, "reservation lost");
            return self.lose(memory, reservation);
        };
        let job = Job {
            ticket: ticket.id,
            kind: ticket.kind,
            resource: ticket.resource,
            quantity: ticket.quantity,
        };
        let state = ticket.state;

        // 3. stall watchdog
        self.stall_ticks += 1;
        if self.stall_ticks > self.config.max_stall_ticks {
            tracing::info!(
                %agent,
                ticket = %job.ticket,
                stalled = self.stall_ticks,
                "execution timed out"
            );
            return self.abandon(identity, memory, ctx, reservation, "timed out");
        }

        // 4. bind
        let needs_bind = self.bound.as_ref().map_or(true, |b| b.kind != job.kind);
        if needs_bind {
            let Some(blueprint) = self.routines.get(job.kind) else {
                return ExecutionOutcome::Unsupported(job.kind);
            };
            if blueprint.needs_inventory() && ctx.boards.inventory(reservation.board).is_none() {
                tracing::warn!(%agent, board = %reservation.board, "board has no inventory");
                return self.lose(memory, reservation);
            }

            self.stall_ticks = 0;
            if state == TicketState::Reserved {
                let started = ctx
                    .boards
                    .get_mut(reservation.board)
                    .map(|b| b.start_work(job.ticket, agent, ctx.now));
                if !matches!(started, Some(Ok(()))) {
                    return self.abandon(identity, memory, ctx, reservation, "could not start");
                }
            }

            let mut routine = Routine::from_blueprint(blueprint);
            let mut rctx = RoutineContext::new(
                ctx.now,
                agent,
                reservation,
                job,
                site,
                &mut *movement,
                &mut *ctx.boards,
                &mut *ctx.providers,
            );
            routine.begin(&mut rctx);
            tracing::debug!(
                %agent,
                ticket = %job.ticket,
                routine = routine.name(),
                "routine bound"
            );
            self.bound = Some(Bound {
                kind: job.kind,
                routine,
            });
        }

        // 5. step
        let Some(bound) = self.bound.as_mut() else {
            return ExecutionOutcome::Running;
        };
        let mut rctx = RoutineContext::new(
            ctx.now,
            agent,
            reservation,
            job,
            site,
            &mut *movement,
            &mut *ctx.boards,
            &mut *ctx.providers,
        );
        let status = bound.routine.step(&mut rctx);
        if rctx.progressed() {
            self.stall_ticks = 0;
        }

        match status {
            RoutineStatus::Running => ExecutionOutcome::Running,
            RoutineStatus::Failed(reason) => {
                tracing::info!(%agent, ticket = %job.ticket, %reason, "routine failed");
                self.abandon(identity, memory, ctx, reservation, &reason)
            }
            RoutineStatus::Completed => {
                let done = ctx
                    .boards
                    .get_mut(reservation.board)
                    .map(|b| b.complete(job.ticket, agent, None));
                memory.clear();
                self.reset();
                match done {
                    Some(Ok(())) => ExecutionOutcome::Completed(reservation),
                    _ => ExecutionOutcome::Lost(reservation),
                }
            }
        }
    }

    /// Abandon whatever is held, for simulation teardown
    pub fn release(
        &mut self,
        identity: &AgentIdentity,
        memory: &mut AgentMemory,
        ctx: &mut AgentContext<'_>,
        reason: &str,
    ) -> Option<Reservation> {
        let reservation = memory.reservation()?;
        self.abandon(identity, memory, ctx, reservation, reason);
        Some(reservation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{Site, Stockpiles, Teleport, AGENT, BOARD};
    use crate::RoutineBlueprint;
    use tickboard_board::BoardSet;
    use tickboard_core::{GroupId, Position, ResourceKind, Tick, TicketId};
    use tickboard_policy::NoModifiers;

    fn identity() -> AgentIdentity {
        AgentIdentity::new(AGENT, GroupId::new(1))
    }

    fn remembered(site: &Site) -> AgentMemory {
        let mut memory = AgentMemory::new();
        memory.remember(BOARD, site.ticket);
        memory
    }

    fn run(
        executor: &mut Executor,
        memory: &mut AgentMemory,
        movement: &mut Teleport,
        boards: &mut BoardSet,
        providers: &mut Stockpiles,
        now: u64,
    ) -> ExecutionOutcome {
        let mut ctx = AgentContext {
            now: Tick::new(now),
            boards,
            providers,
            modifiers: &NoModifiers,
        };
        executor.tick(&identity(), memory, movement, &mut ctx)
    }

    #[test]
    fn test_idle_without_reservation() {
        let mut site = Site::fetch(ResourceKind::Wood, 1);
        let mut executor = Executor::new(ExecutionConfig::default(), RoutineTable::default());
        let mut memory = AgentMemory::new();
        let mut movement = Teleport::default();
        let mut providers = Stockpiles::default();
        let outcome = run(
            &mut executor,
            &mut memory,
            &mut movement,
            &mut site.boards,
            &mut providers,
            1,
        );
        assert_eq!(outcome, ExecutionOutcome::Idle);
    }

    #[test]
    fn test_no_provider_abandons_ticket() {
        let mut site = Site::fetch(ResourceKind::Wood, 20);
        let mut executor = Executor::new(ExecutionConfig::default(), RoutineTable::default());
        let mut memory = remembered(&site);
        let mut movement = Teleport::default();
        let mut providers = Stockpiles::default();

        let outcome = run(
            &mut executor,
            &mut memory,
            &mut movement,
            &mut site.boards,
            &mut providers,
            1,
        );

        assert_eq!(
            outcome,
            ExecutionOutcome::Abandoned {
                reservation: Reservation {
                    ticket: site.ticket,
                    board: BOARD
                },
                reason: "no provider".to_string()
            }
        );
        assert!(!memory.has_ticket());
        let ticket = site.boards.get(BOARD).unwrap().find(site.ticket).unwrap();
        assert_eq!(ticket.state, TicketState::Open);
        assert_eq!(ticket.reserved_by, None);
        assert_eq!(ticket.notes, "no provider");
    }

    #[test]
    fn test_fetch_completes_and_clears_memory() {
        let mut site = Site::fetch(ResourceKind::Wood, 10);
        let mut executor = Executor::new(ExecutionConfig::default(), RoutineTable::default());
        let mut memory = remembered(&site);
        let mut movement = Teleport::default();
        let mut providers = Stockpiles::default();
        providers.add(Position::new(4.0, 4.0), ResourceKind::Wood, 10);

        let mut last = ExecutionOutcome::Idle;
        for t in 1..40 {
            last = run(
                &mut executor,
                &mut memory,
                &mut movement,
                &mut site.boards,
                &mut providers,
                t,
            );
            if last != ExecutionOutcome::Running {
                break;
            }
        }

        assert!(matches!(last, ExecutionOutcome::Completed(_)));
        assert!(!memory.has_ticket());
        assert_eq!(site.stock(ResourceKind::Wood), 10);
        assert_eq!(site.ticket_state(), TicketState::Done);
    }

    #[test]
    fn test_stolen_ticket_is_lost() {
        let mut site = Site::fetch(ResourceKind::Wood, 10);
        let mut executor = Executor::new(ExecutionConfig::default(), RoutineTable::default());
        let mut memory = remembered(&site);
        let mut movement = Teleport::default();
        let mut providers = Stockpiles::default();

        // reclaimed and taken by someone else
        let board = site.boards.get_mut(BOARD).unwrap();
        board.reclaim_stale(Tick::new(1_000));
        board
            .reserve(site.ticket, tickboard_core::AgentId::new(2), Tick::new(1_000))
            .unwrap();

        let outcome = run(
            &mut executor,
            &mut memory,
            &mut movement,
            &mut site.boards,
            &mut providers,
            1_001,
        );
        assert!(matches!(outcome, ExecutionOutcome::Lost(_)));
        assert!(!memory.has_ticket());
        let ticket = site.boards.get(BOARD).unwrap().find(site.ticket).unwrap();
        assert_eq!(ticket.reserved_by, Some(tickboard_core::AgentId::new(2)));
    }

    #[test]
    fn test_missing_board_is_lost() {
        let mut boards = BoardSet::new();
        let mut executor = Executor::new(ExecutionConfig::default(), RoutineTable::default());
        let mut memory = AgentMemory::new();
        memory.remember(BOARD, TicketId::new(1));
        let mut movement = Teleport::default();
        let mut providers = Stockpiles::default();

        let outcome = run(
            &mut executor,
            &mut memory,
            &mut movement,
            &mut boards,
            &mut providers,
            1,
        );
        assert!(matches!(outcome, ExecutionOutcome::Lost(_)));
        assert!(!memory.has_ticket());
    }

    #[test]
    fn test_unsupported_kind_waits() {
        let mut site = Site::fetch(ResourceKind::Wood, 10);
        let mut executor = Executor::new(ExecutionConfig::default(), RoutineTable::empty());
        let mut memory = remembered(&site);
        let mut movement = Teleport::default();
        let mut providers = Stockpiles::default();

        for t in 1..4 {
            let outcome = run(
                &mut executor,
                &mut memory,
                &mut movement,
                &mut site.boards,
                &mut providers,
                t,
            );
            assert_eq!(outcome, ExecutionOutcome::Unsupported(tickboard_core::TicketKind::Fetch));
        }
        assert!(memory.has_ticket());
        assert_eq!(site.ticket_state(), TicketState::Reserved);
    }

    #[test]
    fn test_stall_limit_abandons() {
        let mut site = Site::fetch(ResourceKind::Wood, 10);
        // a long pickup wait with no progress marks
        let table = RoutineTable::empty().with(
            tickboard_core::TicketKind::Fetch,
            RoutineBlueprint::Fetch {
                pickup_ticks: 100,
                deposit_ticks: 0,
            },
        );
        let mut executor = Executor::new(ExecutionConfig { max_stall_ticks: 5 }, table);
        let mut memory = remembered(&site);
        let mut movement = Teleport::default();
        let mut providers = Stockpiles::default();
        providers.add(Position::new(1.0, 0.0), ResourceKind::Wood, 10);

        let mut outcome = ExecutionOutcome::Idle;
        for t in 1..20 {
            outcome = run(
                &mut executor,
                &mut memory,
                &mut movement,
                &mut site.boards,
                &mut providers,
                t,
            );
            if outcome != ExecutionOutcome::Running {
                break;
            }
        }

        match outcome {
            ExecutionOutcome::Abandoned { reason, .. } => assert_eq!(reason, "timed out"),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(site.ticket_state(), TicketState::Open);
        assert!(!memory.has_ticket());
    }

    #[test]
    fn test_progress_marks_reset_stall() {
        let mut site = Site::fetch(ResourceKind::Wood, 10);
        // eight ticks end to end, never more than three between marks
        let table = RoutineTable::empty().with(
            tickboard_core::TicketKind::Fetch,
            RoutineBlueprint::Fetch {
                pickup_ticks: 3,
                deposit_ticks: 3,
            },
        );
        let mut executor = Executor::new(ExecutionConfig { max_stall_ticks: 4 }, table);
        let mut memory = remembered(&site);
        let mut movement = Teleport::default();
        let mut providers = Stockpiles::default();
        providers.add(Position::new(1.0, 0.0), ResourceKind::Wood, 10);

        let mut outcome = ExecutionOutcome::Idle;
        let mut worst_stall = 0;
        let mut ticks = 0;
        for t in 1..20 {
            outcome = run(
                &mut executor,
                &mut memory,
                &mut movement,
                &mut site.boards,
                &mut providers,
                t,
            );
            ticks = t;
            worst_stall = worst_stall.max(executor.stall_ticks());
            if outcome != ExecutionOutcome::Running {
                break;
            }
        }

        assert!(matches!(outcome, ExecutionOutcome::Completed(_)));
        assert!(ticks > 4);
        assert!(worst_stall <= 3);
        assert_eq!(site.stock(ResourceKind::Wood), 10);
        assert_eq!(site.ticket_state(), TicketState::Done);
    }

    #[test]
    fn test_missing_inventory_is_lost() {
        let site = Site::fetch(ResourceKind::Wood, 10);
        let board = site.boards.get(BOARD).unwrap().clone();
        let mut boards = BoardSet::new();
        boards.insert(board);

        let mut executor = Executor::new(ExecutionConfig::default(), RoutineTable::default());
        let mut memory = remembered(&site);
        let mut movement = Teleport::default();
        let mut providers = Stockpiles::default();

        let outcome = run(
            &mut executor,
            &mut memory,
            &mut movement,
            &mut boards,
            &mut providers,
            1,
        );
        assert!(matches!(outcome, ExecutionOutcome::Lost(_)));
        // left for stale reclamation
        assert_eq!(
            boards.get(BOARD).unwrap().find(site.ticket).unwrap().state,
            TicketState::Reserved
        );
    }
}
