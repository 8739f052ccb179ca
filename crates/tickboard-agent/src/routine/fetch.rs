//! Fetch routine
//!
//! ```text
//! GoToProvider -> PickupWait -> GoToDropoff -> DepositWait -> done
//! ```
//!
//! The provider is chosen once, at begin time. Not finding one, or coming
//! away with nothing, ends the routine with a failure; there is no retry
//! within the same reservation.

use tickboard_core::Tick;

use super::{RoutineContext, RoutineStatus};
use crate::ProviderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchPhase {
    Unstarted,
    GoToProvider,
    PickupWait { until: Tick },
    GoToDropoff,
    DepositWait { until: Tick },
    Finished,
}

/// Carry `quantity` units of a resource from a provider to the job site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRoutine {
    pickup_ticks: u64,
    deposit_ticks: u64,
    phase: FetchPhase,
    provider: Option<ProviderId>,
    carried: u32,
}

impl FetchRoutine {
    pub fn new(pickup_ticks: u64, deposit_ticks: u64) -> Self {
        FetchRoutine {
            pickup_ticks,
            deposit_ticks,
            phase: FetchPhase::Unstarted,
            provider: None,
            carried: 0,
        }
    }

    pub fn provider(&self) -> Option<ProviderId> {
        self.provider
    }

    pub fn begin(&mut self, ctx: &mut RoutineContext<'_>) {
        let from = ctx.movement.position();
        self.provider =
            ctx.providers
                .find_best_provider(ctx.job.resource, ctx.job.quantity, from);
        self.carried = 0;

        let target = self
            .provider
            .and_then(|id| ctx.providers.provider(id))
            .map(|p| p.position());
        let Some(target) = target else {
            // reported on the first step
            self.phase = FetchPhase::Unstarted;
            return;
        };

        ctx.movement.set_target(target);
        self.phase = FetchPhase::GoToProvider;
        ctx.mark_progress("heading to provider");
    }

    pub fn step(&mut self, ctx: &mut RoutineContext<'_>) -> RoutineStatus {
        let Some(provider) = self.provider else {
            return RoutineStatus::Failed("no provider".to_string());
        };

        match self.phase {
            FetchPhase::Unstarted => RoutineStatus::Failed("no provider".to_string()),
            FetchPhase::GoToProvider => {
                if ctx.arrived() {
                    self.phase = FetchPhase::PickupWait {
                        until: ctx.now + self.pickup_ticks,
                    };
                    ctx.mark_progress("picking up");
                }
                RoutineStatus::Running
            }
            FetchPhase::PickupWait { until } => {
                if ctx.now < until {
                    return RoutineStatus::Running;
                }
                let wanted = ctx.job.quantity;
                let taken = ctx
                    .providers
                    .provider_mut(provider)
                    .map(|p| p.take(wanted))
                    .unwrap_or(0);
                if taken == 0 {
                    return RoutineStatus::Failed("provider empty".to_string());
                }

                self.carried = taken;
                ctx.movement.set_target(ctx.site);
                self.phase = FetchPhase::GoToDropoff;
                ctx.mark_progress("carrying to site");
                RoutineStatus::Running
            }
            FetchPhase::GoToDropoff => {
                if ctx.arrived() {
                    self.phase = FetchPhase::DepositWait {
                        until: ctx.now + self.deposit_ticks,
                    };
                    ctx.mark_progress("depositing");
                }
                RoutineStatus::Running
            }
            FetchPhase::DepositWait { until } => {
                if ctx.now < until {
                    return RoutineStatus::Running;
                }
                let Some(accepted) = ctx.deposit(self.carried) else {
                    return RoutineStatus::Failed("no inventory".to_string());
                };
                if accepted < self.carried {
                    tracing::debug!(
                        board = %ctx.reservation.board,
                        carried = self.carried,
                        accepted,
                        "inventory full, surplus dropped"
                    );
                }
                self.carried = 0;
                self.phase = FetchPhase::Finished;
                ctx.mark_progress("delivered");
                RoutineStatus::Completed
            }
            FetchPhase::Finished => RoutineStatus::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{Site, Stockpiles};
    use crate::{Job, ProviderDirectory, ResourceProvider};
    use tickboard_core::{Position, ResourceKind, TicketKind, TicketState};

    fn job(site: &Site, quantity: u32) -> Job {
        Job {
            ticket: site.ticket,
            kind: TicketKind::Fetch,
            resource: ResourceKind::Wood,
            quantity,
        }
    }

    #[test]
    fn test_no_provider_fails_first_step() {
        let mut site = Site::fetch(ResourceKind::Wood, 20);
        let mut providers = Stockpiles::default();
        let job = job(&site, 20);

        let mut routine = FetchRoutine::new(2, 2);
        let mut ctx = site.context(Tick::new(1), job, &mut providers);
        routine.begin(&mut ctx);
        assert!(!ctx.progressed());
        assert_eq!(
            routine.step(&mut ctx),
            RoutineStatus::Failed("no provider".to_string())
        );
    }

    #[test]
    fn test_full_delivery() {
        let mut site = Site::fetch(ResourceKind::Wood, 20);
        let mut providers = Stockpiles::default();
        let pile = providers.add(Position::new(3.0, 0.0), ResourceKind::Wood, 50);
        let job = job(&site, 20);
        let mut routine = FetchRoutine::new(2, 1);

        let mut now = Tick::new(1);
        {
            let mut ctx = site.context(now, job, &mut providers);
            routine.begin(&mut ctx);
            assert!(ctx.progressed());
        }
        assert_eq!(routine.provider(), Some(pile));

        let mut status = RoutineStatus::Running;
        for _ in 0..20 {
            now += 1;
            let mut ctx = site.context(now, job, &mut providers);
            status = routine.step(&mut ctx);
            if status != RoutineStatus::Running {
                break;
            }
        }

        assert_eq!(status, RoutineStatus::Completed);
        assert_eq!(site.stock(ResourceKind::Wood), 20);
        assert_eq!(providers.provider(pile).map(|p| p.can_provide(30)), Some(true));
        assert_eq!(providers.provider(pile).map(|p| p.can_provide(31)), Some(false));
        assert_eq!(site.ticket_state(), TicketState::Reserved);
    }

    #[test]
    fn test_empty_provider_fails() {
        let mut site = Site::fetch(ResourceKind::Wood, 5);
        let mut providers = Stockpiles::default();
        let pile = providers.add(Position::new(1.0, 0.0), ResourceKind::Wood, 5);
        let job = job(&site, 5);
        let mut routine = FetchRoutine::new(0, 0);

        {
            let mut ctx = site.context(Tick::new(1), job, &mut providers);
            routine.begin(&mut ctx);
        }
        // someone else empties the pile while we walk
        providers.drain(pile);

        let mut status = RoutineStatus::Running;
        for t in 2..10 {
            let mut ctx = site.context(Tick::new(t), job, &mut providers);
            status = routine.step(&mut ctx);
            if status != RoutineStatus::Running {
                break;
            }
        }
        assert_eq!(status, RoutineStatus::Failed("provider empty".to_string()));
    }
}
