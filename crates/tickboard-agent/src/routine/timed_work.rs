//! Timed-work routine: walk to the job site, work a fixed number of ticks

use tickboard_core::Tick;

use super::{RoutineContext, RoutineStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkPhase {
    GoToSite,
    Working { until: Tick },
    Finished,
}

/// Maintenance-style work whose duration depends only on the kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedWorkRoutine {
    work_ticks: u64,
    phase: WorkPhase,
}

impl TimedWorkRoutine {
    pub fn new(work_ticks: u64) -> Self {
        TimedWorkRoutine {
            work_ticks,
            phase: WorkPhase::GoToSite,
        }
    }

    pub fn begin(&mut self, ctx: &mut RoutineContext<'_>) {
        ctx.movement.set_target(ctx.site);
        self.phase = WorkPhase::GoToSite;
        ctx.mark_progress("heading to site");
    }

    pub fn step(&mut self, ctx: &mut RoutineContext<'_>) -> RoutineStatus {
        match self.phase {
            WorkPhase::GoToSite => {
                if ctx.arrived() {
                    self.phase = WorkPhase::Working {
                        until: ctx.now + self.work_ticks,
                    };
                    ctx.mark_progress("working");
                }
                RoutineStatus::Running
            }
            WorkPhase::Working { until } => {
                if ctx.now < until {
                    return RoutineStatus::Running;
                }
                self.phase = WorkPhase::Finished;
                ctx.mark_progress("work finished");
                RoutineStatus::Completed
            }
            WorkPhase::Finished => RoutineStatus::Completed,
        }
    }
}
