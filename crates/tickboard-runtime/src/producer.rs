//! Ticket producers
//!
//! Producers are ordinary tickables in the production phase. They only ever
//! call `Board::add_ticket`; everything about the ticket (priority, aging,
//! quantity, scope) is their own tuning.

use tickboard_core::{BoardId, ResourceKind, Tick, Ticket, TicketKind, TicketScope};
use tickboard_time::{TickPhase, Tickable};

use crate::World;

/// Watch one resource on one board's inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRule {
    pub board: BoardId,
    pub resource: ResourceKind,
    /// Publish when stock falls strictly below this
    pub threshold: u32,
    /// Units requested per ticket
    pub request: u32,
    pub scope: TicketScope,
    pub base_priority_points: u32,
    pub aging_priority_points_per_tick: u32,
}

impl AuditRule {
    pub fn new(board: BoardId, resource: ResourceKind, threshold: u32, request: u32) -> Self {
        AuditRule {
            board,
            resource,
            threshold,
            request,
            scope: TicketScope::Household,
            base_priority_points: 100,
            aging_priority_points_per_tick: 1,
        }
    }

    pub fn with_scope(mut self, scope: TicketScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_priority(mut self, base_points: u32, aging_points_per_tick: u32) -> Self {
        self.base_priority_points = base_points;
        self.aging_priority_points_per_tick = aging_points_per_tick;
        self
    }
}

/// Publishes fetch tickets when inventory runs low
///
/// A rule fires only if no unresolved fetch ticket for the same resource and
/// scope is already on the board.
#[derive(Debug, Clone)]
pub struct InventoryAudit {
    name: String,
    rules: Vec<AuditRule>,
    /// Ticks between audits
    interval: u64,
    last_run: Option<Tick>,
}

impl InventoryAudit {
    pub fn new(name: impl Into<String>, interval: u64) -> Self {
        InventoryAudit {
            name: name.into(),
            rules: Vec::new(),
            interval: interval.max(1),
            last_run: None,
        }
    }

    pub fn with_rule(mut self, rule: AuditRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[AuditRule] {
        &self.rules
    }

    /// Audit every rule once, returning how many tickets were published
    pub fn audit(&self, now: Tick, world: &mut World) -> usize {
        let mut created = 0;
        for rule in &self.rules {
            let Some((board, inventory)) = world.boards.site_mut(rule.board) else {
                tracing::warn!(audit = %self.name, board = %rule.board, "audited board not found");
                continue;
            };
            let Some(inventory) = inventory else {
                tracing::warn!(
                    audit = %self.name,
                    board = %rule.board,
                    "audited board has no inventory"
                );
                continue;
            };

            let stock = inventory.quantity(rule.resource);
            if stock >= rule.threshold {
                continue;
            }
            if board.has_unresolved(TicketKind::Fetch, rule.resource, Some(rule.scope)) {
                continue;
            }

            let ticket = Ticket::new(
                TicketKind::Fetch,
                rule.resource,
                rule.scope,
                rule.request,
                now,
            )
            .with_priority(rule.base_priority_points, rule.aging_priority_points_per_tick)
            .with_notes(format!(
                "{}: {} low ({stock}/{})",
                self.name, rule.resource, rule.threshold
            ));

            if board.add_ticket(ticket).is_ok() {
                created += 1;
            }
        }
        world.stats.tickets_created += created as u64;
        created
    }
}

impl Tickable<World> for InventoryAudit {
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
        if !due {
            return;
        }
        self.last_run = Some(tick);
        self.audit(tick, world);
    }
}
