//! World modifiers - global multipliers on ticket scores
//!
//! External systems (weather, events, festivals) register rules that
//! raise or lower the score of matching tickets for a while. A rule with
//! an unset filter matches everything on that axis.

use std::sync::Arc;

use parking_lot::RwLock;
use tickboard_core::{ResourceKind, Tick, Ticket, TicketKind, TicketScope};

/// Anything that can weigh a ticket by world conditions
///
/// Reads take no tick, so expiry is not checked here: a rule past its
/// `expires_at` keeps applying until the owner calls `expire(now)`. The
/// simulation does that in its maintenance phase, before any agent reads.
pub trait MultiplierSource {
    /// Product of all active matching rules, 1.0 when none match
    fn multiplier_for(&self, ticket: &Ticket) -> f64;
}

/// No modifiers at all
#[derive(Debug, Default, Clone, Copy)]
pub struct NoModifiers;

impl MultiplierSource for NoModifiers {
    fn multiplier_for(&self, _ticket: &Ticket) -> f64 {
        1.0
    }
}

/// One world modifier rule
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierRule {
    pub label: String,
    pub kind: Option<TicketKind>,
    pub resource: Option<ResourceKind>,
    pub scope: Option<TicketScope>,
    multiplier: f64,
    intensity: f64,
    /// Rule stops applying at this tick
    pub expires_at: Option<Tick>,
}

impl ModifierRule {
    /// A rule matching every ticket
    pub fn new(label: impl Into<String>, multiplier: f64) -> Self {
        ModifierRule {
            label: label.into(),
            kind: None,
            resource: None,
            scope: None,
            multiplier: clamp_multiplier(multiplier),
            intensity: 1.0,
            expires_at: None,
        }
    }

    pub fn for_kind(mut self, kind: TicketKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn for_resource(mut self, resource: ResourceKind) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn for_scope(mut self, scope: TicketScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Scale the rule; non-positive intensity means full strength (1.0)
    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = if intensity.is_finite() && intensity > 0.0 {
            intensity
        } else {
            1.0
        };
        self
    }

    pub fn expiring_at(mut self, tick: Tick) -> Self {
        self.expires_at = Some(tick);
        self
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Effective factor this rule contributes
    pub fn factor(&self) -> f64 {
        self.multiplier * self.intensity
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.kind.map_or(true, |k| k == ticket.kind)
            && self.resource.map_or(true, |r| r == ticket.resource)
            && self.scope.map_or(true, |s| s == ticket.scope)
    }

    pub fn is_expired(&self, now: Tick) -> bool {
        self.expires_at.map_or(false, |t| now >= t)
    }
}

fn clamp_multiplier(m: f64) -> f64 {
    if m.is_finite() {
        m.max(0.0)
    } else {
        0.0
    }
}

/// The set of currently active rules
#[derive(Debug, Default, Clone)]
pub struct ModifierBook {
    rules: Vec<ModifierRule>,
}

impl ModifierBook {
    pub fn new() -> Self {
        ModifierBook::default()
    }

    /// Add a rule; a rule with the same label is replaced
    pub fn add(&mut self, rule: ModifierRule) {
        self.remove(&rule.label);
        tracing::debug!(label = %rule.label, factor = rule.factor(), "modifier added");
        self.rules.push(rule);
    }

    /// Remove a rule by label
    pub fn remove(&mut self, label: &str) -> Option<ModifierRule> {
        let pos = self.rules.iter().position(|r| r.label == label)?;
        Some(self.rules.remove(pos))
    }

    /// Drop every rule whose expiry has been reached
    pub fn expire(&mut self, now: Tick) -> usize {
        let before = self.rules.len();
        self.rules.retain(|r| {
            let keep = !r.is_expired(now);
            if !keep {
                tracing::debug!(label = %r.label, %now, "modifier expired");
            }
            keep
        });
        before - self.rules.len()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[ModifierRule] {
        &self.rules
    }
}

impl MultiplierSource for ModifierBook {
    fn multiplier_for(&self, ticket: &Ticket) -> f64 {
        self.rules
            .iter()
            .filter(|r| r.matches(ticket))
            .map(ModifierRule::factor)
            .product()
    }
}

/// Modifier book shared between the simulation and whoever edits it
#[derive(Debug, Default, Clone)]
pub struct SharedModifiers {
    inner: Arc<RwLock<ModifierBook>>,
}

impl SharedModifiers {
    pub fn new() -> Self {
        SharedModifiers::default()
    }

    pub fn add(&self, rule: ModifierRule) {
        self.inner.write().add(rule);
    }

    pub fn remove(&self, label: &str) -> Option<ModifierRule> {
        self.inner.write().remove(label)
    }

    pub fn expire(&self, now: Tick) -> usize {
        self.inner.write().expire(now)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Snapshot of the current rules
    pub fn snapshot(&self) -> ModifierBook {
        self.inner.read().clone()
    }
}

impl MultiplierSource for SharedModifiers {
    fn multiplier_for(&self, ticket: &Ticket) -> f64 {
        self.inner.read().multiplier_for(ticket)
    }
}
