//! Collaborator interfaces
//!
//! The agent crate never moves anything or owns any resource source. It
//! asks these traits instead, and receives everything else it needs for a
//! tick through `AgentContext`.

use std::fmt;

use tickboard_board::BoardSet;
use tickboard_core::{Position, ResourceKind, Tick};
use tickboard_policy::MultiplierSource;

/// Point-to-point navigator owned by one agent
///
/// No guarantee is made about how long a trip takes; only that
/// `is_at_target` eventually tells the truth.
pub trait Movement {
    fn set_target(&mut self, target: Position);

    fn clear_target(&mut self);

    fn is_at_target(&self) -> bool;

    /// Acknowledge an arrival, returning whether one was pending
    fn consume_arrival(&mut self) -> bool;

    fn position(&self) -> Position;

    /// Integrate one tick of motion
    fn advance(&mut self) {}
}

/// Resource provider handle, unique within a directory
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ProviderId(pub u64);

impl fmt::Debug for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Provider({})", self.0)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A place resources can be taken from
pub trait ResourceProvider {
    fn position(&self) -> Position;

    fn can_provide(&self, amount: u32) -> bool;

    /// Take up to `amount` units, returning how many were actually taken
    fn take(&mut self, amount: u32) -> u32;
}

/// Lookup of resource providers by kind and distance
pub trait ProviderDirectory {
    fn find_best_provider(
        &self,
        resource: ResourceKind,
        amount: u32,
        from: Position,
    ) -> Option<ProviderId>;

    fn provider(&self, id: ProviderId) -> Option<&dyn ResourceProvider>;

    fn provider_mut(&mut self, id: ProviderId) -> Option<&mut dyn ResourceProvider>;
}

/// A directory with no providers at all
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProviders;

impl ProviderDirectory for NoProviders {
    fn find_best_provider(&self, _: ResourceKind, _: u32, _: Position) -> Option<ProviderId> {
        None
    }

    fn provider(&self, _: ProviderId) -> Option<&dyn ResourceProvider> {
        None
    }

    fn provider_mut(&mut self, _: ProviderId) -> Option<&mut dyn ResourceProvider> {
        None
    }
}

/// Everything an agent may touch during one tick
pub struct AgentContext<'a> {
    pub now: Tick,
    pub boards: &'a mut BoardSet,
    pub providers: &'a mut dyn ProviderDirectory,
    pub modifiers: &'a dyn MultiplierSource,
}
