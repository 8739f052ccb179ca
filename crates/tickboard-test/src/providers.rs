//! Stockpile resource providers

use tickboard_agent::{ProviderDirectory, ProviderId, ResourceProvider};
use tickboard_core::{Position, ResourceKind};

/// A finite pile of one resource
#[derive(Debug, Clone, PartialEq)]
pub struct Stockpile {
    pub position: Position,
    pub resource: ResourceKind,
    pub amount: u32,
}

impl Stockpile {
    pub fn new(position: Position, resource: ResourceKind, amount: u32) -> Self {
        Stockpile {
            position,
            resource,
            amount,
        }
    }
}

impl ResourceProvider for Stockpile {
    fn position(&self) -> Position {
        self.position
    }

    fn can_provide(&self, amount: u32) -> bool {
        self.amount >= amount
    }

    fn take(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.amount);
        self.amount -= taken;
        taken
    }
}

/// Every stockpile of a world, addressed by insertion index
#[derive(Debug, Clone, Default)]
pub struct StockpileDirectory {
    piles: Vec<Stockpile>,
}

impl StockpileDirectory {
    pub fn new() -> Self {
        StockpileDirectory::default()
    }

    pub fn add(&mut self, pile: Stockpile) -> ProviderId {
        self.piles.push(pile);
        ProviderId(self.piles.len() as u64 - 1)
    }

    pub fn piles(&self) -> &[Stockpile] {
        &self.piles
    }

    pub fn len(&self) -> usize {
        self.piles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.piles.is_empty()
    }

    /// Units of `resource` left across all piles
    pub fn remaining(&self, resource: ResourceKind) -> u32 {
        self.piles
            .iter()
            .filter(|p| p.resource == resource)
            .map(|p| p.amount)
            .sum()
    }
}

impl ProviderDirectory for StockpileDirectory {
    /// Nearest pile that can cover `amount`, else the nearest non-empty one
    fn find_best_provider(
        &self,
        resource: ResourceKind,
        amount: u32,
        from: Position,
    ) -> Option<ProviderId> {
        let nearest = |full_only: bool| {
            self.piles
                .iter()
                .enumerate()
                .filter(|(_, p)| p.resource == resource && p.amount > 0)
                .filter(|(_, p)| !full_only || p.can_provide(amount))
                .min_by(|(_, a), (_, b)| {
                    a.position
                        .distance_to(from)
                        .total_cmp(&b.position.distance_to(from))
                })
                .map(|(i, _)| ProviderId(i as u64))
        };
        nearest(true).or_else(|| nearest(false))
    }

    fn provider(&self, id: ProviderId) -> Option<&dyn ResourceProvider> {
        self.piles
            .get(id.0 as usize)
            .map(|p| p as &dyn ResourceProvider)
    }

    fn provider_mut(&mut self, id: ProviderId) -> Option<&mut dyn ResourceProvider> {
        self.piles
            .get_mut(id.0 as usize)
            .map(|p| p as &mut dyn ResourceProvider)
    }
}
