//! Per-site resource stock
//!
//! Fetch routines deposit into the inventory of the board they work for,
//! and the inventory audit producer publishes tickets when stock runs low.

use std::collections::BTreeMap;

use tickboard_core::ResourceKind;

/// Resource stock attached to a board's site
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    stock: BTreeMap<ResourceKind, u32>,
    /// Total units the site can hold, `None` for unbounded
    capacity: Option<u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Inventory::default()
    }

    pub fn with_capacity(capacity: u32) -> Self {
        Inventory {
            stock: BTreeMap::new(),
            capacity: Some(capacity),
        }
    }

    pub fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    /// Units of `resource` on hand
    pub fn quantity(&self, resource: ResourceKind) -> u32 {
        self.stock.get(&resource).copied().unwrap_or(0)
    }

    /// Units of every resource on hand
    pub fn total(&self) -> u32 {
        self.stock.values().fold(0u32, |acc, n| acc.saturating_add(*n))
    }

    /// Free room left under the capacity
    pub fn free(&self) -> u32 {
        match self.capacity {
            Some(cap) => cap.saturating_sub(self.total()),
            None => u32::MAX,
        }
    }

    /// Store up to `amount` units, returning how many were accepted
    pub fn deposit(&mut self, resource: ResourceKind, amount: u32) -> u32 {
        if resource.is_none() {
            return 0;
        }
        let accepted = amount.min(self.free());
        if accepted > 0 {
            let slot = self.stock.entry(resource).or_insert(0);
            *slot = slot.saturating_add(accepted);
        }
        accepted
    }

    /// Remove up to `amount` units, returning how many were taken
    pub fn withdraw(&mut self, resource: ResourceKind, amount: u32) -> u32 {
        let Some(slot) = self.stock.get_mut(&resource) else {
            return 0;
        };
        let taken = amount.min(*slot);
        *slot -= taken;
        if *slot == 0 {
            self.stock.remove(&resource);
        }
        taken
    }

    /// Overwrite the stock of one resource
    pub fn set(&mut self, resource: ResourceKind, amount: u32) {
        if resource.is_none() {
            return;
        }
        if amount == 0 {
            self.stock.remove(&resource);
        } else {
            self.stock.insert(resource, amount);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        self.stock.iter().map(|(r, n)| (*r, *n))
    }
}
