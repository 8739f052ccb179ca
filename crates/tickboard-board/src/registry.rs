//! BoardSet - boards keyed by stable id
//!
//! Board ids are assigned by the simulation when a board is inserted and
//! never change, so agents can remember them across ticks.

use std::collections::{BTreeMap, HashMap};

use tickboard_core::{BoardId, Position, Tick};

use crate::{Board, Inventory, MaintenanceReport};

/// Totals of one maintenance pass over every board
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceTotals {
    pub reclaimed: usize,
    pub pruned: usize,
}

impl MaintenanceTotals {
    fn absorb(&mut self, report: &MaintenanceReport) {
        self.reclaimed += report.reclaimed.len();
        self.pruned += report.pruned;
    }
}

/// All boards of a world, with the inventories they deliver into
#[derive(Debug, Default)]
pub struct BoardSet {
    boards: BTreeMap<BoardId, Board>,
    inventories: HashMap<BoardId, Inventory>,
}

impl BoardSet {
    pub fn new() -> Self {
        BoardSet::default()
    }

    /// Insert a board without an inventory
    ///
    /// Replaces any board with the same id, dropping that board's inventory.
    pub fn insert(&mut self, board: Board) -> Option<Board> {
        self.inventories.remove(&board.id());
        self.boards.insert(board.id(), board)
    }

    /// Insert a board together with its inventory sink
    pub fn insert_with_inventory(&mut self, board: Board, inventory: Inventory) -> Option<Board> {
        let id = board.id();
        let replaced = self.insert(board);
        self.inventories.insert(id, inventory);
        replaced
    }

    pub fn get(&self, id: BoardId) -> Option<&Board> {
        self.boards.get(&id)
    }

    pub fn get_mut(&mut self, id: BoardId) -> Option<&mut Board> {
        self.boards.get_mut(&id)
    }

    pub fn inventory(&self, id: BoardId) -> Option<&Inventory> {
        self.inventories.get(&id)
    }

    pub fn inventory_mut(&mut self, id: BoardId) -> Option<&mut Inventory> {
        self.inventories.get_mut(&id)
    }

    /// A board and its inventory, borrowed together
    pub fn site_mut(&mut self, id: BoardId) -> Option<(&mut Board, Option<&mut Inventory>)> {
        let board = self.boards.get_mut(&id)?;
        let inventory = self.inventories.get_mut(&id);
        Some((board, inventory))
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Boards in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Board> {
        self.boards.values()
    }

    /// Ids of boards whose site lies within `radius` of `pos`, ascending
    pub fn within_radius(&self, pos: Position, radius: f32) -> Vec<BoardId> {
        self.boards
            .values()
            .filter(|b| b.position().within(pos, radius))
            .map(|b| b.id())
            .collect()
    }

    /// Run one maintenance cycle on every board
    pub fn maintain_all(&mut self, now: Tick) -> MaintenanceTotals {
        let mut totals = MaintenanceTotals::default();
        for board in self.boards.values_mut() {
            totals.absorb(&board.maintain(now));
        }
        totals
    }
}
