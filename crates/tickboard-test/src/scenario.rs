//! Scenario builder - seeded villages of households and workplaces
//!
//! Layout is a row of homes along the x axis, workplaces on a parallel row
//! above them and stockpiles scattered below. Everything random (pile
//! placement, employment, agent order, chores) comes from one seed, so two
//! builds with the same seed run identically.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tickboard_board::{Board, BoardKind, BoardSet, Inventory};
use tickboard_core::{AgentId, AgentIdentity, BoardId, GroupId, Position, ResourceKind, TicketScope};
use tickboard_runtime::{
    AuditRule, ConfigResult, InventoryAudit, Simulation, SimulationConfig, SimulationStats, World,
};

use crate::{
    check_reservations, AgentShuffle, ChoreRoster, GridMovement, Stockpile, StockpileDirectory,
    Violation,
};

/// First id used for workplace boards and groups
pub const WORKPLACE_ID_BASE: u64 = 100;

/// Builder for a seeded village
#[derive(Debug, Clone)]
pub struct VillageBuilder {
    seed: u64,
    households: usize,
    workplaces: usize,
    agents_per_household: usize,
    employment_rate: f64,
    spacing: f32,
    agent_speed: f32,
    stock_per_pile: u32,
    piles_per_resource: usize,
    chore_interval: Option<u64>,
    shuffle_agents: bool,
    config: SimulationConfig,
}

impl Default for VillageBuilder {
    fn default() -> Self {
        VillageBuilder {
            seed: 0,
            households: 2,
            workplaces: 1,
            agents_per_household: 2,
            employment_rate: 0.5,
            spacing: 8.0,
            agent_speed: 1.0,
            stock_per_pile: 500,
            piles_per_resource: 2,
            chore_interval: Some(25),
            shuffle_agents: true,
            config: SimulationConfig::default(),
        }
    }
}

impl VillageBuilder {
    pub fn new(seed: u64) -> Self {
        VillageBuilder {
            seed,
            ..Default::default()
        }
    }

    pub fn households(mut self, count: usize) -> Self {
        self.households = count;
        self
    }

    pub fn workplaces(mut self, count: usize) -> Self {
        self.workplaces = count;
        self
    }

    pub fn agents_per_household(mut self, count: usize) -> Self {
        self.agents_per_household = count;
        self
    }

    /// Probability that an agent gets a workplace
    pub fn employment_rate(mut self, rate: f64) -> Self {
        self.employment_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn agent_speed(mut self, speed: f32) -> Self {
        self.agent_speed = speed;
        self
    }

    pub fn stock_per_pile(mut self, amount: u32) -> Self {
        self.stock_per_pile = amount;
        self
    }

    /// Ticks between chores, `None` for no chores
    pub fn chores(mut self, interval: Option<u64>) -> Self {
        self.chore_interval = interval;
        self
    }

    pub fn shuffle_agents(mut self, enabled: bool) -> Self {
        self.shuffle_agents = enabled;
        self
    }

    pub fn config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    fn home_position(&self, index: usize) -> Position {
        Position::new(index as f32 * self.spacing, 0.0)
    }

    fn work_position(&self, index: usize) -> Position {
        Position::new(index as f32 * self.spacing + self.spacing / 2.0, self.spacing)
    }

    /// Build the village and its simulation
    pub fn build(self) -> ConfigResult<Village> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let stale = self.config.board.stale_timeout_ticks;

        let mut boards = BoardSet::new();
        let mut homes = Vec::with_capacity(self.households);
        for h in 0..self.households {
            let id = BoardId::new(h as u64 + 1);
            let kind = BoardKind::Home {
                household: GroupId::new(h as u64 + 1),
            };
            boards.insert_with_inventory(
                Board::new(id, kind, self.home_position(h), stale),
                Inventory::new(),
            );
            homes.push(id);
        }

        let mut works = Vec::with_capacity(self.workplaces);
        for w in 0..self.workplaces {
            let id = BoardId::new(WORKPLACE_ID_BASE + w as u64);
            let kind = BoardKind::Work {
                workplace: GroupId::new(WORKPLACE_ID_BASE + w as u64),
            };
            boards.insert(Board::new(id, kind, self.work_position(w), stale));
            works.push(id);
        }

        let width = self.households.max(1) as f32 * self.spacing;
        let mut piles = StockpileDirectory::new();
        for resource in [ResourceKind::Wood, ResourceKind::Food] {
            for _ in 0..self.piles_per_resource {
                let x = rng.gen_range(0.0..width);
                let y = -rng.gen_range(2.0..self.spacing);
                piles.add(Stockpile::new(Position::new(x, y), resource, self.stock_per_pile));
            }
        }

        let world = World::new(boards, Box::new(piles));
        let mut simulation = Simulation::new(self.config.clone(), world)?;

        let mut audit = InventoryAudit::new("inventory-audit", 10);
        for home in &homes {
            audit = audit
                .with_rule(AuditRule::new(*home, ResourceKind::Wood, 10, 5).with_priority(150, 2))
                .with_rule(AuditRule::new(*home, ResourceKind::Food, 10, 5).with_priority(120, 2));
        }
        simulation.add_producer(Box::new(audit));

        if let Some(interval) = self.chore_interval {
            let mut roster = ChoreRoster::new("chores", rng.gen(), interval);
            for work in &works {
                roster = roster.with_board(*work, TicketScope::Workplace);
            }
            for home in &homes {
                roster = roster.with_board(*home, TicketScope::Public);
            }
            simulation.add_producer(Box::new(roster));
        }
        if self.shuffle_agents {
            simulation.add_producer(Box::new(AgentShuffle::new(rng.gen())));
        }

        let mut agents = Vec::new();
        let mut next_agent = 1;
        for (h, _) in homes.iter().enumerate() {
            for _ in 0..self.agents_per_household {
                let household = GroupId::new(h as u64 + 1);
                let mut identity = AgentIdentity::new(AgentId::new(next_agent), household);
                if !works.is_empty() && rng.gen_bool(self.employment_rate) {
                    let w = rng.gen_range(0..works.len());
                    identity = identity.employed_at(GroupId::new(WORKPLACE_ID_BASE + w as u64));
                }
                let movement = GridMovement::new(self.home_position(h), self.agent_speed);
                agents.push(simulation.add_agent(identity, Box::new(movement)));
                next_agent += 1;
            }
        }

        tracing::debug!(
            seed = self.seed,
            homes = homes.len(),
            workplaces = works.len(),
            agents = agents.len(),
            "village built"
        );

        Ok(Village {
            simulation,
            homes,
            works,
            agents,
        })
    }
}

/// A built village
#[derive(Debug)]
pub struct Village {
    pub simulation: Simulation,
    pub homes: Vec<BoardId>,
    pub works: Vec<BoardId>,
    pub agents: Vec<AgentId>,
}

impl Village {
    /// Run `ticks` ticks, checking reservations after each
    pub fn run_checked(&mut self, ticks: u64) -> Result<(), Violation> {
        for _ in 0..ticks {
            self.simulation.step();
            check_reservations(self.simulation.world())?;
        }
        Ok(())
    }

    pub fn stats(&self) -> &SimulationStats {
        self.simulation.stats()
    }

    /// Units of `resource` stored across every home
    pub fn stored(&self, resource: ResourceKind) -> u32 {
        let world = self.simulation.world();
        self.homes
            .iter()
            .filter_map(|h| world.boards.inventory(*h))
            .map(|inv| inv.quantity(resource))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let village = VillageBuilder::new(1)
            .households(3)
            .workplaces(2)
            .agents_per_household(2)
            .build()
            .unwrap();

        assert_eq!(village.homes, vec![BoardId(1), BoardId(2), BoardId(3)]);
        assert_eq!(village.works, vec![BoardId(100), BoardId(101)]);
        assert_eq!(village.agents.len(), 6);
        assert_eq!(village.simulation.world().boards.len(), 5);
        assert_eq!(
            village.simulation.phases(),
            vec!["board-maintenance", "inventory-audit", "chores", "agent-shuffle", "agents"]
        );
    }

    #[test]
    fn test_employment_rate_extremes() {
        let all = VillageBuilder::new(9).employment_rate(1.0).build().unwrap();
        assert!(all
            .simulation
            .world()
            .agents
            .iter()
            .all(|a| a.identity().is_employed()));

        let none = VillageBuilder::new(9).employment_rate(0.0).build().unwrap();
        assert!(none
            .simulation
            .world()
            .agents
            .iter()
            .all(|a| !a.identity().is_employed()));
    }

    #[test]
    fn test_homes_start_empty() {
        let village = VillageBuilder::new(2).build().unwrap();
        assert_eq!(village.stored(ResourceKind::Wood), 0);
        assert_eq!(village.stored(ResourceKind::Food), 0);
    }
}
