//! End-to-end marketplace behaviour through the public API

use tickboard_agent::{Agent, AgentContext, ExecutionConfig, RoutineTable, SeekerConfig};
use tickboard_board::{Board, BoardKind, BoardSet, Inventory};
use tickboard_core::{
    AgentId, AgentIdentity, BoardId, GroupId, Position, ResourceKind, Tick, Ticket, TicketKind,
    TicketScope, TicketState,
};
use tickboard_policy::{score, ModifierRule, NoModifiers, SharedModifiers};
use tickboard_runtime::{Simulation, SimulationConfig, World};
use tickboard_test::{check_reservations, GridMovement, Stockpile, StockpileDirectory};

const HOME: BoardId = BoardId(1);

fn home_board(stale_timeout: u64) -> Board {
    Board::new(
        HOME,
        BoardKind::Home {
            household: GroupId::new(1),
        },
        Position::ORIGIN,
        stale_timeout,
    )
}

fn villager(id: u64) -> AgentIdentity {
    AgentIdentity::new(AgentId::new(id), GroupId::new(1))
}

fn simulation(board: Board, piles: StockpileDirectory) -> Simulation {
    let mut boards = BoardSet::new();
    boards.insert_with_inventory(board, Inventory::new());
    let world = World::new(boards, Box::new(piles));
    Simulation::new(SimulationConfig::default(), world).unwrap()
}

#[test]
fn test_stale_reservation_reclaimed_at_timeout() {
    let mut board = home_board(200);
    let id = board
        .add_ticket(Ticket::new(
            TicketKind::Repair,
            ResourceKind::None,
            TicketScope::Household,
            1,
            Tick::ZERO,
        ))
        .unwrap();
    board.reserve(id, AgentId::new(7), Tick::new(10)).unwrap();

    assert!(board.reclaim_stale(Tick::new(209)).is_empty());
    assert_eq!(board.find(id).unwrap().state, TicketState::Reserved);

    assert_eq!(board.reclaim_stale(Tick::new(210)), vec![id]);
    let ticket = board.find(id).unwrap();
    assert_eq!(ticket.state, TicketState::Open);
    assert_eq!(ticket.reserved_by, None);
    assert_eq!(ticket.reserved_at, None);
}

#[test]
fn test_score_with_aging_affinity_and_modifier() {
    let ticket = Ticket::new(
        TicketKind::Repair,
        ResourceKind::None,
        TicketScope::Household,
        1,
        Tick::ZERO,
    )
    .with_priority(500, 2);
    let agent = villager(1).with_affinity(TicketKind::Repair, 1.5);
    let modifiers = SharedModifiers::new();
    modifiers.add(ModifierRule::new("storm", 1.5).for_kind(TicketKind::Repair));

    // 500 + 2 * 100 = 700, then x1.5 world and x1.5 personal
    assert_eq!(score(&ticket, Tick::new(100), &villager(1), &NoModifiers), 700);
    assert_eq!(score(&ticket, Tick::new(100), &agent, &modifiers), 1575);
}

#[test]
fn test_seeker_reserves_higher_score_first() {
    let mut board = home_board(200);
    let low = board
        .add_ticket(
            Ticket::new(
                TicketKind::Clean,
                ResourceKind::None,
                TicketScope::Household,
                1,
                Tick::ZERO,
            )
            .with_priority(1200, 0),
        )
        .unwrap();
    let high = board
        .add_ticket(
            Ticket::new(
                TicketKind::Repair,
                ResourceKind::None,
                TicketScope::Household,
                1,
                Tick::ZERO,
            )
            .with_priority(1350, 0),
        )
        .unwrap();

    let mut sim = simulation(board, StockpileDirectory::new());
    sim.add_agent(villager(1), Box::new(GridMovement::new(Position::ORIGIN, 1.0)));
    sim.step();

    let board = sim.world().board(HOME).unwrap();
    assert!(board.find(high).unwrap().is_held_by(AgentId::new(1)));
    assert_eq!(board.find(low).unwrap().state, TicketState::Open);
    let remembered = sim.world().agent(AgentId::new(1)).unwrap().memory().reservation();
    assert_eq!(remembered.map(|r| r.ticket), Some(high));
}

#[test]
fn test_fetch_without_provider_reopens_ticket() {
    let mut board = home_board(200);
    let id = board
        .add_ticket(Ticket::new(
            TicketKind::Fetch,
            ResourceKind::Wood,
            TicketScope::Household,
            20,
            Tick::ZERO,
        ))
        .unwrap();

    let mut sim = simulation(board, StockpileDirectory::new());
    sim.add_agent(villager(1), Box::new(GridMovement::new(Position::ORIGIN, 1.0)));
    sim.step();

    let ticket = sim.world().board(HOME).unwrap().find(id).unwrap();
    assert_eq!(ticket.state, TicketState::Open);
    assert_eq!(ticket.reserved_by, None);
    assert_eq!(ticket.notes, "no provider");
    assert!(!sim.world().agent(AgentId::new(1)).unwrap().memory().has_ticket());
    assert_eq!(sim.stats().reservations, 1);
    assert_eq!(sim.stats().abandonments, 1);
}

#[test]
fn test_fetch_delivers_to_home_inventory() {
    let board = home_board(200);
    let mut piles = StockpileDirectory::new();
    piles.add(Stockpile::new(Position::new(3.0, 0.0), ResourceKind::Wood, 100));

    let mut sim = simulation(board, piles);
    sim.world_mut()
        .boards
        .get_mut(HOME)
        .unwrap()
        .add_ticket(Ticket::new(
            TicketKind::Fetch,
            ResourceKind::Wood,
            TicketScope::Household,
            8,
            Tick::ZERO,
        ))
        .unwrap();
    sim.add_agent(villager(1), Box::new(GridMovement::new(Position::ORIGIN, 1.0)));

    // 3 out, 5 pickup, 3 back, 5 deposit, with slack
    sim.run_for(40);

    assert_eq!(sim.stats().completions, 1);
    assert_eq!(
        sim.world().boards.inventory(HOME).unwrap().quantity(ResourceKind::Wood),
        8
    );
    assert!(sim.world().board(HOME).unwrap().is_empty());
}

#[test]
fn test_same_tick_contention_has_one_winner() {
    let mut board = home_board(200);
    let id = board
        .add_ticket(Ticket::new(
            TicketKind::Tend,
            ResourceKind::None,
            TicketScope::Household,
            1,
            Tick::ZERO,
        ))
        .unwrap();
    let mut boards = BoardSet::new();
    boards.insert(board);
    let mut piles = StockpileDirectory::new();

    let mut agents: Vec<Agent> = (1..=8)
        .map(|n| {
            Agent::new(
                villager(n),
                Box::new(GridMovement::new(Position::ORIGIN, 1.0)),
                SeekerConfig::default(),
                ExecutionConfig::default(),
                RoutineTable::default(),
            )
        })
        .collect();

    let mut ctx = AgentContext {
        now: Tick::new(1),
        boards: &mut boards,
        providers: &mut piles,
        modifiers: &NoModifiers,
    };
    let winners = agents
        .iter_mut()
        .map(|a| a.tick(&mut ctx))
        .filter(|report| report.reserved().is_some())
        .count();

    assert_eq!(winners, 1);
    let holder = boards.get(HOME).unwrap().find(id).unwrap().reserved_by;
    assert_eq!(holder, Some(AgentId::new(1)));
}

#[test]
fn test_shutdown_reopens_everything() {
    let mut board = home_board(200);
    for _ in 0..3 {
        board
            .add_ticket(Ticket::new(
                TicketKind::Repair,
                ResourceKind::None,
                TicketScope::Household,
                1,
                Tick::ZERO,
            ))
            .unwrap();
    }
    let mut sim = simulation(board, StockpileDirectory::new());
    for n in 1..=3 {
        sim.add_agent(villager(n), Box::new(GridMovement::new(Position::ORIGIN, 1.0)));
    }
    sim.step();
    assert_eq!(check_reservations(sim.world()), Ok(3));

    assert_eq!(sim.shutdown(), 3);
    assert_eq!(check_reservations(sim.world()), Ok(0));
    let board = sim.world().board(HOME).unwrap();
    assert!(board.tickets().all(|t| t.state == TicketState::Open));
    assert!(board.tickets().all(|t| t.notes == "shutdown"));
}
