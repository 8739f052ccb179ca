//! Minimal collaborators for unit tests

use tickboard_board::{Board, BoardKind, BoardSet, Inventory};
use tickboard_core::{
    AgentId, BoardId, GroupId, Position, Reservation, ResourceKind, Tick, Ticket, TicketId,
    TicketKind, TicketScope, TicketState,
};

use crate::{Job, Movement, ProviderDirectory, ProviderId, ResourceProvider, RoutineContext};

pub const AGENT: AgentId = AgentId(1);
pub const BOARD: BoardId = BoardId(1);

/// Arrives at the next check after a target is set
#[derive(Debug, Default)]
pub struct Teleport {
    pub position: Position,
    pub target: Option<Position>,
    pub arrival_pending: bool,
    pub targets_set: usize,
}

impl Movement for Teleport {
    fn set_target(&mut self, target: Position) {
        self.position = target;
        self.target = Some(target);
        self.arrival_pending = true;
        self.targets_set += 1;
    }

    fn clear_target(&mut self) {
        self.target = None;
        self.arrival_pending = false;
    }

    fn is_at_target(&self) -> bool {
        self.target == Some(self.position)
    }

    fn consume_arrival(&mut self) -> bool {
        std::mem::take(&mut self.arrival_pending)
    }

    fn position(&self) -> Position {
        self.position
    }
}

pub struct Pile {
    pub position: Position,
    pub resource: ResourceKind,
    pub amount: u32,
}

impl ResourceProvider for Pile {
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

#[derive(Default)]
pub struct Stockpiles {
    piles: Vec<Pile>,
}

impl Stockpiles {
    pub fn add(&mut self, position: Position, resource: ResourceKind, amount: u32) -> ProviderId {
        self.piles.push(Pile {
            position,
            resource,
            amount,
        });
        ProviderId(self.piles.len() as u64 - 1)
    }

    pub fn drain(&mut self, id: ProviderId) {
        if let Some(pile) = self.piles.get_mut(id.0 as usize) {
            pile.amount = 0;
        }
    }
}

impl ProviderDirectory for Stockpiles {
    fn find_best_provider(
        &self,
        resource: ResourceKind,
        _amount: u32,
        from: Position,
    ) -> Option<ProviderId> {
        self.piles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.resource == resource && p.amount > 0)
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance_to(from)
                    .total_cmp(&b.position.distance_to(from))
            })
            .map(|(i, _)| ProviderId(i as u64))
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

pub fn home_board(id: u64, household: u64, position: Position) -> Board {
    Board::new(
        BoardId(id),
        BoardKind::Home {
            household: GroupId(household),
        },
        position,
        200,
    )
}

pub fn work_board(id: u64, workplace: u64, position: Position) -> Board {
    Board::new(
        BoardId(id),
        BoardKind::Work {
            workplace: GroupId(workplace),
        },
        position,
        200,
    )
}

pub fn public_ticket(kind: TicketKind, base: u32) -> Ticket {
    Ticket::new(kind, ResourceKind::None, TicketScope::Public, 1, Tick::ZERO).with_priority(base, 0)
}

/// One board at (10, 0) with an inventory and one ticket reserved by `AGENT`
pub struct Site {
    pub boards: BoardSet,
    pub movement: Teleport,
    pub ticket: TicketId,
    pub position: Position,
}

impl Site {
    pub fn fetch(resource: ResourceKind, quantity: u32) -> Self {
        let position = Position::new(10.0, 0.0);
        let mut board = home_board(BOARD.0, 1, position);
        let ticket = board
            .add_ticket(Ticket::new(
                TicketKind::Fetch,
                resource,
                TicketScope::Household,
                quantity,
                Tick::ZERO,
            ))
            .unwrap();
        board.reserve(ticket, AGENT, Tick::ZERO).unwrap();

        let mut boards = BoardSet::new();
        boards.insert_with_inventory(board, Inventory::new());
        Site {
            boards,
            movement: Teleport::default(),
            ticket,
            position,
        }
    }

    pub fn context<'a>(
        &'a mut self,
        now: Tick,
        job: Job,
        providers: &'a mut Stockpiles,
    ) -> RoutineContext<'a> {
        RoutineContext::new(
            now,
            AGENT,
            Reservation {
                ticket: self.ticket,
                board: BOARD,
            },
            job,
            self.position,
            &mut self.movement,
            &mut self.boards,
            providers,
        )
    }

    pub fn stock(&self, resource: ResourceKind) -> u32 {
        self.boards
            .inventory(BOARD)
            .map(|inv| inv.quantity(resource))
            .unwrap_or(0)
    }

    pub fn ticket_state(&self) -> TicketState {
        self.boards
            .get(BOARD)
            .and_then(|b| b.find(self.ticket))
            .map(|t| t.state)
            .unwrap_or(TicketState::Failed)
    }
}
