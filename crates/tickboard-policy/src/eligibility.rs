//! Eligibility - ownership gates on claiming, reading and visiting boards
//!
//! All predicates are pure: no side effects, no knowledge of the clock.
//!
//! - Claim: may this agent reserve this ticket on this board?
//! - Read: may this agent look at this board's tickets at all?
//! - Visit: is this board worth walking to for this agent?
//!
//! Reading is looser than claiming: any work board in range can be read,
//! but only the agent's own workplace tickets can be claimed from it.

use tickboard_board::{Board, BoardKind};
use tickboard_core::{AgentIdentity, Ticket, TicketScope};

/// Scope gate for reserving `ticket` on `board`
pub fn can_claim(ticket: &Ticket, board: &Board, agent: &AgentIdentity) -> bool {
    match ticket.scope {
        TicketScope::Household => match board.kind() {
            BoardKind::Home { household } => household == agent.household,
            BoardKind::Work { .. } => false,
        },
        TicketScope::Workplace => match board.kind() {
            BoardKind::Work { workplace } => agent.is_employed() && workplace == agent.workplace,
            BoardKind::Home { .. } => false,
        },
        TicketScope::Public => true,
    }
}

/// Read gate: own household's home boards, or any work board
pub fn can_read(board: &Board, agent: &AgentIdentity) -> bool {
    match board.kind() {
        BoardKind::Home { household } => household == agent.household,
        BoardKind::Work { .. } => true,
    }
}

/// Structural visit gate: own household's home boards, own workplace if employed
pub fn can_visit(board: &Board, agent: &AgentIdentity) -> bool {
    match board.kind() {
        BoardKind::Home { household } => household == agent.household,
        BoardKind::Work { workplace } => agent.is_employed() && workplace == agent.workplace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tickboard_core::{
        AgentId, BoardId, GroupId, Position, ResourceKind, Tick, TicketKind,
    };

    fn home(household: u64) -> Board {
        Board::new(
            BoardId::new(1),
            BoardKind::Home {
                household: GroupId::new(household),
            },
            Position::ORIGIN,
            200,
        )
    }

    fn work(workplace: u64) -> Board {
        Board::new(
            BoardId::new(2),
            BoardKind::Work {
                workplace: GroupId::new(workplace),
            },
            Position::ORIGIN,
            200,
        )
    }

    fn ticket(scope: TicketScope) -> Ticket {
        Ticket::new(TicketKind::Repair, ResourceKind::None, scope, 1, Tick::ZERO)
    }

    fn villager(household: u64, workplace: u64) -> AgentIdentity {
        AgentIdentity::new(AgentId::new(1), GroupId::new(household))
            .employed_at(GroupId::new(workplace))
    }

    #[test]
    fn test_household_scope() {
        let t = ticket(TicketScope::Household);
        assert!(can_claim(&t, &home(5), &villager(5, 0)));
        assert!(!can_claim(&t, &home(6), &villager(5, 0)));
        // never satisfied by a work board, even with matching numbers
        assert!(!can_claim(&t, &work(5), &villager(5, 5)));
    }

    #[test]
    fn test_workplace_scope() {
        let t = ticket(TicketScope::Workplace);
        assert!(can_claim(&t, &work(3), &villager(1, 3)));
        assert!(!can_claim(&t, &work(4), &villager(1, 3)));
        assert!(!can_claim(&t, &home(3), &villager(3, 3)));
    }

    #[test]
    fn test_public_scope_always_claimable() {
        let t = ticket(TicketScope::Public);
        assert!(can_claim(&t, &home(9), &villager(1, 0)));
        assert!(can_claim(&t, &work(9), &villager(1, 0)));
    }

    #[test]
    fn test_read_leaks_work_boards() {
        let unemployed = villager(1, 0);
        assert!(can_read(&work(7), &unemployed));
        assert!(can_read(&home(1), &unemployed));
        assert!(!can_read(&home(2), &unemployed));
    }

    #[test]
    fn test_visit_is_structural() {
        assert!(can_visit(&home(1), &villager(1, 0)));
        assert!(!can_visit(&home(2), &villager(1, 0)));
        assert!(!can_visit(&work(7), &villager(1, 0)));
        assert!(can_visit(&work(7), &villager(1, 7)));
        assert!(!can_visit(&work(8), &villager(1, 7)));
    }

    proptest! {
        #[test]
        fn prop_unemployed_never_claims_workplace(
            board_group in 0u64..1_000,
            household in 0u64..1_000,
            on_home in any::<bool>(),
        ) {
            let board = if on_home { home(board_group) } else { work(board_group) };
            let agent = villager(household, 0);
            prop_assert!(!can_claim(&ticket(TicketScope::Workplace), &board, &agent));
        }
    }
}
