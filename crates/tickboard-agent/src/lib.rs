//! tickboard Agent - the consumer side of the marketplace
//!
//! Each agent runs two state machines once per tick:
//! - Seeker: decides which board to walk to, reads boards in range and
//!   reserves the best eligible ticket
//! - Executor: drives a reserved ticket through the routine bound to its
//!   kind, tracks stalls and abandons on timeout or failure
//!
//! Movement and resource providers are external collaborators, reached
//! only through the traits in `collab`.

pub mod agent;
pub mod collab;
pub mod execution;
pub mod routine;
pub mod seeker;

#[cfg(test)]
mod testkit;

pub use agent::*;
pub use collab::*;
pub use execution::*;
pub use routine::*;
pub use seeker::*;
