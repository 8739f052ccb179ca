//! Ticket classification
//!
//! Every ticket carries three enumerated tags:
//! - Kind: what work it is (drives routine selection and affinity)
//! - Resource: which resource it concerns, `None` when not applicable
//! - Scope: who may claim it (household, workplace or anyone)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseNameError;

/// Task category
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TicketKind {
    /// Fetch a resource from a provider and deliver it to the board's inventory
    Fetch = 0x00,
    /// Timed maintenance: fix up the site
    Repair = 0x01,
    /// Timed maintenance: tidy the site
    Clean = 0x02,
    /// Timed maintenance: tend fields, animals, hearth
    Tend = 0x03,
}

impl TicketKind {
    pub const ALL: [TicketKind; 4] = [
        TicketKind::Fetch,
        TicketKind::Repair,
        TicketKind::Clean,
        TicketKind::Tend,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TicketKind::Fetch => "fetch",
            TicketKind::Repair => "repair",
            TicketKind::Clean => "clean",
            TicketKind::Tend => "tend",
        }
    }

    /// Does this kind move resources around?
    pub fn is_fetch(self) -> bool {
        matches!(self, TicketKind::Fetch)
    }
}

impl fmt::Display for TicketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TicketKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ParseNameError::new("ticket kind", s))
    }
}

/// Resource type a ticket concerns
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ResourceKind {
    /// Sentinel for tickets that move no resource
    #[default]
    None = 0x00,
    Wood = 0x01,
    Stone = 0x02,
    Food = 0x03,
    Water = 0x04,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::None,
        ResourceKind::Wood,
        ResourceKind::Stone,
        ResourceKind::Food,
        ResourceKind::Water,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::None => "none",
            ResourceKind::Wood => "wood",
            ResourceKind::Stone => "stone",
            ResourceKind::Food => "food",
            ResourceKind::Water => "water",
        }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == ResourceKind::None
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| ParseNameError::new("resource kind", s))
    }
}

/// Eligibility class of a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TicketScope {
    /// Only members of the owning household (home boards)
    Household = 0x00,
    /// Only employees of the owning workplace (work boards)
    Workplace = 0x01,
    /// Anyone who can reach the board
    #[default]
    Public = 0x02,
}

impl TicketScope {
    pub const ALL: [TicketScope; 3] = [
        TicketScope::Household,
        TicketScope::Workplace,
        TicketScope::Public,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TicketScope::Household => "household",
            TicketScope::Workplace => "workplace",
            TicketScope::Public => "public",
        }
    }
}

impl fmt::Display for TicketScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TicketScope {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketScope::ALL
            .into_iter()
            .find(|sc| sc.name() == s)
            .ok_or_else(|| ParseNameError::new("ticket scope", s))
    }
}
