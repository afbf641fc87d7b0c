//! Door identities and contents.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ContractViolation;

/// Number of doors on stage. Only the classic three-door game is supported.
pub const DOOR_COUNT: usize = 3;

/// A physical door, numbered 1 through 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DoorIndex(u8);

impl DoorIndex {
    pub const ONE: Self = Self(1);
    pub const TWO: Self = Self(2);
    pub const THREE: Self = Self(3);

    /// Every door in stage order.
    pub const ALL: [Self; DOOR_COUNT] = [Self::ONE, Self::TWO, Self::THREE];

    /// Build a door index from its 1-based number.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::DoorOutOfRange`] when `value` is not 1, 2, or 3.
    pub const fn new(value: u8) -> Result<Self, ContractViolation> {
        match value {
            1..=3 => Ok(Self(value)),
            _ => Err(ContractViolation::DoorOutOfRange { value }),
        }
    }

    /// The 1-based door number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    pub(crate) fn slot(self) -> usize {
        usize::from(self.0 - 1)
    }

    pub(crate) const fn from_slot(slot: usize) -> Self {
        Self::ALL[slot % DOOR_COUNT]
    }

    /// The two doors other than `self`, in stage order.
    #[must_use]
    pub const fn others(self) -> [Self; 2] {
        match self.0 {
            1 => [Self::TWO, Self::THREE],
            2 => [Self::ONE, Self::THREE],
            _ => [Self::ONE, Self::TWO],
        }
    }

    /// The single door that is neither `a` nor `b`, or `None` when they coincide.
    #[must_use]
    pub const fn remaining(a: Self, b: Self) -> Option<Self> {
        if a.0 == b.0 {
            return None;
        }
        // Door numbers sum to 6.
        Some(Self(6 - a.0 - b.0))
    }
}

impl TryFrom<u8> for DoorIndex {
    type Error = ContractViolation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DoorIndex> for u8 {
    fn from(door: DoorIndex) -> Self {
        door.0
    }
}

impl fmt::Display for DoorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What sits behind a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorContent {
    Goat,
    Car,
}

impl fmt::Display for DoorContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoorContent::Goat => write!(f, "goat"),
            DoorContent::Car => write!(f, "car"),
        }
    }
}
