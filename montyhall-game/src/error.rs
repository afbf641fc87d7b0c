//! Error types shared across the simulation.

use thiserror::Error;

use crate::door::DoorIndex;

/// Broken internal invariants. These indicate a programming error rather than
/// bad user input, and always halt the run that observed them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("arrangement must hold exactly one car (found {cars})")]
    CarCount { cars: usize },
    #[error("door index {value} is outside 1..=3")]
    DoorOutOfRange { value: u8 },
    #[error("the host opened the contestant's own door {door}")]
    OpenedPickedDoor { door: DoorIndex },
    #[error("the host revealed the car behind door {door}")]
    RevealedCar { door: DoorIndex },
}

/// Errors surfaced by trial runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("trial count must be a positive integer (got {input:?})")]
    InvalidArgument { input: String },
    #[error("contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),
    #[error("trial run cancelled after {completed} of {requested} rounds")]
    Cancelled { completed: u64, requested: u64 },
}

impl SimulationError {
    pub(crate) fn invalid_argument(input: impl ToString) -> Self {
        Self::InvalidArgument {
            input: input.to_string(),
        }
    }
}

/// Errors raised while loading a [`SimulationConfig`](crate::SimulationConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] SimulationError),
}
