//! Monty Hall Simulation Engine
//!
//! Platform-agnostic Monte Carlo simulation of the three-door Monty Hall game.
//! A round deals one car and two goats, takes a blind pick, lets the host open
//! a goat door, and then resolves both the stay and the switch strategy against
//! that same setup. Trial runs repeat rounds and tally a strategy × outcome
//! table with rounded row proportions.
//!
//! All randomness is injected by the caller, either as a generator or as a
//! seed, so every run is reproducible.

pub mod arrangement;
pub mod config;
pub mod door;
pub mod error;
pub mod numbers;
pub mod round;
pub mod strategy;
pub mod streams;
pub mod table;
pub mod trials;

// Re-export commonly used types
pub use arrangement::{Arrangement, new_arrangement};
pub use config::SimulationConfig;
pub use door::{DOOR_COUNT, DoorContent, DoorIndex};
pub use error::{ConfigError, ContractViolation, SimulationError};
pub use round::{
    PlayedRound, RoundRecords, RoundSetup, RoundState, TrialRecord, play_round,
    play_round_detailed,
};
pub use strategy::{
    Outcome, Strategy, determine_outcome, open_goat_door, resolve_pick, select_initial_door,
};
pub use streams::RoundStreams;
pub use table::{
    ContingencyTable, OutcomeCounts, Proportion, ProportionTable, Rounding, RowProportions,
};
pub use trials::{
    AggregateResult, DEFAULT_TRIALS, TrialCount, TrialRunner, run_trials, run_trials_parallel,
    run_trials_seeded,
};
