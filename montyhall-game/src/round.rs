//! A single round played through both strategies.
//!
//! The deal, the initial pick, and the host's reveal happen once per round in
//! [`RoundSetup`]. Both strategy branches resolve against that same setup, so
//! every round is a paired comparison of stay and switch.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::arrangement::{Arrangement, new_arrangement};
use crate::door::{DoorContent, DoorIndex};
use crate::error::ContractViolation;
use crate::strategy::{
    Outcome, Strategy, determine_outcome, open_goat_door, resolve_pick, select_initial_door,
};

/// A dealt round up to and including the host's reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RoundSetup {
    arrangement: Arrangement,
    initial_pick: DoorIndex,
    opened_door: DoorIndex,
}

impl RoundSetup {
    /// Build a setup from explicit values, checking the reveal invariants.
    ///
    /// # Errors
    ///
    /// Fails when the opened door is the contestant's pick or hides the car.
    pub fn new(
        arrangement: Arrangement,
        initial_pick: DoorIndex,
        opened_door: DoorIndex,
    ) -> Result<Self, ContractViolation> {
        if opened_door == initial_pick {
            return Err(ContractViolation::OpenedPickedDoor { door: opened_door });
        }
        if arrangement.content(opened_door) == DoorContent::Car {
            return Err(ContractViolation::RevealedCar { door: opened_door });
        }
        Ok(Self {
            arrangement,
            initial_pick,
            opened_door,
        })
    }

    /// Deal an arrangement, make the blind pick, and let the host reveal a goat.
    pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let arrangement = new_arrangement(rng);
        let initial_pick = select_initial_door(rng);
        let opened_door = open_goat_door(arrangement, initial_pick, rng);
        Self {
            arrangement,
            initial_pick,
            opened_door,
        }
    }

    #[must_use]
    pub const fn arrangement(&self) -> Arrangement {
        self.arrangement
    }

    #[must_use]
    pub const fn initial_pick(&self) -> DoorIndex {
        self.initial_pick
    }

    #[must_use]
    pub const fn opened_door(&self) -> DoorIndex {
        self.opened_door
    }

    /// Finish the round under one strategy.
    ///
    /// # Errors
    ///
    /// Propagates a [`ContractViolation`] from pick resolution.
    pub fn resolve(&self, strategy: Strategy) -> Result<RoundState, ContractViolation> {
        let final_pick = resolve_pick(strategy, self.initial_pick, self.opened_door)?;
        Ok(RoundState {
            arrangement: self.arrangement,
            initial_pick: self.initial_pick,
            opened_door: self.opened_door,
            strategy,
            final_pick,
            outcome: determine_outcome(self.arrangement, final_pick),
        })
    }

    /// Finish the round under both strategies.
    ///
    /// # Errors
    ///
    /// Propagates a [`ContractViolation`] from either branch.
    pub fn play(&self) -> Result<PlayedRound, ContractViolation> {
        Ok(PlayedRound {
            stay: self.resolve(Strategy::Stay)?,
            switch: self.resolve(Strategy::Switch)?,
        })
    }
}

/// A fully resolved strategy branch of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundState {
    pub arrangement: Arrangement,
    pub initial_pick: DoorIndex,
    pub opened_door: DoorIndex,
    pub strategy: Strategy,
    pub final_pick: DoorIndex,
    pub outcome: Outcome,
}

impl RoundState {
    #[must_use]
    pub const fn record(&self) -> TrialRecord {
        TrialRecord {
            strategy: self.strategy,
            outcome: self.outcome,
        }
    }
}

/// The part of a round kept for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrialRecord {
    pub strategy: Strategy,
    pub outcome: Outcome,
}

/// Both branches of one round with their full state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedRound {
    pub stay: RoundState,
    pub switch: RoundState,
}

impl PlayedRound {
    #[must_use]
    pub const fn records(&self) -> RoundRecords {
        RoundRecords {
            stay: self.stay.record(),
            switch: self.switch.record(),
        }
    }
}

/// The two records emitted by one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecords {
    pub stay: TrialRecord,
    pub switch: TrialRecord,
}

impl RoundRecords {
    #[must_use]
    pub const fn as_array(self) -> [TrialRecord; 2] {
        [self.stay, self.switch]
    }
}

/// Play one round and keep only its two records.
///
/// # Errors
///
/// Returns a [`ContractViolation`] if an internal invariant breaks.
pub fn play_round<R: Rng + ?Sized>(rng: &mut R) -> Result<RoundRecords, ContractViolation> {
    play_round_detailed(rng).map(|round| round.records())
}

/// Play one round and keep the full state of both branches.
///
/// # Errors
///
/// Returns a [`ContractViolation`] if an internal invariant breaks.
pub fn play_round_detailed<R: Rng + ?Sized>(rng: &mut R) -> Result<PlayedRound, ContractViolation> {
    RoundSetup::deal(rng).play()
}
