//! Repeated-trial runner and the aggregate it produces.
//!
//! A run plays `n` rounds, tallies both records of every round into a
//! [`ContingencyTable`], and derives row-normalized proportions once at the
//! end. Three execution modes share the same tallying:
//!
//! - [`TrialRunner::run`] draws every round from one caller-supplied generator.
//! - [`TrialRunner::run_seeded`] gives each round its own stream derived from a
//!   seed (see [`RoundStreams`]).
//! - [`TrialRunner::run_parallel`] uses the same per-round streams across the
//!   rayon pool, so it reproduces `run_seeded` exactly for the same seed.

use log::{debug, trace};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::error::{ContractViolation, SimulationError};
use crate::round::{RoundRecords, TrialRecord, play_round};
use crate::streams::RoundStreams;
use crate::strategy::Strategy;
use crate::table::{ContingencyTable, Proportion, ProportionTable, Rounding};

/// Trial count used when the caller does not pick one.
pub const DEFAULT_TRIALS: i64 = 100;

/// Upper bound on records reserved up front; longer runs grow the list as they go.
const MAX_PREALLOCATED_RECORDS: u64 = 1 << 20;

/// A validated, strictly positive number of rounds.
///
/// Deserializes from any JSON number, so fractions and out-of-range values
/// report [`SimulationError::InvalidArgument`] like the text parser does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Number", into = "u64")]
pub struct TrialCount(NonZeroU64);

impl TrialCount {
    pub const DEFAULT: Self = match NonZeroU64::new(DEFAULT_TRIALS.unsigned_abs()) {
        Some(n) => Self(n),
        None => panic!("default trial count must be positive"),
    };

    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidArgument`] for zero or negative counts.
    pub fn new(n: i64) -> Result<Self, SimulationError> {
        u64::try_from(n)
            .ok()
            .and_then(NonZeroU64::new)
            .map(Self)
            .ok_or_else(|| SimulationError::invalid_argument(n))
    }

    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidArgument`] for zero.
    pub fn from_u64(n: u64) -> Result<Self, SimulationError> {
        NonZeroU64::new(n)
            .map(Self)
            .ok_or_else(|| SimulationError::invalid_argument(n))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// Two records per round, capped at [`MAX_PREALLOCATED_RECORDS`].
    fn record_capacity(self) -> usize {
        let records = self.get().saturating_mul(2).min(MAX_PREALLOCATED_RECORDS);
        usize::try_from(records).unwrap_or(0)
    }
}

impl Default for TrialCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for TrialCount {
    type Error = SimulationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<u64> for TrialCount {
    type Error = SimulationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_u64(value)
    }
}

impl TryFrom<serde_json::Number> for TrialCount {
    type Error = SimulationError;

    fn try_from(value: serde_json::Number) -> Result<Self, Self::Error> {
        if let Some(n) = value.as_i64() {
            return Self::new(n);
        }
        match value.as_u64() {
            Some(n) => Self::from_u64(n),
            None => Err(SimulationError::invalid_argument(value)),
        }
    }
}

impl From<TrialCount> for u64 {
    fn from(count: TrialCount) -> Self {
        count.get()
    }
}

impl FromStr for TrialCount {
    type Err = SimulationError;

    /// Accepts any integer literal; fractions and other text are rejected as
    /// invalid arguments rather than truncated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::new(n);
        }
        trimmed
            .parse::<u64>()
            .map_err(|_| SimulationError::invalid_argument(trimmed))
            .and_then(Self::from_u64)
    }
}

impl fmt::Display for TrialCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a finished run reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub trials: u64,
    /// Seed of a seeded or parallel run; `None` when the caller supplied the generator.
    pub seed: Option<u64>,
    pub table: ContingencyTable,
    pub proportions: ProportionTable,
    /// `2 * trials` records in round order, or empty when records were not kept.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<TrialRecord>,
}

impl AggregateResult {
    #[must_use]
    pub fn win_proportion(&self, strategy: Strategy) -> Option<Proportion> {
        self.proportions.row(strategy).map(|row| row.win)
    }

    /// Unrounded win fraction of `strategy`.
    #[must_use]
    pub fn win_rate(&self, strategy: Strategy) -> Option<f64> {
        self.table.row(strategy).win_rate()
    }

    /// The strategy with strictly more wins, if any.
    #[must_use]
    pub fn better_strategy(&self) -> Option<Strategy> {
        let stay = self.table.stay.win;
        let switch = self.table.switch.win;
        match stay.cmp(&switch) {
            std::cmp::Ordering::Greater => Some(Strategy::Stay),
            std::cmp::Ordering::Less => Some(Strategy::Switch),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Configured trial run.
#[derive(Debug, Clone, Copy)]
pub struct TrialRunner<'a> {
    count: TrialCount,
    rounding: Rounding,
    keep_records: bool,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> TrialRunner<'a> {
    #[must_use]
    pub const fn new(count: TrialCount) -> Self {
        Self {
            count,
            rounding: Rounding::HalfUp,
            keep_records: true,
            cancel: None,
        }
    }

    #[must_use]
    pub const fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Skip collecting per-round records and only keep the table.
    #[must_use]
    pub const fn keep_records(mut self, keep: bool) -> Self {
        self.keep_records = keep;
        self
    }

    /// Stop between rounds once `flag` is raised.
    #[must_use]
    pub const fn with_cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[must_use]
    pub const fn count(&self) -> TrialCount {
        self.count
    }

    #[must_use]
    pub const fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Play every round from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::ContractViolation`] if a round breaks an
    /// invariant, or [`SimulationError::Cancelled`] if the cancel flag is raised.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<AggregateResult, SimulationError> {
        self.run_sequential(None, |_| play_round(&mut *rng))
    }

    /// Play every round on this thread from per-round streams derived from `seed`.
    ///
    /// # Errors
    ///
    /// Same as [`TrialRunner::run`].
    pub fn run_seeded(&self, seed: u64) -> Result<AggregateResult, SimulationError> {
        let streams = RoundStreams::from_user_seed(seed);
        self.run_sequential(Some(seed), |round| play_round(&mut streams.round(round)))
    }

    /// Play rounds across the rayon pool from per-round streams derived from `seed`.
    ///
    /// Records come back in round order, identical to [`TrialRunner::run_seeded`].
    ///
    /// # Errors
    ///
    /// Same as [`TrialRunner::run`]. The `completed` count of a cancelled
    /// parallel run is the number of rounds finished across all workers.
    pub fn run_parallel(&self, seed: u64) -> Result<AggregateResult, SimulationError> {
        let streams = RoundStreams::from_user_seed(seed);
        let requested = self.count.get();
        let completed = AtomicU64::new(0);
        debug!(
            "running {requested} rounds on {} threads (seed {seed}, rounding {})",
            rayon::current_num_threads(),
            self.rounding
        );

        self.check_cancelled(0)?;

        let play = |round: u64| -> Result<RoundRecords, SimulationError> {
            self.check_cancelled(completed.load(Ordering::Relaxed))?;
            let records = play_round(&mut streams.round(round))?;
            completed.fetch_add(1, Ordering::Relaxed);
            Ok(records)
        };

        let (table, records) = if self.keep_records {
            let records: Vec<TrialRecord> = (0..requested)
                .into_par_iter()
                .flat_map_iter(|round| match play(round) {
                    Ok(played) => played.as_array().map(Ok),
                    Err(err) => [Err(err.clone()), Err(err)],
                })
                .collect::<Result<_, _>>()?;
            (ContingencyTable::from_records(&records), records)
        } else {
            let table = (0..requested)
                .into_par_iter()
                .try_fold(ContingencyTable::default, |mut table, round| {
                    table.record_round(play(round)?);
                    Ok::<_, SimulationError>(table)
                })
                .try_reduce(ContingencyTable::default, |left, right| {
                    Ok(left.merged(right))
                })?;
            (table, Vec::new())
        };

        Ok(self.finish(table, records, Some(seed)))
    }

    fn run_sequential<F>(
        &self,
        seed: Option<u64>,
        mut play: F,
    ) -> Result<AggregateResult, SimulationError>
    where
        F: FnMut(u64) -> Result<RoundRecords, ContractViolation>,
    {
        let requested = self.count.get();
        debug!(
            "running {requested} rounds sequentially (seed {seed:?}, rounding {})",
            self.rounding
        );
        self.check_cancelled(0)?;

        let mut table = ContingencyTable::default();
        let mut records = if self.keep_records {
            Vec::with_capacity(self.count.record_capacity())
        } else {
            Vec::new()
        };

        for round in 0..requested {
            self.check_cancelled(round)?;
            let played = play(round)?;
            trace!(
                "round {round}: stay {} / switch {}",
                played.stay.outcome, played.switch.outcome
            );
            table.record_round(played);
            if self.keep_records {
                records.extend(played.as_array());
            }
        }

        Ok(self.finish(table, records, seed))
    }

    fn check_cancelled(&self, completed: u64) -> Result<(), SimulationError> {
        match self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(SimulationError::Cancelled {
                completed,
                requested: self.count.get(),
            }),
            _ => Ok(()),
        }
    }

    fn finish(
        &self,
        table: ContingencyTable,
        records: Vec<TrialRecord>,
        seed: Option<u64>,
    ) -> AggregateResult {
        let proportions = table.proportions(self.rounding);
        debug!(
            "finished {} rounds: stay won {}, switch won {}",
            self.count, table.stay.win, table.switch.win
        );
        AggregateResult {
            trials: self.count.get(),
            seed,
            table,
            proportions,
            records,
        }
    }
}

/// Validate `n` and play that many rounds from `rng`.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidArgument`] before any round is played when
/// `n` is not positive, and propagates any contract violation from a round.
pub fn run_trials<R: Rng + ?Sized>(
    n: i64,
    rng: &mut R,
) -> Result<AggregateResult, SimulationError> {
    TrialRunner::new(TrialCount::new(n)?).run(rng)
}

/// Validate `n` and play that many rounds from streams derived from `seed`.
///
/// # Errors
///
/// Same as [`run_trials`].
pub fn run_trials_seeded(n: i64, seed: u64) -> Result<AggregateResult, SimulationError> {
    TrialRunner::new(TrialCount::new(n)?).run_seeded(seed)
}

/// Parallel counterpart of [`run_trials_seeded`] with identical results.
///
/// # Errors
///
/// Same as [`run_trials`].
pub fn run_trials_parallel(n: i64, seed: u64) -> Result<AggregateResult, SimulationError> {
    TrialRunner::new(TrialCount::new(n)?).run_parallel(seed)
}
