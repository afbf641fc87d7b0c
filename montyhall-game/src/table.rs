//! Strategy × outcome contingency table and its row-normalized proportions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

use crate::numbers::{hundredths_half_even, hundredths_half_up, ratio};
use crate::round::{RoundRecords, TrialRecord};
use crate::strategy::{Outcome, Strategy};

/// Tie-breaking rule used when proportions are rounded to two decimals.
///
/// Rounding is performed on the exact integer counts, so a proportion that is
/// exactly halfway (for example 1/200 = 0.005) is always treated as a tie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Ties round toward the larger hundredth.
    #[default]
    HalfUp,
    /// Ties round toward the even hundredth.
    HalfEven,
}

impl Rounding {
    #[must_use]
    pub fn round(self, numerator: u64, denominator: u64) -> Option<Proportion> {
        let hundredths = match self {
            Rounding::HalfUp => hundredths_half_up(numerator, denominator),
            Rounding::HalfEven => hundredths_half_even(numerator, denominator),
        }?;
        Some(Proportion { hundredths })
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rounding::HalfUp => write!(f, "half_up"),
            Rounding::HalfEven => write!(f, "half_even"),
        }
    }
}

/// A proportion already rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "f64")]
pub struct Proportion {
    hundredths: u32,
}

impl Proportion {
    #[must_use]
    pub const fn hundredths(self) -> u32 {
        self.hundredths
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.hundredths) / 100.0
    }
}

impl From<Proportion> for f64 {
    fn from(value: Proportion) -> Self {
        value.as_f64()
    }
}

impl fmt::Display for Proportion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.hundredths / 100, self.hundredths % 100)
    }
}

/// Win and lose counts for one strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub win: u64,
    pub lose: u64,
}

impl OutcomeCounts {
    #[must_use]
    pub const fn total(self) -> u64 {
        self.win + self.lose
    }

    #[must_use]
    pub const fn get(self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Win => self.win,
            Outcome::Lose => self.lose,
        }
    }

    /// Unrounded win fraction, `None` when the row is empty.
    #[must_use]
    pub fn win_rate(self) -> Option<f64> {
        ratio(self.win, self.total())
    }

    fn bump(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.win += 1,
            Outcome::Lose => self.lose += 1,
        }
    }
}

impl AddAssign for OutcomeCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.win += rhs.win;
        self.lose += rhs.lose;
    }
}

/// Counts of every (strategy, outcome) pair seen in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContingencyTable {
    pub stay: OutcomeCounts,
    pub switch: OutcomeCounts,
}

impl ContingencyTable {
    #[must_use]
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TrialRecord>,
    {
        let mut table = Self::default();
        for record in records {
            table.record(*record);
        }
        table
    }

    pub fn record(&mut self, record: TrialRecord) {
        self.row_mut(record.strategy).bump(record.outcome);
    }

    pub fn record_round(&mut self, round: RoundRecords) {
        self.record(round.stay);
        self.record(round.switch);
    }

    #[must_use]
    pub const fn row(&self, strategy: Strategy) -> OutcomeCounts {
        match strategy {
            Strategy::Stay => self.stay,
            Strategy::Switch => self.switch,
        }
    }

    #[must_use]
    pub const fn count(&self, strategy: Strategy, outcome: Outcome) -> u64 {
        self.row(strategy).get(outcome)
    }

    /// Total number of records tallied.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.stay.total() + self.switch.total()
    }

    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        self += other;
        self
    }

    /// Row-normalized proportions under `rounding`.
    #[must_use]
    pub fn proportions(&self, rounding: Rounding) -> ProportionTable {
        ProportionTable {
            rounding,
            stay: RowProportions::from_counts(self.stay, rounding),
            switch: RowProportions::from_counts(self.switch, rounding),
        }
    }

    fn row_mut(&mut self, strategy: Strategy) -> &mut OutcomeCounts {
        match strategy {
            Strategy::Stay => &mut self.stay,
            Strategy::Switch => &mut self.switch,
        }
    }
}

impl AddAssign for ContingencyTable {
    fn add_assign(&mut self, rhs: Self) {
        self.stay += rhs.stay;
        self.switch += rhs.switch;
    }
}

/// Win and lose fractions of one strategy row.
///
/// Each cell is rounded on its own, so under [`Rounding::HalfUp`] a row whose
/// cells both sit on a tie can sum to 1.01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RowProportions {
    pub win: Proportion,
    pub lose: Proportion,
}

impl RowProportions {
    fn from_counts(counts: OutcomeCounts, rounding: Rounding) -> Option<Self> {
        let total = counts.total();
        Some(Self {
            win: rounding.round(counts.win, total)?,
            lose: rounding.round(counts.lose, total)?,
        })
    }

    #[must_use]
    pub const fn get(self, outcome: Outcome) -> Proportion {
        match outcome {
            Outcome::Win => self.win,
            Outcome::Lose => self.lose,
        }
    }
}

/// Rows are `None` when no record of that strategy was tallied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ProportionTable {
    pub rounding: Rounding,
    pub stay: Option<RowProportions>,
    pub switch: Option<RowProportions>,
}

impl ProportionTable {
    #[must_use]
    pub const fn row(&self, strategy: Strategy) -> Option<RowProportions> {
        match strategy {
            Strategy::Stay => self.stay,
            Strategy::Switch => self.switch,
        }
    }
}
