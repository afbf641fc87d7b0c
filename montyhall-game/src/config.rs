//! Run configuration loadable from JSON.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::{ConfigError, SimulationError};
use crate::table::Rounding;
use crate::trials::{AggregateResult, DEFAULT_TRIALS, TrialCount, TrialRunner};

/// Settings for one trial run.
///
/// Every field has a default, so `{}` is a valid configuration. The trial
/// count is kept as the raw JSON number and validated by [`Self::validate`],
/// so a negative or fractional count in a file reports the same error as one
/// on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "SimulationConfig::default_trials")]
    pub trials: Number,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub rounding: Rounding,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default = "SimulationConfig::default_keep_records")]
    pub keep_records: bool,
}

impl SimulationConfig {
    fn default_trials() -> Number {
        Number::from(DEFAULT_TRIALS)
    }

    const fn default_keep_records() -> bool {
        true
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when the trial count is not positive.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config = Self::parse_json(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration without validating field values, for callers
    /// that apply overrides before validating.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or mistyped fields.
    pub fn parse_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidArgument`] when `trials` is not a
    /// positive integer.
    pub fn validate(&self) -> Result<TrialCount, SimulationError> {
        TrialCount::try_from(self.trials.clone())
    }

    /// Build a runner carrying these settings.
    ///
    /// # Errors
    ///
    /// Same as [`Self::validate`].
    pub fn runner(&self) -> Result<TrialRunner<'static>, SimulationError> {
        Ok(TrialRunner::new(self.validate()?)
            .with_rounding(self.rounding)
            .keep_records(self.keep_records))
    }

    /// Run with `seed`, on the rayon pool when `parallel` is set.
    ///
    /// # Errors
    ///
    /// Propagates validation and simulation errors.
    pub fn run_with_seed(&self, seed: u64) -> Result<AggregateResult, SimulationError> {
        let runner = self.runner()?;
        if self.parallel {
            runner.run_parallel(seed)
        } else {
            runner.run_seeded(seed)
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: Self::default_trials(),
            seed: None,
            rounding: Rounding::default(),
            parallel: false,
            keep_records: Self::default_keep_records(),
        }
    }
}
