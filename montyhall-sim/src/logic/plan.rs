use anyhow::{Context, Result, bail};
use log::debug;
use montyhall_game::{
    AggregateResult, Rounding, SimulationConfig, SimulationError, TrialCount, TrialRunner,
};
use std::path::Path;

use super::SeedInfo;

/// Fully resolved settings for one command-line run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub count: TrialCount,
    pub seed: SeedInfo,
    pub rounding: Rounding,
    pub parallel: bool,
    pub keep_records: bool,
}

impl RunPlan {
    /// Combine a loaded config with the raw `--trials` text and the resolved seed.
    ///
    /// The trial text goes through [`TrialCount`] parsing, so `2.5` or `-5`
    /// surface as the library's invalid-argument error.
    pub fn from_config(
        config: &SimulationConfig,
        trials: Option<&str>,
        seed: SeedInfo,
    ) -> Result<Self, SimulationError> {
        let count = match trials {
            Some(text) => text.parse()?,
            None => config.validate()?,
        };
        Ok(Self {
            count,
            seed,
            rounding: config.rounding,
            parallel: config.parallel,
            keep_records: config.keep_records,
        })
    }

    #[must_use]
    pub const fn runner(&self) -> TrialRunner<'static> {
        TrialRunner::new(self.count)
            .with_rounding(self.rounding)
            .keep_records(self.keep_records)
    }

    /// Reject report formats that need data this plan will not keep.
    pub fn check_report(&self, report: &str) -> Result<()> {
        if report == "csv" && !self.keep_records {
            bail!("csv report needs per-round records; drop --no-records");
        }
        Ok(())
    }

    pub fn execute(&self) -> Result<AggregateResult, SimulationError> {
        let runner = self.runner();
        if self.parallel {
            runner.run_parallel(self.seed.seed)
        } else {
            runner.run_seeded(self.seed.seed)
        }
    }
}

/// Read a JSON config file, or fall back to defaults when no path is given.
///
/// Field values are not validated here; [`RunPlan::from_config`] validates
/// them once command-line overrides are applied.
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = SimulationConfig::parse_json(&raw)
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!("loaded config from {}: {config:?}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(label: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("montyhall-config-{label}.json"));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn trials_text_overrides_config() {
        let config = SimulationConfig {
            trials: 500.into(),
            ..SimulationConfig::default()
        };
        let plan =
            RunPlan::from_config(&config, Some("25"), SeedInfo::from_numeric(1)).unwrap();
        assert_eq!(plan.count.get(), 25);
        let plan = RunPlan::from_config(&config, None, SeedInfo::from_numeric(1)).unwrap();
        assert_eq!(plan.count.get(), 500);
    }

    #[test]
    fn bad_trials_text_is_invalid_argument() {
        let config = SimulationConfig::default();
        for bad in ["2.5", "abc", "0", "-5"] {
            assert!(matches!(
                RunPlan::from_config(&config, Some(bad), SeedInfo::from_numeric(1)),
                Err(SimulationError::InvalidArgument { .. })
            ));
        }
    }

    #[test]
    fn parallel_plan_matches_sequential_plan() {
        let config = SimulationConfig {
            trials: 300.into(),
            ..SimulationConfig::default()
        };
        let sequential = RunPlan::from_config(&config, None, SeedInfo::from_numeric(11)).unwrap();
        let parallel = RunPlan {
            parallel: true,
            ..sequential
        };
        assert_eq!(sequential.execute().unwrap(), parallel.execute().unwrap());
    }

    #[test]
    fn loads_config_from_file() {
        let path = temp_config("load", r#"{"trials": 40, "rounding": "half_even"}"#);
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.validate().unwrap().get(), 40);
        assert_eq!(config.rounding, Rounding::HalfEven);
    }

    #[test]
    fn missing_or_invalid_config_reports_path() {
        let missing = std::env::temp_dir().join("montyhall-config-does-not-exist.json");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));

        let path = temp_config("invalid", r#"{"trials": "many"}"#);
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config"));
    }

    #[test]
    fn trials_flag_overrides_invalid_config_count() {
        let path = temp_config("zero-trials", r#"{"trials": 0}"#);
        let config = load_config(Some(&path)).unwrap();
        let plan = RunPlan::from_config(&config, Some("10"), SeedInfo::from_numeric(1)).unwrap();
        assert_eq!(plan.count.get(), 10);
        assert!(matches!(
            RunPlan::from_config(&config, None, SeedInfo::from_numeric(1)),
            Err(SimulationError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn csv_report_requires_kept_records() {
        let config = SimulationConfig {
            keep_records: false,
            ..SimulationConfig::default()
        };
        let plan = RunPlan::from_config(&config, None, SeedInfo::from_numeric(1)).unwrap();
        assert!(plan.check_report("csv").is_err());
        assert!(plan.check_report("json").is_ok());
        let plan = RunPlan {
            keep_records: true,
            ..plan
        };
        assert!(plan.check_report("csv").is_ok());
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(load_config(None).unwrap(), SimulationConfig::default());
    }
}
