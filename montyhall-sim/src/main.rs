mod logic;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::{debug, info};
use montyhall_game::{AggregateResult, Rounding, SimulationConfig};
use std::fs::File;
use std::io::{BufWriter, Stdout, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use logic::plan::load_config;
use logic::{RunPlan, SeedInfo, resolve_seed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoundingMode {
    /// Ties round away from zero (0.125 -> 0.13)
    #[value(alias = "half_up")]
    HalfUp,
    /// Ties round to the even hundredth (0.125 -> 0.12)
    #[value(alias = "half_even")]
    HalfEven,
}

impl From<RoundingMode> for Rounding {
    fn from(mode: RoundingMode) -> Self {
        match mode {
            RoundingMode::HalfUp => Self::HalfUp,
            RoundingMode::HalfEven => Self::HalfEven,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "montyhall-sim", version)]
#[command(about = "Monte Carlo comparison of staying and switching in the Monty Hall game")]
struct Args {
    /// Number of rounds to play (positive integer, default 100)
    #[arg(long, allow_hyphen_values = true)]
    trials: Option<String>,

    /// Seed: decimal, 0x-prefixed hex, or "random"
    #[arg(long)]
    seed: Option<String>,

    /// Rounding rule for the proportion table
    #[arg(long, value_enum)]
    rounding: Option<RoundingMode>,

    /// Spread rounds across all cores (same results as a sequential run)
    #[arg(long)]
    parallel: bool,

    /// JSON config file; flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Only keep the table, not the per-round records
    #[arg(long)]
    no_records: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    announce_banner(&args);

    let start_time = Instant::now();
    let config = load_config(args.config.as_deref())?;
    let config = apply_overrides(config, &args);
    let seed = resolve_seed(args.seed.as_deref(), config.seed)?;
    let plan = RunPlan::from_config(&config, args.trials.as_deref(), seed)?;
    plan.check_report(&args.report)?;

    if args.verbose {
        eprintln!(
            "🎲 Playing {} rounds ({}, seed {}, rounding {})",
            plan.count,
            if plan.parallel { "parallel" } else { "sequential" },
            plan.seed.seed,
            plan.rounding
        );
    }
    info!("run plan: {plan:?}");

    let result = plan.execute()?;

    if args.verbose {
        eprintln!("✅ Finished in {:?}", start_time.elapsed());
    }

    write_reports(&args, &result, plan.seed, start_time)
}

fn announce_banner(args: &Args) {
    if args.report == "console" && args.output.is_none() {
        println!("{}", "🐐 Monty Hall Simulator".bright_cyan().bold());
        println!("{}", "=======================".cyan());
    }
}

fn apply_overrides(mut config: SimulationConfig, args: &Args) -> SimulationConfig {
    if let Some(mode) = args.rounding {
        config.rounding = mode.into();
    }
    if args.parallel {
        config.parallel = true;
    }
    if args.no_records {
        config.keep_records = false;
    }
    config
}

fn write_reports(
    args: &Args,
    result: &AggregateResult,
    seed: SeedInfo,
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::open(args.output.as_deref())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, result)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, result, seed)?,
        "csv" => logic::reports::generate_csv_report(&mut output_target, result)?,
        _ => logic::reports::generate_console_report(
            &mut output_target,
            result,
            seed,
            start_time.elapsed(),
        )?,
    }

    output_target.finish()
}

/// Report sink: buffered stdout, or a file created at `--output`.
enum OutputTarget {
    Stdout(BufWriter<Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn open(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(BufWriter::new(stdout())));
        };
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        debug!("writing report to {}", path.display());
        Ok(Self::File(BufWriter::new(file)))
    }

    fn inner(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn finish(mut self) -> Result<()> {
        self.flush().context("failed to flush report")
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner().flush()
    }
}
