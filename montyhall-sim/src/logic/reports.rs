use anyhow::{Result, bail};
use colored::Colorize;
use montyhall_game::{AggregateResult, Outcome, Strategy};
use std::io::Write;
use std::time::Duration;

use super::SeedInfo;

fn seed_label(seed: SeedInfo) -> String {
    if seed.from_entropy {
        format!("{} (random)", seed.seed)
    } else {
        seed.seed.to_string()
    }
}

fn cell(result: &AggregateResult, strategy: Strategy, outcome: Outcome) -> String {
    result
        .proportions
        .row(strategy)
        .map_or_else(|| "-".to_string(), |row| row.get(outcome).to_string())
}

pub fn generate_console_report(
    writer: &mut impl Write,
    result: &AggregateResult,
    seed: SeedInfo,
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Monty Hall Results".bright_cyan().bold())?;
    writeln!(writer, "{}", "=====================".cyan())?;
    writeln!(writer, "Trials: {}", result.trials)?;
    writeln!(writer, "Seed: {}", seed_label(seed))?;
    writeln!(writer, "Rounding: {}", result.proportions.rounding)?;
    writeln!(writer)?;

    writeln!(
        writer,
        "{:<10}{:>8}{:>8}",
        "",
        Outcome::Win.label().bold(),
        Outcome::Lose.label().bold()
    )?;
    for strategy in Strategy::ALL {
        writeln!(
            writer,
            "{:<10}{:>8}{:>8}",
            strategy.label().bold(),
            cell(result, strategy, Outcome::Win).green(),
            cell(result, strategy, Outcome::Lose).red()
        )?;
    }
    writeln!(writer)?;

    writeln!(writer, "{}", "🎯 Counts".bright_yellow().bold())?;
    writeln!(writer, "{}", "=========".yellow())?;
    for strategy in Strategy::ALL {
        let row = result.table.row(strategy);
        writeln!(
            writer,
            "{:<10}{} wins / {} losses",
            strategy.label(),
            row.win.to_string().green(),
            row.lose.to_string().red()
        )?;
    }

    match result.better_strategy() {
        Some(strategy) => writeln!(writer, "Better strategy: {}", strategy.label().bold())?,
        None => writeln!(writer, "Better strategy: tie")?,
    }
    writeln!(writer, "Total time: {total_duration:?}")?;
    Ok(())
}

pub fn generate_json_report(writer: &mut impl Write, result: &AggregateResult) -> Result<()> {
    let json_output = serde_json::to_string_pretty(result)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(
    writer: &mut impl Write,
    result: &AggregateResult,
    seed: SeedInfo,
) -> Result<()> {
    writeln!(writer, "# Monty Hall Simulation Results\n")?;
    writeln!(writer, "- **Trials**: {}", result.trials)?;
    writeln!(writer, "- **Seed**: {}", seed_label(seed))?;
    writeln!(writer, "- **Rounding**: {}\n", result.proportions.rounding)?;

    writeln!(writer, "| Strategy | WIN | LOSE | Wins | Losses |")?;
    writeln!(writer, "|----------|-----|------|------|--------|")?;
    for strategy in Strategy::ALL {
        let row = result.table.row(strategy);
        writeln!(
            writer,
            "| {} | {} | {} | {} | {} |",
            strategy.label(),
            cell(result, strategy, Outcome::Win),
            cell(result, strategy, Outcome::Lose),
            row.win,
            row.lose
        )?;
    }
    Ok(())
}

/// One row per record, numbered by round starting at 1.
pub fn generate_csv_report(writer: &mut impl Write, result: &AggregateResult) -> Result<()> {
    if result.records.is_empty() {
        bail!("csv report needs per-round records; drop --no-records");
    }
    writeln!(writer, "round,strategy,outcome")?;
    for (index, record) in result.records.iter().enumerate() {
        writeln!(
            writer,
            "{},{},{}",
            index / 2 + 1,
            record.strategy,
            record.outcome
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use montyhall_game::{TrialCount, TrialRunner, run_trials_seeded};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn console_report_lists_both_rows_and_seed() {
        colored::control::set_override(false);
        let result = run_trials_seeded(200, 4).unwrap();
        let text = render(|w| {
            generate_console_report(w, &result, SeedInfo::from_numeric(4), Duration::ZERO)
        });
        assert!(text.contains("Monty Hall Results"));
        assert!(text.contains("STAY"));
        assert!(text.contains("SWITCH"));
        assert!(text.contains("Seed: 4"));
        assert!(text.contains("Rounding: half_up"));
    }

    #[test]
    fn entropy_seed_is_marked_random() {
        let seed = SeedInfo {
            seed: 99,
            from_entropy: true,
        };
        assert_eq!(seed_label(seed), "99 (random)");
    }

    #[test]
    fn markdown_report_has_table_rows() {
        let result = run_trials_seeded(50, 2).unwrap();
        let text = render(|w| generate_markdown_report(w, &result, SeedInfo::from_numeric(2)));
        assert!(text.starts_with("# Monty Hall Simulation Results"));
        assert!(text.contains("| STAY |"));
        assert!(text.contains("| SWITCH |"));
    }

    #[test]
    fn json_report_round_trips_counts() {
        let result = run_trials_seeded(10, 3).unwrap();
        let text = render(|w| generate_json_report(w, &result));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["trials"], 10);
        assert_eq!(value["seed"], 3);
        assert_eq!(value["records"].as_array().unwrap().len(), 20);
    }

    #[test]
    fn csv_report_numbers_rounds() {
        let result = run_trials_seeded(3, 5).unwrap();
        let text = render(|w| generate_csv_report(w, &result));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "round,strategy,outcome");
        assert!(lines[1].starts_with("1,stay,"));
        assert!(lines[2].starts_with("1,switch,"));
        assert!(lines[6].starts_with("3,switch,"));
    }

    #[test]
    fn csv_report_requires_records() {
        let result = TrialRunner::new(TrialCount::new(3).unwrap())
            .keep_records(false)
            .run_seeded(5)
            .unwrap();
        let mut buffer = Vec::new();
        assert!(generate_csv_report(&mut buffer, &result).is_err());
        assert!(buffer.is_empty());
    }
}
