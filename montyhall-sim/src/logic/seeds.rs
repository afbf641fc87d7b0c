use anyhow::{Context, Result, bail};

/// Seed used for a run and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub from_entropy: bool,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            from_entropy: false,
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            seed: rand::random(),
            from_entropy: true,
        }
    }
}

/// Resolve the seed for a run.
///
/// A command-line token wins over the config file seed; with neither, a fresh
/// seed is drawn from entropy. Tokens may be decimal, `0x` hex, or `random`.
pub fn resolve_seed(token: Option<&str>, configured: Option<u64>) -> Result<SeedInfo> {
    match token {
        Some(token) => parse_seed_token(token),
        None => Ok(configured.map_or_else(SeedInfo::from_entropy, SeedInfo::from_numeric)),
    }
}

fn parse_seed_token(token: &str) -> Result<SeedInfo> {
    let token = token.trim();
    if token.is_empty() {
        bail!("Empty seed token");
    }

    if token.eq_ignore_ascii_case("random") {
        return Ok(SeedInfo::from_entropy());
    }

    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        let seed = u64::from_str_radix(&hex.replace('_', ""), 16)
            .with_context(|| format!("invalid hex seed: {token}"))?;
        return Ok(SeedInfo::from_numeric(seed));
    }

    if let Ok(seed) = token.replace('_', "").parse::<u64>() {
        return Ok(SeedInfo::from_numeric(seed));
    }

    bail!("Unrecognized seed token: {token}");
}
