//! Duration parsing for command-line age filters
//!
//! Accepts the compact `<number><unit>` notation used by the purge commands,
//! e.g. `72h`, `1h30m`, `7d`. Units: `s`, `m`, `h`, `d`.

use anyhow::{anyhow, bail, Result};
use std::time::Duration;

/// Parse a duration such as `72h` or `1d12h`
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();
    if input.is_empty() {
        bail!("Duration cannot be empty");
    }
    if input == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total: u64 = 0;
    let mut digits = String::new();

    for c in input.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        if digits.is_empty() {
            bail!("Invalid duration '{input}': expected a number before '{c}'");
        }
        let value: u64 = digits
            .parse()
            .map_err(|e| anyhow!("Invalid duration '{input}': {e}"))?;
        digits.clear();

        let unit_secs = match c {
            's' => 1,
            'm' => 60,
            'h' => 60 * 60,
            'd' => 24 * 60 * 60,
            other => bail!("Invalid duration '{input}': unknown unit '{other}'"),
        };

        total = value
            .checked_mul(unit_secs)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| anyhow!("Duration '{input}' is too large"))?;
    }

    if !digits.is_empty() {
        bail!("Invalid duration '{input}': missing unit after '{digits}'");
    }

    Ok(Duration::from_secs(total))
}
