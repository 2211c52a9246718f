use anyhow::{Context, Result, bail};
use chrono::Utc;
use civdraft_engine::{normalize_seed, seed_from_entropy};
use std::collections::HashSet;

pub const DEFAULT_SEED: &str = "1337";

/// Largest numeric range a single `start..end` token may expand to.
const MAX_RANGE_LEN: u64 = 10_000;

/// Resolve CLI seed tokens into draft seed strings.
///
/// Tokens are taken literally, except for `now` (a fresh base-36 seed derived
/// from the wall clock) and `start..end` (every integer in the half-open range).
/// Duplicates are dropped, keeping first-seen order.
pub fn resolve_seed_tokens(tokens: &[String]) -> Result<Vec<String>> {
    let mut pending: Vec<String> = Vec::new();

    for token in tokens {
        let token = normalize_seed(token);
        if token.is_empty() {
            continue;
        }

        if token.eq_ignore_ascii_case("now") {
            pending.push(clock_seed());
            continue;
        }

        if let Some((start, end)) = token.split_once("..") {
            pending.extend(expand_range(start, end)?);
            continue;
        }

        pending.push(token);
    }

    let mut seen = HashSet::new();
    pending.retain(|seed| seen.insert(seed.clone()));

    if pending.is_empty() {
        pending.push(DEFAULT_SEED.to_string());
    }
    Ok(pending)
}

fn clock_seed() -> String {
    let millis = Utc::now().timestamp_millis();
    seed_from_entropy(millis.unsigned_abs())
}

fn expand_range(start: &str, end: &str) -> Result<Vec<String>> {
    let start: u64 = start
        .parse()
        .with_context(|| format!("invalid range start: {start}"))?;
    let end: u64 = end
        .parse()
        .with_context(|| format!("invalid range end: {end}"))?;
    if end <= start {
        bail!("Empty seed range: {start}..{end}");
    }
    if end - start > MAX_RANGE_LEN {
        bail!("Seed range {start}..{end} exceeds {MAX_RANGE_LEN} seeds");
    }
    Ok((start..end).map(|value| value.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_literals_and_ranges_in_order() {
        let seeds = resolve_seed_tokens(&tokens(&["abc", "3..6", " abc ", "4"])).unwrap();
        assert_eq!(seeds, vec!["abc", "3", "4", "5"]);
    }

    #[test]
    fn empty_input_falls_back_to_default() {
        assert_eq!(resolve_seed_tokens(&[]).unwrap(), vec![DEFAULT_SEED]);
        assert_eq!(resolve_seed_tokens(&tokens(&["  "])).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn now_yields_base36_seed() {
        let seeds = resolve_seed_tokens(&tokens(&["now"])).unwrap();
        assert_eq!(seeds.len(), 1);
        assert!(
            seeds[0]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn rejects_bad_ranges() {
        assert!(resolve_seed_tokens(&tokens(&["5..5"])).is_err());
        assert!(resolve_seed_tokens(&tokens(&["x..3"])).is_err());
        assert!(resolve_seed_tokens(&tokens(&["0..20000"])).is_err());
    }
}
