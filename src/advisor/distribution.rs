//! Key distribution validation and security scoring

use crate::advisor::config::MultisigConfig;
use crate::advisor::recommend::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Location name → key ids kept there
pub type Distribution = BTreeMap<String, Vec<String>>;

/// Location the validator treats as the owner's residence
pub const HOME: &str = "home";

/// Third-party custody locations
pub const THIRD_PARTY: [&str; 2] = ["bank", "attorney"];

/// Points per spare key beyond the threshold
const REDUNDANCY_POINTS: i64 = 15;
/// Bonus once more than one signature is required
const MULTI_SIG_BONUS: i64 = 25;
/// Further bonus for thresholds of three or more
const HIGH_THRESHOLD_BONUS: i64 = 15;
/// Points per distinct location
const LOCATION_POINTS: i64 = 10;
/// Cap on location points
const LOCATION_CAP: i64 = 30;
/// Assumed hardware diversity once there are three or more keys
const DEVICE_BONUS: i64 = 10;

/// Outcome of validating a proposed distribution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReport {
    /// Blocking problems
    pub issues: Vec<String>,
    /// Non-blocking risk flags
    pub warnings: Vec<String>,
    /// Advisory text
    pub recommendations: Vec<String>,
    /// True iff there are no issues
    pub valid: bool,
}

/// Total key ids placed across all locations.
///
/// Ids listed at more than one location are counted once per listing.
pub fn distributed_count(distribution: &Distribution) -> usize {
    distribution.values().map(Vec::len).sum()
}

/// Check a proposed distribution against an M-of-N configuration
pub fn validate(config: &MultisigConfig, distribution: &Distribution) -> DistributionReport {
    let mut report = DistributionReport::default();

    let distributed = distributed_count(distribution);
    let locations = distribution.len();

    if distributed < config.n as usize {
        report.issues.push(format!(
            "Only {} of {} keys distributed",
            distributed, config.n
        ));
    }

    if locations == 1 {
        report
            .warnings
            .push("All keys in one location - single point of failure".to_string());
    }

    if let Some(home_keys) = distribution.get(HOME) {
        if home_keys.len() >= config.m as usize {
            report.warnings.push(format!(
                "Home location holds {} keys, enough to meet the {} threshold - vulnerable to a targeted attack",
                home_keys.len(),
                config.description()
            ));
        }
    }

    if locations < 2 {
        report
            .recommendations
            .push("Distribute keys across at least 2-3 physical locations".to_string());
    }

    if !THIRD_PARTY.iter().any(|loc| distribution.contains_key(*loc)) {
        report.recommendations.push(
            "Consider third-party custody (bank safe deposit box or attorney) for one key"
                .to_string(),
        );
    }

    report.valid = report.issues.is_empty();
    report
}

/// Score a configuration from 0 to 100 using its stored distribution
pub fn security_score(config: &MultisigConfig) -> u8 {
    let m = i64::from(config.m);
    let n = i64::from(config.n);

    let mut score = (n - m) * REDUNDANCY_POINTS;

    if m >= 2 {
        score += MULTI_SIG_BONUS;
    }
    if m >= 3 {
        score += HIGH_THRESHOLD_BONUS;
    }

    let locations = config.distribution.len() as i64;
    score += (locations * LOCATION_POINTS).min(LOCATION_CAP);

    // Hardware is not tracked; key count stands in for device diversity
    if n >= 3 {
        score += DEVICE_BONUS;
    }

    score.clamp(0, 100) as u8
}

/// Parse a `location=key-1,key-2` entry
pub fn parse_location(entry: &str) -> Result<(String, Vec<String>), ParseError> {
    let (location, keys) = entry
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidLocation(entry.to_string()))?;

    let location = location.trim();
    if location.is_empty() {
        return Err(ParseError::InvalidLocation(entry.to_string()));
    }

    let keys = keys
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();

    Ok((location.to_string(), keys))
}

/// Build a distribution from repeated `location=keys` entries.
///
/// A location given twice accumulates keys from both entries.
pub fn parse_distribution<S: AsRef<str>>(entries: &[S]) -> Result<Distribution, ParseError> {
    let mut distribution = Distribution::new();
    for entry in entries {
        let (location, keys) = parse_location(entry.as_ref())?;
        distribution.entry(location).or_default().extend(keys);
    }
    Ok(distribution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(entries: &[(&str, &str)]) -> Distribution {
        entries
            .iter()
            .map(|(loc, keys)| {
                (
                    loc.to_string(),
                    keys.split(',').map(|k| k.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_all_keys_at_home() {
        let config = MultisigConfig::new(2, 3).unwrap();
        let report = validate(&config, &dist(&[("home", "key-1,key-2,key-3")]));

        assert!(report.valid);
        assert!(report.issues.is_empty());
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].starts_with("All keys in one location"));
        assert!(report.warnings[1].contains("Home location holds 3 keys"));
        assert_eq!(report.recommendations.len(), 2);
    }

    #[test]
    fn test_missing_keys_is_an_issue() {
        let config = MultisigConfig::new(2, 3).unwrap();
        let report = validate(
            &config,
            &dist(&[("home", "key-1"), ("bank", "key-2")]),
        );

        assert!(!report.valid);
        assert_eq!(report.issues, vec!["Only 2 of 3 keys distributed".to_string()]);
        // Home holds one key, below the threshold
        assert!(report.warnings.is_empty());
        // Bank present, two locations used
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_empty_distribution() {
        let config = MultisigConfig::new(1, 1).unwrap();
        let report = validate(&config, &Distribution::new());

        assert!(!report.valid);
        assert_eq!(report.issues, vec!["Only 0 of 1 keys distributed".to_string()]);
        assert!(report.warnings.is_empty());
        assert_eq!(report.recommendations.len(), 2);
    }

    #[test]
    fn test_home_concentration_with_other_locations() {
        let config = MultisigConfig::new(2, 4).unwrap();
        let report = validate(
            &config,
            &dist(&[
                ("home", "key-1,key-2"),
                ("attorney", "key-3"),
                ("office", "key-4"),
            ]),
        );

        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("2-of-4"));
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_duplicate_ids_are_counted_per_listing() {
        let config = MultisigConfig::new(2, 3).unwrap();
        let duplicated = dist(&[
            ("home", "key-1,key-2"),
            ("bank", "key-1"),
        ]);

        assert_eq!(distributed_count(&duplicated), 3);
        assert!(validate(&config, &duplicated).valid);
    }

    #[test]
    fn test_score_two_of_three_over_three_locations() {
        let mut config = MultisigConfig::new(2, 3).unwrap();
        config.distribution = dist(&[
            ("home", "key-1"),
            ("bank", "key-2"),
            ("attorney", "key-3"),
        ]);

        // 15 + 25 + 30 + 10
        assert_eq!(security_score(&config), 80);
    }

    #[test]
    fn test_score_components() {
        let single = MultisigConfig::new(1, 1).unwrap();
        assert_eq!(security_score(&single), 0);

        // 1-of-2, no distribution: redundancy only
        let spare = MultisigConfig::new(1, 2).unwrap();
        assert_eq!(security_score(&spare), 15);

        // 3-of-5: 30 + 25 + 15 + 10
        let three_of_five = MultisigConfig::new(3, 5).unwrap();
        assert_eq!(security_score(&three_of_five), 80);
    }

    #[test]
    fn test_score_location_points_capped() {
        let mut config = MultisigConfig::new(2, 5).unwrap();
        config.distribution = dist(&[
            ("a", "key-1"),
            ("b", "key-2"),
            ("c", "key-3"),
            ("d", "key-4"),
            ("e", "key-5"),
        ]);

        // 45 + 25 + 30 (capped) + 10
        assert_eq!(security_score(&config), 100);
    }

    #[test]
    fn test_score_clamped_to_hundred() {
        let mut config = MultisigConfig::new(1, 15).unwrap();
        config.distribution = dist(&[("a", "key-1"), ("b", "key-2"), ("c", "key-3")]);

        // 210 + 30 + 10 before clamping
        assert_eq!(security_score(&config), 100);
    }

    #[test]
    fn test_parse_distribution() {
        let parsed = parse_distribution(&["home=key-1, key-2", "bank=key-3", "home=key-4"]).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["home"], vec!["key-1", "key-2", "key-4"]);
        assert_eq!(parsed["bank"], vec!["key-3"]);

        assert!(parse_location("no-separator").is_err());
        assert!(parse_location("=key-1").is_err());
        assert_eq!(parse_location("vault=").unwrap(), ("vault".to_string(), vec![]));
    }
}
