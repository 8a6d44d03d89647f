//! The advisor engine
//!
//! One `Advisor` per simulation session. It owns the live configuration and
//! exposes the configure / recommend / validate / score / summarise flow
//! plus the signing simulation.

use crate::advisor::config::{AdvisorError, Key, MultisigConfig};
use crate::advisor::distribution::{self, Distribution, DistributionReport};
use crate::advisor::recommend::{self, AmountTier, Recommendation, Threats};
use serde::{Deserialize, Serialize};

/// Projection of the live configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Description like "2-of-3"
    pub config: String,
    pub m: u32,
    pub n: u32,
    /// Spare keys beyond the threshold
    pub redundancy: u32,
    /// Keys that can be lost while still able to sign
    pub can_lose_keys: u32,
    /// Compromised keys tolerated before unauthorized signing is possible
    pub protected_from: u32,
    pub security_score: u8,
}

/// Multisig custody advisor for a single session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Advisor {
    config: MultisigConfig,
}

impl Advisor {
    /// Create an advisor with the default 2-of-3 configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the live configuration
    pub fn config(&self) -> &MultisigConfig {
        &self.config
    }

    /// Replace the configuration with a fresh M-of-N setup.
    ///
    /// Keys are regenerated and any stored distribution, threats and
    /// signatures are discarded.
    pub fn set_config(&mut self, m: u32, n: u32) -> Result<(), AdvisorError> {
        self.config = MultisigConfig::new(m, n)?;
        log::info!("Configuration reset to {}", self.config.description());
        Ok(())
    }

    /// Suggest a configuration. Does not modify the advisor.
    pub fn recommend(&self, threats: Threats, tier: AmountTier) -> Recommendation {
        recommend::recommend(threats, tier)
    }

    /// Apply a recommendation and remember the threat model behind it
    pub fn apply_recommendation(
        &mut self,
        recommendation: &Recommendation,
        threats: Threats,
    ) -> Result<(), AdvisorError> {
        self.set_config(recommendation.m, recommendation.n)?;
        self.config.threats = threats;
        Ok(())
    }

    /// Record the threat model without touching keys
    pub fn set_threats(&mut self, threats: Threats) {
        self.config.threats = threats;
    }

    /// Store a distribution on the configuration.
    ///
    /// This is the distribution the security score reads. Keys named in it
    /// get their location recorded; ids not in the configuration are kept
    /// in the map but otherwise ignored. A key listed at several locations
    /// records the last one in location order; the map itself is stored
    /// unchanged, so validation and scoring still count every listing.
    pub fn set_distribution(&mut self, distribution: Distribution) {
        for key in &mut self.config.keys {
            key.location = None;
        }

        for (location, ids) in &distribution {
            for id in ids {
                match self.config.key_mut(id) {
                    Some(key) => {
                        if let Some(previous) = key.location.replace(location.clone()) {
                            log::debug!(
                                "Key {} listed at both {} and {}; recording {}",
                                id,
                                previous,
                                location,
                                location
                            );
                        }
                    }
                    None => log::debug!("Distribution names unknown key {} at {}", id, location),
                }
            }
        }

        log::info!(
            "Distribution applied: {} keys across {} locations",
            distribution::distributed_count(&distribution),
            distribution.len()
        );
        self.config.distribution = distribution;
    }

    /// Validate a proposed distribution against the live configuration
    pub fn validate_distribution(&self, distribution: &Distribution) -> DistributionReport {
        distribution::validate(&self.config, distribution)
    }

    /// Score the live configuration.
    ///
    /// Reads the distribution stored via [`Advisor::set_distribution`], not
    /// whatever was last passed to [`Advisor::validate_distribution`].
    pub fn calculate_security_score(&self) -> u8 {
        distribution::security_score(&self.config)
    }

    /// Summarise the live configuration
    pub fn get_summary(&self) -> Summary {
        let redundancy = self.config.redundancy();
        Summary {
            config: self.config.description(),
            m: self.config.m,
            n: self.config.n,
            redundancy,
            can_lose_keys: redundancy,
            protected_from: self.config.m - 1,
            security_score: self.calculate_security_score(),
        }
    }

    // =========================================================================
    // Signing simulation
    // =========================================================================

    /// Mark a key as having signed
    pub fn sign_key(&mut self, id: &str) -> Result<&Key, AdvisorError> {
        let key = self
            .config
            .key_mut(id)
            .ok_or_else(|| AdvisorError::UnknownKey(id.to_string()))?;
        key.signed = true;
        Ok(key)
    }

    /// Number of keys that have signed
    pub fn signatures_collected(&self) -> usize {
        self.config.keys.iter().filter(|k| k.signed).count()
    }

    /// True once the threshold has been met
    pub fn can_authorize(&self) -> bool {
        self.signatures_collected() >= self.config.m as usize
    }

    /// Clear all signatures
    pub fn reset_signatures(&mut self) {
        for key in &mut self.config.keys {
            key.signed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_locations() -> Distribution {
        let mut dist = Distribution::new();
        dist.insert("home".to_string(), vec!["key-1".to_string()]);
        dist.insert("bank".to_string(), vec!["key-2".to_string()]);
        dist.insert("attorney".to_string(), vec!["key-3".to_string()]);
        dist
    }

    #[test]
    fn test_set_config_resets_state() {
        let mut advisor = Advisor::new();
        advisor.set_distribution(three_locations());
        advisor.set_threats(Threats::THEFT);
        advisor.sign_key("key-1").unwrap();

        advisor.set_config(3, 5).unwrap();

        let config = advisor.config();
        assert_eq!(config.keys.len(), 5);
        assert!(config.distribution.is_empty());
        assert!(config.threats.is_empty());
        assert_eq!(advisor.signatures_collected(), 0);
    }

    #[test]
    fn test_failed_set_config_keeps_previous() {
        let mut advisor = Advisor::new();
        advisor.set_config(2, 4).unwrap();

        assert!(matches!(
            advisor.set_config(5, 4),
            Err(AdvisorError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            advisor.set_config(2, 16),
            Err(AdvisorError::PracticalLimitExceeded { .. })
        ));
        assert_eq!(advisor.config().description(), "2-of-4");
    }

    #[test]
    fn test_recommend_does_not_mutate() {
        let mut advisor = Advisor::new();
        advisor.set_config(1, 2).unwrap();
        let before = advisor.config().clone();

        let rec = advisor.recommend(Threats::COLLUSION, AmountTier::VeryLarge);
        assert_eq!((rec.m, rec.n), (4, 7));
        assert_eq!(advisor.config(), &before);
    }

    #[test]
    fn test_apply_recommendation() {
        let mut advisor = Advisor::new();
        let threats = Threats::LOSS | Threats::THEFT;
        let rec = advisor.recommend(threats, AmountTier::Medium);

        advisor.apply_recommendation(&rec, threats).unwrap();

        assert_eq!(advisor.config().description(), "2-of-3");
        assert_eq!(advisor.config().threats, threats);
    }

    #[test]
    fn test_score_reads_stored_distribution() {
        let mut advisor = Advisor::new();
        advisor.set_config(2, 3).unwrap();

        // Validating does not store anything
        let report = advisor.validate_distribution(&three_locations());
        assert!(report.valid);
        assert_eq!(advisor.calculate_security_score(), 50);

        advisor.set_distribution(three_locations());
        assert_eq!(advisor.calculate_security_score(), 80);
    }

    #[test]
    fn test_set_distribution_records_locations() {
        let mut advisor = Advisor::new();
        let mut dist = three_locations();
        dist.get_mut("bank").unwrap().push("key-9".to_string());

        advisor.set_distribution(dist);

        let config = advisor.config();
        assert_eq!(config.key("key-1").unwrap().location.as_deref(), Some("home"));
        assert_eq!(config.key("key-3").unwrap().location.as_deref(), Some("attorney"));
        assert_eq!(config.distribution["bank"].len(), 2);
    }

    #[test]
    fn test_set_distribution_duplicate_key_keeps_last_location() {
        let mut advisor = Advisor::new();
        let mut dist = Distribution::new();
        dist.insert("home".to_string(), vec!["key-1".to_string(), "key-2".to_string()]);
        dist.insert("bank".to_string(), vec!["key-1".to_string()]);

        advisor.set_distribution(dist);

        // "home" sorts after "bank", so its listing is applied last
        let config = advisor.config();
        assert_eq!(config.key("key-1").unwrap().location.as_deref(), Some("home"));
        assert_eq!(config.key("key-2").unwrap().location.as_deref(), Some("home"));
        assert_eq!(config.key("key-3").unwrap().location, None);
        assert_eq!(distribution::distributed_count(&config.distribution), 3);
    }

    #[test]
    fn test_summary() {
        let mut advisor = Advisor::new();
        advisor.set_config(2, 3).unwrap();
        advisor.set_distribution(three_locations());

        let summary = advisor.get_summary();
        assert_eq!(summary.config, "2-of-3");
        assert_eq!(summary.redundancy, 1);
        assert_eq!(summary.can_lose_keys, 1);
        assert_eq!(summary.protected_from, 1);
        assert_eq!(summary.security_score, 80);
    }

    #[test]
    fn test_signing_simulation() {
        let mut advisor = Advisor::new();
        advisor.set_config(2, 3).unwrap();

        advisor.sign_key("key-1").unwrap();
        assert!(!advisor.can_authorize());

        // Signing twice does not double count
        advisor.sign_key("key-1").unwrap();
        assert_eq!(advisor.signatures_collected(), 1);

        advisor.sign_key("key-3").unwrap();
        assert!(advisor.can_authorize());

        assert_eq!(
            advisor.sign_key("key-4").unwrap_err(),
            AdvisorError::UnknownKey("key-4".to_string())
        );

        advisor.reset_signatures();
        assert_eq!(advisor.signatures_collected(), 0);
    }

    #[test]
    fn test_signing_does_not_change_score() {
        let mut advisor = Advisor::new();
        advisor.set_distribution(three_locations());
        let score = advisor.calculate_security_score();

        advisor.sign_key("key-2").unwrap();
        assert_eq!(advisor.calculate_security_score(), score);
    }
}
