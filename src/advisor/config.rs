//! Multisig configuration state
//!
//! Holds the canonical M-of-N pair, the generated key list and the
//! distribution/threat state attached to it.

use crate::advisor::distribution::Distribution;
use crate::advisor::recommend::Threats;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Practical ceiling on the number of keys in a configuration
pub const MAX_KEYS: u32 = 15;

/// Errors raised by the advisor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    #[error("Invalid threshold: {m}-of-{n} (need 1 <= m <= n)")]
    InvalidThreshold { m: u32, n: u32 },
    #[error("Practical limit exceeded: {n} keys (maximum {max})")]
    PracticalLimitExceeded { n: u32, max: u32 },
    #[error("Unknown key: {0}")]
    UnknownKey(String),
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Inconsistent configuration: {0}")]
    InconsistentConfig(String),
}

/// A single key slot in the configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Key {
    /// Stable label (`key-<i>`, 1-indexed)
    pub id: String,
    /// Where the key is kept, once a distribution has been applied
    pub location: Option<String>,
    /// Set by the signing simulation only
    pub signed: bool,
}

impl Key {
    fn new(index: u32) -> Self {
        Self {
            id: format!("key-{}", index),
            location: None,
            signed: false,
        }
    }
}

/// M-of-N configuration
///
/// Deserialization goes through [`MultisigConfig::validate`], so saved state
/// cannot bring back a pair that `new` would reject.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "MultisigConfigData")]
pub struct MultisigConfig {
    /// Signatures required (M)
    pub m: u32,
    /// Total keys (N)
    pub n: u32,
    /// Generated key slots, always `n` long
    pub keys: Vec<Key>,
    /// Distribution read by the security scorer
    #[serde(default)]
    pub distribution: Distribution,
    /// Threat model the configuration was chosen for
    #[serde(default)]
    pub threats: Threats,
}

/// Unchecked on-disk form of [`MultisigConfig`]
#[derive(Deserialize)]
struct MultisigConfigData {
    m: u32,
    n: u32,
    keys: Vec<Key>,
    #[serde(default)]
    distribution: Distribution,
    #[serde(default)]
    threats: Threats,
}

impl TryFrom<MultisigConfigData> for MultisigConfig {
    type Error = AdvisorError;

    fn try_from(data: MultisigConfigData) -> Result<Self, Self::Error> {
        Self::validate(data.m, data.n)?;

        if data.keys.len() != data.n as usize {
            return Err(AdvisorError::InconsistentConfig(format!(
                "{} keys for a {}-of-{} configuration",
                data.keys.len(),
                data.m,
                data.n
            )));
        }

        let expected = Self::generate_keys(data.n);
        if let Some((key, _)) = data
            .keys
            .iter()
            .zip(&expected)
            .find(|(key, slot)| key.id != slot.id)
        {
            return Err(AdvisorError::InconsistentConfig(format!(
                "unexpected key id {}",
                key.id
            )));
        }

        Ok(Self {
            m: data.m,
            n: data.n,
            keys: data.keys,
            distribution: data.distribution,
            threats: data.threats,
        })
    }
}

impl MultisigConfig {
    /// Create a validated configuration
    ///
    /// # Errors
    /// `InvalidThreshold` if `m > n` or either is zero, then
    /// `PracticalLimitExceeded` if `n` is above [`MAX_KEYS`].
    pub fn new(m: u32, n: u32) -> Result<Self, AdvisorError> {
        Self::validate(m, n)?;

        Ok(Self {
            m,
            n,
            keys: Self::generate_keys(n),
            distribution: Distribution::new(),
            threats: Threats::empty(),
        })
    }

    /// Check an M-of-N pair without building a configuration
    pub fn validate(m: u32, n: u32) -> Result<(), AdvisorError> {
        if m > n {
            return Err(AdvisorError::InvalidThreshold { m, n });
        }

        if m < 1 || n < 1 {
            return Err(AdvisorError::InvalidThreshold { m, n });
        }

        if n > MAX_KEYS {
            return Err(AdvisorError::PracticalLimitExceeded { n, max: MAX_KEYS });
        }

        Ok(())
    }

    fn generate_keys(n: u32) -> Vec<Key> {
        (1..=n).map(Key::new).collect()
    }

    /// Look up a key by id
    pub fn key(&self, id: &str) -> Option<&Key> {
        self.keys.iter().find(|k| k.id == id)
    }

    /// Mutable key lookup
    pub fn key_mut(&mut self, id: &str) -> Option<&mut Key> {
        self.keys.iter_mut().find(|k| k.id == id)
    }

    /// Spare keys beyond the threshold
    pub fn redundancy(&self) -> u32 {
        self.n - self.m
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.m, self.n)
    }
}

impl Default for MultisigConfig {
    /// The classic 2-of-3 starting point
    fn default() -> Self {
        Self {
            m: 2,
            n: 3,
            keys: Self::generate_keys(3),
            distribution: Distribution::new(),
            threats: Threats::empty(),
        }
    }
}
