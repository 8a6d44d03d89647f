//! Threshold recommendation heuristic
//!
//! Maps a coarse threat model and holdings tier onto a suggested M-of-N
//! configuration. Nothing here touches advisor state.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors parsing threat or tier names
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown threat: {0} (expected loss, theft, coercion or collusion)")]
    UnknownThreat(String),
    #[error("Unknown amount tier: {0} (expected small, medium, large or very-large)")]
    UnknownTier(String),
    #[error("Invalid location entry: {0} (expected location=key-1,key-2)")]
    InvalidLocation(String),
}

bitflags! {
    /// Adverse conditions a configuration should resist
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Threats: u8 {
        const LOSS = 0b0001;
        const THEFT = 0b0010;
        const COERCION = 0b0100;
        const COLLUSION = 0b1000;
    }
}

impl Threats {
    /// Parse a single lower-case threat name
    pub fn from_threat_name(name: &str) -> Result<Self, ParseError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "loss" => Ok(Threats::LOSS),
            "theft" => Ok(Threats::THEFT),
            "coercion" => Ok(Threats::COERCION),
            "collusion" => Ok(Threats::COLLUSION),
            other => Err(ParseError::UnknownThreat(other.to_string())),
        }
    }

    /// Build a set from a list of threat names
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ParseError> {
        names
            .iter()
            .try_fold(Threats::empty(), |acc, name| {
                Ok(acc | Self::from_threat_name(name.as_ref())?)
            })
    }

    /// Lower-case names of the threats in this set
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Threats::LOSS) {
            names.push("loss");
        }
        if self.contains(Threats::THEFT) {
            names.push("theft");
        }
        if self.contains(Threats::COERCION) {
            names.push("coercion");
        }
        if self.contains(Threats::COLLUSION) {
            names.push("collusion");
        }
        names
    }

    /// Parse a comma-separated list, e.g. `loss,theft`. Empty means no threats.
    pub fn parse_list(s: &str) -> Result<Self, ParseError> {
        let names: Vec<&str> = s.split(',').filter(|p| !p.trim().is_empty()).collect();
        Self::from_names(&names)
    }
}

/// Size of the holdings being protected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmountTier {
    Small,
    Medium,
    Large,
    VeryLarge,
}

impl AmountTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmountTier::Small => "small",
            AmountTier::Medium => "medium",
            AmountTier::Large => "large",
            AmountTier::VeryLarge => "very-large",
        }
    }
}

impl fmt::Display for AmountTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmountTier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(AmountTier::Small),
            "medium" => Ok(AmountTier::Medium),
            "large" => Ok(AmountTier::Large),
            "very-large" => Ok(AmountTier::VeryLarge),
            other => Err(ParseError::UnknownTier(other.to_string())),
        }
    }
}

/// A suggested configuration with its rationale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub m: u32,
    pub n: u32,
    pub reason: String,
}

impl Recommendation {
    fn new(m: u32, n: u32, reason: &str) -> Self {
        Self {
            m,
            n,
            reason: reason.to_string(),
        }
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.m, self.n)
    }
}

/// Recommend an M-of-N configuration for a threat model and holdings tier.
///
/// Arms are tried in order; within a tier the threat predicates are checked
/// top to bottom and the first match wins.
pub fn recommend(threats: Threats, tier: AmountTier) -> Recommendation {
    let loss = threats.contains(Threats::LOSS);
    let theft = threats.contains(Threats::THEFT);
    let coercion = threats.contains(Threats::COERCION);
    let collusion = threats.contains(Threats::COLLUSION);

    match tier {
        AmountTier::VeryLarge if collusion => {
            Recommendation::new(4, 7, "Maximum security with high collusion resistance")
        }
        AmountTier::VeryLarge => Recommendation::new(3, 5, "High security for large holdings"),
        AmountTier::Large if collusion || coercion => {
            Recommendation::new(3, 5, "Enhanced security with geographic distribution")
        }
        AmountTier::Large => {
            Recommendation::new(2, 3, "Balanced security for substantial holdings")
        }
        AmountTier::Medium if loss && theft => Recommendation::new(
            2,
            3,
            "Standard multisig provides both loss and theft protection",
        ),
        AmountTier::Medium if theft => {
            Recommendation::new(2, 2, "Two-party approval prevents unauthorized access")
        }
        AmountTier::Medium => Recommendation::new(2, 3, "Recommended for most users"),
        AmountTier::Small if loss || theft => {
            Recommendation::new(2, 3, "Entry-level multisig for learning")
        }
        AmountTier::Small => {
            Recommendation::new(1, 1, "Single-sig may be sufficient for small amounts")
        }
    }
}
