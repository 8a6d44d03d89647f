//! Multisig custody advisor
//!
//! Recommends M-of-N thresholds, validates where keys are kept and scores
//! the resulting setup.
//!
//! # Example
//!
//! ```rust
//! use multisig_advisor::advisor::{Advisor, AmountTier, Distribution, Threats};
//!
//! let mut advisor = Advisor::new();
//!
//! // Pick a configuration for the threat model
//! let rec = advisor.recommend(Threats::LOSS | Threats::THEFT, AmountTier::Medium);
//! advisor.set_config(rec.m, rec.n).unwrap();
//!
//! // Spread the keys out
//! let mut dist = Distribution::new();
//! dist.insert("home".to_string(), vec!["key-1".to_string()]);
//! dist.insert("bank".to_string(), vec!["key-2".to_string()]);
//! dist.insert("attorney".to_string(), vec!["key-3".to_string()]);
//!
//! assert!(advisor.validate_distribution(&dist).valid);
//! advisor.set_distribution(dist);
//! assert_eq!(advisor.calculate_security_score(), 80);
//! ```

pub mod config;
pub mod distribution;
pub mod engine;
pub mod manager;
pub mod recommend;

pub use config::{AdvisorError, Key, MultisigConfig, MAX_KEYS};
pub use distribution::{parse_distribution, Distribution, DistributionReport};
pub use engine::{Advisor, Summary};
pub use manager::{Session, SessionManager};
pub use recommend::{recommend, AmountTier, ParseError, Recommendation, Threats};
