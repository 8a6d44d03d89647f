//! Multisig Advisor: custody planning for M-of-N multisig setups
//!
//! This crate provides:
//! - Threshold recommendations from a threat model and holdings size
//! - Validated M-of-N configurations with generated key slots
//! - Key distribution checks (issues, warnings, recommendations)
//! - A 0-100 security score and configuration summary
//! - A signing simulation for teaching how thresholds behave
//! - Independent per-session advisors, a CLI and a REST API
//!
//! # Example
//!
//! ```rust
//! use multisig_advisor::advisor::{Advisor, AmountTier, Threats};
//!
//! let mut advisor = Advisor::new();
//!
//! let rec = advisor.recommend(Threats::COLLUSION, AmountTier::VeryLarge);
//! println!("Recommended {}: {}", rec.description(), rec.reason);
//!
//! advisor.set_config(rec.m, rec.n).unwrap();
//! let summary = advisor.get_summary();
//! println!("Can lose {} keys", summary.can_lose_keys);
//! ```

pub mod advisor;
pub mod api;
pub mod cli;
pub mod storage;

// Re-export commonly used types
pub use advisor::{
    recommend, Advisor, AdvisorError, AmountTier, Distribution, DistributionReport,
    MultisigConfig, Recommendation, SessionManager, Summary, Threats,
};
pub use api::{create_router, ApiState};
pub use storage::{Storage, StorageConfig};
