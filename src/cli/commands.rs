//! CLI commands for the advisor
//!
//! Implements all command handlers for the CLI interface.

use crate::advisor::{parse_distribution, Advisor, AmountTier, DistributionReport, Threats};
use crate::storage::{Storage, StorageConfig};
use std::path::PathBuf;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub advisor: Advisor,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize application state from whatever is saved in `data_dir`
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let mut state = Self::unloaded(data_dir)?;
        state.advisor = state.storage.load_or_default()?;
        Ok(state)
    }

    /// State with a default advisor, ignoring anything saved
    pub fn unloaded(data_dir: PathBuf) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.clone(),
            ..Default::default()
        };

        Ok(Self {
            advisor: Advisor::new(),
            storage: Storage::new(storage_config)?,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.advisor)?;
        Ok(())
    }
}

/// Recommend a configuration, optionally applying it
pub fn cmd_recommend(state: &mut AppState, threats: &str, tier: &str, apply: bool) -> CliResult<()> {
    let threats = Threats::parse_list(threats)?;
    let tier: AmountTier = tier.parse()?;
    let rec = state.advisor.recommend(threats, tier);

    let names = threats.names();
    println!("🧭 Recommendation");
    println!(
        "   ├─ Threats: {}",
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    );
    println!("   ├─ Amount: {}", tier);
    println!("   ├─ Configuration: {}", rec.description());
    println!("   └─ Reason: {}", rec.reason);

    if apply {
        state.advisor.apply_recommendation(&rec, threats)?;
        state.save()?;
        println!("\n✅ Applied {} configuration", rec.description());
    }

    Ok(())
}

/// Set the M-of-N configuration
pub fn cmd_config_set(state: &mut AppState, m: u32, n: u32) -> CliResult<()> {
    state.advisor.set_config(m, n)?;
    state.save()?;

    println!("🔧 Configuration set to {}", state.advisor.config().description());
    println!("   Keys regenerated; previous distribution cleared.");

    Ok(())
}

/// Show the current configuration
pub fn cmd_config_show(state: &AppState) -> CliResult<()> {
    let config = state.advisor.config();

    println!("🔐 Configuration: {}", config.description());
    let threats = config.threats.names();
    if !threats.is_empty() {
        println!("   Threat model: {}", threats.join(", "));
    }
    println!("   Keys:");
    for key in &config.keys {
        println!(
            "   └─ {} @ {}{}",
            key.id,
            key.location.as_deref().unwrap_or("-"),
            if key.signed { " (signed)" } else { "" }
        );
    }

    Ok(())
}

/// Store a distribution on the configuration
pub fn cmd_distribute(state: &mut AppState, locations: &[String]) -> CliResult<()> {
    let distribution = parse_distribution(locations)?;
    let report = state.advisor.validate_distribution(&distribution);

    state.advisor.set_distribution(distribution);
    state.save()?;

    println!("📦 Distribution stored");
    print_report(&report);

    Ok(())
}

/// Validate a distribution (the stored one when none is given)
pub fn cmd_validate(state: &AppState, locations: &[String]) -> CliResult<()> {
    let distribution = if locations.is_empty() {
        state.advisor.config().distribution.clone()
    } else {
        parse_distribution(locations)?
    };

    println!("🔍 Validating distribution for {}...", state.advisor.config().description());
    print_report(&state.advisor.validate_distribution(&distribution));

    Ok(())
}

fn print_report(report: &DistributionReport) {
    if report.valid {
        println!("✅ Distribution is valid");
    } else {
        println!("❌ Distribution is NOT valid");
    }

    for issue in &report.issues {
        println!("   ❌ {}", issue);
    }
    for warning in &report.warnings {
        println!("   ⚠️  {}", warning);
    }
    for rec in &report.recommendations {
        println!("   💡 {}", rec);
    }
}

/// Show the security score
pub fn cmd_score(state: &AppState) -> CliResult<()> {
    println!(
        "🛡️  Security score for {}: {}/100",
        state.advisor.config().description(),
        state.advisor.calculate_security_score()
    );
    Ok(())
}

/// Show the configuration summary
pub fn cmd_summary(state: &AppState) -> CliResult<()> {
    let summary = state.advisor.get_summary();

    println!("📋 Summary");
    println!("   ├─ Configuration: {}", summary.config);
    println!("   ├─ Redundancy: {}", summary.redundancy);
    println!("   ├─ Can lose keys: {}", summary.can_lose_keys);
    println!("   ├─ Protected from: {} compromised key(s)", summary.protected_from);
    println!("   └─ Security score: {}/100", summary.security_score);

    Ok(())
}

/// Simulate a signature, or clear all signatures
pub fn cmd_sign(state: &mut AppState, key: Option<&str>, reset: bool) -> CliResult<()> {
    if reset {
        state.advisor.reset_signatures();
        state.save()?;
        println!("🧹 Signatures cleared");
        return Ok(());
    }

    let Some(key) = key else {
        println!("⚠️  Pass --key <id> to sign or --reset to clear signatures");
        return Ok(());
    };

    state.advisor.sign_key(key)?;
    state.save()?;

    let m = state.advisor.config().m;
    println!("✍️  {} signed", key);
    println!("   Signatures: {}/{}", state.advisor.signatures_collected(), m);
    if state.advisor.can_authorize() {
        println!("   ✅ Threshold met - transaction can be authorized");
    }

    Ok(())
}

/// Discard saved state and start over from the default 2-of-3 setup
pub fn cmd_reset(state: &mut AppState) -> CliResult<()> {
    state.storage.delete()?;
    state.advisor = Advisor::new();
    log::info!("Advisor state reset in {:?}", state.data_dir);

    println!("🗑️  Saved state removed");
    println!("   Configuration back to {}", state.advisor.config().description());

    Ok(())
}
