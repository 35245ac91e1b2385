//! Configuration module
//!
//! Settings for the verification simulator, read from `TRUEFRAME_*`
//! environment variables (a `.env` file is honoured).

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_ANALYZING_DELAY_MS, DEFAULT_OUTCOME_DELAY_MS, DEFAULT_POLICY_NAME,
};

/// Delays of the two scheduled transitions, both measured from the moment
/// media is selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerificationTimings {
    pub analyzing_after: Duration,
    pub outcome_after: Duration,
}

impl Default for VerificationTimings {
    fn default() -> Self {
        Self {
            analyzing_after: Duration::from_millis(DEFAULT_ANALYZING_DELAY_MS),
            outcome_after: Duration::from_millis(DEFAULT_OUTCOME_DELAY_MS),
        }
    }
}

impl VerificationTimings {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.analyzing_after >= self.outcome_after {
            return Err(anyhow::anyhow!(
                "analyzing delay ({} ms) must be shorter than outcome delay ({} ms)",
                self.analyzing_after.as_millis(),
                self.outcome_after.as_millis()
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct VerificationConfig {
    pub environment: String,
    pub timings: VerificationTimings,
    /// Name of the registered verification policy to use
    pub policy: String,
    /// Seed for the outcome draw; `None` seeds from OS entropy
    pub outcome_seed: Option<u64>,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            timings: VerificationTimings::default(),
            policy: DEFAULT_POLICY_NAME.to_string(),
            outcome_seed: None,
        }
    }
}

impl VerificationConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("TRUEFRAME_ENV")
            .or_else(|| lookup("ENVIRONMENT"))
            .unwrap_or_else(|| "development".to_string());

        let analyzing_ms = parse_millis(
            &lookup,
            "TRUEFRAME_ANALYZING_DELAY_MS",
            DEFAULT_ANALYZING_DELAY_MS,
        )?;
        let outcome_ms =
            parse_millis(&lookup, "TRUEFRAME_OUTCOME_DELAY_MS", DEFAULT_OUTCOME_DELAY_MS)?;

        let policy = lookup("TRUEFRAME_POLICY")
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_else(|| DEFAULT_POLICY_NAME.to_string());

        let outcome_seed = match lookup("TRUEFRAME_OUTCOME_SEED") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                anyhow::anyhow!("TRUEFRAME_OUTCOME_SEED must be an unsigned integer")
            })?),
            None => None,
        };

        let config = Self {
            environment,
            timings: VerificationTimings {
                analyzing_after: Duration::from_millis(analyzing_ms),
                outcome_after: Duration::from_millis(outcome_ms),
            },
            policy,
            outcome_seed,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.policy.is_empty() {
            return Err(anyhow::anyhow!("TRUEFRAME_POLICY must not be empty"));
        }
        self.timings.validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn parse_millis<F>(lookup: &F, key: &str, default: u64) -> Result<u64, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("{} must be a number of milliseconds", key)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_simulated_delays() {
        let config = VerificationConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.timings.analyzing_after, Duration::from_millis(1500));
        assert_eq!(config.timings.outcome_after, Duration::from_millis(3500));
        assert_eq!(config.policy, "random");
        assert!(config.outcome_seed.is_none());
        assert!(!config.is_production());
    }

    #[test]
    fn reads_overrides() {
        let config = VerificationConfig::from_lookup(lookup_from(&[
            ("TRUEFRAME_ENV", "Prod"),
            ("TRUEFRAME_ANALYZING_DELAY_MS", "10"),
            ("TRUEFRAME_OUTCOME_DELAY_MS", "20"),
            ("TRUEFRAME_POLICY", " Always-Verified "),
            ("TRUEFRAME_OUTCOME_SEED", "42"),
        ]))
        .unwrap();
        assert!(config.is_production());
        assert_eq!(config.timings.analyzing_after, Duration::from_millis(10));
        assert_eq!(config.policy, "always-verified");
        assert_eq!(config.outcome_seed, Some(42));
    }

    #[test]
    fn rejects_inverted_delays() {
        let err = VerificationConfig::from_lookup(lookup_from(&[
            ("TRUEFRAME_ANALYZING_DELAY_MS", "4000"),
            ("TRUEFRAME_OUTCOME_DELAY_MS", "3500"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("must be shorter"));
    }

    #[test]
    fn rejects_blank_policy() {
        let err = VerificationConfig::from_lookup(lookup_from(&[("TRUEFRAME_POLICY", "  ")]))
            .unwrap_err();
        assert!(err.to_string().contains("TRUEFRAME_POLICY must not be empty"));
    }

    #[test]
    fn rejects_garbage_numbers() {
        assert!(VerificationConfig::from_lookup(lookup_from(&[(
            "TRUEFRAME_OUTCOME_DELAY_MS",
            "soon"
        )]))
        .is_err());
        assert!(VerificationConfig::from_lookup(lookup_from(&[(
            "TRUEFRAME_OUTCOME_SEED",
            "-1"
        )]))
        .is_err());
    }
}
