//! Registry of verification policies, resolved by name from configuration.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use trueframe_core::models::TerminalStatus;
use trueframe_core::AppError;

use crate::policy::{FixedOutcomePolicy, RandomOutcomePolicy, VerificationPolicy};

/// Policy information for listing available policies
#[derive(Debug, Clone, Serialize)]
pub struct PolicyInfo {
    pub name: String,
    pub description: String,
    pub outcomes: Vec<TerminalStatus>,
}

/// Thread-safe registry of policies keyed by name.
#[derive(Clone)]
pub struct PolicyRegistry {
    policies: Arc<RwLock<HashMap<String, Arc<dyn VerificationPolicy>>>>,
    policy_info: Arc<RwLock<HashMap<String, PolicyInfo>>>,
}

impl PolicyRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            policies: Arc::new(RwLock::new(HashMap::new())),
            policy_info: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registry with the simulated random policy and one fixed policy per
    /// terminal status.
    pub async fn with_defaults(seed: Option<u64>) -> Self {
        let registry = Self::new();
        registry
            .register(
                Arc::new(RandomOutcomePolicy::simulated(seed)),
                "Uniform draw from [verified, verified, verified, warning]",
            )
            .await;
        for status in [
            TerminalStatus::Verified,
            TerminalStatus::Warning,
            TerminalStatus::Rejected,
        ] {
            registry
                .register(
                    Arc::new(FixedOutcomePolicy::new(status)),
                    &format!("Every upload ends {}", status),
                )
                .await;
        }
        registry
    }

    /// Register a policy, replacing any policy with the same name.
    pub async fn register(&self, policy: Arc<dyn VerificationPolicy>, description: &str) {
        let name = policy.name().to_string();
        let info = PolicyInfo {
            name: name.clone(),
            description: description.to_string(),
            outcomes: policy.possible_outcomes(),
        };

        let mut policies = self.policies.write().await;
        let mut policy_info = self.policy_info.write().await;

        if policies.insert(name.clone(), policy).is_some() {
            tracing::debug!(policy = %name, "Replaced verification policy");
        }
        policy_info.insert(name, info);
    }

    /// Get a policy by name
    pub async fn get(&self, name: &str) -> Result<Arc<dyn VerificationPolicy>, AppError> {
        let policies = self.policies.read().await;

        policies
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::PolicyNotFound(name.to_string()))
    }

    /// List registered policies sorted by name
    pub async fn list(&self) -> Vec<PolicyInfo> {
        let policy_info = self.policy_info.read().await;
        let mut infos: Vec<PolicyInfo> = policy_info.values().cloned().collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.policies.read().await.contains_key(name)
    }
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
