//! Verification policies
//!
//! A policy decides the terminal status of an attempt once the simulated
//! analysis window has elapsed. The session never looks inside the media; a
//! real classifier would be one more implementation of [`VerificationPolicy`].

use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Mutex;

use trueframe_core::models::{SelectedMedia, TerminalStatus};
use trueframe_core::AppError;

/// Trait that all verification policies implement
#[async_trait]
pub trait VerificationPolicy: Send + Sync + Debug {
    /// Policy name/identifier
    fn name(&self) -> &str;

    /// Decide the terminal status for `media`.
    async fn evaluate(&self, media: &SelectedMedia) -> Result<TerminalStatus>;

    /// Every status this policy can return.
    fn possible_outcomes(&self) -> Vec<TerminalStatus>;
}

/// Multiset of terminal statuses drawn from uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomePool(Vec<TerminalStatus>);

impl OutcomePool {
    pub fn new(outcomes: Vec<TerminalStatus>) -> Result<Self, AppError> {
        if outcomes.is_empty() {
            return Err(AppError::InvalidInput(
                "Outcome pool must contain at least one status".to_string(),
            ));
        }
        Ok(Self(outcomes))
    }

    /// Three verified entries and one warning. `Rejected` is never drawn.
    pub fn simulated() -> Self {
        Self(vec![
            TerminalStatus::Verified,
            TerminalStatus::Verified,
            TerminalStatus::Verified,
            TerminalStatus::Warning,
        ])
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> TerminalStatus {
        self.0[rng.random_range(0..self.0.len())]
    }

    pub fn contains(&self, status: TerminalStatus) -> bool {
        self.0.contains(&status)
    }

    /// Number of entries equal to `status`.
    pub fn weight(&self, status: TerminalStatus) -> usize {
        self.0.iter().filter(|s| **s == status).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn distinct(&self) -> Vec<TerminalStatus> {
        let mut distinct = Vec::new();
        for status in &self.0 {
            if !distinct.contains(status) {
                distinct.push(*status);
            }
        }
        distinct
    }
}

impl Default for OutcomePool {
    fn default() -> Self {
        Self::simulated()
    }
}

/// Picks uniformly from an [`OutcomePool`].
pub struct RandomOutcomePolicy {
    pool: OutcomePool,
    rng: Mutex<StdRng>,
}

impl Debug for RandomOutcomePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RandomOutcomePolicy")
            .field("pool", &self.pool)
            .finish()
    }
}

impl RandomOutcomePolicy {
    pub const NAME: &'static str = "random";

    /// `seed` makes the sequence of outcomes reproducible.
    pub fn new(pool: OutcomePool, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            pool,
            rng: Mutex::new(rng),
        }
    }

    pub fn simulated(seed: Option<u64>) -> Self {
        Self::new(OutcomePool::simulated(), seed)
    }

    pub fn pool(&self) -> &OutcomePool {
        &self.pool
    }

    /// Draw without going through the async trait.
    pub fn draw(&self) -> Result<TerminalStatus> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow::anyhow!("outcome rng lock poisoned"))?;
        Ok(self.pool.draw(&mut *rng))
    }
}

#[async_trait]
impl VerificationPolicy for RandomOutcomePolicy {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn evaluate(&self, media: &SelectedMedia) -> Result<TerminalStatus> {
        let status = self.draw()?;
        tracing::debug!(media_id = %media.id, outcome = %status, "Drew simulated outcome");
        Ok(status)
    }

    fn possible_outcomes(&self) -> Vec<TerminalStatus> {
        self.pool.distinct()
    }
}

/// Always returns the same status.
#[derive(Debug, Clone)]
pub struct FixedOutcomePolicy {
    name: String,
    status: TerminalStatus,
}

impl FixedOutcomePolicy {
    pub fn new(status: TerminalStatus) -> Self {
        Self {
            name: format!("always-{}", status),
            status,
        }
    }

    pub fn status(&self) -> TerminalStatus {
        self.status
    }
}

#[async_trait]
impl VerificationPolicy for FixedOutcomePolicy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, _media: &SelectedMedia) -> Result<TerminalStatus> {
        Ok(self.status)
    }

    fn possible_outcomes(&self) -> Vec<TerminalStatus> {
        vec![self.status]
    }
}
