//! Convergence detection for the random walk.
//!
//! The walk has no natural end, so we track an exponentially decaying
//! average of rank-update magnitudes:
//!
//! ```text
//! converge ← converge·(1-α) + α·|Δrank|
//! ```
//!
//! With α = 1/N the average spans roughly the last N updates. The walk is
//! considered settled once the average drops below the limit. One tracker
//! lives for the whole parse, so state carries from one walk to the next.

use crate::types::RankingConfig;

/// Value the accumulator starts at: "not converged".
pub const UNCONVERGED: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceTracker {
    converge: f64,
    damper: f64,
    limit: f64,
    observed: usize,
}

impl ConvergenceTracker {
    pub fn new(damper: f64, limit: f64) -> Self {
        Self {
            converge: UNCONVERGED,
            damper,
            limit,
            observed: 0,
        }
    }

    pub fn from_config(config: &RankingConfig) -> Self {
        Self::new(config.convergence_damper, config.convergence_limit)
    }

    /// Fold one update magnitude into the running average.
    pub fn observe(&mut self, delta: f64) {
        self.converge = self.converge * (1.0 - self.damper) + self.damper * delta.abs();
        self.observed += 1;
    }

    pub fn has_converged(&self) -> bool {
        self.converge < self.limit
    }

    /// Current value of the running average.
    pub fn value(&self) -> f64 {
        self.converge
    }

    /// Number of deltas observed so far.
    pub fn observed(&self) -> usize {
        self.observed
    }
}
