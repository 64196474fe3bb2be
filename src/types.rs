//! Core types shared by the graph seams and the ranking engine.
//!
//! Identifiers are opaque handles into whatever store backs the graph.
//! The engine never inspects them beyond equality and hashing; the store
//! resolves them to concrete nodes and edges.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RankError, RankResult};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

handle!(
    /// A document: an ordered sequence of parses.
    DocumentId,
    "doc#"
);
handle!(
    /// One candidate syntactic reading of a sentence.
    ParseId,
    "parse#"
);
handle!(
    /// A token occurrence within a parse.
    WordId,
    "word#"
);
handle!(
    /// One candidate meaning of one word instance.
    SenseId,
    "sense#"
);
handle!(
    /// A weighted sense-similarity relation.
    EdgeId,
    "edge#"
);

/// Rank estimate plus confidence stored per sense.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Current rank. Not normalized across senses.
    pub mean: f64,
    /// Confidence in [0, 1]; fixed at initialization.
    pub confidence: f64,
}

impl Score {
    pub fn new(mean: f64, confidence: f64) -> Self {
        Self { mean, confidence }
    }

    /// Same confidence, new mean.
    pub fn with_mean(self, mean: f64) -> Self {
        Self { mean, ..self }
    }
}

/// One entry of a sense's edge list: the sense at the other end plus the
/// edge handle used to look up the weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SenseEdge {
    pub neighbor: SenseId,
    pub edge: EdgeId,
}

/// Where walks start within a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalkStart {
    /// One walk per word instance, from its first sense.
    #[default]
    FirstSense,
    /// One walk per sense of every word instance.
    EverySense,
}

/// How a neighbor with zero incoming weight is treated during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegenerateNeighbor {
    /// The neighbor contributes nothing to the rank sum.
    #[default]
    Skip,
    /// The update fails with [`RankError::DegenerateNeighbor`].
    Fail,
}

/// Tunable parameters for sense ranking.
///
/// Deserialized from `senserank.toml` with kebab-case keys; any key left out
/// keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RankingConfig {
    // PageRank
    pub damping_factor: f64,

    // Convergence detection
    pub convergence_damper: f64,
    pub convergence_limit: f64,

    // Priors written by the initializer
    pub prior_mean: f64,
    pub prior_confidence: f64,

    // Walk control
    pub disconnect_epsilon: f64,
    pub max_walk_steps: usize,
    pub walk_start: WalkStart,
    pub degenerate_neighbor: DegenerateNeighbor,

    /// Seed for the walk RNG. `None` means seed from entropy.
    pub seed: Option<u64>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.90,

            // Average over roughly one sentence worth of senses
            convergence_damper: 1.0 / 30.0,
            convergence_limit: 0.03,

            prior_mean: 1.0,
            prior_confidence: 0.9,

            disconnect_epsilon: 1.0e-10,
            max_walk_steps: 100_000,
            walk_start: WalkStart::FirstSense,
            degenerate_neighbor: DegenerateNeighbor::Skip,

            seed: None,
        }
    }
}

impl RankingConfig {
    /// Check every field against its documented range.
    pub fn validate(&self) -> RankResult<()> {
        fn invalid(field: &'static str, reason: &str) -> RankResult<()> {
            Err(RankError::InvalidConfig {
                field,
                reason: reason.to_string(),
            })
        }

        if !(self.damping_factor > 0.0 && self.damping_factor < 1.0) {
            return invalid("damping-factor", "must be in (0, 1)");
        }
        if !(self.convergence_damper > 0.0 && self.convergence_damper <= 1.0) {
            return invalid("convergence-damper", "must be in (0, 1]");
        }
        if !(self.convergence_limit > 0.0 && self.convergence_limit.is_finite()) {
            return invalid("convergence-limit", "must be a positive number");
        }
        if !self.prior_mean.is_finite() {
            return invalid("prior-mean", "must be finite");
        }
        if !(0.0..=1.0).contains(&self.prior_confidence) {
            return invalid("prior-confidence", "must be in [0, 1]");
        }
        if !(self.disconnect_epsilon >= 0.0 && self.disconnect_epsilon.is_finite()) {
            return invalid("disconnect-epsilon", "must be a non-negative number");
        }
        if self.max_walk_steps == 0 {
            return invalid("max-walk-steps", "must be at least 1");
        }
        Ok(())
    }

    /// Score every sense receives at initialization.
    pub fn prior(&self) -> Score {
        Score::new(self.prior_mean, self.prior_confidence)
    }
}
