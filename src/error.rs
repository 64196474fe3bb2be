//! Error types for sense ranking.
//!
//! Conditions the engine handles locally (disconnected senses, words without
//! senses, exhausted step caps) are reported through [`crate::ranking`]
//! outcomes instead. Everything here is a failure of one parse.

use thiserror::Error;

use crate::types::{DocumentId, EdgeId, ParseId, SenseId, WordId};

/// Result type alias for ranking operations.
pub type RankResult<T> = Result<T, RankError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankError {
    // ========== Store lookups ==========
    /// The store has no score for this sense.
    #[error("Unknown sense: {0}")]
    UnknownSense(SenseId),

    #[error("Unknown document: {0}")]
    UnknownDocument(DocumentId),

    #[error("Unknown parse: {0}")]
    UnknownParse(ParseId),

    #[error("Unknown word instance: {0}")]
    UnknownWord(WordId),

    /// The store has no weight for this edge.
    #[error("Unknown edge: {0}")]
    UnknownEdge(EdgeId),

    /// Edge weights must be finite and non-negative.
    #[error("Invalid weight {weight} on {edge}")]
    InvalidWeight { edge: EdgeId, weight: f64 },

    /// Rejected at insertion, before the edge got a handle.
    #[error("Invalid weight {weight} for edge {from} -> {to}")]
    InvalidEdge { from: SenseId, to: SenseId, weight: f64 },

    // ========== Numerics ==========
    /// A neighbor feeding into `sense` has zero incoming weight, so its
    /// normalized contribution is undefined.
    #[error("Neighbor {neighbor} of {sense} has zero incoming weight")]
    DegenerateNeighbor { sense: SenseId, neighbor: SenseId },

    // ========== Configuration ==========
    #[error("Invalid config value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Config file could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// Graph file could not be read, parsed or resolved.
    #[error("Graph file error: {0}")]
    GraphFile(String),
}
