//! senserank - PageRank over word-sense graphs
//!
//! Ranks the candidate senses of every word in a parsed sentence by the
//! stationary probability of a damped random walk over weighted
//! sense-similarity edges.
//!
//! # Architecture
//!
//! ```text
//! Graph store → Init priors → Walk from each word → Update rank → Converged?
//!      ↓             ↓                ↓                  ↓             ↓
//!  GraphAccessor  uniform        weighted edge      damped PageRank   decaying
//!  + ScoreStore   (1.0, 0.9)     choice (rand)      (Gauss-Seidel)    average
//! ```
//!
//! The store is a pair of traits; [`SenseGraph`] is an in-memory petgraph
//! implementation. Ranked scores are written back into the store.

pub mod config;
pub mod error;
pub mod graph;
pub mod ranking;
pub mod types;

// Re-export core types
pub use error::{RankError, RankResult};
pub use types::{
    DegenerateNeighbor, DocumentId, EdgeId, ParseId, RankingConfig, Score, SenseEdge, SenseId,
    WalkStart, WordId,
};

pub use graph::{GraphAccessor, GraphFile, ScoreStore, SenseGraph};
pub use ranking::{DocumentReport, ParseReport, SenseRanker};
