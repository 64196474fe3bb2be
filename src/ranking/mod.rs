//! Ranking pipeline - from uniform priors to stationary sense ranks.
//!
//! The ranking system combines:
//! - Initialization of every sense to a uniform prior
//! - A damped, weight-normalized PageRank update per sense
//! - A weighted random walk choosing which sense to update next
//! - An exponentially decaying average of update sizes to stop the walk

mod convergence;
mod init;
mod normalizer;
mod ranker;
mod update;
mod walker;

pub use convergence::{ConvergenceTracker, UNCONVERGED};
pub use init::{init_parse, InitializedParse};
pub use normalizer::{incoming_weight_sum, outgoing_weight_sum};
pub use ranker::{DocumentReport, ParseReport, SenseRanker};
pub use update::{update_rank, RankUpdate};
pub use walker::{pick_weighted, walk_from, WalkOutcome, WalkSummary};
