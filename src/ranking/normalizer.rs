//! Edge-weight sums used to normalize rank contributions.
//!
//! Sums are recomputed on every call. Nothing is cached because the whole
//! point of the walk is that the graph state keeps moving underneath it.

use crate::error::{RankError, RankResult};
use crate::graph::{GraphAccessor, ScoreStore};
use crate::types::{EdgeId, SenseId};

/// Weight of `edge`, checked to be finite and non-negative.
pub(crate) fn edge_weight<G: ScoreStore + ?Sized>(graph: &G, edge: EdgeId) -> RankResult<f64> {
    let weight = graph.edge_weight(edge).ok_or(RankError::UnknownEdge(edge))?;
    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err(RankError::InvalidWeight { edge, weight })
    }
}

/// Sum of weights of every edge terminating at `sense`, or 0 with none.
///
/// Callers dividing by this must check for zero first.
pub fn incoming_weight_sum<G>(graph: &G, sense: SenseId) -> RankResult<f64>
where
    G: GraphAccessor + ScoreStore,
{
    graph
        .incoming_edges(sense)
        .try_fold(0.0, |sum, e| Ok(sum + edge_weight(graph, e.edge)?))
}

/// Sum of weights of every edge leaving `sense`.
pub fn outgoing_weight_sum<G>(graph: &G, sense: SenseId) -> RankResult<f64>
where
    G: GraphAccessor + ScoreStore,
{
    graph
        .outgoing_edges(sense)
        .try_fold(0.0, |sum, e| Ok(sum + edge_weight(graph, e.edge)?))
}
