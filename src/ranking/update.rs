//! Single-sense PageRank update.
//!
//! For a sense a with predecessors b:
//!
//! ```text
//! P(a) = (1-d) + d · Σ_b  w(b→a) / W(b) · P(b)
//! ```
//!
//! where W(b) is the total weight entering b. Writing t_ab = w(b→a) / W(b)
//! gives a column-stochastic transition matrix on a symmetric graph, so rank
//! mass passed through the chain is conserved. Ranks range over all senses
//! of all words; the senses of one word are not normalized against each
//! other.
//!
//! Updates are written back immediately, so later updates in the same walk
//! see them (Gauss-Seidel rather than a Jacobi sweep).

use tracing::trace;

use crate::error::{RankError, RankResult};
use crate::graph::{GraphAccessor, ScoreStore};
use crate::ranking::normalizer::{edge_weight, incoming_weight_sum};
use crate::types::{DegenerateNeighbor, RankingConfig, SenseId};

/// Result of updating one sense.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankUpdate {
    pub old_rank: f64,
    pub new_rank: f64,
    /// |new_rank - old_rank|
    pub delta: f64,
    /// Neighbors skipped because their own incoming weight was zero.
    pub degenerate_terms: usize,
}

/// Recompute the rank of `sense` and store it, keeping its confidence.
pub fn update_rank<G>(graph: &mut G, sense: SenseId, config: &RankingConfig) -> RankResult<RankUpdate>
where
    G: GraphAccessor + ScoreStore,
{
    let current = graph.score(sense).ok_or(RankError::UnknownSense(sense))?;
    let (rank_sum, degenerate_terms) = weighted_rank_sum(graph, sense, config.degenerate_neighbor)?;

    let new_rank = config.damping_factor * rank_sum + (1.0 - config.damping_factor);
    let delta = (new_rank - current.mean).abs();

    trace!(%sense, old = current.mean, new = new_rank, delta, "rank update");

    graph.set_score(sense, current.with_mean(new_rank));

    Ok(RankUpdate {
        old_rank: current.mean,
        new_rank,
        delta,
        degenerate_terms,
    })
}

/// Σ_b t_ab · P(b) over every edge b→a, with the count of skipped terms.
///
/// The outer loop walks the edges into `sense`; for each predecessor the
/// normalizer runs its own inner pass over the edges into that predecessor.
fn weighted_rank_sum<G>(
    graph: &G,
    sense: SenseId,
    policy: DegenerateNeighbor,
) -> RankResult<(f64, usize)>
where
    G: GraphAccessor + ScoreStore,
{
    let mut rank_sum = 0.0;
    let mut degenerate = 0;

    for e in graph.incoming_edges(sense) {
        let weight_ab = edge_weight(graph, e.edge)?;
        let edge_sum = incoming_weight_sum(graph, e.neighbor)?;

        if edge_sum <= 0.0 {
            match policy {
                DegenerateNeighbor::Skip => {
                    degenerate += 1;
                    continue;
                }
                DegenerateNeighbor::Fail => {
                    return Err(RankError::DegenerateNeighbor {
                        sense,
                        neighbor: e.neighbor,
                    });
                }
            }
        }

        let p_b = graph
            .score(e.neighbor)
            .ok_or(RankError::UnknownSense(e.neighbor))?
            .mean;
        rank_sum += weight_ab / edge_sum * p_b;
    }

    Ok((rank_sum, degenerate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SenseGraph;
    use crate::types::Score;

    fn pair(weight: f64) -> (SenseGraph, SenseId, SenseId) {
        let mut graph = SenseGraph::new();
        let doc = graph.add_document();
        let parse = graph.add_parse(doc).unwrap();
        let wa = graph.add_word(parse, "a").unwrap();
        let wb = graph.add_word(parse, "b").unwrap();
        let a = graph.add_sense(wa, "a#1").unwrap();
        let b = graph.add_sense(wb, "b#1").unwrap();
        graph.add_similarity(a, b, weight).unwrap();
        graph.set_score(a, Score::new(1.0, 0.9));
        graph.set_score(b, Score::new(1.0, 0.9));
        (graph, a, b)
    }

    #[test]
    fn test_symmetric_pair_is_fixed_point() {
        let config = RankingConfig::default();
        let (mut graph, a, b) = pair(1.0);

        let update = update_rank(&mut graph, a, &config).unwrap();
        assert!((update.new_rank - 1.0).abs() < 1e-12);
        assert!(update.delta < 1e-12);

        let update = update_rank(&mut graph, b, &config).unwrap();
        assert!(update.delta < 1e-12);
        assert_eq!(graph.score(b).unwrap().confidence, 0.9);
    }

    #[test]
    fn test_formula_with_uneven_weights() {
        // b1 feeds a1 (w=2) and a2 (w=1); W(b1) = 3
        let config = RankingConfig::default();
        let mut graph = SenseGraph::new();
        let doc = graph.add_document();
        let parse = graph.add_parse(doc).unwrap();
        let wa = graph.add_word(parse, "a").unwrap();
        let wb = graph.add_word(parse, "b").unwrap();
        let a1 = graph.add_sense(wa, "a#1").unwrap();
        let a2 = graph.add_sense(wa, "a#2").unwrap();
        let b1 = graph.add_sense(wb, "b#1").unwrap();
        graph.add_similarity(a1, b1, 2.0).unwrap();
        graph.add_similarity(a2, b1, 1.0).unwrap();
        for s in [a1, a2, b1] {
            graph.set_score(s, Score::new(1.0, 0.9));
        }

        let update = update_rank(&mut graph, a1, &config).unwrap();
        let expected = 0.9 * (2.0 / 3.0) * 1.0 + 0.1;
        assert!((update.new_rank - expected).abs() < 1e-12);
        assert!((update.delta - (1.0 - expected)).abs() < 1e-12);

        // b1 sees the freshly written a1
        let update = update_rank(&mut graph, b1, &config).unwrap();
        let expected_b = 0.9 * (2.0 / 2.0 * expected + 1.0 / 1.0 * 1.0) + 0.1;
        assert!((update.new_rank - expected_b).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_preserved() {
        let config = RankingConfig::default();
        let (mut graph, a, _) = pair(1.0);
        graph.set_score(a, Score::new(0.3, 0.42));

        update_rank(&mut graph, a, &config).unwrap();
        assert_eq!(graph.score(a).unwrap().confidence, 0.42);
    }

    /// a has an edge from b, but nothing enters b.
    fn dangling_predecessor() -> (SenseGraph, SenseId, SenseId) {
        let mut graph = SenseGraph::new();
        let doc = graph.add_document();
        let parse = graph.add_parse(doc).unwrap();
        let w = graph.add_word(parse, "w").unwrap();
        let a = graph.add_sense(w, "a").unwrap();
        let b = graph.add_sense(w, "b").unwrap();
        graph.add_edge(b, a, 1.0).unwrap();
        graph.set_score(a, Score::new(1.0, 0.9));
        graph.set_score(b, Score::new(1.0, 0.9));
        (graph, a, b)
    }

    #[test]
    fn test_degenerate_neighbor_skipped() {
        let config = RankingConfig::default();
        let (mut graph, a, _) = dangling_predecessor();

        let update = update_rank(&mut graph, a, &config).unwrap();
        assert_eq!(update.degenerate_terms, 1);
        assert!((update.new_rank - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_neighbor_fails_when_strict() {
        let config = RankingConfig {
            degenerate_neighbor: DegenerateNeighbor::Fail,
            ..Default::default()
        };
        let (mut graph, a, b) = dangling_predecessor();

        assert_eq!(
            update_rank(&mut graph, a, &config),
            Err(RankError::DegenerateNeighbor { sense: a, neighbor: b })
        );
        // Nothing written on failure
        assert_eq!(graph.score(a).unwrap().mean, 1.0);
    }

    #[test]
    fn test_unknown_sense() {
        let config = RankingConfig::default();
        let mut graph = SenseGraph::new();
        assert_eq!(
            update_rank(&mut graph, SenseId(3), &config),
            Err(RankError::UnknownSense(SenseId(3)))
        );
    }
}
