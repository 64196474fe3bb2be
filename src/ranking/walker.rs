//! Random walk over a connected component of the sense graph.
//!
//! Each step updates the current sense, feeds the delta to the parse's
//! convergence tracker, then moves along an outgoing edge chosen with
//! probability proportional to its weight. The update order is therefore
//! the (stochastic) visiting order of the walk.

use rand::Rng;
use tracing::{debug, warn};

use crate::error::RankResult;
use crate::graph::{GraphAccessor, ScoreStore};
use crate::ranking::convergence::ConvergenceTracker;
use crate::ranking::normalizer::{edge_weight, incoming_weight_sum, outgoing_weight_sum};
use crate::ranking::update::update_rank;
use crate::types::{RankingConfig, SenseId};

/// How a single walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The start sense has no incoming weight; nothing was updated.
    Disconnected,
    /// The tracker reported convergence after `steps` updates.
    Converged { steps: usize },
    /// `max-walk-steps` updates ran without convergence. Ranks are left
    /// as they were after the last update.
    StepCapReached { steps: usize },
}

impl WalkOutcome {
    pub fn steps(&self) -> usize {
        match *self {
            WalkOutcome::Disconnected => 0,
            WalkOutcome::Converged { steps } | WalkOutcome::StepCapReached { steps } => steps,
        }
    }
}

/// Counters a walk adds to its parse's report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    pub outcome: WalkOutcome,
    pub degenerate_terms: usize,
}

/// Pick the next sense among the outgoing edges of `sense`.
///
/// Draws u·W with u uniform in [0, 1) and W the total outgoing weight, then
/// takes the first edge at which the running weight sum exceeds the draw.
/// Returns `None` when `sense` has no outgoing weight.
pub fn pick_weighted<G, R>(graph: &G, sense: SenseId, rng: &mut R) -> RankResult<Option<SenseId>>
where
    G: GraphAccessor + ScoreStore,
    R: Rng,
{
    let total = outgoing_weight_sum(graph, sense)?;
    if total <= 0.0 {
        return Ok(None);
    }

    let draw = rng.gen::<f64>() * total;
    let mut edge_sum = 0.0;
    let mut last_positive = None;

    for e in graph.outgoing_edges(sense) {
        let weight = edge_weight(graph, e.edge)?;
        if weight <= 0.0 {
            continue;
        }
        edge_sum += weight;
        last_positive = Some(e.neighbor);
        if draw < edge_sum {
            return Ok(Some(e.neighbor));
        }
    }

    // Only reachable when rounding leaves the running sum at or below the draw
    Ok(last_positive)
}

/// Walk from `start` until `tracker` reports convergence.
///
/// A start sense with no incoming weight, or less than `disconnect-epsilon`,
/// is skipped untouched. A sense with nowhere to go sends the walk back to
/// `start`.
pub fn walk_from<G, R>(
    graph: &mut G,
    start: SenseId,
    config: &RankingConfig,
    tracker: &mut ConvergenceTracker,
    rng: &mut R,
) -> RankResult<WalkSummary>
where
    G: GraphAccessor + ScoreStore,
    R: Rng,
{
    let edge_sum = incoming_weight_sum(graph, start)?;
    if edge_sum <= 0.0 || edge_sum < config.disconnect_epsilon {
        debug!(%start, edge_sum, "disconnected sense, skipping walk");
        return Ok(WalkSummary {
            outcome: WalkOutcome::Disconnected,
            degenerate_terms: 0,
        });
    }
    debug!(%start, converge = tracker.value(), "starting walk");

    let mut current = start;
    let mut steps = 0;
    let mut degenerate_terms = 0;

    loop {
        let update = update_rank(graph, current, config)?;
        tracker.observe(update.delta);
        degenerate_terms += update.degenerate_terms;
        steps += 1;

        if tracker.has_converged() {
            debug!(%start, steps, converge = tracker.value(), "walk converged");
            return Ok(WalkSummary {
                outcome: WalkOutcome::Converged { steps },
                degenerate_terms,
            });
        }
        if steps >= config.max_walk_steps {
            warn!(%start, steps, converge = tracker.value(), "walk hit step cap before converging");
            return Ok(WalkSummary {
                outcome: WalkOutcome::StepCapReached { steps },
                degenerate_terms,
            });
        }

        current = pick_weighted(graph, current, rng)?.unwrap_or(start);
    }
}
