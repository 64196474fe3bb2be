//! Sense ranking driver.
//!
//! The driver:
//! 1. Initializes each parse (uniform priors, fresh tracker)
//! 2. Starts a walk from every word instance, so each disconnected
//!    component reached by some word gets sampled
//! 3. Lets the parse's shared tracker decide when each walk stops
//!
//! Components no word starts in are never updated. Results are the mutated
//! scores in the store; the reports only describe how the run went.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use crate::error::RankResult;
use crate::graph::{GraphAccessor, ScoreStore};
use crate::ranking::init::{init_parse, InitializedParse};
use crate::ranking::walker::{walk_from, WalkOutcome};
use crate::types::{DocumentId, ParseId, RankingConfig, SenseId, WalkStart, WordId};

/// How ranking one parse went.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport {
    pub parse: ParseId,
    pub words: usize,
    pub senses: usize,
    /// Walks started, including ones skipped as disconnected.
    pub walks: usize,
    pub disconnected: usize,
    /// Rank updates across all walks.
    pub steps: usize,
    pub degenerate_terms: usize,
    /// False if any walk stopped at the step cap.
    pub converged: bool,
    /// Final value of the convergence accumulator.
    pub convergence: f64,
    /// Word instances skipped for having no senses.
    pub empty_words: Vec<WordId>,
}

/// Per-parse results of ranking a document, in document order.
#[derive(Debug, Clone, Default)]
pub struct DocumentReport {
    pub parses: Vec<(ParseId, RankResult<ParseReport>)>,
}

impl DocumentReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ParseReport> {
        self.parses.iter().filter_map(|(_, r)| r.as_ref().ok())
    }

    pub fn failure_count(&self) -> usize {
        self.parses.iter().filter(|(_, r)| r.is_err()).count()
    }
}

/// PageRank-based word-sense ranker.
///
/// Owns its random source, so independent rankers never share state.
/// Seeding it makes runs reproducible.
pub struct SenseRanker<R = ChaCha8Rng> {
    config: RankingConfig,
    rng: R,
}

impl SenseRanker<ChaCha8Rng> {
    /// Ranker with the configured seed, or an entropy seed when unset.
    pub fn new(config: RankingConfig) -> RankResult<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn seeded(config: RankingConfig, seed: u64) -> RankResult<Self> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> SenseRanker<R> {
    pub fn with_rng(config: RankingConfig, rng: R) -> RankResult<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Initialize `parse` and walk it to convergence.
    pub fn rank_sentence<G>(&mut self, graph: &mut G, parse: ParseId) -> RankResult<ParseReport>
    where
        G: GraphAccessor + ScoreStore,
    {
        let initialized = init_parse(graph, parse, &self.config);
        self.rank_parse(graph, initialized)
    }

    /// Rank several parses, each with its own convergence tracker.
    ///
    /// Every parse is initialized before any is ranked. A failure is
    /// recorded for its parse and the remaining parses still run.
    pub fn rank_document<G>(&mut self, graph: &mut G, parses: &[ParseId]) -> DocumentReport
    where
        G: GraphAccessor + ScoreStore,
    {
        let initialized: Vec<InitializedParse> = parses
            .iter()
            .map(|&parse| init_parse(graph, parse, &self.config))
            .collect();

        let mut report = DocumentReport::default();
        for init in initialized {
            let parse = init.parse;
            let result = self.rank_parse(graph, init);
            report.parses.push((parse, result));
        }
        report
    }

    /// Rank every parse of a stored document.
    pub fn rank_stored_document<G>(&mut self, graph: &mut G, document: DocumentId) -> DocumentReport
    where
        G: GraphAccessor + ScoreStore,
    {
        let parses: Vec<ParseId> = graph.parses(document).collect();
        self.rank_document(graph, &parses)
    }

    fn rank_parse<G>(&mut self, graph: &mut G, init: InitializedParse) -> RankResult<ParseReport>
    where
        G: GraphAccessor + ScoreStore,
    {
        let InitializedParse {
            parse,
            mut tracker,
            words,
            empty_words,
        } = init;

        let mut report = ParseReport {
            parse,
            words: words.len(),
            senses: words.iter().map(|(_, s)| s.len()).sum(),
            walks: 0,
            disconnected: 0,
            steps: 0,
            degenerate_terms: 0,
            converged: true,
            convergence: tracker.value(),
            empty_words,
        };

        for (_, senses) in &words {
            let starts: &[SenseId] = match self.config.walk_start {
                WalkStart::FirstSense => &senses[..1],
                WalkStart::EverySense => senses.as_slice(),
            };
            for &start in starts {
                let summary = walk_from(graph, start, &self.config, &mut tracker, &mut self.rng)?;
                report.walks += 1;
                report.steps += summary.outcome.steps();
                report.degenerate_terms += summary.degenerate_terms;
                match summary.outcome {
                    WalkOutcome::Disconnected => report.disconnected += 1,
                    WalkOutcome::StepCapReached { .. } => report.converged = false,
                    WalkOutcome::Converged { .. } => {}
                }
            }
        }

        report.convergence = tracker.value();

        info!(
            %parse,
            words = report.words,
            walks = report.walks,
            disconnected = report.disconnected,
            steps = report.steps,
            converged = report.converged,
            "parse ranked"
        );
        Ok(report)
    }
}
