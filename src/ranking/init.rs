//! Parse initialization: uniform priors and a fresh convergence tracker.

use tracing::{debug, warn};

use crate::graph::{GraphAccessor, ScoreStore};
use crate::ranking::convergence::ConvergenceTracker;
use crate::types::{ParseId, RankingConfig, SenseId, WordId};

/// A parse whose senses all hold the prior score.
///
/// Owns the convergence tracker every walk of this parse shares.
#[derive(Debug, Clone)]
pub struct InitializedParse {
    pub parse: ParseId,
    pub tracker: ConvergenceTracker,
    /// Word instances with their senses, in parse order.
    pub words: Vec<(WordId, Vec<SenseId>)>,
    /// Word instances without a single candidate sense.
    pub empty_words: Vec<WordId>,
}

impl InitializedParse {
    pub fn sense_count(&self) -> usize {
        self.words.iter().map(|(_, senses)| senses.len()).sum()
    }
}

/// Give every sense of every word in `parse` the configured prior.
///
/// Calling this again discards any ranking progress on the parse.
pub fn init_parse<G>(graph: &mut G, parse: ParseId, config: &RankingConfig) -> InitializedParse
where
    G: GraphAccessor + ScoreStore,
{
    let prior = config.prior();

    let mut words = Vec::new();
    let mut empty_words = Vec::new();
    for word in graph.word_instances(parse) {
        let senses: Vec<SenseId> = graph.senses_of(word).collect();
        if senses.is_empty() {
            warn!(%parse, %word, "word instance has no candidate senses");
            empty_words.push(word);
        } else {
            words.push((word, senses));
        }
    }

    for (_, senses) in &words {
        for &sense in senses {
            graph.set_score(sense, prior);
        }
    }

    let initialized = InitializedParse {
        parse,
        tracker: ConvergenceTracker::from_config(config),
        words,
        empty_words,
    };
    debug!(
        %parse,
        words = initialized.words.len(),
        senses = initialized.sense_count(),
        "parse initialized"
    );
    initialized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SenseGraph;
    use crate::ranking::convergence::UNCONVERGED;
    use crate::types::Score;

    #[test]
    fn test_priors_assigned() {
        let config = RankingConfig::default();
        let mut graph = SenseGraph::new();
        let doc = graph.add_document();
        let parse = graph.add_parse(doc).unwrap();
        let bank = graph.add_word(parse, "bank").unwrap();
        let empty = graph.add_word(parse, "the").unwrap();
        let s1 = graph.add_sense(bank, "bank#1").unwrap();
        let s2 = graph.add_sense(bank, "bank#2").unwrap();
        graph.set_score(s1, Score::new(5.0, 0.1));

        let init = init_parse(&mut graph, parse, &config);

        assert_eq!(graph.score(s1), Some(Score::new(1.0, 0.9)));
        assert_eq!(graph.score(s2), Some(Score::new(1.0, 0.9)));
        assert_eq!(init.empty_words, vec![empty]);
        assert_eq!(init.words, vec![(bank, vec![s1, s2])]);
        assert_eq!(init.sense_count(), 2);
        assert_eq!(init.tracker.value(), UNCONVERGED);
    }

    #[test]
    fn test_leaves_other_parses_alone() {
        let config = RankingConfig::default();
        let mut graph = SenseGraph::new();
        let doc = graph.add_document();
        let p1 = graph.add_parse(doc).unwrap();
        let p2 = graph.add_parse(doc).unwrap();
        let w1 = graph.add_word(p1, "a").unwrap();
        let w2 = graph.add_word(p2, "b").unwrap();
        let a = graph.add_sense(w1, "a#1").unwrap();
        let b = graph.add_sense(w2, "b#1").unwrap();
        graph.set_score(b, Score::new(0.25, 0.5));

        init_parse(&mut graph, p1, &config);
        assert_eq!(graph.score(a), Some(config.prior()));
        assert_eq!(graph.score(b), Some(Score::new(0.25, 0.5)));
    }

    #[test]
    fn test_custom_prior() {
        let config = RankingConfig {
            prior_mean: 0.5,
            prior_confidence: 0.3,
            ..Default::default()
        };
        let mut graph = SenseGraph::new();
        let doc = graph.add_document();
        let parse = graph.add_parse(doc).unwrap();
        let w = graph.add_word(parse, "w").unwrap();
        let s = graph.add_sense(w, "w#1").unwrap();

        init_parse(&mut graph, parse, &config);
        assert_eq!(graph.score(s), Some(Score::new(0.5, 0.3)));
    }
}
