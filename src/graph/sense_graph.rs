//! In-memory sense graph.
//!
//! Senses are petgraph nodes carrying their score; similarity relations are
//! weighted directed edges. Documents, parses and word instances are plain
//! ordered lists of handles layered on top.

use std::collections::HashMap;
use std::sync::Arc;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::error::{RankError, RankResult};
use crate::graph::{GraphAccessor, ScoreStore};
use crate::types::{DocumentId, EdgeId, ParseId, Score, SenseEdge, SenseId, WordId};

#[derive(Debug, Clone)]
struct SenseNode {
    label: Arc<str>,
    word: WordId,
    score: Score,
}

#[derive(Debug, Clone)]
struct WordInstance {
    token: Arc<str>,
    parse: ParseId,
    senses: Vec<SenseId>,
}

/// Sense graph with scores stored on the nodes.
///
/// Handles are dense indices, so they stay valid for the lifetime of the
/// graph (nothing is ever removed).
#[derive(Debug, Clone, Default)]
pub struct SenseGraph {
    graph: DiGraph<SenseNode, f64>,
    documents: Vec<Vec<ParseId>>,
    parses: Vec<Vec<WordId>>,
    words: Vec<WordInstance>,
    /// Fast lookup: label -> sense (first sense added under a label wins)
    labels: HashMap<Arc<str>, SenseId>,
}

impl SenseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self) -> DocumentId {
        self.documents.push(Vec::new());
        DocumentId(self.documents.len() - 1)
    }

    /// Append a new, empty parse to `document`.
    pub fn add_parse(&mut self, document: DocumentId) -> RankResult<ParseId> {
        let parse = ParseId(self.parses.len());
        let parses = self
            .documents
            .get_mut(document.0)
            .ok_or(RankError::UnknownDocument(document))?;
        parses.push(parse);
        self.parses.push(Vec::new());
        Ok(parse)
    }

    pub fn add_word(&mut self, parse: ParseId, token: impl Into<Arc<str>>) -> RankResult<WordId> {
        let word = WordId(self.words.len());
        let words = self
            .parses
            .get_mut(parse.0)
            .ok_or(RankError::UnknownParse(parse))?;
        words.push(word);
        self.words.push(WordInstance {
            token: token.into(),
            parse,
            senses: Vec::new(),
        });
        Ok(word)
    }

    /// Add a candidate sense to `word`, scored at zero until initialized.
    pub fn add_sense(&mut self, word: WordId, label: impl Into<Arc<str>>) -> RankResult<SenseId> {
        let instance = self
            .words
            .get_mut(word.0)
            .ok_or(RankError::UnknownWord(word))?;
        let label = label.into();
        let idx = self.graph.add_node(SenseNode {
            label: Arc::clone(&label),
            word,
            score: Score::new(0.0, 0.0),
        });
        let sense = SenseId(idx.index());
        instance.senses.push(sense);
        self.labels.entry(label).or_insert(sense);
        Ok(sense)
    }

    /// Add a directed edge `from -> to`.
    pub fn add_edge(&mut self, from: SenseId, to: SenseId, weight: f64) -> RankResult<EdgeId> {
        if !(weight.is_finite() && weight >= 0.0) {
            return Err(RankError::InvalidEdge { from, to, weight });
        }
        let (a, b) = (NodeIndex::new(from.0), NodeIndex::new(to.0));
        if self.graph.node_weight(a).is_none() {
            return Err(RankError::UnknownSense(from));
        }
        if self.graph.node_weight(b).is_none() {
            return Err(RankError::UnknownSense(to));
        }
        Ok(EdgeId(self.graph.add_edge(a, b, weight).index()))
    }

    /// Add a symmetric similarity: one edge in each direction.
    pub fn add_similarity(
        &mut self,
        a: SenseId,
        b: SenseId,
        weight: f64,
    ) -> RankResult<(EdgeId, EdgeId)> {
        let forward = self.add_edge(a, b, weight)?;
        let backward = self.add_edge(b, a, weight)?;
        Ok((forward, backward))
    }

    pub fn sense_label(&self, sense: SenseId) -> Option<&str> {
        self.graph
            .node_weight(NodeIndex::new(sense.0))
            .map(|n| n.label.as_ref())
    }

    /// Word instance a sense belongs to.
    pub fn sense_word(&self, sense: SenseId) -> Option<WordId> {
        self.graph.node_weight(NodeIndex::new(sense.0)).map(|n| n.word)
    }

    pub fn word_token(&self, word: WordId) -> Option<&str> {
        self.words.get(word.0).map(|w| w.token.as_ref())
    }

    pub fn word_parse(&self, word: WordId) -> Option<ParseId> {
        self.words.get(word.0).map(|w| w.parse)
    }

    pub fn find_sense(&self, label: &str) -> Option<SenseId> {
        self.labels.get(label).copied()
    }

    pub fn sense_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl GraphAccessor for SenseGraph {
    fn parses(&self, document: DocumentId) -> impl Iterator<Item = ParseId> + '_ {
        self.documents
            .get(document.0)
            .into_iter()
            .flat_map(|parses| parses.iter().copied())
    }

    fn word_instances(&self, parse: ParseId) -> impl Iterator<Item = WordId> + '_ {
        self.parses
            .get(parse.0)
            .into_iter()
            .flat_map(|words| words.iter().copied())
    }

    fn senses_of(&self, word: WordId) -> impl Iterator<Item = SenseId> + '_ {
        self.words
            .get(word.0)
            .into_iter()
            .flat_map(|w| w.senses.iter().copied())
    }

    fn outgoing_edges(&self, sense: SenseId) -> impl Iterator<Item = SenseEdge> + '_ {
        self.graph
            .edges_directed(NodeIndex::new(sense.0), Direction::Outgoing)
            .map(|e| SenseEdge {
                neighbor: SenseId(e.target().index()),
                edge: EdgeId(e.id().index()),
            })
    }

    fn incoming_edges(&self, sense: SenseId) -> impl Iterator<Item = SenseEdge> + '_ {
        self.graph
            .edges_directed(NodeIndex::new(sense.0), Direction::Incoming)
            .map(|e| SenseEdge {
                neighbor: SenseId(e.source().index()),
                edge: EdgeId(e.id().index()),
            })
    }
}

impl ScoreStore for SenseGraph {
    fn score(&self, sense: SenseId) -> Option<Score> {
        self.graph.node_weight(NodeIndex::new(sense.0)).map(|n| n.score)
    }

    fn set_score(&mut self, sense: SenseId, score: Score) {
        if let Some(node) = self.graph.node_weight_mut(NodeIndex::new(sense.0)) {
            node.score = score;
        }
    }

    fn edge_weight(&self, edge: EdgeId) -> Option<f64> {
        self.graph.edge_weight(EdgeIndex::new(edge.0)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_traversal_order() {
        let mut graph = SenseGraph::new();
        let doc = graph.add_document();
        let p1 = graph.add_parse(doc).unwrap();
        let p2 = graph.add_parse(doc).unwrap();
        let bank = graph.add_word(p1, "bank").unwrap();
        let river = graph.add_word(p1, "river").unwrap();
        let s1 = graph.add_sense(bank, "bank#1").unwrap();
        let s2 = graph.add_sense(bank, "bank#2").unwrap();
        graph.add_sense(river, "river#1").unwrap();

        assert_eq!(graph.parses(doc).collect::<Vec<_>>(), vec![p1, p2]);
        assert_eq!(graph.word_instances(p1).collect::<Vec<_>>(), vec![bank, river]);
        assert_eq!(graph.word_instances(p2).count(), 0);
        assert_eq!(graph.senses_of(bank).collect::<Vec<_>>(), vec![s1, s2]);
        assert_eq!(graph.word_token(river), Some("river"));
        assert_eq!(graph.word_parse(river), Some(p1));
        assert_eq!(graph.sense_word(s2), Some(bank));
        assert_eq!(graph.find_sense("bank#2"), Some(s2));
    }

    #[test]
    fn test_edge_directions() {
        let mut graph = SenseGraph::new();
        let doc = graph.add_document();
        let parse = graph.add_parse(doc).unwrap();
        let w = graph.add_word(parse, "w").unwrap();
        let a = graph.add_sense(w, "a").unwrap();
        let b = graph.add_sense(w, "b").unwrap();

        let edge = graph.add_edge(a, b, 0.5).unwrap();

        let out: Vec<_> = graph.outgoing_edges(a).collect();
        assert_eq!(out, vec![SenseEdge { neighbor: b, edge }]);
        let inc: Vec<_> = graph.incoming_edges(b).collect();
        assert_eq!(inc, vec![SenseEdge { neighbor: a, edge }]);
        assert_eq!(graph.incoming_edges(a).count(), 0);
        assert_eq!(graph.edge_weight(edge), Some(0.5));
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let mut graph = SenseGraph::new();
        let doc = graph.add_document();
        let parse = graph.add_parse(doc).unwrap();
        let w = graph.add_word(parse, "w").unwrap();
        let a = graph.add_sense(w, "a").unwrap();
        let b = graph.add_sense(w, "b").unwrap();

        graph.add_similarity(a, b, 2.0).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.outgoing_edges(a).count(), 1);
        assert_eq!(graph.incoming_edges(a).count(), 1);
    }

    #[test]
    fn test_rejects_bad_edges() {
        let mut graph = SenseGraph::new();
        let doc = graph.add_document();
        let parse = graph.add_parse(doc).unwrap();
        let w = graph.add_word(parse, "w").unwrap();
        let a = graph.add_sense(w, "a").unwrap();

        assert!(matches!(
            graph.add_edge(a, a, -1.0),
            Err(RankError::InvalidEdge { .. })
        ));
        assert!(matches!(
            graph.add_edge(a, a, f64::NAN),
            Err(RankError::InvalidEdge { .. })
        ));
        assert_eq!(
            graph.add_edge(a, SenseId(99), 1.0),
            Err(RankError::UnknownSense(SenseId(99)))
        );
    }

    #[test]
    fn test_rejects_unknown_parents() {
        let mut graph = SenseGraph::new();
        let doc = graph.add_document();
        let parse = graph.add_parse(doc).unwrap();
        graph.add_word(parse, "w").unwrap();

        assert_eq!(
            graph.add_parse(DocumentId(7)),
            Err(RankError::UnknownDocument(DocumentId(7)))
        );
        assert_eq!(
            graph.add_word(ParseId(3), "x"),
            Err(RankError::UnknownParse(ParseId(3)))
        );
        assert_eq!(
            graph.add_sense(WordId(5), "x#1"),
            Err(RankError::UnknownWord(WordId(5)))
        );

        // Nothing was left behind by the rejected inserts
        assert_eq!(graph.parses(doc).collect::<Vec<_>>(), vec![parse]);
        assert_eq!(graph.word_instances(parse).count(), 1);
        assert_eq!(graph.sense_count(), 0);
        assert_eq!(graph.find_sense("x#1"), None);
        assert_eq!(graph.add_parse(doc), Ok(ParseId(1)));
    }

    #[test]
    fn test_scores_round_trip_through_store() {
        let mut graph = SenseGraph::new();
        let doc = graph.add_document();
        let parse = graph.add_parse(doc).unwrap();
        let w = graph.add_word(parse, "w").unwrap();
        let a = graph.add_sense(w, "a").unwrap();

        graph.set_score(a, Score::new(0.7, 0.9));
        assert_eq!(graph.score(a), Some(Score::new(0.7, 0.9)));
        assert_eq!(graph.score(SenseId(42)), None);
    }
}
