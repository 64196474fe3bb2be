//! Traversal and score-storage traits consumed by the ranking engine.

use crate::types::{DocumentId, EdgeId, ParseId, Score, SenseEdge, SenseId, WordId};

/// Ordered, restartable traversal over a sense graph.
///
/// Every method returns a fresh iterator; callers stop early by breaking
/// out of the loop. Iteration order must be stable between calls because
/// the weighted walk accumulates weights in that order.
pub trait GraphAccessor {
    /// Parses of a document, in document order.
    fn parses(&self, document: DocumentId) -> impl Iterator<Item = ParseId> + '_;

    /// Word instances of a parse.
    fn word_instances(&self, parse: ParseId) -> impl Iterator<Item = WordId> + '_;

    /// Candidate senses of a word instance.
    fn senses_of(&self, word: WordId) -> impl Iterator<Item = SenseId> + '_;

    /// Edges leaving `sense`; `neighbor` is the edge target.
    fn outgoing_edges(&self, sense: SenseId) -> impl Iterator<Item = SenseEdge> + '_;

    /// Edges ending at `sense`; `neighbor` is the edge source.
    fn incoming_edges(&self, sense: SenseId) -> impl Iterator<Item = SenseEdge> + '_;
}

/// Per-sense (mean, confidence) storage plus edge weights.
pub trait ScoreStore {
    fn score(&self, sense: SenseId) -> Option<Score>;

    fn set_score(&mut self, sense: SenseId, score: Score);

    fn edge_weight(&self, edge: EdgeId) -> Option<f64>;
}
