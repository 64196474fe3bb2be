//! JSON graph files.
//!
//! ```json
//! {
//!   "parses": [
//!     { "words": [ { "token": "bank", "senses": ["bank#1", "bank#2"] } ] }
//!   ],
//!   "edges": [
//!     { "from": "bank#1", "to": "river#1", "weight": 0.7 }
//!   ]
//! }
//! ```
//!
//! Sense labels are unique across the file and edges refer to them by label.
//! Edges are symmetric unless `"directed": true`. All parses land in a
//! single document.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{RankError, RankResult};
use crate::graph::SenseGraph;
use crate::types::{DocumentId, SenseId};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphFile {
    pub parses: Vec<ParseSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParseSpec {
    pub words: Vec<WordSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WordSpec {
    pub token: String,
    #[serde(default)]
    pub senses: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    pub weight: f64,
    #[serde(default)]
    pub directed: bool,
}

/// A graph built from a [`GraphFile`], plus the document holding its parses.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: SenseGraph,
    pub document: DocumentId,
}

impl GraphFile {
    pub fn load(path: &Path) -> RankResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RankError::GraphFile(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> RankResult<Self> {
        serde_json::from_str(content).map_err(|e| RankError::GraphFile(e.to_string()))
    }

    /// Resolve labels and build the in-memory graph.
    pub fn build(&self) -> RankResult<LoadedGraph> {
        let mut graph = SenseGraph::new();
        let document = graph.add_document();
        let mut by_label: HashMap<&str, SenseId> = HashMap::new();

        for parse_spec in &self.parses {
            let parse = graph.add_parse(document)?;
            for word_spec in &parse_spec.words {
                let word = graph.add_word(parse, word_spec.token.as_str())?;
                for label in &word_spec.senses {
                    if by_label.contains_key(label.as_str()) {
                        return Err(RankError::GraphFile(format!(
                            "duplicate sense label '{}'",
                            label
                        )));
                    }
                    let sense = graph.add_sense(word, label.as_str())?;
                    by_label.insert(label.as_str(), sense);
                }
            }
        }

        let resolve = |label: &str| {
            by_label.get(label).copied().ok_or_else(|| {
                RankError::GraphFile(format!("edge refers to unknown sense '{}'", label))
            })
        };

        for edge in &self.edges {
            let from = resolve(edge.from.as_str())?;
            let to = resolve(edge.to.as_str())?;
            if edge.directed {
                graph.add_edge(from, to, edge.weight)?;
            } else {
                graph.add_similarity(from, to, edge.weight)?;
            }
        }

        Ok(LoadedGraph { graph, document })
    }
}
