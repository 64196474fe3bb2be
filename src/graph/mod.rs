//! Graph seams - how the ranking engine sees the sense graph.
//!
//! The engine only needs ordered traversal (document → parse → word →
//! sense → edge) and per-sense score storage. Both are traits so any
//! store can back the engine; [`SenseGraph`] is the in-memory one used by
//! the CLI and tests.

mod accessor;
mod file;
mod sense_graph;

pub use accessor::{GraphAccessor, ScoreStore};
pub use file::{EdgeSpec, GraphFile, LoadedGraph, ParseSpec, WordSpec};
pub use sense_graph::SenseGraph;
