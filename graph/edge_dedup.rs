/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Undirected edge deduplication.
//!
//! `(a, b)` and `(b, a)` name the same logical pair; at most one edge may
//! exist per pair.

use petgraph::Directed;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use super::NodeKey;

/// Order-independent key for an endpoint pair.
pub(crate) fn logical_pair_key(a: NodeKey, b: NodeKey) -> (NodeKey, NodeKey) {
    if a.index() <= b.index() { (a, b) } else { (b, a) }
}

/// True if `(a, b)` equals `(x, y)` in either orientation.
pub(crate) fn matching(a: NodeKey, b: NodeKey, x: NodeKey, y: NodeKey) -> bool {
    logical_pair_key(a, b) == logical_pair_key(x, y)
}

/// True if an edge already joins `a` and `b` in either direction.
pub(crate) fn connected<N, E>(graph: &StableGraph<N, E, Directed>, a: NodeKey, b: NodeKey) -> bool {
    graph
        .edge_references()
        .any(|edge| matching(a, b, edge.source(), edge.target()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_edge() -> (StableGraph<(), (), Directed>, NodeKey, NodeKey, NodeKey) {
        let mut graph = StableGraph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        graph.add_edge(a, b, ());
        (graph, a, b, c)
    }

    #[test]
    fn pair_key_ignores_orientation() {
        let (_, a, b, _) = graph_with_edge();
        assert_eq!(logical_pair_key(a, b), logical_pair_key(b, a));
    }

    #[test]
    fn connected_is_symmetric() {
        let (graph, a, b, c) = graph_with_edge();
        assert!(connected(&graph, a, b));
        assert!(connected(&graph, b, a));
        assert!(!connected(&graph, a, c));
        assert!(!connected(&graph, c, b));
    }

    #[test]
    fn self_loop_matches_only_itself() {
        let mut graph: StableGraph<(), (), Directed> = StableGraph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph.add_edge(a, a, ());
        assert!(connected(&graph, a, a));
        assert!(!connected(&graph, a, b));
    }
}
