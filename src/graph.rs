use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use itertools::Itertools;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::{Error, Result};
use crate::key::NodeKey;
use crate::path;
use crate::weight::Weight;

/// A directed weighted graph.
///
/// Nodes live in a dense index arena (a `petgraph` graph) next to an ordered map from node keys
/// to their indices. There is at most one edge per ordered pair of nodes and self-loops are never
/// stored. Weights are read as capacities, costs or distances depending on the solver.
#[derive(Clone, Debug)]
pub struct Graph<N, W> {
    inner: DiGraph<N, W>,
    index: BTreeMap<N, NodeIndex>,
}

impl<N, W> Default for Graph<N, W> {
    fn default() -> Self {
        Self {
            inner: DiGraph::default(),
            index: BTreeMap::new(),
        }
    }
}

impl<N, W> Graph<N, W>
where
    N: NodeKey,
    W: Weight,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a list of `(source, target, weight)` triples.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N, W)>,
    {
        edges.into_iter().fold(Self::new(), |mut acc, (u, v, w)| {
            acc.add_edge(u, v, w);
            acc
        })
    }

    /// Builds a graph from an adjacency mapping `node -> {node: weight}`. Every key becomes a node
    /// even if it has no outgoing edges.
    pub fn from_adjacency<I, A>(adjacency: I) -> Self
    where
        I: IntoIterator<Item = (N, A)>,
        A: IntoIterator<Item = (N, W)>,
    {
        let mut graph = Self::new();
        for (u, targets) in adjacency {
            graph.add_node(u.clone());
            for (v, w) in targets {
                graph.add_edge(u.clone(), v, w);
            }
        }
        graph
    }

    pub fn add_node(&mut self, node: N) {
        self.ensure_node(node);
    }

    fn ensure_node(&mut self, node: N) -> NodeIndex {
        if let Some(ix) = self.index.get(&node) {
            return *ix;
        }
        let ix = self.inner.add_node(node.clone());
        self.index.insert(node, ix);
        ix
    }

    /// Inserts the edge `u -> v`, overwriting the weight of an existing one.
    ///
    /// Self-loops are ignored (their endpoint is still added as a node) and `false` is returned.
    pub fn add_edge(&mut self, u: N, v: N, weight: W) -> bool {
        if u == v {
            log::warn!("ignoring self-loop on {u:?}");
            self.ensure_node(u);
            return false;
        }

        let a = self.ensure_node(u);
        let b = self.ensure_node(v);
        if let Some(e) = self.inner.find_edge(a, b) {
            log::warn!(
                "overwriting edge {:?} -> {:?} ({} => {weight})",
                self.inner[a],
                self.inner[b],
                self.inner[e]
            );
            self.inner[e] = weight;
        } else {
            self.inner.add_edge(a, b, weight);
        }
        true
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    pub fn nodes(&self) -> BTreeSet<N> {
        self.index.keys().cloned().collect()
    }

    /// All edges as `(source, target, weight)` triples, in insertion order.
    pub fn edges(&self) -> Vec<(N, N, W)> {
        self.inner
            .edge_references()
            .map(|e| {
                (
                    self.inner[e.source()].clone(),
                    self.inner[e.target()].clone(),
                    *e.weight(),
                )
            })
            .collect()
    }

    pub fn edge(&self, u: &N, v: &N) -> Option<W> {
        let a = self.index_of(u)?;
        let b = self.index_of(v)?;
        self.inner.find_edge(a, b).map(|e| self.inner[e])
    }

    /// Sums the edge weights along consecutive pairs of `path`.
    pub fn distance_from_path(&self, path: &[N]) -> Result<W> {
        path.iter().tuple_windows().try_fold(W::zero(), |acc, (u, v)| {
            acc.try_add(self.existing_edge(u, v)?)
                .ok_or(Error::ArithmeticOverflow)
        })
    }

    /// Checks that every consecutive pair of `path` is an edge, reporting the first one that
    /// isn't.
    pub fn check_path(&self, path: &[N]) -> Result<()> {
        for node in path {
            self.index_of(node)
                .ok_or_else(|| Error::node_not_found(node))?;
        }
        path.iter()
            .tuple_windows()
            .try_for_each(|(u, v)| self.existing_edge(u, v).map(|_| ()))
    }

    /// Whether every consecutive pair of `path` is an edge. The sequence may be open or closed.
    pub fn has_path(&self, path: &[N]) -> bool {
        self.check_path(path).is_ok()
    }

    /// Whether `b` is a rotation of `a` or of `a` reversed.
    pub fn same_path(&self, a: &[N], b: &[N]) -> bool {
        path::same_path(a, b)
    }

    fn existing_edge(&self, u: &N, v: &N) -> Result<W> {
        self.edge(u, v).ok_or_else(|| Error::missing_edge(u, v))
    }

    pub(crate) fn index_of(&self, node: &N) -> Option<NodeIndex> {
        self.index.get(node).copied()
    }

    /// Same as `index_of` but fails with `NodeNotFound`.
    pub(crate) fn require(&self, node: &N) -> Result<NodeIndex> {
        self.index_of(node).ok_or_else(|| Error::node_not_found(node))
    }

    pub(crate) fn key(&self, ix: NodeIndex) -> &N {
        &self.inner[ix]
    }

    pub(crate) fn inner(&self) -> &DiGraph<N, W> {
        &self.inner
    }

    /// A graph over the same nodes and edges carrying `weights`, indexed like `edges()`.
    pub(crate) fn reweighted(&self, weights: &[W]) -> Self {
        debug_assert_eq!(weights.len(), self.edge_count());
        Self {
            inner: self.inner.map(|_, n| n.clone(), |e, _| weights[e.index()]),
            index: self.index.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    fn triangle() -> Graph<i32, i32> {
        Graph::from_edges([(1, 2, 3), (2, 3, 4), (3, 1, 5)])
    }

    #[test]
    fn edge_list_and_adjacency_build_the_same_graph() {
        let adjacency: BTreeMap<i32, BTreeMap<i32, i32>> = [
            (1, [(2, 3)].into_iter().collect()),
            (2, [(3, 4)].into_iter().collect()),
            (3, [(1, 5)].into_iter().collect()),
        ]
        .into_iter()
        .collect();
        let g = Graph::from_adjacency(adjacency);

        assert_eq!(g.nodes(), triangle().nodes());
        assert_eq!(g.edges(), triangle().edges());
    }

    #[test]
    fn self_loops_are_ignored() {
        let mut g = triangle();
        assert!(!g.add_edge(4, 4, 0));
        assert!(g.contains_node(&4));
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edge(&4, &4), None);
    }

    #[test]
    fn duplicate_edges_overwrite() {
        let mut g = triangle();
        assert!(g.add_edge(1, 2, 10));
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edge(&1, &2), Some(10));
        assert_eq!(g.edges()[0], (1, 2, 10));
    }

    #[test]
    fn distance_along_a_path() {
        let g = triangle();
        assert_eq!(g.distance_from_path(&[1, 2, 3, 1]), Ok(12));
        assert_eq!(g.distance_from_path(&[2]), Ok(0));
        assert_eq!(
            g.distance_from_path(&[1, 3]),
            Err(Error::MissingEdge("1 -> 3".into()))
        );
    }

    #[test]
    fn path_distance_overflow_is_an_error() {
        let g = Graph::from_edges([(1, 2, i32::MAX), (2, 1, 1)]);
        assert_eq!(g.distance_from_path(&[1, 2]), Ok(i32::MAX));
        assert_eq!(g.distance_from_path(&[1, 2, 1]), Err(Error::ArithmeticOverflow));
    }

    #[test]
    fn has_path_accepts_open_and_closed_sequences() {
        let g = triangle();
        assert!(g.has_path(&[1, 2, 3]));
        assert!(g.has_path(&[1, 2, 3, 1]));
        assert!(!g.has_path(&[1, 3, 2]));
        assert!(!g.has_path(&[1, 2, 7]));
        assert_eq!(g.check_path(&[9]), Err(Error::NodeNotFound("9".into())));
    }

    #[test]
    fn nodes_without_edges() {
        let mut g: Graph<&str, f64> = Graph::new();
        g.add_node("a");
        g.add_edge("b", "c", 1.5);
        let nodes: Vec<_> = g.nodes().into_iter().collect();
        assert_eq!(nodes, vec!["a", "b", "c"]);
        assert_eq!(g.edges(), vec![("b", "c", 1.5)]);
    }
}
