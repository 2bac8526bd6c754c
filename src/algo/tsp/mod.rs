pub mod branch_and_bound;
pub mod greedy;

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::key::NodeKey;
use crate::weight::{checked_sum, Weight};

pub use branch_and_bound::BranchAndBound;
pub use greedy::greedy;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TspMethod {
    /// Nearest-neighbor construction, no optimality guarantee.
    Greedy,
    /// Exhaustive best-first branch-and-bound.
    #[default]
    BranchAndBound,
}

/// A closed tour in open form: the last node connects back to the first one.
#[derive(Clone, Debug, PartialEq)]
pub struct TspSolution<N, W> {
    pub distance: W,
    pub tour: Vec<N>,
    /// `true` when the tour is proven to be a shortest one.
    pub optimal: bool,
}

pub fn solve_tsp<N, W>(graph: &Graph<N, W>, method: TspMethod) -> Result<TspSolution<N, W>>
where
    N: NodeKey,
    W: Weight,
{
    match method {
        TspMethod::Greedy => greedy(graph),
        TspMethod::BranchAndBound => BranchAndBound::default().solve(graph),
    }
}

/// Dense distance matrix over the node indices of a graph, `None` where there is no edge.
///
/// Construction checks that the heaviest edges leaving the nodes, and those entering them, both
/// sum up within the weight type. Every tour length and every search bound stays below these two
/// sums, so the solvers add distances without further checks.
pub(crate) struct Distances<W> {
    n: usize,
    matrix: Vec<Option<W>>,
}

impl<W: Weight> Distances<W> {
    pub(crate) fn new<N: NodeKey>(graph: &Graph<N, W>) -> Result<Self> {
        let n = graph.node_count();
        let mut matrix = vec![None; n * n];
        for e in graph.inner().edge_references() {
            let w = *e.weight();
            if w.is_negative() {
                return Err(Error::InvalidInput(format!(
                    "negative distance {w} on edge {:?} -> {:?}",
                    graph.key(e.source()),
                    graph.key(e.target())
                )));
            }
            matrix[e.source().index() * n + e.target().index()] = Some(w);
        }
        let d = Self { n, matrix };

        let heaviest_out = (0..n).filter_map(|u| heaviest((0..n).map(|v| d.get(u, v))));
        let heaviest_in = (0..n).filter_map(|v| heaviest((0..n).map(|u| d.get(u, v))));
        checked_sum(heaviest_out)
            .and(checked_sum(heaviest_in))
            .ok_or(Error::ArithmeticOverflow)?;
        Ok(d)
    }

    /// Whether some node cannot be left or cannot be entered, which rules out every tour.
    pub(crate) fn has_dead_end(&self) -> bool {
        let n = self.n;
        n > 1
            && (0..n).any(|u| {
                (0..n).all(|v| self.get(u, v).is_none()) || (0..n).all(|v| self.get(v, u).is_none())
            })
    }

    pub(crate) fn len(&self) -> usize {
        self.n
    }

    pub(crate) fn get(&self, u: usize, v: usize) -> Option<W> {
        self.matrix[u * self.n + v]
    }

    /// Length of the closed tour through `tour`, summed from its first node on.
    pub(crate) fn tour_length(&self, tour: &[usize]) -> Option<W> {
        let (first, last) = (tour.first()?, tour.last()?);
        tour.windows(2)
            .map(|w| self.get(w[0], w[1]))
            .chain(core::iter::once(if tour.len() > 1 {
                self.get(*last, *first)
            } else {
                Some(W::zero())
            }))
            .sum()
    }
}

fn heaviest<W: Weight>(weights: impl Iterator<Item = Option<W>>) -> Option<W> {
    weights.flatten().reduce(|a, b| if b > a { b } else { a })
}

pub(crate) fn to_solution<N, W>(
    graph: &Graph<N, W>,
    distance: W,
    tour: &[usize],
    optimal: bool,
) -> TspSolution<N, W>
where
    N: NodeKey,
    W: Weight,
{
    TspSolution {
        distance,
        tour: tour
            .iter()
            .map(|&ix| graph.key(NodeIndex::new(ix)).clone())
            .collect(),
        optimal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tour_length_closes_the_tour() {
        let g = Graph::from_edges([(1, 2, 1), (2, 3, 2), (3, 1, 4), (1, 3, 8)]);
        let d = Distances::new(&g).unwrap();
        assert_eq!(d.tour_length(&[0, 1, 2]), Some(7));
        assert_eq!(d.tour_length(&[0, 2, 1]), None);
        assert_eq!(d.tour_length(&[1]), Some(0));
        assert_eq!(d.tour_length(&[]), None);
    }

    #[test]
    fn rejects_negative_distances() {
        let g = Graph::from_edges([(1, 2, 1.0), (2, 1, -1.0)]);
        assert!(matches!(
            solve_tsp(&g, TspMethod::Greedy),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn single_node_tour() {
        let mut g: Graph<&str, i32> = Graph::new();
        g.add_node("only");
        for method in [TspMethod::Greedy, TspMethod::BranchAndBound] {
            let solution = solve_tsp(&g, method).unwrap();
            assert_eq!(solution.distance, 0);
            assert_eq!(solution.tour, ["only"]);
        }
    }

    #[test]
    fn empty_graph_has_no_tour() {
        let g: Graph<i32, i32> = Graph::new();
        assert_eq!(solve_tsp(&g, TspMethod::BranchAndBound), Err(Error::NoTour));
    }

    #[test]
    fn dead_ends_rule_out_tours() {
        let sink = Graph::from_edges([(1, 2, 1), (2, 1, 1), (2, 3, 1), (1, 3, 1)]);
        assert!(Distances::new(&sink).unwrap().has_dead_end());
        let source = Graph::from_edges([(1, 2, 1), (2, 1, 1), (3, 2, 1)]);
        assert!(Distances::new(&source).unwrap().has_dead_end());
        let cycle = Graph::from_edges([(1, 2, 1), (2, 3, 1), (3, 1, 1)]);
        assert!(!Distances::new(&cycle).unwrap().has_dead_end());
    }

    #[test]
    fn tours_that_may_overflow_are_rejected() {
        let g = Graph::from_edges([(1, 2, i32::MAX), (2, 1, 1)]);
        for method in [TspMethod::Greedy, TspMethod::BranchAndBound] {
            assert_eq!(solve_tsp(&g, method), Err(Error::ArithmeticOverflow));
        }

        let g = Graph::from_edges([(1, 2, i32::MAX - 1), (2, 1, 1)]);
        for method in [TspMethod::Greedy, TspMethod::BranchAndBound] {
            assert_eq!(solve_tsp(&g, method).unwrap().distance, i32::MAX);
        }
    }
}
