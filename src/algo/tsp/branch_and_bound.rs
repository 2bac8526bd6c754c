use alloc::collections::BinaryHeap;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::iter;

use crate::algo::tsp::greedy::nearest_neighbor;
use crate::algo::tsp::{to_solution, Distances, TspSolution};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::key::NodeKey;
use crate::weight::{cmp_weights, min_weight, Weight};

/// Exact TSP search over Hamiltonian cycles starting at the first node.
///
/// Partial paths are explored best-first by lower bound from an explicit frontier. A partial
/// path is pruned once its bound reaches the shortest complete tour found so far, which starts out
/// as the greedy tour. When the frontier runs dry the incumbent is optimal.
///
/// `max_expansions` caps the number of expanded partial paths. A search stopped by it returns the
/// best tour found so far with `optimal == false`, or `SearchBudgetExhausted` if it found none.
/// `NoTour` is only returned once the whole search space has been ruled out.
#[derive(Clone, Copy, Debug, Default)]
pub struct BranchAndBound {
    pub max_expansions: Option<usize>,
}

struct Partial<W> {
    bound: W,
    distance: W,
    path: Vec<usize>,
    visited: Vec<bool>,
}

impl<W> Partial<W> {
    fn last(&self) -> usize {
        self.path[self.path.len() - 1]
    }
}

impl<W: PartialOrd> PartialEq for Partial<W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<W: PartialOrd> Eq for Partial<W> {}

impl<W: PartialOrd> PartialOrd for Partial<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// `BinaryHeap` is a max-heap: the smallest bound comes out first, deeper paths first on ties.
impl<W: PartialOrd> Ord for Partial<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_weights(&other.bound, &self.bound).then(self.path.len().cmp(&other.path.len()))
    }
}

fn cheapest<W: Weight>(candidates: impl Iterator<Item = Option<W>>) -> Option<W> {
    candidates.flatten().reduce(min_weight)
}

/// Lower bound on every tour extending `path`: its distance plus the larger of two relaxations.
/// Each unvisited node and the last node of the path must still be left once (at the cheapest
/// admissible edge), and each unvisited node and the start must still be entered once. `None`
/// when some node can no longer be left or entered at all.
fn lower_bound<W: Weight>(
    d: &Distances<W>,
    path: &[usize],
    visited: &[bool],
    distance: W,
) -> Option<W> {
    let start = path[0];
    let last = path[path.len() - 1];
    let remaining: Vec<usize> = (0..d.len()).filter(|&v| !visited[v]).collect();

    let mut leave = cheapest(remaining.iter().map(|&v| d.get(last, v)))?;
    for &u in &remaining {
        let targets = remaining.iter().copied().filter(|&v| v != u).chain(iter::once(start));
        leave += cheapest(targets.map(|v| d.get(u, v)))?;
    }

    let mut enter = cheapest(remaining.iter().map(|&u| d.get(u, start)))?;
    for &v in &remaining {
        let sources = remaining.iter().copied().filter(|&u| u != v).chain(iter::once(last));
        enter += cheapest(sources.map(|u| d.get(u, v)))?;
    }

    Some(distance + if enter > leave { enter } else { leave })
}

impl BranchAndBound {
    pub fn new(max_expansions: Option<usize>) -> Self {
        Self { max_expansions }
    }

    pub fn solve<N, W>(&self, graph: &Graph<N, W>) -> Result<TspSolution<N, W>>
    where
        N: NodeKey,
        W: Weight,
    {
        let d = Distances::new(graph)?;
        let n = d.len();
        match n {
            0 => return Err(Error::NoTour),
            1 => return Ok(to_solution(graph, W::zero(), &[0], true)),
            _ => {}
        }

        let mut best: Option<(W, Vec<usize>)> = nearest_neighbor(&d, 0)
            .and_then(|tour| d.tour_length(&tour).map(|length| (length, tour)));
        if let Some((length, _)) = &best {
            log::debug!("starting from the greedy tour of length {length}");
        }
        let beats =
            |best: &Option<(W, Vec<usize>)>, w: W| best.as_ref().map_or(true, |(b, _)| w < *b);

        let mut visited = vec![false; n];
        visited[0] = true;
        let mut frontier = BinaryHeap::new();
        if let Some(bound) = lower_bound(&d, &[0], &visited, W::zero()) {
            frontier.push(Partial {
                bound,
                distance: W::zero(),
                path: vec![0],
                visited,
            });
        }

        let mut expansions = 0usize;
        let mut optimal = true;
        while let Some(partial) = frontier.pop() {
            if !beats(&best, partial.bound) {
                continue;
            }
            if self.max_expansions.map_or(false, |max| expansions >= max) {
                optimal = false;
                break;
            }
            expansions += 1;

            let last = partial.last();
            for next in (0..n).filter(|&v| !partial.visited[v]) {
                let Some(w) = d.get(last, next) else {
                    continue;
                };
                let distance = partial.distance + w;

                if partial.path.len() + 1 == n {
                    let Some(back) = d.get(next, partial.path[0]) else {
                        continue;
                    };
                    let length = distance + back;
                    if beats(&best, length) {
                        let mut tour = partial.path.clone();
                        tour.push(next);
                        log::trace!("new incumbent of length {length}: {tour:?}");
                        best = Some((length, tour));
                    }
                    continue;
                }

                let mut path = partial.path.clone();
                path.push(next);
                let mut visited = partial.visited.clone();
                visited[next] = true;

                match lower_bound(&d, &path, &visited, distance) {
                    Some(bound) if beats(&best, bound) => frontier.push(Partial {
                        bound,
                        distance,
                        path,
                        visited,
                    }),
                    _ => {}
                }
            }
        }

        log::debug!(
            "branch and bound expanded {expansions} partial tours ({} left on the frontier)",
            frontier.len()
        );

        let (length, tour) = best.ok_or(if optimal {
            Error::NoTour
        } else {
            Error::SearchBudgetExhausted
        })?;
        Ok(to_solution(graph, length, &tour, optimal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::tsp::greedy;

    // Greedy from node 0 walks 0 -> 1 -> 2 -> 3 and pays 10 to get home, while 0 -> 2 -> 3 -> 1
    // -> 0 costs 5.
    fn trap() -> Graph<u8, i32> {
        Graph::from_edges([
            (0, 1, 1),
            (1, 2, 1),
            (2, 3, 1),
            (3, 0, 10),
            (0, 2, 2),
            (3, 1, 1),
            (1, 0, 1),
            (2, 0, 10),
            (0, 3, 10),
            (2, 1, 10),
            (1, 3, 10),
            (3, 2, 10),
        ])
    }

    #[test]
    fn beats_the_greedy_tour() {
        let g = trap();
        assert_eq!(greedy(&g).unwrap().distance, 13);

        let solution = BranchAndBound::default().solve(&g).unwrap();
        assert_eq!(solution.tour, [0, 2, 3, 1]);
        assert_eq!(solution.distance, 5);
        assert_eq!(solution.distance, g.distance_from_path(&[0, 2, 3, 1, 0]).unwrap());
        assert!(solution.optimal);
    }

    #[test]
    fn finds_the_only_cycle_of_a_sparse_graph() {
        // greedy gets stuck, a single hamiltonian cycle 1 -> 3 -> 2 -> 4 -> 1 exists
        let g = Graph::from_edges([
            (1, 2, 1),
            (1, 3, 5),
            (3, 2, 5),
            (2, 4, 5),
            (4, 1, 5),
        ]);
        let solution = BranchAndBound::default().solve(&g).unwrap();
        assert_eq!(solution.tour, [1, 3, 2, 4]);
        assert_eq!(solution.distance, 20);
    }

    #[test]
    fn no_hamiltonian_cycle() {
        let g = Graph::from_edges([(1, 2, 1), (2, 3, 1), (3, 2, 1), (2, 1, 1)]);
        assert_eq!(BranchAndBound::default().solve(&g), Err(Error::NoTour));
    }

    #[test]
    fn expansion_budget_marks_the_result() {
        let g = trap();
        let solution = BranchAndBound::new(Some(0)).solve(&g).unwrap();
        assert!(!solution.optimal);
        assert_eq!(solution.distance, 13);
    }

    #[test]
    fn budget_spent_before_any_tour() {
        let g = Graph::from_edges([(1, 2, 1), (1, 3, 5), (3, 2, 5), (2, 4, 5), (4, 1, 5)]);
        assert_eq!(
            BranchAndBound::new(Some(0)).solve(&g),
            Err(Error::SearchBudgetExhausted)
        );
        let solution = BranchAndBound::new(None).solve(&g).unwrap();
        assert_eq!((solution.distance, solution.tour), (20, vec![1, 3, 2, 4]));
        assert!(solution.optimal);
    }
}
