use alloc::vec;
use alloc::vec::Vec;

use crate::algo::tsp::{to_solution, Distances, TspSolution};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::key::NodeKey;
use crate::weight::Weight;

/// Nearest-neighbor tour from `start`: repeatedly moves to the closest unvisited node, the lowest
/// index winning ties. `None` when it gets stuck or cannot close the tour.
pub(crate) fn nearest_neighbor<W: Weight>(d: &Distances<W>, start: usize) -> Option<Vec<usize>> {
    let n = d.len();
    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n);
    visited[start] = true;
    tour.push(start);

    let mut current = start;
    while tour.len() < n {
        let (next, _) = (0..n)
            .filter(|&v| !visited[v])
            .filter_map(|v| d.get(current, v).map(|w| (v, w)))
            .fold(None, |best: Option<(usize, W)>, (v, w)| match best {
                Some((_, b)) if b <= w => best,
                _ => Some((v, w)),
            })?;
        visited[next] = true;
        tour.push(next);
        current = next;
    }

    (n == 1 || d.get(current, start).is_some()).then_some(tour)
}

/// Solves the TSP heuristically with a nearest-neighbor tour from the first node, in O(n^2).
///
/// Fails with `NoTour` when some node cannot be left or entered at all. When the walk merely gets
/// stuck it fails with `HeuristicFailed`: a tour may still exist, and `BranchAndBound` finds it.
pub fn greedy<N, W>(graph: &Graph<N, W>) -> Result<TspSolution<N, W>>
where
    N: NodeKey,
    W: Weight,
{
    let d = Distances::new(graph)?;
    if d.len() == 0 {
        return Err(Error::NoTour);
    }

    let Some(tour) = nearest_neighbor(&d, 0) else {
        log::debug!("nearest neighbor walk got stuck");
        return Err(if d.has_dead_end() {
            Error::NoTour
        } else {
            Error::HeuristicFailed
        });
    };
    let distance = d.tour_length(&tour).ok_or(Error::NoTour)?;
    log::debug!("greedy tour of length {distance}");

    Ok(to_solution(graph, distance, &tour, d.len() == 1))
}
