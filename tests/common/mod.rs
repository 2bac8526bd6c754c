#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use graphopt::{Graph, NodeKey, Weight};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub type Point = (i64, i64);

/// A complete graph over `n` distinct random points of the `x_max` by `y_max` grid, weighted by
/// straight-line distance.
pub fn random_xy_graph(n: usize, x_max: i64, y_max: i64, seed: u64) -> Graph<Point, f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = BTreeSet::new();
    while points.len() < n {
        points.insert((rng.gen_range(0..=x_max), rng.gen_range(0..=y_max)));
    }

    let mut g = Graph::new();
    for (&a, &b) in points.iter().tuple_combinations() {
        let d = (((a.0 - b.0).pow(2) + (a.1 - b.1).pow(2)) as f64).sqrt();
        g.add_edge(a, b, d);
        g.add_edge(b, a, d);
    }
    g
}

/// Relabels the nodes of `graph` as 1, 2, 3, ... in order of first appearance in its edges.
pub fn simplify<N: NodeKey, W: Weight>(graph: &Graph<N, W>) -> Graph<u32, W> {
    let mut ids = BTreeMap::new();
    let mut next = 1..;
    let mut id = |n: N| *ids.entry(n).or_insert_with(|| next.next().unwrap());
    Graph::from_edges(
        graph
            .edges()
            .into_iter()
            .map(|(u, v, w)| (id(u), id(v), w))
            .collect::<Vec<_>>(),
    )
}

/// Shortest tour by enumerating every permutation of the nodes after the first one.
pub fn brute_force_tsp<N: NodeKey, W: Weight>(graph: &Graph<N, W>) -> Option<(W, Vec<N>)> {
    let nodes: Vec<N> = graph.nodes().into_iter().collect();
    let (first, rest) = nodes.split_first()?;

    rest.iter()
        .cloned()
        .permutations(rest.len())
        .filter_map(|perm| {
            let mut tour = vec![first.clone()];
            tour.extend(perm);
            let mut closed = tour.clone();
            closed.push(first.clone());
            graph.distance_from_path(&closed).ok().map(|d| (d, tour))
        })
        .min_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap())
}

/// Inflow minus outflow per node.
pub fn balance<N: NodeKey, W: Weight>(flow: &Graph<N, W>) -> BTreeMap<N, W> {
    let mut acc: BTreeMap<N, W> = flow.nodes().into_iter().map(|n| (n, W::zero())).collect();
    for (u, v, f) in flow.edges() {
        *acc.get_mut(&v).unwrap() += f;
        *acc.get_mut(&u).unwrap() -= f;
    }
    acc
}
