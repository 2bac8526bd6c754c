use alloc::collections::BTreeSet;

use crate::graph::Graph;
use crate::key::NodeKey;
use crate::weight::Weight;

/// Returns `true` iff `b` is a cyclic rotation of `a` or of `a` reversed, i.e. both sequences
/// describe the same closed, undirected tour.
pub fn same_path<N: PartialEq>(a: &[N], b: &[N]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let n = a.len();
    if n == 0 {
        return true;
    }

    (0..n).filter(|&k| a[k] == b[0]).any(|k| {
        let forward = (0..n).all(|i| b[i] == a[(k + i) % n]);
        let backward = (0..n).all(|i| b[i] == a[(k + n - i) % n]);
        forward || backward
    })
}

/// Returns `true` iff `tour` visits every node of `graph` exactly once and every hop, including
/// the closing one back to the first node, is an edge. A closed form (first node repeated at the
/// end) is accepted as well.
pub fn is_tour<N, W>(graph: &Graph<N, W>, tour: &[N]) -> bool
where
    N: NodeKey,
    W: Weight,
{
    let open = match tour {
        [first, .., last] if tour.len() == graph.node_count() + 1 && first == last => {
            &tour[..tour.len() - 1]
        }
        _ => tour,
    };
    if open.len() != graph.node_count() {
        return false;
    }
    let distinct: BTreeSet<_> = open.iter().collect();
    if distinct.len() != open.len() {
        return false;
    }

    match open {
        [] => true,
        [single] => graph.contains_node(single),
        [first, .., last] => graph.has_path(open) && graph.edge(last, first).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOUR: [i32; 5] = [1, 3, 4, 2, 5];

    #[test]
    fn a_tour_is_its_own_path() {
        assert!(same_path(&TOUR, &TOUR));
    }

    #[test]
    fn reversal_is_the_same_path() {
        let mut reversed = TOUR;
        reversed.reverse();
        assert!(same_path(&TOUR, &reversed));
    }

    #[test]
    fn every_rotation_is_the_same_path() {
        for k in 0..TOUR.len() {
            let mut rotated = TOUR;
            rotated.rotate_left(k);
            assert!(same_path(&TOUR, &rotated), "rotation {k}");

            rotated.reverse();
            assert!(same_path(&TOUR, &rotated), "reversed rotation {k}");
        }
    }

    #[test]
    fn swapped_nodes_are_a_different_path() {
        assert!(!same_path(&TOUR, &[1, 4, 3, 2, 5]));
        assert!(!same_path(&TOUR, &[1, 3, 4, 2]));
        assert!(!same_path(&TOUR, &[1, 3, 4, 2, 6]));
    }

    #[test]
    fn repeated_nodes() {
        assert!(same_path(&[1, 1, 2], &[2, 1, 1]));
        assert!(!same_path(&[1, 1, 2], &[2, 2, 1]));
        assert!(same_path::<i32>(&[], &[]));
    }

    #[test]
    fn tours_must_visit_every_node_once() {
        let g = Graph::from_edges([(1, 2, 1), (2, 3, 1), (3, 1, 1), (1, 3, 1)]);
        assert!(is_tour(&g, &[1, 2, 3]));
        assert!(is_tour(&g, &[2, 3, 1, 2]));
        assert!(!is_tour(&g, &[1, 3, 2]));
        assert!(!is_tour(&g, &[1, 2]));
        assert!(!is_tour(&g, &[1, 2, 2]));
    }
}
