use core::cmp::Ordering;

use crate::weight::cmp_weights;

pub mod max_flow;
pub mod mcmf;
pub(crate) mod residual;
pub mod tsp;

/// A heap entry ordered by ascending score, so that `BinaryHeap` pops the smallest one first.
#[derive(Copy, Clone, Debug)]
pub(crate) struct MinScored<K, T>(pub K, pub T);

impl<K: PartialOrd, T> PartialEq for MinScored<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: PartialOrd, T> Eq for MinScored<K, T> {}

impl<K: PartialOrd, T> PartialOrd for MinScored<K, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: PartialOrd, T> Ord for MinScored<K, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_weights(&other.0, &self.0)
    }
}
