use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::weight::{min_weight, Weight};

/// One direction of a residual edge. `residual == None` is unbounded capacity.
#[derive(Clone, Debug)]
struct Arc<W> {
    head: usize,
    residual: Option<W>,
    cost: W,
}

/// A residual network over a dense node range.
///
/// Arcs are created in pairs: arc `a` and its twin `a ^ 1` point in opposite directions, the
/// twin's residual is the flow sent through `a` and its cost is `-cost(a)`. For every forward arc
/// `residual(a) + flow(a) == capacity(a)` holds.
#[derive(Clone, Debug)]
pub(crate) struct ResidualNetwork<W> {
    arcs: Vec<Arc<W>>,
    adjacency: Vec<Vec<usize>>,
}

impl<W: Weight> ResidualNetwork<W> {
    pub(crate) fn new(node_count: usize) -> Self {
        Self {
            arcs: vec![],
            adjacency: vec![vec![]; node_count],
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Adds `u -> v` together with its twin and returns the forward arc.
    pub(crate) fn add_arc(&mut self, u: usize, v: usize, capacity: Option<W>, cost: W) -> usize {
        let a = self.arcs.len();
        self.arcs.push(Arc {
            head: v,
            residual: capacity,
            cost,
        });
        self.arcs.push(Arc {
            head: u,
            residual: Some(W::zero()),
            cost: -cost,
        });
        self.adjacency[u].push(a);
        self.adjacency[v].push(a ^ 1);
        a
    }

    pub(crate) fn arcs_from(&self, u: usize) -> &[usize] {
        &self.adjacency[u]
    }

    pub(crate) fn head(&self, a: usize) -> usize {
        self.arcs[a].head
    }

    pub(crate) fn tail(&self, a: usize) -> usize {
        self.arcs[a ^ 1].head
    }

    pub(crate) fn cost(&self, a: usize) -> W {
        self.arcs[a].cost
    }

    pub(crate) fn residual(&self, a: usize) -> Option<W> {
        self.arcs[a].residual
    }

    pub(crate) fn has_capacity(&self, a: usize) -> bool {
        self.arcs[a].residual.map_or(true, |r| r > W::zero())
    }

    /// Flow currently carried by the forward arc `a`.
    pub(crate) fn flow(&self, a: usize) -> W {
        self.arcs[a ^ 1].residual.unwrap_or_else(W::zero)
    }

    /// Sends `amount` along `a`: its residual shrinks and its twin's grows by the same amount.
    pub(crate) fn push(&mut self, a: usize, amount: W) -> Result<()> {
        if let Some(r) = self.arcs[a].residual.as_mut() {
            debug_assert!(*r >= amount);
            *r -= amount;
        }
        if let Some(r) = self.arcs[a ^ 1].residual.as_mut() {
            *r = r.try_add(amount).ok_or(Error::ArithmeticOverflow)?;
        }
        Ok(())
    }

    /// Smallest residual along `path`, `None` if every arc on it is unbounded.
    pub(crate) fn bottleneck(&self, path: &[usize]) -> Option<W> {
        path.iter()
            .filter_map(|&a| self.residual(a))
            .fold(None, |acc, r| Some(acc.map_or(r, |m| min_weight(m, r))))
    }

    /// Walks `parent` arcs back from `target` and returns the arcs of the path in order.
    pub(crate) fn trace_path(&self, parent: &[Option<usize>], target: usize) -> Vec<usize> {
        let mut path = vec![];
        let mut v = target;
        while let Some(a) = parent[v] {
            path.push(a);
            v = self.tail(a);
        }
        path.reverse();
        path
    }

    /// Breadth-first search over arcs with positive residual capacity. Returns, per node, the arc
    /// it was first reached through (`None` for `source` and unreached nodes) and whether it was
    /// reached at all.
    pub(crate) fn bfs(
        &self,
        source: usize,
        target: Option<usize>,
    ) -> (Vec<Option<usize>>, Vec<bool>) {
        let mut parent = vec![None; self.node_count()];
        let mut seen = vec![false; self.node_count()];
        let mut queue = VecDeque::new();
        seen[source] = true;
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            if Some(u) == target {
                break;
            }
            for &a in self.arcs_from(u) {
                let v = self.head(a);
                if !seen[v] && self.has_capacity(a) {
                    seen[v] = true;
                    parent[v] = Some(a);
                    queue.push_back(v);
                }
            }
        }

        (parent, seen)
    }
}
