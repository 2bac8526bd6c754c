#![cfg_attr(not(test), no_std)]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

//! Exact and heuristic solvers over directed weighted graphs: maximum flow / minimum cut,
//! minimum-cost flow and the traveling-salesman problem.
//!
//! ```
//! use graphopt::Graph;
//!
//! let g = Graph::from_edges([(1, 2, 3), (2, 3, 2), (1, 3, 1)]);
//! let (value, _flow) = g.maximum_flow(&1, &3).unwrap();
//! assert_eq!(value, 3);
//! ```

extern crate alloc;

pub mod algo;
pub mod error;
pub mod graph;
pub mod key;
pub mod node;
pub mod path;
pub mod weight;

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

pub use crate::algo::max_flow::NodePair;
pub use crate::algo::mcmf::{
    complementary_slackness, primal_dual::PrimalDual, MinCostFlow, MinCostFlowSolution,
    SupplyVector,
};
pub use crate::algo::tsp::{BranchAndBound, TspMethod, TspSolution};
pub use crate::error::{Error, Result};
pub use crate::graph::Graph;
pub use crate::key::NodeKey;
pub use crate::node::Node;
pub use crate::path::{is_tour, same_path};
pub use crate::weight::Weight;

#[cfg(feature = "lemon-cpp")]
pub use crate::algo::mcmf::network_simplex::NetworkSimplex;

impl<N, W> Graph<N, W>
where
    N: NodeKey,
    W: Weight,
{
    /// Maximum flow from `start` to `end` with edge weights as capacities. Returns the flow value
    /// and the flow carried by every edge.
    pub fn maximum_flow(&self, start: &N, end: &N) -> Result<(W, Graph<N, W>)> {
        algo::max_flow::maximum_flow(self, start, end)
    }

    /// Edges crossing a minimum `start`-`end` cut.
    pub fn maximum_flow_min_cut(&self, start: &N, end: &N) -> Result<BTreeSet<NodePair<N>>> {
        algo::max_flow::minimum_cut(self, start, end)
    }

    /// Minimum cost flow with edge weights as unit costs. `capacity` bounds each edge by the weight
    /// of the same edge in that graph (absent edges have zero capacity), `None` is uncapacitated.
    /// Returns the total cost and the flow carried by every edge.
    pub fn capacitated_min_cost_flow(
        &self,
        supply: &SupplyVector<N, W>,
        capacity: Option<&Graph<N, W>>,
    ) -> Result<(W, Graph<N, W>)> {
        let solution = PrimalDual::default().min_cost_flow(self, supply, capacity)?;
        Ok((solution.cost, solution.flow))
    }

    /// Solves the traveling-salesman problem over the edge weights as distances. The tour is
    /// returned in open form.
    pub fn solve_tsp(&self, method: TspMethod) -> Result<(W, Vec<N>)> {
        let solution = algo::tsp::solve_tsp(self, method)?;
        Ok((solution.distance, solution.tour))
    }
}
