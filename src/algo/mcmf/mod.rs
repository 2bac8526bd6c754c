#[cfg(feature = "lemon-cpp")]
pub mod network_simplex;

pub mod primal_dual;

use alloc::collections::BTreeMap;
use alloc::format;
use core::fmt::Debug;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::key::NodeKey;
use crate::weight::{checked_sum, Weight};

/// Signed quantity per node: positive is supply, negative is demand, zero (or absent) is
/// transshipment.
pub type SupplyVector<N, W> = BTreeMap<N, W>;

#[derive(Clone, Debug)]
pub struct MinCostFlowSolution<N, W> {
    pub cost: W,
    /// Flow carried by every edge of the cost graph.
    pub flow: Graph<N, W>,
    /// Node potentials certifying optimality, when the algorithm produces them.
    pub potentials: Option<BTreeMap<N, W>>,
}

/// The minimum cost flow algorithm.
pub trait MinCostFlow {
    type Node;
    type Weight;
    type Error: Debug;

    /// Routes `supply` to demand over the edges of `costs` at minimum total cost. Edge weights of
    /// `capacity` bound the flow on the edge with the same endpoints; `None` leaves every edge
    /// uncapacitated.
    fn min_cost_flow(
        &mut self,
        costs: &Graph<Self::Node, Self::Weight>,
        supply: &SupplyVector<Self::Node, Self::Weight>,
        capacity: Option<&Graph<Self::Node, Self::Weight>>,
    ) -> core::result::Result<MinCostFlowSolution<Self::Node, Self::Weight>, Self::Error>;
}

/// Checks a problem instance before any search and returns its total supply.
///
/// Float supplies are balanced when they cancel out up to rounding.
pub(crate) fn validate<N, W>(
    costs: &Graph<N, W>,
    supply: &SupplyVector<N, W>,
    capacity: Option<&Graph<N, W>>,
) -> Result<W>
where
    N: NodeKey,
    W: Weight,
{
    if let Some(node) = supply.keys().find(|n| !costs.contains_node(n)) {
        return Err(Error::node_not_found(node));
    }
    let total_supply = checked_sum(supply.values().copied().filter(|s| *s > W::zero()))
        .ok_or(Error::ArithmeticOverflow)?;
    let total_demand = supply
        .values()
        .filter(|s| s.is_negative())
        .try_fold(W::zero(), |acc, s| acc.try_add(W::zero().try_sub(*s)?))
        .ok_or(Error::ArithmeticOverflow)?;
    let excess = total_supply
        .try_sub(total_demand)
        .ok_or(Error::ArithmeticOverflow)?;
    if !excess.is_negligible(total_supply) {
        return Err(Error::Unbalanced);
    }
    if let Some((u, v, c)) = costs.edges().into_iter().find(|(_, _, c)| c.is_negative()) {
        return Err(Error::InvalidInput(format!(
            "negative cost {c} on edge {u:?} -> {v:?}"
        )));
    }
    if let Some((u, v, c)) = capacity
        .into_iter()
        .flat_map(Graph::edges)
        .find(|(_, _, c)| c.is_negative())
    {
        return Err(Error::InvalidInput(format!(
            "negative capacity {c} on edge {u:?} -> {v:?}"
        )));
    }

    Ok(total_supply)
}

/// Capacity of `u -> v`: unbounded without a capacity graph, zero when the capacity graph lacks
/// the edge.
pub(crate) fn edge_capacity<N, W>(capacity: Option<&Graph<N, W>>, u: &N, v: &N) -> Option<W>
where
    N: NodeKey,
    W: Weight,
{
    capacity.map(|c| c.edge(u, v).unwrap_or_else(W::zero))
}

/// Verifies the complementary slackness conditions of a flow against node potentials, with
/// `reduced_cost(u, v) = cost(u, v) - potential(u) + potential(v)`:
///
/// * an edge strictly between zero flow and its capacity has a reduced cost of zero,
/// * an edge without flow has a non-negative reduced cost,
/// * a saturated edge has a non-positive reduced cost.
///
/// A flow satisfying them (and the supply vector) is a minimum cost flow.
pub fn complementary_slackness<N, W>(
    costs: &Graph<N, W>,
    capacity: Option<&Graph<N, W>>,
    flow: &Graph<N, W>,
    potentials: &BTreeMap<N, W>,
) -> bool
where
    N: NodeKey,
    W: Weight,
{
    costs.edges().into_iter().all(|(u, v, cost)| {
        let (Some(pu), Some(pv)) = (potentials.get(&u), potentials.get(&v)) else {
            return false;
        };
        let Some(reduced) = cost.try_sub(*pu).and_then(|r| r.try_add(*pv)) else {
            return false;
        };
        let f = flow.edge(&u, &v).unwrap_or_else(W::zero);

        match edge_capacity(capacity, &u, &v) {
            Some(cap) if cap == W::zero() => true,
            _ if f == W::zero() => reduced >= W::zero(),
            Some(cap) if f >= cap => reduced <= W::zero(),
            _ => reduced == W::zero(),
        }
    })
}
