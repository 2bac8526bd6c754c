use alloc::collections::{BTreeMap, BinaryHeap};
use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;

use petgraph::visit::EdgeRef;

use crate::algo::mcmf::{edge_capacity, validate, MinCostFlow, MinCostFlowSolution, SupplyVector};
use crate::algo::residual::ResidualNetwork;
use crate::algo::MinScored;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::key::NodeKey;
use crate::node::Node;
use crate::weight::Weight;

/// Successive shortest augmenting paths with node potentials.
///
/// Supplies and demands are attached to a virtual source and sink. Every iteration runs Dijkstra
/// on reduced costs from the source, augments along the cheapest path to the sink and folds the
/// distances into the potentials, which keeps every residual reduced cost non-negative.
pub struct PrimalDual<N, W>(PhantomData<(N, W)>);

impl<N, W> Default for PrimalDual<N, W> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<N, W> MinCostFlow for PrimalDual<N, W>
where
    N: NodeKey,
    W: Weight,
{
    type Node = N;
    type Weight = W;
    type Error = Error;

    fn min_cost_flow(
        &mut self,
        costs: &Graph<N, W>,
        supply: &SupplyVector<N, W>,
        capacity: Option<&Graph<N, W>>,
    ) -> Result<MinCostFlowSolution<N, W>> {
        primal_dual(costs, supply, capacity)
    }
}

struct State<W> {
    network: ResidualNetwork<W>,
    // forward arc of every original edge, by edge index
    edges: Vec<usize>,
    potentials: Vec<W>,
    node_count: usize,
}

impl<W: Weight> State<W> {
    fn new(node_count: usize) -> Self {
        State {
            network: ResidualNetwork::new(node_count + 2),
            edges: vec![],
            potentials: vec![W::zero(); node_count + 2],
            node_count,
        }
    }

    fn slot(&self, node: Node<usize>) -> usize {
        node.slot(self.node_count)
    }

    fn reduced_cost(&self, a: usize) -> Result<W> {
        let u = self.network.tail(a);
        let v = self.network.head(a);
        self.network
            .cost(a)
            .try_sub(self.potentials[u])
            .and_then(|c| c.try_add(self.potentials[v]))
            .ok_or(Error::ArithmeticOverflow)
    }

    /// Dijkstra over residual arcs weighted by reduced cost, stopping once the sink is settled.
    /// Returns the parent arc of every labelled node and the final distance labels of settled
    /// nodes.
    #[allow(clippy::type_complexity)]
    fn shortest_paths(&self) -> Result<(Vec<Option<usize>>, Vec<Option<W>>, Vec<bool>)> {
        let n = self.network.node_count();
        let source = self.slot(Node::Source);
        let sink = self.slot(Node::Sink);

        let mut dist: Vec<Option<W>> = vec![None; n];
        let mut parent = vec![None; n];
        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::new();
        dist[source] = Some(W::zero());
        heap.push(MinScored(W::zero(), source));

        while let Some(MinScored(d, u)) = heap.pop() {
            if settled[u] {
                continue;
            }
            settled[u] = true;
            if u == sink {
                break;
            }

            for &a in self.network.arcs_from(u) {
                if !self.network.has_capacity(a) {
                    continue;
                }
                let v = self.network.head(a);
                if settled[v] {
                    continue;
                }
                // float rounding can leave tiny negative reduced costs behind
                let reduced = self.reduced_cost(a)?;
                let next = if reduced.is_negative() {
                    d
                } else {
                    d.try_add(reduced).ok_or(Error::ArithmeticOverflow)?
                };
                if dist[v].map_or(true, |old| next < old) {
                    dist[v] = Some(next);
                    parent[v] = Some(a);
                    heap.push(MinScored(next, v));
                }
            }
        }

        Ok((parent, dist, settled))
    }

    fn add_edges<N: NodeKey>(&mut self, costs: &Graph<N, W>, capacity: Option<&Graph<N, W>>) {
        for e in costs.inner().edge_references() {
            let cap = edge_capacity(capacity, costs.key(e.source()), costs.key(e.target()));
            let a = self
                .network
                .add_arc(e.source().index(), e.target().index(), cap, *e.weight());
            self.edges.push(a);
        }
    }

    // Add source and sink arcs based on the signs of the supply vector
    fn add_terminals<N: NodeKey>(
        &mut self,
        costs: &Graph<N, W>,
        supply: &SupplyVector<N, W>,
    ) -> Result<()> {
        for (node, amount) in supply {
            let id = self.slot(Node::WithId(costs.require(node)?.index()));
            if *amount > W::zero() {
                let source = self.slot(Node::Source);
                self.network.add_arc(source, id, Some(*amount), W::zero());
            } else if amount.is_negative() {
                let sink = self.slot(Node::Sink);
                self.network.add_arc(id, sink, Some(-*amount), W::zero());
            }
        }
        Ok(())
    }

    fn run(&mut self) -> Result<W> {
        let sink = self.slot(Node::Sink);
        let mut routed = W::zero();
        let mut iterations = 0usize;

        loop {
            let (parent, dist, settled) = self.shortest_paths()?;
            let Some(d_sink) = dist[sink].filter(|_| settled[sink]) else {
                break;
            };

            // Nodes not settled before the sink are at least as far as the sink.
            for (v, potential) in self.potentials.iter_mut().enumerate() {
                let d = match dist[v] {
                    Some(d) if settled[v] && d < d_sink => d,
                    _ => d_sink,
                };
                *potential = potential.try_sub(d).ok_or(Error::ArithmeticOverflow)?;
            }

            let path = self.network.trace_path(&parent, sink);
            // the source arcs are always bounded by a supply
            let Some(amount) = self.network.bottleneck(&path) else {
                break;
            };
            for &a in &path {
                self.network.push(a, amount)?;
            }
            log::trace!(
                "augmenting {} arcs by {amount} at distance {d_sink}",
                path.len()
            );

            routed = routed.try_add(amount).ok_or(Error::ArithmeticOverflow)?;
            iterations += 1;
        }

        log::debug!("routed {routed} units in {iterations} iterations");
        Ok(routed)
    }
}

/// Computes a minimum cost flow meeting `supply` over the edges of `costs`, optionally bounded by
/// the edge weights of `capacity` (missing capacity edges have zero capacity).
///
/// Fails with `Unbalanced` when the supply vector does not sum to zero, with `NoFeasibleFlow`
/// when the capacities cannot route the whole supply and with `ArithmeticOverflow` when a flow,
/// a cost or a potential does not fit the weight type.
pub fn primal_dual<N, W>(
    costs: &Graph<N, W>,
    supply: &SupplyVector<N, W>,
    capacity: Option<&Graph<N, W>>,
) -> Result<MinCostFlowSolution<N, W>>
where
    N: NodeKey,
    W: Weight,
{
    let total_supply = validate(costs, supply, capacity)?;

    let mut state = State::new(costs.node_count());
    state.add_edges(costs, capacity);
    state.add_terminals(costs, supply)?;

    let routed = state.run()?;
    let shortfall = total_supply
        .try_sub(routed)
        .ok_or(Error::ArithmeticOverflow)?;
    if routed < total_supply && !shortfall.is_negligible(total_supply) {
        log::debug!("only {routed} of {total_supply} units routed");
        return Err(Error::NoFeasibleFlow);
    }

    let flows: Vec<W> = state
        .edges
        .iter()
        .map(|&a| state.network.flow(a))
        .collect();
    let cost = costs
        .edges()
        .iter()
        .zip(&flows)
        .try_fold(W::zero(), |acc, ((_, _, c), f)| acc.try_add(c.try_mul(*f)?))
        .ok_or(Error::ArithmeticOverflow)?;
    let potentials: BTreeMap<N, W> = costs
        .inner()
        .node_indices()
        .map(|ix| (costs.key(ix).clone(), state.potentials[ix.index()]))
        .collect();

    Ok(MinCostFlowSolution {
        cost,
        flow: costs.reweighted(&flows),
        potentials: Some(potentials),
    })
}
