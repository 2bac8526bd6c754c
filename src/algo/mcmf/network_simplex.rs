use alloc::collections::BTreeMap;
use alloc::format;
use alloc::vec::Vec;
use core::marker::PhantomData;

use mcmf::{Capacity, Cost, GraphBuilder, Vertex};

use crate::algo::mcmf::{validate, MinCostFlow, MinCostFlowSolution, SupplyVector};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::key::NodeKey;
use crate::node::Node;

/// Network simplex backend provided by the `mcmf` crate (LEMON). Integer weights only; it does
/// not report node potentials.
pub struct NetworkSimplex<N>(PhantomData<N>);

impl<N> Default for NetworkSimplex<N> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<N: NodeKey> From<Node<N>> for Vertex<N> {
    fn from(value: Node<N>) -> Self {
        match value {
            Node::Source => Vertex::Source,
            Node::Sink => Vertex::Sink,
            Node::WithId(id) => Vertex::Node(id),
        }
    }
}

impl<N: NodeKey> MinCostFlow for NetworkSimplex<N> {
    type Node = N;
    type Weight = i32;
    type Error = Error;

    fn min_cost_flow(
        &mut self,
        costs: &Graph<N, i32>,
        supply: &SupplyVector<N, i32>,
        capacity: Option<&Graph<N, i32>>,
    ) -> Result<MinCostFlowSolution<N, i32>> {
        let total_supply = validate(costs, supply, capacity)?;

        // build a graph from the cost graph, an uncapacitated edge never carries more than the
        // whole supply
        let edges = costs.edges();
        let mut g = edges
            .iter()
            .fold(GraphBuilder::<N>::new(), |mut acc, (u, v, cost)| {
                let cap = match capacity {
                    None => total_supply,
                    Some(c) => c.edge(u, v).unwrap_or(0),
                };
                acc.add_edge(
                    Node::WithId(u.clone()),
                    Node::WithId(v.clone()),
                    Capacity(cap),
                    Cost(*cost),
                );
                acc
            });

        // Add source and sink flows based on the signs of the supply vector
        for (node, amount) in supply {
            if *amount > 0 {
                g.add_edge(Node::Source, Node::WithId(node.clone()), Capacity(*amount), Cost(0));
            } else if *amount < 0 {
                g.add_edge(Node::WithId(node.clone()), Node::Sink, Capacity(-*amount), Cost(0));
            }
        }

        let (cost, paths) = g.mcmf();

        let mut routed = 0;
        let mut per_edge = BTreeMap::<(N, N), i32>::new();
        for flow in paths.iter().flat_map(|p| p.flows.iter()) {
            let amount = i32::try_from(flow.amount)
                .map_err(|e| Error::AlgoSpecific(format!("{e:?}")))?;
            match (flow.a.clone().as_option(), flow.b.clone().as_option()) {
                (Some(u), Some(v)) => *per_edge.entry((u, v)).or_default() += amount,
                (None, Some(_)) => routed += amount,
                _ => {}
            }
        }
        if routed < total_supply {
            log::debug!("only {routed} of {total_supply} units routed");
            return Err(Error::NoFeasibleFlow);
        }

        let flows: Vec<i32> = edges
            .into_iter()
            .map(|(u, v, _)| per_edge.get(&(u, v)).copied().unwrap_or(0))
            .collect();

        Ok(MinCostFlowSolution {
            cost,
            flow: costs.reweighted(&flows),
            potentials: None,
        })
    }
}
