use alloc::collections::BTreeSet;
use alloc::format;
use alloc::vec::Vec;

use petgraph::visit::EdgeRef;

use crate::algo::residual::ResidualNetwork;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::key::NodeKey;
use crate::weight::Weight;

pub type NodePair<N> = (N, N);

struct State<W> {
    network: ResidualNetwork<W>,
    // forward arc of every original edge, by edge index
    edges: Vec<usize>,
    source: usize,
    target: usize,
}

impl<W: Weight> State<W> {
    fn new<N: NodeKey>(graph: &Graph<N, W>, source: &N, target: &N) -> Result<Self> {
        let s = graph.require(source)?;
        let t = graph.require(target)?;
        if s == t {
            return Err(Error::InvalidInput(format!(
                "source and sink are the same node {:?}",
                graph.key(s)
            )));
        }

        let mut network = ResidualNetwork::new(graph.node_count());
        let edges = graph
            .inner()
            .edge_references()
            .map(|e| {
                let capacity = *e.weight();
                if capacity.is_negative() {
                    return Err(Error::InvalidInput(format!(
                        "negative capacity {capacity} on edge {:?} -> {:?}",
                        graph.key(e.source()),
                        graph.key(e.target())
                    )));
                }
                Ok(network.add_arc(
                    e.source().index(),
                    e.target().index(),
                    Some(capacity),
                    W::zero(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(State {
            network,
            edges,
            source: s.index(),
            target: t.index(),
        })
    }

    /// Shortest (fewest arcs) augmenting path from source to target, if any.
    fn augmenting_path(&self) -> Option<Vec<usize>> {
        let (parent, seen) = self.network.bfs(self.source, Some(self.target));
        seen[self.target].then(|| self.network.trace_path(&parent, self.target))
    }

    // Keep pushing the bottleneck of the shortest augmenting path until there is none left.
    fn run(&mut self) -> Result<W> {
        let mut value = W::zero();
        let mut augmentations = 0usize;

        while let Some(path) = self.augmenting_path() {
            let Some(bottleneck) = self.network.bottleneck(&path) else {
                break;
            };
            log::trace!("augmenting {} arcs by {bottleneck}", path.len());

            for &a in &path {
                self.network.push(a, bottleneck)?;
            }
            value = value
                .try_add(bottleneck)
                .ok_or(Error::ArithmeticOverflow)?;
            augmentations += 1;
        }

        log::debug!("max flow {value} after {augmentations} augmentations");
        Ok(value)
    }

    fn flows(&self) -> Vec<W> {
        self.edges.iter().map(|&a| self.network.flow(a)).collect()
    }

    /// Nodes reachable from the source in the residual network.
    fn source_side(&self) -> Vec<bool> {
        self.network.bfs(self.source, None).1
    }
}

/// Computes a maximum flow from `source` to `target` using the Edmonds-Karp algorithm
/// (breadth-first augmenting paths).
///
/// The edge weights of `graph` are interpreted as capacities and must be non-negative. Returns the
/// flow value together with a graph holding the flow carried by every original edge (possibly
/// zero). A `target` unreachable from `source` is a zero flow, not an error. A flow value too
/// large for the weight type is an `ArithmeticOverflow`.
pub fn maximum_flow<N, W>(
    graph: &Graph<N, W>,
    source: &N,
    target: &N,
) -> Result<(W, Graph<N, W>)>
where
    N: NodeKey,
    W: Weight,
{
    let mut state = State::new(graph, source, target)?;
    let value = state.run()?;
    Ok((value, graph.reweighted(&state.flows())))
}

/// Computes the edges of a minimum `source`-`target` cut.
///
/// After saturating a maximum flow, the cut is every original edge leaving the set of nodes still
/// reachable from `source` in the residual network. The capacities of these edges sum to the
/// maximum flow value.
pub fn minimum_cut<N, W>(
    graph: &Graph<N, W>,
    source: &N,
    target: &N,
) -> Result<BTreeSet<NodePair<N>>>
where
    N: NodeKey,
    W: Weight,
{
    let mut state = State::new(graph, source, target)?;
    state.run()?;

    let reachable = state.source_side();
    let cut = graph
        .inner()
        .edge_references()
        .filter(|e| reachable[e.source().index()] && !reachable[e.target().index()])
        .map(|e| (graph.key(e.source()).clone(), graph.key(e.target()).clone()))
        .collect();

    Ok(cut)
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::vec;

    use super::*;

    fn inflow_minus_outflow(flow: &Graph<i32, i32>) -> BTreeMap<i32, i32> {
        flow.edges()
            .into_iter()
            .fold(BTreeMap::new(), |mut acc, (u, v, f)| {
                *acc.entry(v).or_default() += f;
                *acc.entry(u).or_default() -= f;
                acc
            })
    }

    #[test]
    fn antiparallel_edges() {
        let g = Graph::from_edges([(1, 2, 4), (2, 1, 3), (2, 3, 2), (1, 3, 1)]);
        let (value, flow) = maximum_flow(&g, &1, &3).unwrap();
        assert_eq!(value, 3);
        assert_eq!(flow.edge(&2, &1), Some(0));

        let balance = inflow_minus_outflow(&flow);
        assert_eq!(balance[&1], -3);
        assert_eq!(balance[&2], 0);
        assert_eq!(balance[&3], 3);
    }

    #[test]
    fn disconnected_sink_is_zero_flow() {
        let mut g = Graph::from_edges([(1, 2, 4)]);
        g.add_node(3);
        let (value, flow) = maximum_flow(&g, &1, &3).unwrap();
        assert_eq!(value, 0);
        assert_eq!(flow.edges(), vec![(1, 2, 0)]);
        assert_eq!(minimum_cut(&g, &1, &3).unwrap(), BTreeSet::new());
    }

    #[test]
    fn rejects_bad_input() {
        let g = Graph::from_edges([(1, 2, 4), (2, 3, -1)]);
        assert!(matches!(maximum_flow(&g, &1, &3), Err(Error::InvalidInput(_))));
        assert_eq!(
            maximum_flow(&g, &1, &9).unwrap_err(),
            Error::NodeNotFound("9".into())
        );
        assert!(matches!(minimum_cut(&g, &1, &1), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn fractional_capacities() {
        let g = Graph::from_edges([(1, 2, 0.5), (1, 3, 1.25), (2, 4, 1.0), (3, 4, 1.0)]);
        let (value, _) = maximum_flow(&g, &1, &4).unwrap();
        assert_eq!(value, 1.5);
    }

    #[test]
    fn flow_value_overflow_is_an_error() {
        let g = Graph::from_edges([
            (1, 2, i32::MAX),
            (2, 4, i32::MAX),
            (1, 3, i32::MAX),
            (3, 4, i32::MAX),
        ]);
        assert_eq!(maximum_flow(&g, &1, &4).unwrap_err(), Error::ArithmeticOverflow);

        let wide = Graph::from_edges([
            (1, 2, i64::from(i32::MAX)),
            (2, 4, i64::from(i32::MAX)),
            (1, 3, i64::from(i32::MAX)),
            (3, 4, i64::from(i32::MAX)),
        ]);
        assert_eq!(maximum_flow(&wide, &1, &4).unwrap().0, 2 * i64::from(i32::MAX));
    }
}
