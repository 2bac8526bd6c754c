use alloc::format;
use alloc::string::String;
use core::fmt::Debug;

use displaydoc::Display;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Error {
    /// Node {0} is not in the graph
    NodeNotFound(String),
    /// Invalid input: {0}
    InvalidInput(String),
    /// Infeasible problem, the supply vector does not sum to zero
    Unbalanced,
    /// Infeasible problem, capacities are insufficient to route the supply
    NoFeasibleFlow,
    /// Infeasible problem, the graph has no hamiltonian cycle
    NoTour,
    /// The search budget ran out before any tour was found
    SearchBudgetExhausted,
    /// The heuristic got stuck before closing a tour, one may still exist
    HeuristicFailed,
    /// Arithmetic overflow while summing weights
    ArithmeticOverflow,
    /// Missing edge {0}
    MissingEdge(String),
    /// Algorithm specific error: {0}
    AlgoSpecific(String),
}

impl Error {
    pub(crate) fn node_not_found<N: Debug>(node: &N) -> Self {
        Self::NodeNotFound(format!("{node:?}"))
    }

    pub(crate) fn missing_edge<N: Debug>(u: &N, v: &N) -> Self {
        Self::MissingEdge(format!("{u:?} -> {v:?}"))
    }
}

pub type Result<T> = core::result::Result<T, Error>;
