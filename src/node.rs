use crate::NodeKey;

/// A vertex of an extended flow network: either one of the two virtual terminals or a node of the
/// underlying graph.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug)]
pub enum Node<Id> {
    Source,
    Sink,
    WithId(Id),
}

impl<Id> Node<Id> {
    /// The graph node, `None` for a terminal.
    pub fn id(self) -> Option<Id> {
        match self {
            Node::WithId(id) => Some(id),
            Node::Source | Node::Sink => None,
        }
    }
}

impl Node<usize> {
    /// Position in a dense layout where the `node_count` graph nodes come first and the source
    /// and sink follow them.
    pub fn slot(self, node_count: usize) -> usize {
        match self {
            Node::WithId(ix) => ix,
            Node::Source => node_count,
            Node::Sink => node_count + 1,
        }
    }
}

impl<Id> From<Id> for Node<Id>
where
    Id: NodeKey,
{
    fn from(id: Id) -> Self {
        Self::WithId(id)
    }
}
