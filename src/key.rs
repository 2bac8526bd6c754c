use core::fmt::Debug;

/// A trait representing a node key: an opaque comparable identifier such as an integer, a string
/// or a tuple of coordinates.
pub trait NodeKey: Clone + Ord + Debug {}

impl<T> NodeKey for T where T: Clone + Ord + Debug {}
