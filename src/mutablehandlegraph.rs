use crate::error::Result;
use crate::handle::{Edge, Handle, NodeId};

/// Encapsulates adding handles and edges to a handlegraph.
pub trait AdditiveHandleGraph {
    /// Add a node with the provided sequence to the graph, using the
    /// ID one past the current maximum node ID.
    fn append_handle(&mut self, sequence: &[u8]) -> Result<Handle>;

    /// Add a node with the provided sequence and ID to the graph.
    /// Fails with `DuplicateId` if the ID is already in use.
    fn create_handle<T: Into<NodeId>>(
        &mut self,
        sequence: &[u8],
        node_id: T,
    ) -> Result<Handle>;

    /// Insert an edge into the graph. Both handles must exist.
    ///
    /// Does not check for an existing identical edge; calling this
    /// twice creates two parallel edges.
    fn create_edge(&mut self, edge: Edge) -> Result<()>;
}

/// Encapsulates removing handles and edges from a handlegraph, and
/// clearing the entire graph.
pub trait SubtractiveHandleGraph {
    /// Remove a node and all of its edges from the graph.
    ///
    /// The node must not have any occurrences on paths; remove those
    /// first.
    fn destroy_handle(&mut self, handle: Handle) -> Result<()>;

    /// Remove one copy of an edge from the graph, returning `true` if
    /// the edge existed. Removing an edge that doesn't exist is not
    /// an error.
    fn destroy_edge(&mut self, edge: Edge) -> Result<bool>;

    /// Remove all nodes, edges and paths, and reset the node ID bounds.
    fn clear(&mut self);
}

/// Encapsulates mutating specific handles in a graph, and splitting
/// handles.
pub trait MutableHandles: AdditiveHandleGraph {
    /// Divide the given handle at the provided `offsets`, in terms of
    /// the handle's own orientation. Creates `offsets.len()` new
    /// handles, and updates the edges accordingly.
    ///
    /// Paths that include a step on `handle` have the new handles
    /// inserted next to that step, so they still spell the same
    /// sequence.
    ///
    /// The returned handles are in the order and orientation in which
    /// they'd be visited when walking along `handle`.
    fn divide_handle(
        &mut self,
        handle: Handle,
        offsets: &[usize],
    ) -> Result<Vec<Handle>>;

    /// Divide the given handle at the provided offset, creating one
    /// new handle. Default implementation uses `divide_handle()`.
    fn split_handle(
        &mut self,
        handle: Handle,
        offset: usize,
    ) -> Result<(Handle, Handle)> {
        let handles = self.divide_handle(handle, &[offset])?;
        Ok((handles[0], handles[1]))
    }

    /// Transform the node that `handle` corresponds to so that the
    /// orientation of `handle` becomes the node's forward
    /// orientation. I.e. if `handle` is reverse, the node will be
    /// reversed. Returns the new handle.
    fn apply_orientation(&mut self, handle: Handle) -> Result<Handle>;
}

/// A graph that supports all forms of handle- and edge-related
/// mutation.
///
/// Is automatically implemented for any graph that implements all of
/// the mutation traits.
pub trait MutableHandleGraph:
    AdditiveHandleGraph + SubtractiveHandleGraph + MutableHandles
{
}

impl<T> MutableHandleGraph for T where
    T: AdditiveHandleGraph + SubtractiveHandleGraph + MutableHandles
{
}
