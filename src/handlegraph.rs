/*!
Traits for immutable access to the nodes and edges of a handlegraph.

[`HandleGraph`] is the closure-based interface: every traversal takes
a visitor that returns `true` to keep going and `false` to stop, and
the traversal returns `false` if and only if it was stopped early.

The `Into*` traits provide the same information as iterators, and are
implemented on references to a graph, so they can be used as bounds
in functions that take a `Copy`able graph reference.
*/

use crate::error::{GraphError, Result};
use crate::handle::{Direction, Edge, Handle, NodeId};

pub mod iter;

pub use self::iter::*;

/// Trait encapsulating the immutable aspects of a handlegraph.
///
/// Methods that take a `Handle` expect it to refer to a node that
/// exists in the graph, and may panic otherwise.
pub trait HandleGraph {
    fn has_node(&self, node_id: NodeId) -> bool;

    /// Look up the handle for a node ID in the given orientation.
    fn get_handle(&self, node_id: NodeId, is_reverse: bool) -> Result<Handle> {
        if self.has_node(node_id) {
            Ok(Handle::pack(node_id, is_reverse))
        } else {
            Err(GraphError::NodeNotFound { id: node_id })
        }
    }

    /// The length of the sequence of a given node
    fn length(&self, handle: Handle) -> usize;

    /// Returns the sequence of a node in the handle's local forward
    /// orientation. Copies the sequence, as the sequence in the graph
    /// may be reversed depending on orientation.
    fn sequence(&self, handle: Handle) -> Vec<u8>;

    fn subsequence(
        &self,
        handle: Handle,
        index: usize,
        size: usize,
    ) -> Vec<u8> {
        self.sequence(handle)[index..index + size].into()
    }

    fn base(&self, handle: Handle, index: usize) -> u8 {
        self.sequence(handle)[index]
    }

    fn min_node_id(&self) -> NodeId;
    fn max_node_id(&self) -> NodeId;

    /// Return the total number of nodes in the graph
    fn node_count(&self) -> usize;

    /// Return the total number of edges in the graph, counting each
    /// edge once no matter how many adjacency entries it uses.
    fn edge_count(&self) -> usize {
        let mut count = 0;
        self.for_each_edge(|_| {
            count += 1;
            true
        });
        count
    }

    /// Sum up all the sequences in the graph
    fn total_length(&self) -> usize;

    /// The number of neighbors `follow_edges` would visit.
    fn degree(&self, handle: Handle, dir: Direction) -> usize;

    fn has_edge(&self, left: Handle, right: Handle) -> bool {
        !self.follow_edges(left, Direction::Right, |next| next != right)
    }

    /// Visit the neighbors of `handle` on the given side. Neighbors
    /// on the left are reported as the handles that lead *into*
    /// `handle`, i.e. so that `(neighbor, handle)` is an edge.
    ///
    /// Stops at the first `false` returned by `f`.
    fn follow_edges<F>(&self, handle: Handle, dir: Direction, f: F) -> bool
    where
        F: FnMut(Handle) -> bool;

    /// Visit the forward handle of every node in ascending ID order.
    /// Stops at the first `false` returned by `f`.
    fn for_each_handle<F>(&self, f: F) -> bool
    where
        F: FnMut(Handle) -> bool;

    /// Visit the forward handle of every node, spread over the rayon
    /// thread pool. The result is the AND of every call to `f`, but a
    /// `false` does not cancel visits that have already been
    /// scheduled; every node may still be visited.
    fn for_each_handle_par<F>(&self, f: F) -> bool
    where
        F: Fn(Handle) -> bool + Send + Sync;

    /// Visit every edge exactly once, in its canonical orientation.
    /// Stops at the first `false` returned by `f`.
    fn for_each_edge<F>(&self, mut f: F) -> bool
    where
        F: FnMut(Edge) -> bool,
    {
        self.for_each_handle(|handle| {
            [Direction::Right, Direction::Left].iter().all(|&dir| {
                self.follow_edges(handle, dir, |neighbor| {
                    match Edge::from_adjacency(handle, dir, neighbor) {
                        Some(edge) => f(edge),
                        None => true,
                    }
                })
            })
        })
    }
}

/// Iteration over the forward handles of every node in the graph.
pub trait IntoHandles: Sized {
    type Handles: Iterator<Item = Handle>;

    fn handles(self) -> Self::Handles;
}

/// Iteration over the neighbors of a handle, in the same order and
/// orientation as [`HandleGraph::follow_edges`].
pub trait IntoNeighbors: Sized {
    type Neighbors: Iterator<Item = Handle>;

    fn neighbors(self, handle: Handle, dir: Direction) -> Self::Neighbors;
}

/// Iteration over every edge in the graph, in canonical form.
pub trait IntoEdges: Sized {
    type Edges: Iterator<Item = Edge>;

    fn edges(self) -> Self::Edges;
}

/// Iteration over the sequence of a handle without copying it.
pub trait IntoSequences: Sized {
    type Sequence: Iterator<Item = u8>;

    fn sequence_iter(self, handle: Handle) -> Self::Sequence;
}

/// Convenience trait for collecting all the iterator traits in a
/// single bound.
pub trait HandleGraphRef:
    IntoHandles + IntoNeighbors + IntoEdges + IntoSequences + Copy
{
}

impl<'a, T> HandleGraphRef for &'a T
where
    T: HandleGraph,
    &'a T: IntoHandles + IntoNeighbors + IntoEdges + IntoSequences + Copy,
{
}
