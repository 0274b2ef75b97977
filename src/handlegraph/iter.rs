//! Iterators shared by implementations of the `Into*` traits in
//! [`handlegraph`](crate::handlegraph).
//!
//! Handles and neighbors are simple enough to express as
//! [`std::iter::Map`] over a function pointer, see [`HandlesFrom`]
//! and [`NeighborsFrom`]; edges and oriented sequences need their own
//! state.

use crate::handle::{Direction, Edge, Handle, NodeId};
use crate::util::dna;

use super::{IntoHandles, IntoNeighbors};

/// Forward handles from an iterator over borrowed node IDs.
pub type HandlesFrom<I> = std::iter::Map<I, fn(&NodeId) -> Handle>;

/// Neighbors from an iterator over a stored edge list.
pub type NeighborsFrom<I> = std::iter::Map<I, fn(&Handle) -> Handle>;

pub fn handles_from<'a, I>(ids: I) -> HandlesFrom<I>
where
    I: Iterator<Item = &'a NodeId>,
{
    let forward: fn(&NodeId) -> Handle = |id| Handle::pack(*id, false);
    ids.map(forward)
}

/// Edge list entries are stored as the handles entered when leaving
/// that side of the node; neighbors on the left are reported flipped,
/// so they lead into the node instead.
pub fn neighbors_from<'a, I>(entries: I, dir: Direction) -> NeighborsFrom<I>
where
    I: Iterator<Item = &'a Handle>,
{
    let orient: fn(&Handle) -> Handle = match dir {
        Direction::Left => |h| h.flip(),
        Direction::Right => |h| *h,
    };
    entries.map(orient)
}

/// Every edge of a graph, once each and in canonical form, built
/// from its handle and neighbor iterators.
///
/// The neighbors of each handle are visited right side first, and
/// [`Edge::from_adjacency`] decides which end reports an edge, the
/// same as [`HandleGraph::for_each_edge`](super::HandleGraph::for_each_edge).
pub struct EdgesIter<G>
where
    G: IntoNeighbors + IntoHandles + Copy,
{
    graph: G,
    handles: std::iter::Fuse<G::Handles>,
    current: Option<(Handle, Direction, G::Neighbors)>,
}

impl<G> EdgesIter<G>
where
    G: IntoNeighbors + IntoHandles + Copy,
{
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            handles: graph.handles().fuse(),
            current: None,
        }
    }

    fn start(&mut self, handle: Handle, dir: Direction) {
        let neighbors = self.graph.neighbors(handle, dir);
        self.current = Some((handle, dir, neighbors));
    }
}

impl<G> Iterator for EdgesIter<G>
where
    G: IntoNeighbors + IntoHandles + Copy,
{
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        loop {
            if let Some((handle, dir, mut neighbors)) = self.current.take() {
                let edge = neighbors
                    .by_ref()
                    .find_map(|n| Edge::from_adjacency(handle, dir, n));

                if edge.is_some() {
                    self.current = Some((handle, dir, neighbors));
                    return edge;
                }

                if dir == Direction::Right {
                    self.start(handle, Direction::Left);
                    continue;
                }
            }

            let handle = self.handles.next()?;
            self.start(handle, Direction::Right);
        }
    }
}

impl<G> std::iter::FusedIterator for EdgesIter<G> where
    G: IntoNeighbors + IntoHandles + Copy
{
}

/// The bases of a node's sequence as seen from a handle: as stored
/// for a forward handle, reverse complemented for a reverse one.
pub enum SequenceIter<I>
where
    I: DoubleEndedIterator<Item = u8>,
{
    Forward(I),
    Reverse(I),
}

impl<I> SequenceIter<I>
where
    I: DoubleEndedIterator<Item = u8>,
{
    #[inline]
    pub fn new(bases: I, handle: Handle) -> Self {
        if handle.is_reverse() {
            SequenceIter::Reverse(bases)
        } else {
            SequenceIter::Forward(bases)
        }
    }
}

impl<I> Iterator for SequenceIter<I>
where
    I: DoubleEndedIterator<Item = u8>,
{
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        match self {
            SequenceIter::Forward(bases) => bases.next(),
            SequenceIter::Reverse(bases) => {
                bases.next_back().map(dna::comp_base)
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            SequenceIter::Forward(bases) | SequenceIter::Reverse(bases) => {
                bases.size_hint()
            }
        }
    }
}

impl<I> ExactSizeIterator for SequenceIter<I> where
    I: DoubleEndedIterator<Item = u8> + ExactSizeIterator
{
}
