/*!

`HashGraph` node definition

*/

use crate::handle::{Direction, Handle};

/// A node record. The sequence is stored in the node's forward
/// orientation. Each edge list holds the handles reached when leaving
/// the node from that side, oriented as they are entered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub sequence: Vec<u8>,
    pub left_edges: Vec<Handle>,
    pub right_edges: Vec<Handle>,
}

impl Node {
    pub fn new(sequence: &[u8]) -> Node {
        Node {
            sequence: sequence.into(),
            left_edges: vec![],
            right_edges: vec![],
        }
    }

    #[inline]
    pub fn edges(&self, side: Direction) -> &Vec<Handle> {
        match side {
            Direction::Left => &self.left_edges,
            Direction::Right => &self.right_edges,
        }
    }

    #[inline]
    pub fn edges_mut(&mut self, side: Direction) -> &mut Vec<Handle> {
        match side {
            Direction::Left => &mut self.left_edges,
            Direction::Right => &mut self.right_edges,
        }
    }

    /// Remove one entry equal to `target` from the given side, by
    /// swapping it with the last entry. Returns `false` if there was
    /// no such entry.
    pub fn remove_edge_entry(&mut self, side: Direction, target: Handle) -> bool {
        let list = self.edges_mut(side);
        if let Some(ix) = list.iter().position(|h| *h == target) {
            list.swap_remove(ix);
            true
        } else {
            false
        }
    }
}

/// The side of a node that an edge list entry for `handle` is stored
/// on, when `handle` is the one leaving the node.
#[inline]
pub(crate) fn outgoing_side(handle: Handle) -> Direction {
    if handle.is_reverse() {
        Direction::Left
    } else {
        Direction::Right
    }
}

/// The side of a node that an edge list entry for the edge entering
/// `handle` is stored on.
#[inline]
pub(crate) fn incoming_side(handle: Handle) -> Direction {
    if handle.is_reverse() {
        Direction::Right
    } else {
        Direction::Left
    }
}

/// The entry stored on the far end of an edge list entry of the node
/// with forward handle `fwd`. For an entry on the right side of the
/// node, the neighbor stores the flipped forward handle; for one on
/// the left side, the forward handle.
#[inline]
pub(crate) fn reciprocal_of(fwd: Handle, side: Direction) -> Handle {
    match side {
        Direction::Left => fwd,
        Direction::Right => fwd.flip(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_entry_swaps_last() {
        let h = |x: u64| Handle::pack(x, false);
        let mut node = Node::new(b"ACGT");
        node.right_edges = vec![h(1), h(2), h(3), h(2)];

        assert!(node.remove_edge_entry(Direction::Right, h(1)));
        assert_eq!(node.right_edges, vec![h(2), h(2), h(3)]);

        assert!(node.remove_edge_entry(Direction::Right, h(2)));
        assert_eq!(node.right_edges, vec![h(3), h(2)]);

        assert!(!node.remove_edge_entry(Direction::Left, h(2)));
        assert!(!node.remove_edge_entry(Direction::Right, h(5)));
    }

    #[test]
    fn entry_sides() {
        let fwd = Handle::pack(4u64, false);
        assert_eq!(outgoing_side(fwd), Direction::Right);
        assert_eq!(outgoing_side(fwd.flip()), Direction::Left);
        assert_eq!(incoming_side(fwd), Direction::Left);
        assert_eq!(incoming_side(fwd.flip()), Direction::Right);
    }
}
