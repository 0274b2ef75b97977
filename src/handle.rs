use std::cmp::Ordering;
use std::ops::Add;

/// Newtype that represents a node in the graph
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// The largest node ID that still fits in a `Handle` alongside
    /// the orientation bit.
    pub const MAX_PACKABLE: NodeId = NodeId((1 << 63) - 1);

    #[inline]
    pub fn is_packable(&self) -> bool {
        *self <= Self::MAX_PACKABLE
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    #[inline]
    fn from(num: u64) -> Self {
        NodeId(num)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(num: usize) -> Self {
        NodeId(num as u64)
    }
}

impl From<NodeId> for u64 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl From<i32> for NodeId {
    #[inline]
    fn from(num: i32) -> Self {
        NodeId(num as u64)
    }
}

impl Add<u64> for NodeId {
    type Output = Self;

    #[inline]
    fn add(self, other: u64) -> Self {
        NodeId(self.0 + other)
    }
}

/// A Handle is a node ID with an orientation, packed as a single
/// u64. The lowest bit is set if the handle is reverse.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Hash, Eq, Ord)]
#[repr(transparent)]
pub struct Handle(pub u64);

/// Returns the forward-oriented `Handle` for a `NodeId`
impl From<NodeId> for Handle {
    #[inline]
    fn from(id: NodeId) -> Handle {
        Handle(id.0 << 1)
    }
}

/// Unpacks the `NodeId` from a `Handle`
impl From<Handle> for NodeId {
    #[inline]
    fn from(h: Handle) -> NodeId {
        h.id()
    }
}

impl Handle {
    #[inline]
    pub fn as_integer(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn from_integer(i: u64) -> Self {
        Handle(i)
    }

    #[inline]
    pub fn unpack_number(self) -> u64 {
        self.as_integer() >> 1
    }

    #[inline]
    pub fn unpack_bit(self) -> bool {
        self.as_integer() & 1 != 0
    }

    /// Pack a node ID and orientation into a handle. Panics if the
    /// node ID needs all 64 bits.
    #[inline]
    pub fn pack<T: Into<NodeId>>(id: T, is_reverse: bool) -> Handle {
        let id: NodeId = id.into();
        let uint: u64 = id.into();
        if uint < (0x1 << 63) {
            Handle::from_integer((uint << 1) | is_reverse as u64)
        } else {
            panic!(
                "Tried to create a handle with a node ID that filled 64 bits"
            )
        }
    }

    #[inline]
    pub fn id(self) -> NodeId {
        NodeId(self.unpack_number())
    }

    #[inline]
    pub fn is_reverse(&self) -> bool {
        self.unpack_bit()
    }

    #[inline]
    pub fn flip(self) -> Self {
        Handle(self.as_integer() ^ 1)
    }

    #[inline]
    pub fn forward(self) -> Self {
        if self.is_reverse() {
            self.flip()
        } else {
            self
        }
    }
}

/// An edge between two handles. Construct with
/// [`Edge::edge_handle`] to get the canonical form, which is shared
/// by `(left, right)` and `(right.flip(), left.flip())`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Hash, Eq, Ord)]
pub struct Edge(pub Handle, pub Handle);

impl Edge {
    /// Construct an edge, taking the orientation of the handles into account
    #[inline]
    pub fn edge_handle(left: Handle, right: Handle) -> Edge {
        let flipped_right = right.flip();
        let flipped_left = left.flip();

        match left.cmp(&flipped_right) {
            Ordering::Greater => Edge(flipped_right, flipped_left),
            Ordering::Equal => {
                if right > flipped_left {
                    Edge(flipped_right, flipped_left)
                } else {
                    Edge(left, right)
                }
            }
            Ordering::Less => Edge(left, right),
        }
    }

    /// The same edge, seen from the other strand.
    #[inline]
    pub fn reverse(self) -> Edge {
        Edge(self.1.flip(), self.0.flip())
    }

    /// Return the canonical form of this edge.
    #[inline]
    pub fn canonical(self) -> Edge {
        Edge::edge_handle(self.0, self.1)
    }

    /// True if the edge is a reversing self-loop, i.e. it only
    /// touches a single side of a single node.
    #[inline]
    pub fn is_reversing_self_loop(&self) -> bool {
        *self == self.reverse()
    }

    /// Edge traversals walk the forward handle of every node, and
    /// look at the neighbors on both sides. Every edge shows up from
    /// both of its ends; this picks exactly one of them.
    ///
    /// `neighbor` is oriented as `follow_edges` reports it: on the
    /// right, `(handle, neighbor)` is the edge, and on the left it's
    /// `(neighbor, handle)`. Returns the canonical edge if this is
    /// the end that reports it.
    #[inline]
    pub fn from_adjacency(
        handle: Handle,
        dir: Direction,
        neighbor: Handle,
    ) -> Option<Edge> {
        let (id, other) = (handle.id(), neighbor.id());
        match dir {
            Direction::Right if id <= other => {
                Some(Edge::edge_handle(handle, neighbor))
            }
            Direction::Left
                if id < other || (id == other && neighbor.is_reverse()) =>
            {
                Some(Edge::edge_handle(neighbor, handle))
            }
            _ => None,
        }
    }
}

/// Which side of a handle to look at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn is_left(&self) -> bool {
        *self == Direction::Left
    }
}
