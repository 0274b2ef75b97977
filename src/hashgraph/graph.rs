use std::collections::BTreeMap;

use bstr::BString;
use fnv::FnvHashMap;
use rayon::prelude::*;

use crate::{
    error::{GraphError, Result},
    handle::{Direction, Handle, NodeId},
    handlegraph::*,
    pathhandlegraph::PathId,
    util::dna,
};

use super::{Node, Occurrences, Path};

/// A handlegraph implementation using maps to represent the graph
/// topology and nodes, and each path as a linked list of steps.
///
/// Nodes are kept ordered by ID, so iteration over nodes (and the
/// serialized form of the graph) is deterministic.
///
/// An empty graph has a max ID of 0 and a min ID of
/// [`NodeId::MAX_PACKABLE`], the largest signed 64-bit value.
///
/// The node and path maps can only be edited through the mutation
/// traits, which keep edge lists and occurrences in sync.
#[derive(Debug, Clone)]
pub struct HashGraph {
    pub(crate) max_id: NodeId,
    pub(crate) min_id: NodeId,
    pub(crate) graph: BTreeMap<NodeId, Node>,
    pub(crate) path_id: FnvHashMap<BString, PathId>,
    pub(crate) paths: BTreeMap<PathId, Path>,
    pub(crate) occurrences: Occurrences,
    pub(crate) next_path_id: u64,
}

impl Default for HashGraph {
    fn default() -> HashGraph {
        HashGraph {
            max_id: NodeId::from(0u64),
            min_id: NodeId::MAX_PACKABLE,
            graph: Default::default(),
            path_id: Default::default(),
            paths: Default::default(),
            occurrences: Default::default(),
            next_path_id: 1,
        }
    }
}

impl HashGraph {
    pub fn new() -> HashGraph {
        Default::default()
    }

    pub fn get_node(&self, node_id: &NodeId) -> Option<&Node> {
        self.graph.get(node_id)
    }

    pub fn get_node_unchecked(&self, node_id: &NodeId) -> &Node {
        self.graph.get(node_id).unwrap_or_else(|| {
            panic!("Tried getting a node that doesn't exist, ID: {:?}", node_id)
        })
    }

    pub(crate) fn node_or_err(&self, node_id: NodeId) -> Result<&Node> {
        self.graph
            .get(&node_id)
            .ok_or(GraphError::NodeNotFound { id: node_id })
    }

    pub fn get_path(&self, path_id: &PathId) -> Option<&Path> {
        self.paths.get(path_id)
    }

    pub(crate) fn path_or_err(&self, path_id: PathId) -> Result<&Path> {
        self.paths
            .get(&path_id)
            .ok_or(GraphError::PathNotFound { id: path_id })
    }

    pub(crate) fn path_mut_or_err(&mut self, path_id: PathId) -> Result<&mut Path> {
        self.paths
            .get_mut(&path_id)
            .ok_or(GraphError::PathNotFound { id: path_id })
    }

    /// The occurrence index, mapping node IDs to the steps on them.
    pub fn occurrences(&self) -> &Occurrences {
        &self.occurrences
    }

    /// Insert a node record, updating the ID bounds.
    pub(crate) fn insert_node(&mut self, node_id: NodeId, node: Node) {
        self.graph.insert(node_id, node);
        self.max_id = std::cmp::max(self.max_id, node_id);
        self.min_id = std::cmp::min(self.min_id, node_id);
    }

    /// The edge list that `follow_edges` reads for the given handle
    /// and direction.
    #[inline]
    fn edge_list(&self, handle: Handle, dir: Direction) -> &[Handle] {
        let node = self.get_node_unchecked(&handle.id());
        if handle.is_reverse() != dir.is_left() {
            &node.left_edges
        } else {
            &node.right_edges
        }
    }
}

impl HandleGraph for HashGraph {
    #[inline]
    fn has_node(&self, node_id: NodeId) -> bool {
        self.graph.contains_key(&node_id)
    }

    #[inline]
    fn length(&self, handle: Handle) -> usize {
        self.get_node_unchecked(&handle.id()).sequence.len()
    }

    fn sequence(&self, handle: Handle) -> Vec<u8> {
        let seq = &self.get_node_unchecked(&handle.id()).sequence;
        if handle.is_reverse() {
            dna::rev_comp(seq)
        } else {
            seq.clone()
        }
    }

    #[inline]
    fn min_node_id(&self) -> NodeId {
        self.min_id
    }

    #[inline]
    fn max_node_id(&self) -> NodeId {
        self.max_id
    }

    #[inline]
    fn node_count(&self) -> usize {
        self.graph.len()
    }

    fn total_length(&self) -> usize {
        self.graph.values().map(|n| n.sequence.len()).sum()
    }

    #[inline]
    fn degree(&self, handle: Handle, dir: Direction) -> usize {
        self.edge_list(handle, dir).len()
    }

    #[inline]
    fn has_edge(&self, left: Handle, right: Handle) -> bool {
        self.edge_list(left, Direction::Right).contains(&right)
    }

    fn follow_edges<F>(&self, handle: Handle, dir: Direction, mut f: F) -> bool
    where
        F: FnMut(Handle) -> bool,
    {
        let flip = dir.is_left();
        for &h in self.edge_list(handle, dir) {
            let h = if flip { h.flip() } else { h };
            if !f(h) {
                return false;
            }
        }
        true
    }

    fn for_each_handle<F>(&self, mut f: F) -> bool
    where
        F: FnMut(Handle) -> bool,
    {
        for id in self.graph.keys() {
            if !f(Handle::pack(*id, false)) {
                return false;
            }
        }
        true
    }

    fn for_each_handle_par<F>(&self, f: F) -> bool
    where
        F: Fn(Handle) -> bool + Send + Sync,
    {
        self.graph
            .par_iter()
            .map(|(id, _)| f(Handle::pack(*id, false)))
            .reduce(|| true, |a, b| a & b)
    }
}

impl<'a> IntoHandles for &'a HashGraph {
    type Handles =
        HandlesFrom<std::collections::btree_map::Keys<'a, NodeId, Node>>;

    #[inline]
    fn handles(self) -> Self::Handles {
        handles_from(self.graph.keys())
    }
}

impl<'a> IntoNeighbors for &'a HashGraph {
    type Neighbors = NeighborsFrom<std::slice::Iter<'a, Handle>>;

    #[inline]
    fn neighbors(self, handle: Handle, dir: Direction) -> Self::Neighbors {
        neighbors_from(self.edge_list(handle, dir).iter(), dir)
    }
}

impl<'a> IntoEdges for &'a HashGraph {
    type Edges = EdgesIter<&'a HashGraph>;

    #[inline]
    fn edges(self) -> Self::Edges {
        EdgesIter::new(self)
    }
}

impl<'a> IntoSequences for &'a HashGraph {
    type Sequence = SequenceIter<std::iter::Copied<std::slice::Iter<'a, u8>>>;

    #[inline]
    fn sequence_iter(self, handle: Handle) -> Self::Sequence {
        let seq = &self.get_node_unchecked(&handle.id()).sequence;
        SequenceIter::new(seq.iter().copied(), handle)
    }
}
