/*!

Structural edits on a `HashGraph`.

Every operation checks its preconditions before the first write, so
an `Err` leaves the graph untouched. Edits that change the meaning of
handles stored elsewhere (flipping a node, moving edges to a new
node) first collect the locations of the affected back references,
then patch them.

*/

use fnv::FnvHashSet;

use log::{debug, trace};

use crate::{
    error::{GraphError, Result},
    handle::{Direction, Edge, Handle, NodeId},
    mutablehandlegraph::*,
    pathhandlegraph::StepHandle,
    util::dna,
};

use super::node::{incoming_side, outgoing_side, reciprocal_of};
use super::{HashGraph, Node};

impl HashGraph {
    /// Add the edge list entries for an edge whose endpoints are known
    /// to exist.
    fn push_edge_entries(&mut self, edge: Edge) {
        let Edge(left, right) = edge;
        if let Some(node) = self.graph.get_mut(&left.id()) {
            node.edges_mut(outgoing_side(left)).push(right);
        }

        // a reversing self-edge only touches one side of one node, so
        // it's only stored once
        if !edge.is_reversing_self_loop() {
            if let Some(node) = self.graph.get_mut(&right.id()) {
                node.edges_mut(incoming_side(right)).push(left.flip());
            }
        }
    }

    fn check_new_id(&self, node_id: NodeId) -> Result<()> {
        if !node_id.is_packable() {
            return Err(GraphError::invalid(format!(
                "node ID {} does not fit in a handle",
                node_id
            )));
        }
        if self.graph.contains_key(&node_id) {
            return Err(GraphError::DuplicateId { id: node_id });
        }
        Ok(())
    }

    /// Translate split offsets into the forward orientation of the
    /// node, checking that they're strictly increasing and inside the
    /// node.
    fn forward_offsets(
        handle: Handle,
        node_len: usize,
        offsets: &[usize],
    ) -> Result<Vec<usize>> {
        let mut last = 0;
        for &offset in offsets {
            if offset <= last || offset >= node_len {
                return Err(GraphError::invalid(format!(
                    "split offsets {:?} must be strictly increasing \
                     and inside a node of length {}",
                    offsets, node_len
                )));
            }
            last = offset;
        }

        if handle.is_reverse() {
            Ok(offsets.iter().rev().map(|o| node_len - o).collect())
        } else {
            Ok(offsets.to_vec())
        }
    }
}

impl AdditiveHandleGraph for HashGraph {
    fn append_handle(&mut self, sequence: &[u8]) -> Result<Handle> {
        let id = self
            .max_id
            .0
            .checked_add(1)
            .ok_or_else(|| GraphError::invalid("node ID space exhausted"))?;
        self.create_handle(sequence, id)
    }

    fn create_handle<T: Into<NodeId>>(
        &mut self,
        sequence: &[u8],
        node_id: T,
    ) -> Result<Handle> {
        let id = node_id.into();
        self.check_new_id(id)?;
        self.insert_node(id, Node::new(sequence));
        trace!("created node {} of length {}", id, sequence.len());
        Ok(Handle::pack(id, false))
    }

    fn create_edge(&mut self, edge: Edge) -> Result<()> {
        let Edge(left, right) = edge;
        self.node_or_err(left.id())?;
        self.node_or_err(right.id())?;

        trace!("creating edge {:?} -> {:?}", left, right);
        self.push_edge_entries(edge);
        Ok(())
    }
}

impl SubtractiveHandleGraph for HashGraph {
    fn destroy_handle(&mut self, handle: Handle) -> Result<()> {
        let id = handle.id();
        let node = self.node_or_err(id)?;

        let occurrences = self.occurrences.get(id).len();
        if occurrences > 0 {
            return Err(GraphError::precondition(format!(
                "node {} still has {} path occurrences",
                id, occurrences
            )));
        }

        // every back reference to this node stored on its neighbors
        let fwd = Handle::pack(id, false);
        let mut back_refs: Vec<(NodeId, Direction, Handle)> = Vec::new();
        for &side in &[Direction::Left, Direction::Right] {
            for &target in node.edges(side) {
                if target.id() != id {
                    back_refs.push((
                        target.id(),
                        incoming_side(target),
                        reciprocal_of(fwd, side),
                    ));
                }
            }
        }

        for (other, side, value) in back_refs {
            if let Some(node) = self.graph.get_mut(&other) {
                node.remove_edge_entry(side, value);
            }
        }

        self.graph.remove(&id);
        self.occurrences.remove_node(id);

        debug!("destroyed node {}", id);
        Ok(())
    }

    fn destroy_edge(&mut self, edge: Edge) -> Result<bool> {
        let Edge(left, right) = edge;
        self.node_or_err(left.id())?;
        self.node_or_err(right.id())?;

        let removed = self
            .graph
            .get_mut(&left.id())
            .map(|n| n.remove_edge_entry(outgoing_side(left), right))
            .unwrap_or(false);

        if !removed {
            return Ok(false);
        }

        if !edge.is_reversing_self_loop() {
            if let Some(node) = self.graph.get_mut(&right.id()) {
                node.remove_edge_entry(incoming_side(right), left.flip());
            }
        }

        trace!("destroyed edge {:?} -> {:?}", left, right);
        Ok(true)
    }

    fn clear(&mut self) {
        *self = HashGraph::default();
    }
}

impl MutableHandles for HashGraph {
    fn divide_handle(
        &mut self,
        handle: Handle,
        offsets: &[usize],
    ) -> Result<Vec<Handle>> {
        let id = handle.id();
        let node_len = self.node_or_err(id)?.sequence.len();

        let fwd_offsets = Self::forward_offsets(handle, node_len, offsets)?;

        if fwd_offsets.is_empty() {
            return Ok(vec![handle]);
        }

        let new_count = fwd_offsets.len() as u64;
        let last_new_id = self.max_id.0.checked_add(new_count);
        if last_new_id.map_or(true, |i| !NodeId(i).is_packable()) {
            return Err(GraphError::invalid(
                "not enough free node IDs to divide the handle",
            ));
        }

        // Everything past this point succeeds.

        let fwd = handle.forward();

        let (sequence, right_edges) = {
            let node = self
                .graph
                .get_mut(&id)
                .ok_or(GraphError::NodeNotFound { id })?;
            let sequence = std::mem::take(&mut node.sequence);
            let right_edges = std::mem::take(&mut node.right_edges);
            node.sequence = sequence[..fwd_offsets[0]].to_vec();
            (sequence, right_edges)
        };

        let mut result = Vec::with_capacity(fwd_offsets.len() + 1);
        result.push(fwd);

        for (ix, &start) in fwd_offsets.iter().enumerate() {
            let end = fwd_offsets.get(ix + 1).copied().unwrap_or(node_len);
            let new_id = self.max_id + 1;
            self.insert_node(new_id, Node::new(&sequence[start..end]));
            result.push(Handle::pack(new_id, false));
        }

        let last = result[result.len() - 1];

        // Move the right-hand edges onto the last segment. A
        // reversing self-loop on the right side now loops on the last
        // segment instead.
        let right_edges = right_edges
            .into_iter()
            .map(|h| if h == fwd.flip() { last.flip() } else { h })
            .collect::<Vec<_>>();

        // Retarget the back references of the moved edges, one entry
        // per moved edge.
        for &target in right_edges.iter() {
            if target == last.flip() {
                continue;
            }
            if let Some(other) = self.graph.get_mut(&target.id()) {
                let list = other.edges_mut(incoming_side(target));
                if let Some(bwd) = list.iter_mut().find(|h| **h == fwd.flip()) {
                    *bwd = last.flip();
                }
            }
        }

        if let Some(last_node) = self.graph.get_mut(&last.id()) {
            last_node.right_edges = right_edges;
        }

        // Chain the segments together
        for window in result.windows(2) {
            if let [this, next] = *window {
                self.push_edge_entries(Edge(this, next));
            }
        }

        // Insert the new segments into every path that visits the node
        let steps = self.occurrences.get(id).to_vec();
        for step in steps {
            let path = match self.paths.get_mut(&step.path) {
                Some(path) => path,
                None => continue,
            };
            let step_handle = match path.get(step.step) {
                Some(rec) => rec.handle,
                None => continue,
            };

            if step_handle.is_reverse() {
                // walking the node backwards, the new segments come
                // before the existing step, in reverse order
                let mut cursor = path.get(step.step).and_then(|r| r.prev);
                for &segment in result[1..].iter().rev() {
                    let new_ix = path.insert_after(cursor, segment.flip());
                    self.occurrences
                        .insert(segment.id(), StepHandle::new(step.path, new_ix));
                    cursor = Some(new_ix);
                }
            } else {
                let mut cursor = Some(step.step);
                for &segment in result[1..].iter() {
                    let new_ix = path.insert_after(cursor, segment);
                    self.occurrences
                        .insert(segment.id(), StepHandle::new(step.path, new_ix));
                    cursor = Some(new_ix);
                }
            }
        }

        debug!(
            "divided node {} into {} segments at {:?}",
            id,
            result.len(),
            fwd_offsets
        );

        if handle.is_reverse() {
            result.reverse();
            result.iter_mut().for_each(|h| *h = h.flip());
        }

        Ok(result)
    }

    fn apply_orientation(&mut self, handle: Handle) -> Result<Handle> {
        let id = handle.id();
        let node = self.node_or_err(id)?;

        if !handle.is_reverse() {
            return Ok(handle);
        }

        let fwd = handle.forward();

        // Find the back reference of every edge list entry on the
        // node. Each entry gets its own back reference, even when
        // several entries point to the same neighbor, so a neighbor
        // connected to both sides of this node is patched twice.
        let mut claimed: FnvHashSet<(NodeId, Direction, usize)> =
            FnvHashSet::default();
        let mut patches: Vec<(NodeId, Direction, usize)> = Vec::new();

        for &side in &[Direction::Left, Direction::Right] {
            let reciprocal = reciprocal_of(fwd, side);
            for &target in node.edges(side) {
                if target.id() == id {
                    continue;
                }
                let other = match self.graph.get(&target.id()) {
                    Some(other) => other,
                    None => continue,
                };
                let bwd_side = incoming_side(target);
                let slot = other.edges(bwd_side).iter().enumerate().position(
                    |(ix, h)| {
                        *h == reciprocal
                            && !claimed.contains(&(target.id(), bwd_side, ix))
                    },
                );
                if let Some(ix) = slot {
                    claimed.insert((target.id(), bwd_side, ix));
                    patches.push((target.id(), bwd_side, ix));
                }
            }
        }

        for (other, side, ix) in patches {
            if let Some(entry) = self
                .graph
                .get_mut(&other)
                .and_then(|n| n.edges_mut(side).get_mut(ix))
            {
                *entry = entry.flip();
            }
        }

        if let Some(node) = self.graph.get_mut(&id) {
            dna::rev_comp_in_place(&mut node.sequence);

            // entries pointing back to this node change meaning too
            for h in node
                .left_edges
                .iter_mut()
                .chain(node.right_edges.iter_mut())
                .filter(|h| h.id() == id)
            {
                *h = h.flip();
            }

            // the edge lists switch sides
            std::mem::swap(&mut node.left_edges, &mut node.right_edges);
        }

        // update the occurrences on paths
        for step in self.occurrences.get(id) {
            if let Some(rec) = self
                .paths
                .get_mut(&step.path)
                .and_then(|p| p.get_mut(step.step))
            {
                rec.handle = rec.handle.flip();
            }
        }

        debug!("reversed the orientation of node {}", id);

        Ok(fwd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::handlegraph::*;
    use crate::pathhandlegraph::*;

    fn hnd(x: u64) -> Handle {
        Handle::pack(x, false)
    }

    fn edge_entries(graph: &HashGraph, id: u64) -> (Vec<Handle>, Vec<Handle>) {
        let node = graph.get_node_unchecked(&NodeId::from(id));
        (node.left_edges.clone(), node.right_edges.clone())
    }

    #[test]
    fn failed_edits_leave_graph_unchanged() {
        let mut graph = HashGraph::new();
        let h1 = graph.create_handle(b"ACGT", 1u64).unwrap();
        let h2 = graph.create_handle(b"TTT", 2u64).unwrap();
        graph.create_edge(Edge(h1, h2)).unwrap();

        let before = graph.clone();

        assert!(matches!(
            graph.create_handle(b"A", 1u64),
            Err(GraphError::DuplicateId { .. })
        ));
        assert!(matches!(
            graph.create_edge(Edge(h1, hnd(9))),
            Err(GraphError::NodeNotFound { .. })
        ));
        assert!(matches!(
            graph.divide_handle(h1, &[2, 2]),
            Err(GraphError::InvalidArgument { .. })
        ));
        assert!(matches!(
            graph.divide_handle(h1, &[0]),
            Err(GraphError::InvalidArgument { .. })
        ));
        assert!(matches!(
            graph.divide_handle(h1, &[4]),
            Err(GraphError::InvalidArgument { .. })
        ));
        assert!(matches!(
            graph.apply_orientation(hnd(7).flip()),
            Err(GraphError::NodeNotFound { .. })
        ));

        assert_eq!(before.graph, graph.graph);
        assert_eq!(before.max_id, graph.max_id);
        assert_eq!(before.min_id, graph.min_id);
    }

    #[test]
    fn node_ids_must_fit_in_handles() {
        let mut graph = HashGraph::new();
        assert!(matches!(
            graph.create_handle(b"A", std::u64::MAX),
            Err(GraphError::InvalidArgument { .. })
        ));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn reversing_self_loop_stored_once() {
        let mut graph = HashGraph::new();
        let h = graph.append_handle(b"GATTACA").unwrap();

        graph.create_edge(Edge(h, h.flip())).unwrap();

        let (left, right) = edge_entries(&graph, 1);
        assert_eq!(left.len() + right.len(), 1);
        assert_eq!(right, vec![h.flip()]);
        assert_eq!(graph.edge_count(), 1);

        assert!(graph.destroy_edge(Edge(h, h.flip())).unwrap());
        let (left, right) = edge_entries(&graph, 1);
        assert!(left.is_empty() && right.is_empty());
    }

    #[test]
    fn destroying_missing_edge_is_noop() {
        let mut graph = HashGraph::new();
        let h1 = graph.append_handle(b"A").unwrap();
        let h2 = graph.append_handle(b"C").unwrap();

        assert_eq!(graph.destroy_edge(Edge(h1, h2)).unwrap(), false);

        graph.create_edge(Edge(h1, h2)).unwrap();
        graph.create_edge(Edge(h1, h2)).unwrap();
        assert_eq!(graph.degree(h1, Direction::Right), 2);

        // removes a single copy of a parallel edge
        assert!(graph.destroy_edge(Edge(h2.flip(), h1.flip())).unwrap());
        assert_eq!(graph.degree(h1, Direction::Right), 1);
        assert_eq!(graph.degree(h2, Direction::Left), 1);
    }

    #[test]
    fn destroy_node_with_occurrences_fails() {
        let mut graph = HashGraph::new();
        let h1 = graph.append_handle(b"A").unwrap();
        let path = graph.create_path_handle(b"p").unwrap();
        let step = graph.append_occurrence(path, h1).unwrap();

        assert!(matches!(
            graph.destroy_handle(h1),
            Err(GraphError::PreconditionViolation { .. })
        ));
        assert!(graph.has_node(h1.id()));

        graph.destroy_occurrence(step).unwrap();
        graph.destroy_handle(h1).unwrap();
        assert!(!graph.has_node(h1.id()));
    }

    #[test]
    fn divide_with_self_loops() {
        let mut graph = HashGraph::new();
        let h = graph.append_handle(b"AACCGG").unwrap();

        // a loop from the end of the node back to its start, and a
        // reversing loop on its right side
        graph.create_edge(Edge(h, h)).unwrap();
        graph.create_edge(Edge(h, h.flip())).unwrap();

        let parts = graph.divide_handle(h, &[2, 4]).unwrap();
        assert_eq!(parts.len(), 3);
        let (first, last) = (parts[0], parts[2]);

        assert!(graph.has_edge(last, first));
        assert!(graph.has_edge(last, last.flip()));
        assert!(graph.has_edge(parts[0], parts[1]));
        assert!(graph.has_edge(parts[1], parts[2]));
        assert!(!graph.has_edge(first, first.flip()));

        assert_eq!(graph.edge_count(), 4);
        crate::util::validate::validate(&graph).unwrap();
    }

    #[test]
    fn apply_orientation_with_self_loops() {
        let mut graph = HashGraph::new();
        let h = graph.append_handle(b"ACG").unwrap();
        let other = graph.append_handle(b"T").unwrap();

        graph.create_edge(Edge(h, h)).unwrap();
        graph.create_edge(Edge(h, h.flip())).unwrap();
        graph.create_edge(Edge(h, other)).unwrap();
        graph.create_edge(Edge(other, h.flip())).unwrap();

        let mut edges_before = graph.edges().collect::<Vec<_>>();
        edges_before.sort();

        let new_h = graph.apply_orientation(h.flip()).unwrap();
        assert_eq!(new_h, h);
        assert_eq!(graph.sequence(new_h), b"CGT");

        // the same edges exist, described from the other strand of
        // the flipped node
        assert!(graph.has_edge(new_h.flip(), new_h.flip()));
        assert!(graph.has_edge(new_h.flip(), new_h));
        assert!(graph.has_edge(new_h.flip(), other));
        assert!(graph.has_edge(other, new_h));

        crate::util::validate::validate(&graph).unwrap();

        graph.apply_orientation(new_h.flip()).unwrap();
        let mut edges_after = graph.edges().collect::<Vec<_>>();
        edges_after.sort();
        assert_eq!(edges_before, edges_after);
    }
}
