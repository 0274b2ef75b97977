/*!

Reverse index from node IDs to the steps on that node, across all
paths. Every live step is in exactly one bucket, keyed by the node ID
of its handle.

*/

use fnv::FnvHashMap;

use crate::handle::NodeId;
use crate::pathhandlegraph::StepHandle;

#[derive(Debug, Clone, Default)]
pub struct Occurrences {
    buckets: FnvHashMap<NodeId, Vec<StepHandle>>,
}

impl Occurrences {
    /// The steps on the given node, in no particular order.
    #[inline]
    pub fn get(&self, id: NodeId) -> &[StepHandle] {
        self.buckets.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    #[inline]
    pub fn insert(&mut self, id: NodeId, step: StepHandle) {
        self.buckets.entry(id).or_default().push(step);
    }

    /// Remove a step from a node's bucket. Returns `false` if the step
    /// wasn't in the bucket.
    pub fn remove(&mut self, id: NodeId, step: StepHandle) -> bool {
        let bucket = match self.buckets.get_mut(&id) {
            Some(bucket) => bucket,
            None => return false,
        };

        let found = match bucket.iter().position(|s| *s == step) {
            Some(ix) => {
                bucket.swap_remove(ix);
                true
            }
            None => false,
        };

        if bucket.is_empty() {
            self.buckets.remove(&id);
        }

        found
    }

    /// Drop the bucket of a node entirely.
    #[inline]
    pub fn remove_node(&mut self, id: NodeId) {
        self.buckets.remove(&id);
    }

    /// The total number of entries across all buckets.
    pub fn total_len(&self) -> usize {
        self.buckets.values().map(|b| b.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[StepHandle])> + '_ {
        self.buckets.iter().map(|(id, b)| (*id, b.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathhandlegraph::{PathId, StepIx};

    fn step(path: u64, ix: u32) -> StepHandle {
        StepHandle::new(PathId(path), StepIx::new(ix, 0))
    }

    #[test]
    fn insert_and_remove() {
        let mut occs = Occurrences::default();
        let n1 = NodeId::from(1u64);
        let n2 = NodeId::from(2u64);

        occs.insert(n1, step(1, 0));
        occs.insert(n1, step(2, 0));
        occs.insert(n2, step(1, 1));

        assert_eq!(occs.get(n1).len(), 2);
        assert_eq!(occs.total_len(), 3);

        assert!(occs.remove(n1, step(1, 0)));
        assert!(!occs.remove(n1, step(1, 0)));
        assert_eq!(occs.get(n1), &[step(2, 0)]);

        assert!(occs.remove(n1, step(2, 0)));
        assert!(occs.get(n1).is_empty());
        assert_eq!(occs.get(n2), &[step(1, 1)]);

        occs.remove_node(n2);
        assert_eq!(occs.total_len(), 0);
    }
}
