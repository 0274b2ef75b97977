/*!
A mutable handlegraph backed by ordered maps.

[`HashGraph`] stores each node's sequence together with its left and
right edge lists, and each path as a linked list of steps. An
occurrence index maps every node to the steps that visit it, so
structural edits can keep paths consistent with the graph.
*/

use bstr::{BString, ByteSlice};

use log::{debug, trace};

use crate::{
    error::{GraphError, Result},
    handle::Handle,
    pathhandlegraph::*,
};

mod graph;
mod mutation;
mod node;
mod occurrences;
mod path;
mod serialize;

pub use self::graph::HashGraph;
pub use self::node::Node;
pub(crate) use self::node::{incoming_side, reciprocal_of};
pub use self::occurrences::Occurrences;
pub use self::path::{Path, StepRecord, StepsIter};

impl HashGraph {
    fn step_record(&self, step: StepHandle) -> Result<&StepRecord> {
        self.paths
            .get(&step.path)
            .and_then(|p| p.get(step.step))
            .ok_or(GraphError::StepNotFound { path: step.path })
    }

    fn insert_step(
        &mut self,
        path_id: PathId,
        handle: Handle,
        at_end: bool,
    ) -> Result<StepHandle> {
        self.node_or_err(handle.id())?;

        let path = self.path_mut_or_err(path_id)?;
        let ix = if at_end {
            path.push_back(handle)
        } else {
            path.push_front(handle)
        };

        let step = StepHandle::new(path_id, ix);
        self.occurrences.insert(handle.id(), step);

        trace!("added step {:?} on path {}", handle, path_id);
        Ok(step)
    }
}

impl PathHandleGraph for HashGraph {
    #[inline]
    fn path_count(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    fn has_path(&self, name: &[u8]) -> bool {
        self.path_id.contains_key(name.as_bstr())
    }

    fn get_path_handle(&self, name: &[u8]) -> Result<PathId> {
        self.path_id
            .get(name.as_bstr())
            .copied()
            .ok_or_else(|| GraphError::PathNameNotFound { name: name.into() })
    }

    fn get_path_name(&self, path: PathId) -> Result<&[u8]> {
        Ok(self.path_or_err(path)?.name.as_slice())
    }

    fn get_occurrence_count(&self, path: PathId) -> Result<usize> {
        Ok(self.path_or_err(path)?.len())
    }

    fn get_occurrence(&self, step: StepHandle) -> Result<Handle> {
        Ok(self.step_record(step)?.handle)
    }

    fn get_first_occurrence(&self, path_id: PathId) -> Result<StepHandle> {
        let path = self.path_or_err(path_id)?;
        path.head()
            .map(|ix| StepHandle::new(path_id, ix))
            .ok_or_else(|| {
                GraphError::precondition(format!("path {} is empty", path_id))
            })
    }

    fn get_last_occurrence(&self, path_id: PathId) -> Result<StepHandle> {
        let path = self.path_or_err(path_id)?;
        path.tail()
            .map(|ix| StepHandle::new(path_id, ix))
            .ok_or_else(|| {
                GraphError::precondition(format!("path {} is empty", path_id))
            })
    }

    fn has_next_occurrence(&self, step: StepHandle) -> bool {
        self.step_record(step)
            .map(|rec| rec.next.is_some())
            .unwrap_or(false)
    }

    fn has_previous_occurrence(&self, step: StepHandle) -> bool {
        self.step_record(step)
            .map(|rec| rec.prev.is_some())
            .unwrap_or(false)
    }

    fn get_next_occurrence(&self, step: StepHandle) -> Result<StepHandle> {
        let rec = self.step_record(step)?;
        rec.next
            .map(|ix| StepHandle::new(step.path, ix))
            .ok_or_else(|| {
                GraphError::precondition("step is the last step of its path")
            })
    }

    fn get_previous_occurrence(&self, step: StepHandle) -> Result<StepHandle> {
        let rec = self.step_record(step)?;
        rec.prev
            .map(|ix| StepHandle::new(step.path, ix))
            .ok_or_else(|| {
                GraphError::precondition("step is the first step of its path")
            })
    }

    fn for_each_path_handle<F>(&self, mut f: F) -> bool
    where
        F: FnMut(PathId) -> bool,
    {
        for &path_id in self.paths.keys() {
            if !f(path_id) {
                return false;
            }
        }
        true
    }

    fn for_each_occurrence_in_path<F>(
        &self,
        path_id: PathId,
        mut f: F,
    ) -> Result<bool>
    where
        F: FnMut(StepHandle) -> bool,
    {
        let path = self.path_or_err(path_id)?;
        for (ix, _) in path.steps() {
            if !f(StepHandle::new(path_id, ix)) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn for_each_occurrence_on_handle<F>(&self, handle: Handle, mut f: F) -> bool
    where
        F: FnMut(StepHandle) -> bool,
    {
        for &step in self.occurrences.get(handle.id()) {
            if !f(step) {
                return false;
            }
        }
        true
    }
}

impl MutablePathHandleGraph for HashGraph {
    fn create_path_handle(&mut self, name: &[u8]) -> Result<PathId> {
        if self.path_id.contains_key(name.as_bstr()) {
            return Err(GraphError::DuplicatePathName { name: name.into() });
        }

        let path_id = PathId(self.next_path_id);
        self.next_path_id += 1;

        let name: BString = name.into();
        self.path_id.insert(name.clone(), path_id);
        self.paths.insert(path_id, Path::new(name, path_id));

        debug!("created path {}", path_id);
        Ok(path_id)
    }

    fn destroy_path(&mut self, path_id: PathId) -> Result<()> {
        let path = self
            .paths
            .remove(&path_id)
            .ok_or(GraphError::PathNotFound { id: path_id })?;

        for (ix, rec) in path.steps() {
            self.occurrences
                .remove(rec.handle.id(), StepHandle::new(path_id, ix));
        }

        self.path_id.remove(&path.name);

        debug!("destroyed path {} with {} steps", path_id, path.len());
        Ok(())
    }

    fn append_occurrence(
        &mut self,
        path: PathId,
        handle: Handle,
    ) -> Result<StepHandle> {
        self.insert_step(path, handle, true)
    }

    fn prepend_occurrence(
        &mut self,
        path: PathId,
        handle: Handle,
    ) -> Result<StepHandle> {
        self.insert_step(path, handle, false)
    }

    fn destroy_occurrence(&mut self, step: StepHandle) -> Result<()> {
        let handle = self
            .paths
            .get_mut(&step.path)
            .and_then(|p| p.remove(step.step))
            .ok_or(GraphError::StepNotFound { path: step.path })?;

        self.occurrences.remove(handle.id(), step);
        trace!("removed step {:?} from path {}", handle, step.path);
        Ok(())
    }
}
