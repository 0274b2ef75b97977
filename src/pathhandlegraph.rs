/*!
Traits for the paths embedded in a handlegraph.

A path is a named, ordered list of steps, each step being an oriented
handle. Steps are addressed by [`StepHandle`]s, which stay valid
until the step itself (or its path) is removed, no matter what other
edits are made to the path or the graph.
*/

use crate::error::Result;
use crate::handle::Handle;

mod path;

pub use self::path::{PathId, StepHandle, StepIx};

/// Immutable access to the paths of a graph and the steps on them.
pub trait PathHandleGraph {
    /// The number of paths in the graph.
    fn path_count(&self) -> usize;

    fn has_path(&self, name: &[u8]) -> bool;

    /// Look up a path by name.
    fn get_path_handle(&self, name: &[u8]) -> Result<PathId>;

    fn get_path_name(&self, path: PathId) -> Result<&[u8]>;

    /// The number of steps on the path.
    fn get_occurrence_count(&self, path: PathId) -> Result<usize>;

    fn is_empty(&self, path: PathId) -> Result<bool> {
        Ok(self.get_occurrence_count(path)? == 0)
    }

    /// The oriented handle stored at the step.
    fn get_occurrence(&self, step: StepHandle) -> Result<Handle>;

    #[inline]
    fn get_path_handle_of_occurrence(&self, step: StepHandle) -> PathId {
        step.path_id()
    }

    /// The first step on the path. Fails with `PreconditionViolation`
    /// if the path is empty.
    fn get_first_occurrence(&self, path: PathId) -> Result<StepHandle>;

    /// The last step on the path. Fails with `PreconditionViolation`
    /// if the path is empty.
    fn get_last_occurrence(&self, path: PathId) -> Result<StepHandle>;

    /// `false` if `step` is the last step, or doesn't exist.
    fn has_next_occurrence(&self, step: StepHandle) -> bool;

    /// `false` if `step` is the first step, or doesn't exist.
    fn has_previous_occurrence(&self, step: StepHandle) -> bool;

    /// Fails with `PreconditionViolation` if `step` is the last step;
    /// check [`has_next_occurrence`](Self::has_next_occurrence) first.
    fn get_next_occurrence(&self, step: StepHandle) -> Result<StepHandle>;

    /// Fails with `PreconditionViolation` if `step` is the first
    /// step; check
    /// [`has_previous_occurrence`](Self::has_previous_occurrence)
    /// first.
    fn get_previous_occurrence(&self, step: StepHandle)
        -> Result<StepHandle>;

    /// Visit every path ID, stopping at the first `false`.
    fn for_each_path_handle<F>(&self, f: F) -> bool
    where
        F: FnMut(PathId) -> bool;

    /// Visit the steps of a path from first to last, stopping at the
    /// first `false`.
    fn for_each_occurrence_in_path<F>(&self, path: PathId, f: F) -> Result<bool>
    where
        F: FnMut(StepHandle) -> bool;

    /// Visit every step, on any path, that is on the node of
    /// `handle`. The orientation of `handle` is ignored.
    fn for_each_occurrence_on_handle<F>(&self, handle: Handle, f: F) -> bool
    where
        F: FnMut(StepHandle) -> bool;

    /// Collect the steps on the node of `handle`. If
    /// `match_orientation` is set, only the steps whose handle is
    /// exactly `handle` are included.
    fn occurrences_of_handle(
        &self,
        handle: Handle,
        match_orientation: bool,
    ) -> Vec<StepHandle> {
        let mut steps = Vec::new();
        self.for_each_occurrence_on_handle(handle, |step| {
            let keep = !match_orientation
                || self.get_occurrence(step).ok() == Some(handle);
            if keep {
                steps.push(step);
            }
            true
        });
        steps
    }
}

/// Creating, destroying and extending paths.
pub trait MutablePathHandleGraph: PathHandleGraph {
    /// Create a new, empty path. Fails with `DuplicatePathName` if
    /// the name is taken.
    fn create_path_handle(&mut self, name: &[u8]) -> Result<PathId>;

    /// Remove the path and all its steps.
    fn destroy_path(&mut self, path: PathId) -> Result<()>;

    /// Add a step to the end of the path.
    fn append_occurrence(
        &mut self,
        path: PathId,
        handle: Handle,
    ) -> Result<StepHandle>;

    /// Add a step to the start of the path.
    fn prepend_occurrence(
        &mut self,
        path: PathId,
        handle: Handle,
    ) -> Result<StepHandle>;

    /// Remove a single step from its path.
    fn destroy_occurrence(&mut self, step: StepHandle) -> Result<()>;
}
