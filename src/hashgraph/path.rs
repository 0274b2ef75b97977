/*!

`HashGraph` path definition.

Each path owns a slot arena of step records that form a doubly
linked list. Steps are addressed by [`StepIx`], which stays valid
until the step is removed, so steps can be inserted and removed
anywhere in the path in constant time without invalidating the
indices held by the occurrence index.

*/

use bstr::BString;

use crate::handle::Handle;
use crate::pathhandlegraph::{PathId, StepIx};

/// A single step on a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRecord {
    pub handle: Handle,
    pub prev: Option<StepIx>,
    pub next: Option<StepIx>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    record: Option<StepRecord>,
}

#[derive(Debug, Clone)]
pub struct Path {
    pub path_id: PathId,
    pub name: BString,
    head: Option<StepIx>,
    tail: Option<StepIx>,
    count: usize,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Path {
    pub fn new<T: Into<BString>>(name: T, path_id: PathId) -> Self {
        Path {
            path_id,
            name: name.into(),
            head: None,
            tail: None,
            count: 0,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn head(&self) -> Option<StepIx> {
        self.head
    }

    #[inline]
    pub fn tail(&self) -> Option<StepIx> {
        self.tail
    }

    #[inline]
    pub fn get(&self, ix: StepIx) -> Option<&StepRecord> {
        let slot = self.slots.get(ix.slot())?;
        if slot.generation == ix.generation {
            slot.record.as_ref()
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, ix: StepIx) -> Option<&mut StepRecord> {
        let slot = self.slots.get_mut(ix.slot())?;
        if slot.generation == ix.generation {
            slot.record.as_mut()
        } else {
            None
        }
    }

    #[inline]
    pub fn contains_step(&self, ix: StepIx) -> bool {
        self.get(ix).is_some()
    }

    fn alloc(&mut self, record: StepRecord) -> StepIx {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.record = Some(record);
            StepIx::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                record: Some(record),
            });
            StepIx::new(index, 0)
        }
    }

    #[inline]
    fn set_next(&mut self, ix: StepIx, next: Option<StepIx>) {
        if let Some(rec) = self.get_mut(ix) {
            rec.next = next;
        }
    }

    #[inline]
    fn set_prev(&mut self, ix: StepIx, prev: Option<StepIx>) {
        if let Some(rec) = self.get_mut(ix) {
            rec.prev = prev;
        }
    }

    pub fn push_back(&mut self, handle: Handle) -> StepIx {
        self.insert_after(self.tail, handle)
    }

    pub fn push_front(&mut self, handle: Handle) -> StepIx {
        self.insert_after(None, handle)
    }

    /// Insert a new step directly after `after`, or at the head of
    /// the path if `after` is `None`. `after` must be a live step of
    /// this path.
    pub fn insert_after(
        &mut self,
        after: Option<StepIx>,
        handle: Handle,
    ) -> StepIx {
        let next = match after {
            Some(ix) => self.get(ix).and_then(|rec| rec.next),
            None => self.head,
        };

        let new_ix = self.alloc(StepRecord {
            handle,
            prev: after,
            next,
        });

        match after {
            Some(ix) => self.set_next(ix, Some(new_ix)),
            None => self.head = Some(new_ix),
        }

        match next {
            Some(ix) => self.set_prev(ix, Some(new_ix)),
            None => self.tail = Some(new_ix),
        }

        self.count += 1;
        new_ix
    }

    /// Unlink and free a step, returning its handle.
    pub fn remove(&mut self, ix: StepIx) -> Option<Handle> {
        let StepRecord { handle, prev, next } = *self.get(ix)?;

        match prev {
            Some(p) => self.set_next(p, next),
            None => self.head = next,
        }

        match next {
            Some(n) => self.set_prev(n, prev),
            None => self.tail = prev,
        }

        let slot = &mut self.slots[ix.slot()];
        slot.record = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(ix.index);

        self.count -= 1;
        Some(handle)
    }

    /// Iterate through the steps from head to tail.
    pub fn steps(&self) -> StepsIter<'_> {
        StepsIter {
            path: self,
            next: self.head,
        }
    }

    /// Iterate through the handles of the path, from head to tail.
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.steps().map(|(_, rec)| rec.handle)
    }
}

/// Iterator through the steps of a path.
pub struct StepsIter<'a> {
    path: &'a Path,
    next: Option<StepIx>,
}

impl<'a> Iterator for StepsIter<'a> {
    type Item = (StepIx, &'a StepRecord);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let ix = self.next?;
        let rec = self.path.get(ix)?;
        self.next = rec.next;
        Some((ix, rec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hnd(x: u64) -> Handle {
        Handle::pack(x, false)
    }

    fn path_handles(path: &Path) -> Vec<u64> {
        path.handles().map(|h| u64::from(h.id())).collect()
    }

    #[test]
    fn push_and_insert() {
        let mut path = Path::new("p", PathId(1));
        let s2 = path.push_back(hnd(2));
        path.push_back(hnd(4));
        path.push_front(hnd(1));
        path.insert_after(Some(s2), hnd(3));

        assert_eq!(path_handles(&path), vec![1, 2, 3, 4]);
        assert_eq!(path.len(), 4);

        let head = path.head().unwrap();
        let tail = path.tail().unwrap();
        assert_eq!(path.get(head).unwrap().prev, None);
        assert_eq!(path.get(tail).unwrap().next, None);
        assert_eq!(path.get(tail).unwrap().handle, hnd(4));
    }

    #[test]
    fn removed_steps_are_not_aliased() {
        let mut path = Path::new("p", PathId(1));
        let s1 = path.push_back(hnd(1));
        let s2 = path.push_back(hnd(2));
        path.push_back(hnd(3));

        assert_eq!(path.remove(s2), Some(hnd(2)));
        assert_eq!(path_handles(&path), vec![1, 3]);
        assert!(!path.contains_step(s2));

        // the freed slot is reused with a new generation
        let s4 = path.push_back(hnd(4));
        assert_eq!(s4.slot(), s2.slot());
        assert_ne!(s4, s2);
        assert!(path.get(s2).is_none());
        assert_eq!(path.remove(s2), None);

        path.remove(s1);
        assert_eq!(path_handles(&path), vec![3, 4]);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn remove_all_steps() {
        let mut path = Path::new("p", PathId(1));
        let steps = (1..=3).map(|x| path.push_back(hnd(x))).collect::<Vec<_>>();
        for s in steps {
            path.remove(s);
        }
        assert!(path.is_empty());
        assert_eq!(path.head(), None);
        assert_eq!(path.tail(), None);
        assert_eq!(path.steps().count(), 0);
    }
}
