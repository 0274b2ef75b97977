/// A unique identifier for a single path.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PathId(pub u64);

impl std::fmt::Display for PathId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable index of a step within its path's step storage. The
/// generation is bumped whenever a slot is reused, so an index to a
/// removed step never aliases a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepIx {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl StepIx {
    #[inline]
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub fn slot(&self) -> usize {
        self.index as usize
    }
}

/// A step along a specific path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepHandle {
    pub path: PathId,
    pub step: StepIx,
}

impl StepHandle {
    #[inline]
    pub fn new(path: PathId, step: StepIx) -> Self {
        Self { path, step }
    }

    #[inline]
    pub fn path_id(&self) -> PathId {
        self.path
    }
}
