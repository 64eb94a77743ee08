use core::fmt;
use core::num::NonZeroU32;

/// Compact identifier of a mesh cell.
///
/// Stored 1-based so that the surface cell reads as cell 1 in logs and
/// `Option<CellId>` stays pointer-sized.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(NonZeroU32);

impl CellId {
    /// Create an id from a 0-based position in the cell array.
    pub fn from_index(index: usize) -> Self {
        let number = u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(NonZeroU32::new)
            .unwrap_or(NonZeroU32::MAX);
        Self(number)
    }

    /// 0-based position in the cell array.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// 1-based cell number (1 = surface).
    pub fn number(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellId({})", self.number())
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}
