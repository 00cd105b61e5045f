//! Positions and identities for rows.
//!
//! An [`IndexPath`] says *where* a row currently sits; a [`RowId`] says *which*
//! row it is. Positions shift whenever rows are inserted, removed, or swapped,
//! while a row keeps its id for its whole life. Height caches that must stay
//! correct under reordering key on the id.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A global counter for generating unique row ids.
static ROW_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// The position of a row: a section index and a row index within that section.
///
/// Index paths order section-major, so sorting a list of paths yields the
/// order the host list displays them in.
///
/// # Example
///
/// ```
/// use horizon_table::model::IndexPath;
///
/// let path = IndexPath::new(1, 3);
/// assert_eq!(path.section, 1);
/// assert_eq!(path.row, 3);
/// assert!(IndexPath::new(0, 9) < path);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IndexPath {
    /// The section index.
    pub section: usize,
    /// The row index within the section.
    pub row: usize,
}

impl IndexPath {
    /// Creates a new index path.
    #[inline]
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }

    /// Returns the path of the row at `row` in the same section.
    #[inline]
    pub const fn with_row(self, row: usize) -> Self {
        Self {
            section: self.section,
            row,
        }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((section, row): (usize, usize)) -> Self {
        Self::new(section, row)
    }
}

/// A process-unique identity for a row instance.
///
/// Ids are allocated when a row is constructed and never reused. Two rows with
/// equal payloads still have distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(u64);

impl RowId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        Self(ROW_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row#{}", self.0)
    }
}
