//! Error types for Horizon Table.

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors that can occur while mutating a table's sections and rows.
///
/// Queries made by the hosting list widget never surface these; they fall back
/// to neutral defaults instead. Only explicit mutations report them, and a
/// failed mutation leaves the model untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A section index was beyond the current number of sections.
    #[error("section index {index} out of bounds (section count {len})")]
    SectionOutOfBounds {
        /// The requested section index.
        index: usize,
        /// The number of sections at the time of the request.
        len: usize,
    },

    /// A row index was beyond the current number of rows in its section.
    #[error("row index {row} out of bounds in section {section} (row count {len})")]
    RowOutOfBounds {
        /// The section the row was looked up in.
        section: usize,
        /// The requested row index.
        row: usize,
        /// The number of rows in the section at the time of the request.
        len: usize,
    },

    /// The hosting list widget has been dropped.
    #[error("the hosting list widget is no longer available")]
    HostUnavailable,
}

impl TableError {
    /// Create a section bounds error.
    pub fn section_out_of_bounds(index: usize, len: usize) -> Self {
        Self::SectionOutOfBounds { index, len }
    }

    /// Create a row bounds error.
    pub fn row_out_of_bounds(section: usize, row: usize, len: usize) -> Self {
        Self::RowOutOfBounds { section, row, len }
    }

    /// Re-addresses a row bounds error to `section`.
    ///
    /// Sections do not know their own position, so row errors raised by a
    /// section report section 0 until the caller fills in the real index.
    pub fn in_section(self, section: usize) -> Self {
        match self {
            Self::RowOutOfBounds { row, len, .. } => Self::RowOutOfBounds { section, row, len },
            other => other,
        }
    }

    /// Returns `true` for either bounds error.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            Self::SectionOutOfBounds { .. } | Self::RowOutOfBounds { .. }
        )
    }
}
