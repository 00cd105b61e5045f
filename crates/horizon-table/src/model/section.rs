//! Sections: ordered groups of rows with optional headers and footers.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use horizon_table_core::logging::targets;
use horizon_table_core::{Result, TableError};

use super::builder::RowBuilder;
use super::cell::SupplementaryView;
use super::index::IndexPath;
use super::row::{IntoRow, Row};

/// Row changes produced by [`Section::perform_updates`].
///
/// Indices are row indices within the section. The director turns them into
/// index paths once it knows where the section sits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionUpdates {
    /// Rows that appeared at the end of the section.
    pub inserted: Vec<usize>,
    /// Rows that disappeared from the end of the section.
    pub deleted: Vec<usize>,
    /// Rows that still exist and should be redrawn.
    pub reloaded: Vec<usize>,
}

impl SectionUpdates {
    /// Computes the updates for a section that went from `old_len` to `new_len` rows.
    pub fn diff(old_len: usize, new_len: usize, reload_rows: bool) -> Self {
        let common = old_len.min(new_len);
        let changed: Vec<usize> = (common..old_len.max(new_len)).collect();
        let (inserted, deleted) = if old_len > new_len {
            (Vec::new(), changed)
        } else {
            (changed, Vec::new())
        };
        Self {
            inserted,
            deleted,
            reloaded: if reload_rows { (0..common).collect() } else { Vec::new() },
        }
    }

    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty() && self.reloaded.is_empty()
    }

    /// Converts to index paths in `section`.
    pub fn in_section(&self, section: usize) -> RowUpdates {
        let paths = |rows: &[usize]| rows.iter().map(|&row| IndexPath::new(section, row)).collect();
        RowUpdates {
            inserted: paths(&self.inserted),
            deleted: paths(&self.deleted),
            reloaded: paths(&self.reloaded),
        }
    }
}

/// Row changes addressed by index path, as handed to the host.
///
/// Hosts should apply deletions and insertions together, then reload. An empty
/// batch asks the host to re-query row heights and animate any change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowUpdates {
    /// Paths of inserted rows.
    pub inserted: Vec<IndexPath>,
    /// Paths of deleted rows.
    pub deleted: Vec<IndexPath>,
    /// Paths of rows to redraw.
    pub reloaded: Vec<IndexPath>,
}

/// An ordered group of rows.
///
/// Row mutations never trigger re-measurement. Through the director, rows
/// that are removed have their cached heights dropped; invalidate explicitly
/// when a change to a remaining row affects its height.
#[derive(Default, Clone)]
pub struct Section {
    rows: Vec<Arc<dyn Row>>,
    /// Title shown in the header when there is no header view.
    pub header_title: Option<String>,
    /// Title shown in the footer when there is no footer view.
    pub footer_title: Option<String>,
    /// Title shown in the section index.
    pub index_title: Option<String>,
    /// Custom header view.
    pub header_view: Option<Arc<dyn SupplementaryView>>,
    /// Custom footer view.
    pub footer_view: Option<Arc<dyn SupplementaryView>>,
    /// Fixed header height, overriding the header view's own height.
    pub header_height: Option<f64>,
    /// Fixed footer height, overriding the footer view's own height.
    pub footer_height: Option<f64>,
}

impl Section {
    /// Creates an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a section holding `rows`.
    pub fn with_rows<R: IntoRow>(rows: impl IntoIterator<Item = R>) -> Self {
        let mut section = Self::new();
        section.append_rows(rows);
        section
    }

    /// Sets the header and footer titles.
    pub fn with_titles(
        mut self,
        header: impl Into<Option<String>>,
        footer: impl Into<Option<String>>,
    ) -> Self {
        self.header_title = header.into();
        self.footer_title = footer.into();
        self
    }

    /// Sets the header and footer views.
    pub fn with_views(
        mut self,
        header: Option<Arc<dyn SupplementaryView>>,
        footer: Option<Arc<dyn SupplementaryView>>,
    ) -> Self {
        self.header_view = header;
        self.footer_view = footer;
        self
    }

    /// Sets fixed header and footer heights.
    pub fn with_heights(mut self, header: Option<f64>, footer: Option<f64>) -> Self {
        self.header_height = header;
        self.footer_height = footer;
        self
    }

    /// Sets the section index title.
    pub fn with_index_title(mut self, title: impl Into<String>) -> Self {
        self.index_title = Some(title.into());
        self
    }

    /// The rows in display order.
    pub fn rows(&self) -> &[Arc<dyn Row>] {
        &self.rows
    }

    /// The row at `index`, if any.
    pub fn row(&self, index: usize) -> Option<&Arc<dyn Row>> {
        self.rows.get(index)
    }

    /// Number of rows.
    pub fn number_of_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the section has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Removes every row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Appends a row.
    pub fn append_row(&mut self, row: impl IntoRow) {
        self.rows.push(row.into_row());
    }

    /// Appends rows in order.
    pub fn append_rows<R: IntoRow>(&mut self, rows: impl IntoIterator<Item = R>) {
        self.rows.extend(rows.into_iter().map(IntoRow::into_row));
    }

    /// Appends every row a builder produces.
    pub fn append_builder(&mut self, builder: &dyn RowBuilder) {
        self.rows.extend(builder.rows());
    }

    /// Inserts a row at `index`. `index` may equal the row count.
    pub fn insert_row(&mut self, index: usize, row: impl IntoRow) -> Result<()> {
        self.check_insert(index)?;
        self.rows.insert(index, row.into_row());
        Ok(())
    }

    /// Inserts rows starting at `index`, keeping their order.
    pub fn insert_rows<R: IntoRow>(
        &mut self,
        index: usize,
        rows: impl IntoIterator<Item = R>,
    ) -> Result<()> {
        self.check_insert(index)?;
        let tail = self.rows.split_off(index);
        self.rows.extend(rows.into_iter().map(IntoRow::into_row));
        self.rows.extend(tail);
        Ok(())
    }

    /// Replaces the row at `index`, returning the old one.
    pub fn replace_row(&mut self, index: usize, row: impl IntoRow) -> Result<Arc<dyn Row>> {
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.rows[index], row.into_row()))
    }

    /// Swaps two rows.
    pub fn swap_rows(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_index(a)?;
        self.check_index(b)?;
        self.rows.swap(a, b);
        Ok(())
    }

    /// Removes and returns the row at `index`.
    pub fn remove_row(&mut self, index: usize) -> Result<Arc<dyn Row>> {
        self.check_index(index)?;
        Ok(self.rows.remove(index))
    }

    /// Removes the rows in `range`, returning them in order.
    pub fn remove_rows(&mut self, range: Range<usize>) -> Result<Vec<Arc<dyn Row>>> {
        if range.start > range.end || range.end > self.rows.len() {
            return Err(TableError::row_out_of_bounds(0, range.end, self.rows.len()));
        }
        Ok(self.rows.drain(range).collect())
    }

    /// Runs `f` against this section and reports which rows changed.
    ///
    /// Only the row count is compared: rows past the old count are inserted,
    /// rows past the new count are deleted, and when `reload_rows` is set the
    /// rows both counts share are reloaded.
    pub fn perform_updates<F>(&mut self, reload_rows: bool, f: F) -> SectionUpdates
    where
        F: FnOnce(&mut Section),
    {
        let old_len = self.rows.len();
        f(self);
        let updates = SectionUpdates::diff(old_len, self.rows.len(), reload_rows);
        tracing::debug!(
            target: targets::MODEL,
            old_len,
            new_len = self.rows.len(),
            inserted = updates.inserted.len(),
            deleted = updates.deleted.len(),
            reloaded = updates.reloaded.len(),
            "section updated"
        );
        updates
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(TableError::row_out_of_bounds(0, index, self.rows.len()))
        }
    }

    fn check_insert(&self, index: usize) -> Result<()> {
        if index <= self.rows.len() {
            Ok(())
        } else {
            Err(TableError::row_out_of_bounds(0, index, self.rows.len()))
        }
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("rows", &self.rows.len())
            .field("header_title", &self.header_title)
            .field("footer_title", &self.footer_title)
            .field("index_title", &self.index_title)
            .field("header_height", &self.header_height)
            .field("footer_height", &self.footer_height)
            .finish_non_exhaustive()
    }
}
