//! The contract with the hosting list widget.
//!
//! The binding layer never owns the list widget. It talks to it through these
//! traits: dequeuing cells, registering templates, reporting geometry, and
//! applying row changes. The host in turn calls the director's data-source and
//! delegate methods.

use crate::model::{CellHandle, CellTemplate, IndexPath, RowUpdates};

/// Hands out reusable cells by reuse identifier.
///
/// This is all the height calculators need from the host.
pub trait CellProvider {
    /// Returns a cell for `reuse_identifier`, or `None` if no template is registered.
    fn dequeue_reusable_cell(&self, reuse_identifier: &str) -> Option<CellHandle>;

    /// Thickness of the separator drawn below each row, if the host draws one.
    ///
    /// Measured heights include it so they match the rendered row.
    fn separator_thickness(&self) -> Option<f64> {
        None
    }
}

/// The hosting list widget, as seen by the director.
///
/// Only `content_width`, `register_template`, and `index_path_for_cell` are
/// required; everything else has a sensible default.
pub trait ListHost: CellProvider + Send + Sync {
    /// The width rows are laid out at.
    fn content_width(&self) -> f64;

    /// Dequeues a cell that will be displayed at `path`.
    fn dequeue_cell_for_row(&self, reuse_identifier: &str, path: IndexPath) -> Option<CellHandle> {
        let _ = path;
        self.dequeue_reusable_cell(reuse_identifier)
    }

    /// Makes `template` available under its reuse identifier.
    fn register_template(&self, template: CellTemplate);

    /// The cell currently displayed at `path`, if any.
    fn visible_cell(&self, path: IndexPath) -> Option<CellHandle> {
        let _ = path;
        None
    }

    /// Where `cell` is currently displayed, if the host knows it.
    fn index_path_for_cell(&self, cell: &CellHandle) -> Option<IndexPath>;

    /// Clears the selection of the row at `path`.
    fn deselect_row(&self, path: IndexPath, animated: bool) {
        let _ = (path, animated);
    }

    /// Reloads everything from the data source.
    fn reload_data(&self) {}

    /// Applies a batch of row changes. The default reloads everything.
    fn apply_updates(&self, updates: &RowUpdates) {
        let _ = updates;
        self.reload_data();
    }
}
