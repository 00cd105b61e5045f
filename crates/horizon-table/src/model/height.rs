//! Row height calculation.
//!
//! Measuring a row means configuring an off-screen prototype cell and running
//! a layout pass, which is far too expensive to repeat on every scroll. A
//! [`RowHeightCalculator`] measures each row at most once per cache key and
//! answers from its cache until [`RowHeightCalculator::invalidate`] is called.
//!
//! Two calculators are provided:
//!
//! - [`PrototypeHeightCalculator`] keys its cache on row identity and width.
//!   It stays correct when rows are inserted, removed, or reordered. This is
//!   the default.
//! - [`ExpandableHeightCalculator`] keys its cache on index path only and lets
//!   cells push their own heights after expanding or collapsing. Any change to
//!   row positions leaves it stale until it is invalidated.
//!
//! Neither calculator notices content or width changes on its own. Invalidate
//! when the content width changes or when a row's content changes in a way that
//! affects its height.

use std::collections::{HashMap, HashSet};

use horizon_table_core::PerfSpan;
use horizon_table_core::logging::{span_names, targets};

use super::cell::CellHandle;
use super::index::{IndexPath, RowId};
use super::row::Row;
use crate::host::CellProvider;

/// A height answer that may defer to the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RowHeight {
    /// A concrete height.
    Fixed(f64),
    /// Let the host size the row itself.
    #[default]
    Automatic,
}

impl RowHeight {
    /// The concrete height, if any.
    pub fn fixed(self) -> Option<f64> {
        match self {
            Self::Fixed(height) => Some(height),
            Self::Automatic => None,
        }
    }

    /// The concrete height, or `automatic` for [`RowHeight::Automatic`].
    ///
    /// Hosts with a numeric "automatic dimension" sentinel pass it here.
    pub fn value_or(self, automatic: f64) -> f64 {
        self.fixed().unwrap_or(automatic)
    }

    /// Returns `true` for [`RowHeight::Automatic`].
    pub fn is_automatic(self) -> bool {
        matches!(self, Self::Automatic)
    }
}

impl From<f64> for RowHeight {
    fn from(height: f64) -> Self {
        Self::Fixed(height)
    }
}

/// Computes, caches, and invalidates row heights.
pub trait RowHeightCalculator: Send {
    /// The exact height of `row` at `path` laid out at `width`.
    ///
    /// Returns `0.0` if no prototype cell can be obtained for the row.
    fn height(
        &mut self,
        row: &dyn Row,
        path: IndexPath,
        width: f64,
        provider: &dyn CellProvider,
    ) -> f64;

    /// A height estimate for `row`.
    fn estimated_height(
        &mut self,
        row: &dyn Row,
        path: IndexPath,
        width: f64,
        provider: &dyn CellProvider,
    ) -> RowHeight;

    /// Measures `row` again and replaces whatever was cached for it.
    ///
    /// Used when a row changes its own appearance, such as an expandable cell
    /// switching between collapsed and expanded.
    fn refresh(
        &mut self,
        row: &dyn Row,
        path: IndexPath,
        width: f64,
        provider: &dyn CellProvider,
    ) -> f64;

    /// Drops every cached height.
    fn invalidate(&mut self);

    /// Forgets the heights of rows that were removed from the list.
    ///
    /// Calculators that do not key on row identity ignore this.
    fn evict(&mut self, removed: &HashSet<RowId>) {
        let _ = removed;
    }

    /// Overwrites the cached height for `row`.
    fn update_cached(&mut self, row: &dyn Row, path: IndexPath, width: f64, height: f64);

    /// Number of cached heights.
    fn cached_len(&self) -> usize;
}

/// Exact comparison key for a width.
fn width_key(width: f64) -> u64 {
    // Fold -0.0 into 0.0 so both share a cache slot.
    (width + 0.0).to_bits()
}

/// A pool of off-screen prototype cells, one per reuse identifier.
#[derive(Default)]
struct PrototypePool {
    cells: HashMap<String, CellHandle>,
}

impl PrototypePool {
    /// Returns the prototype for `reuse_identifier`, dequeuing one on first use.
    ///
    /// A failed dequeue is not remembered, so a template registered later is
    /// picked up on the next request.
    fn get(&mut self, reuse_identifier: &str, provider: &dyn CellProvider) -> Option<CellHandle> {
        if let Some(cell) = self.cells.get(reuse_identifier) {
            return Some(cell.clone());
        }
        let cell = provider.dequeue_reusable_cell(reuse_identifier)?;
        tracing::debug!(target: targets::HEIGHT, reuse_identifier, "created prototype cell");
        self.cells.insert(reuse_identifier.to_string(), cell.clone());
        Some(cell)
    }

    /// Lays out the prototype for `row` at `width` and returns its height,
    /// including the host's separator.
    ///
    /// The prototype is reset before it is configured, so nothing a previous
    /// row left on it leaks into this measurement. `None` if the provider has
    /// no cell for the row's reuse identifier.
    fn measure(&mut self, row: &dyn Row, width: f64, provider: &dyn CellProvider) -> Option<f64> {
        let Some(prototype) = self.get(row.reuse_identifier(), provider) else {
            tracing::warn!(
                target: targets::HEIGHT,
                reuse_identifier = row.reuse_identifier(),
                "no prototype cell available; reporting zero height"
            );
            return None;
        };

        let _span = PerfSpan::with_subject(span_names::MEASURE, row.reuse_identifier());
        let mut height = {
            let mut cell = prototype.lock();
            cell.prepare_for_reuse();
            row.configure(&mut *cell);
            cell.fitting_height(width)
        };
        if let Some(separator) = provider.separator_thickness() {
            height += separator;
        }
        Some(height)
    }

    fn len(&self) -> usize {
        self.cells.len()
    }
}

/// Identity-keyed height calculator backed by prototype cells.
///
/// The cache key is the row's [`RowId`] together with the layout width, so a
/// row measured at two widths has two independent entries, and moving a row
/// does not move its height onto a neighbour.
#[derive(Default)]
pub struct PrototypeHeightCalculator {
    prototypes: PrototypePool,
    cache: HashMap<(RowId, u64), f64>,
}

impl PrototypeHeightCalculator {
    /// Creates an empty calculator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached height for `row` at `width`, if measured.
    pub fn cached_height(&self, row: &dyn Row, width: f64) -> Option<f64> {
        self.cache.get(&(row.id(), width_key(width))).copied()
    }

    /// Number of prototype cells created so far.
    pub fn prototype_count(&self) -> usize {
        self.prototypes.len()
    }
}

impl RowHeightCalculator for PrototypeHeightCalculator {
    fn height(
        &mut self,
        row: &dyn Row,
        path: IndexPath,
        width: f64,
        provider: &dyn CellProvider,
    ) -> f64 {
        let key = (row.id(), width_key(width));
        if let Some(&height) = self.cache.get(&key) {
            tracing::trace!(target: targets::HEIGHT, row = %row.id(), %path, height, "height cache hit");
            return height;
        }

        let Some(height) = self.prototypes.measure(row, width, provider) else {
            return 0.0;
        };
        tracing::debug!(target: targets::HEIGHT, row = %row.id(), %path, width, height, "measured row");
        self.cache.insert(key, height);
        height
    }

    fn estimated_height(
        &mut self,
        row: &dyn Row,
        _path: IndexPath,
        width: f64,
        _provider: &dyn CellProvider,
    ) -> RowHeight {
        if let Some(height) = self.cached_height(row, width) {
            return RowHeight::Fixed(height);
        }
        match row.estimated_height() {
            Some(height) if height > 0.0 => RowHeight::Fixed(height),
            _ => RowHeight::Automatic,
        }
    }

    fn refresh(
        &mut self,
        row: &dyn Row,
        path: IndexPath,
        width: f64,
        provider: &dyn CellProvider,
    ) -> f64 {
        self.cache.remove(&(row.id(), width_key(width)));
        self.height(row, path, width, provider)
    }

    fn invalidate(&mut self) {
        tracing::debug!(target: targets::HEIGHT, entries = self.cache.len(), "invalidating height cache");
        self.cache.clear();
    }

    fn evict(&mut self, removed: &HashSet<RowId>) {
        let before = self.cache.len();
        self.cache.retain(|(id, _), _| !removed.contains(id));
        tracing::trace!(
            target: targets::HEIGHT,
            evicted = before - self.cache.len(),
            "evicted heights of removed rows"
        );
    }

    fn update_cached(&mut self, row: &dyn Row, _path: IndexPath, width: f64, height: f64) {
        self.cache.insert((row.id(), width_key(width)), height);
    }

    fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

/// Position-keyed height calculator for cells that change height in place.
///
/// Expanding cells report their new height through
/// [`RowHeightCalculator::update_cached`] or [`RowHeightCalculator::refresh`].
/// Because entries are keyed only by [`IndexPath`], inserting, removing, or
/// reordering rows without calling [`RowHeightCalculator::invalidate`] leaves
/// heights attached to the wrong rows.
///
/// Measurement itself is identical to [`PrototypeHeightCalculator`], so a row
/// reports the same height under either calculator.
#[derive(Default)]
pub struct ExpandableHeightCalculator {
    prototypes: PrototypePool,
    cache: HashMap<IndexPath, f64>,
}

impl ExpandableHeightCalculator {
    /// Creates an empty calculator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached height at `path`, if any.
    pub fn cached_height(&self, path: IndexPath) -> Option<f64> {
        self.cache.get(&path).copied()
    }
}

impl RowHeightCalculator for ExpandableHeightCalculator {
    fn height(
        &mut self,
        row: &dyn Row,
        path: IndexPath,
        width: f64,
        provider: &dyn CellProvider,
    ) -> f64 {
        if let Some(&height) = self.cache.get(&path) {
            return height;
        }

        let Some(height) = self.prototypes.measure(row, width, provider) else {
            return 0.0;
        };
        tracing::debug!(target: targets::HEIGHT, %path, width, height, "measured expandable row");
        self.cache.insert(path, height);
        height
    }

    /// Same as [`RowHeightCalculator::height`]; expandable rows have no cheap estimate.
    fn estimated_height(
        &mut self,
        row: &dyn Row,
        path: IndexPath,
        width: f64,
        provider: &dyn CellProvider,
    ) -> RowHeight {
        RowHeight::Fixed(self.height(row, path, width, provider))
    }

    fn refresh(
        &mut self,
        row: &dyn Row,
        path: IndexPath,
        width: f64,
        provider: &dyn CellProvider,
    ) -> f64 {
        self.cache.remove(&path);
        self.height(row, path, width, provider)
    }

    fn invalidate(&mut self) {
        self.cache.clear();
    }

    fn update_cached(&mut self, _row: &dyn Row, path: IndexPath, _width: f64, height: f64) {
        self.cache.insert(path, height);
    }

    fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
