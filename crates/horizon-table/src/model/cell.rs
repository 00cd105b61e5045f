//! Cells, cell templates, and supplementary views.
//!
//! A cell is the host's reusable view for one row. The binding layer never
//! draws anything itself; it only needs to configure cells with row data and
//! ask them how tall they want to be at a given width.
//!
//! # Core Types
//!
//! - [`Cell`]: The object-safe cell capability (reuse reset and measurement)
//! - [`ConfigurableCell`]: A concrete cell type that knows its payload type
//! - [`CellHandle`]: Shared, lockable handle to a type-erased cell
//! - [`CellTemplate`]: Factory registered with the host per reuse identifier
//! - [`SupplementaryView`]: Header and footer views

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Shared handle to a type-erased cell.
///
/// Cell identity is pointer identity: two handles refer to the same cell when
/// [`same_cell`] returns `true`.
pub type CellHandle = Arc<Mutex<dyn Cell>>;

/// Wraps a cell in a [`CellHandle`].
pub fn cell_handle<C: Cell>(cell: C) -> CellHandle {
    Arc::new(Mutex::new(cell))
}

/// Returns `true` if both handles refer to the same cell instance.
#[inline]
pub fn same_cell(a: &CellHandle, b: &CellHandle) -> bool {
    Arc::ptr_eq(a, b)
}

/// The object-safe part of a cell.
///
/// `fitting_height` stands in for the host's layout pass: given the width the
/// cell will be laid out at, return the height its content needs.
pub trait Cell: Any + Send {
    /// Resets transient state before the cell is configured for another row.
    fn prepare_for_reuse(&mut self) {}

    /// Lays the cell out at `width` and returns the height it needs.
    fn fitting_height(&mut self, width: f64) -> f64;
}

impl dyn Cell {
    /// Returns a reference to the concrete cell if it is of type `C`.
    pub fn downcast_ref<C: Cell>(&self) -> Option<&C> {
        let any: &dyn Any = self;
        any.downcast_ref::<C>()
    }

    /// Returns a mutable reference to the concrete cell if it is of type `C`.
    pub fn downcast_mut<C: Cell>(&mut self) -> Option<&mut C> {
        let any: &mut dyn Any = self;
        any.downcast_mut::<C>()
    }

    /// Returns `true` if the concrete cell is of type `C`.
    pub fn is<C: Cell>(&self) -> bool {
        self.downcast_ref::<C>().is_some()
    }
}

/// A concrete cell type that can be configured with a typed payload.
///
/// Rows are generic over the cell type; the payload type, the reuse identifier,
/// and the height hints all come from here.
///
/// # Example
///
/// ```
/// use horizon_table::model::{Cell, ConfigurableCell};
///
/// #[derive(Default)]
/// struct TitleCell {
///     title: String,
/// }
///
/// impl Cell for TitleCell {
///     fn fitting_height(&mut self, _width: f64) -> f64 {
///         44.0
///     }
/// }
///
/// impl ConfigurableCell for TitleCell {
///     type Data = String;
///
///     fn configure(&mut self, data: &String) {
///         self.title = data.clone();
///     }
/// }
///
/// assert_eq!(TitleCell::reuse_identifier(), "TitleCell");
/// ```
pub trait ConfigurableCell: Cell + Default {
    /// The payload a row carries for this cell type.
    type Data: Send + Sync + 'static;

    /// The identifier the host uses to pool cells of this type.
    ///
    /// Defaults to the unqualified type name.
    fn reuse_identifier() -> String {
        short_type_name::<Self>().to_string()
    }

    /// A cheap height hint used before the row has been measured.
    fn estimated_height() -> Option<f64> {
        None
    }

    /// A fixed height that skips measurement entirely.
    fn default_height() -> Option<f64> {
        None
    }

    /// Applies the payload to the cell.
    fn configure(&mut self, data: &Self::Data);
}

/// Last path segment of a type name, ignoring generic arguments.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

type CellFactory = Arc<dyn Fn() -> CellHandle + Send + Sync>;

/// A factory the host can use to create cells for a reuse identifier.
#[derive(Clone)]
pub struct CellTemplate {
    reuse_identifier: String,
    factory: CellFactory,
}

impl CellTemplate {
    /// Creates a template from an identifier and a factory closure.
    pub fn new<F>(reuse_identifier: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> CellHandle + Send + Sync + 'static,
    {
        Self {
            reuse_identifier: reuse_identifier.into(),
            factory: Arc::new(factory),
        }
    }

    /// Creates the template for a configurable cell type, producing `C::default()`.
    pub fn of<C: ConfigurableCell>() -> Self {
        Self::new(C::reuse_identifier(), || cell_handle(C::default()))
    }

    /// The identifier this template is registered under.
    pub fn reuse_identifier(&self) -> &str {
        &self.reuse_identifier
    }

    /// Creates a fresh cell.
    pub fn instantiate(&self) -> CellHandle {
        (self.factory)()
    }
}

impl fmt::Debug for CellTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellTemplate")
            .field("reuse_identifier", &self.reuse_identifier)
            .finish_non_exhaustive()
    }
}

/// A header or footer view supplied by a section.
pub trait SupplementaryView: Send + Sync {
    /// The height the view occupies.
    fn height(&self) -> f64;
}

/// A plain header/footer view with a fixed height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedView {
    height: f64,
}

impl FixedView {
    /// Creates a view that reports `height`.
    pub const fn new(height: f64) -> Self {
        Self { height }
    }
}

impl SupplementaryView for FixedView {
    fn height(&self) -> f64 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct LabelCell {
        text: String,
        resets: usize,
    }

    impl Cell for LabelCell {
        fn prepare_for_reuse(&mut self) {
            self.resets += 1;
            self.text.clear();
        }

        fn fitting_height(&mut self, width: f64) -> f64 {
            if width < 100.0 { 60.0 } else { 30.0 }
        }
    }

    impl ConfigurableCell for LabelCell {
        type Data = String;

        fn configure(&mut self, data: &String) {
            self.text = data.clone();
        }
    }

    struct Other;

    impl Cell for Other {
        fn fitting_height(&mut self, _width: f64) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_reuse_identifier_is_short_type_name() {
        assert_eq!(LabelCell::reuse_identifier(), "LabelCell");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }

    #[test]
    fn test_downcast_through_handle() {
        let handle = cell_handle(LabelCell::default());
        {
            let mut guard = handle.lock();
            assert!(guard.is::<LabelCell>());
            assert!(guard.downcast_ref::<Other>().is_none());
            guard
                .downcast_mut::<LabelCell>()
                .expect("label cell")
                .configure(&"hello".to_string());
            guard.prepare_for_reuse();
        }
        let guard = handle.lock();
        let cell = guard.downcast_ref::<LabelCell>().expect("label cell");
        assert_eq!(cell.resets, 1);
        assert!(cell.text.is_empty());
    }

    #[test]
    fn test_template_produces_distinct_cells() {
        let template = CellTemplate::of::<LabelCell>();
        assert_eq!(template.reuse_identifier(), "LabelCell");

        let a = template.instantiate();
        let b = template.instantiate();
        assert!(!same_cell(&a, &b));
        assert!(same_cell(&a, &a.clone()));
        assert_eq!(a.lock().fitting_height(50.0), 60.0);
    }

    #[test]
    fn test_fixed_view_height() {
        let view: Arc<dyn SupplementaryView> = Arc::new(FixedView::new(28.0));
        assert_eq!(view.height(), 28.0);
    }
}
