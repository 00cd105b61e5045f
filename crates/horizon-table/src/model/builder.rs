//! Building many rows of one cell type at once.

use std::fmt;
use std::sync::Arc;

use super::action::{ActionKind, ActionOptions, RowAction};
use super::cell::ConfigurableCell;
use super::row::{Row, TableRow};

/// Anything that can produce a batch of rows for a section.
pub trait RowBuilder {
    /// Produces the rows, in order.
    fn rows(&self) -> Vec<Arc<dyn Row>>;
}

/// Maps a list of items onto rows of cell type `C` sharing one set of actions.
///
/// # Example
///
/// ```
/// use horizon_table::model::{ActionKind, Cell, ConfigurableCell, RowBuilder, TableRowBuilder};
///
/// #[derive(Default)]
/// struct TagCell;
///
/// impl Cell for TagCell {
///     fn fitting_height(&mut self, _width: f64) -> f64 {
///         32.0
///     }
/// }
///
/// impl ConfigurableCell for TagCell {
///     type Data = &'static str;
///
///     fn configure(&mut self, _data: &&'static str) {}
/// }
///
/// let builder = TableRowBuilder::<TagCell>::new(["rust", "ui", "lists"])
///     .on(ActionKind::Click, |options| println!("tag {}", options.item));
///
/// assert_eq!(builder.rows().len(), 3);
/// ```
pub struct TableRowBuilder<C: ConfigurableCell> {
    items: Vec<C::Data>,
    actions: Vec<RowAction<C>>,
}

impl<C: ConfigurableCell> TableRowBuilder<C> {
    /// Creates a builder for `items`.
    pub fn new(items: impl IntoIterator<Item = C::Data>) -> Self {
        Self {
            items: items.into_iter().collect(),
            actions: Vec::new(),
        }
    }

    /// Appends an item.
    pub fn push(&mut self, item: C::Data) {
        self.items.push(item);
    }

    /// Adds an action every built row will carry.
    pub fn with_action(mut self, action: RowAction<C>) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a handler without a return value that every built row will carry.
    pub fn on<F>(self, kind: ActionKind, handler: F) -> Self
    where
        F: Fn(&ActionOptions<'_, C>) + Send + Sync + 'static,
    {
        self.with_action(RowAction::new(kind, handler))
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<C> RowBuilder for TableRowBuilder<C>
where
    C: ConfigurableCell,
    C::Data: Clone,
{
    fn rows(&self) -> Vec<Arc<dyn Row>> {
        self.items
            .iter()
            .map(|item| {
                let row = TableRow::<C>::with_actions(item.clone(), self.actions.iter().cloned());
                Arc::new(row) as Arc<dyn Row>
            })
            .collect()
    }
}

impl<C: ConfigurableCell> fmt::Debug for TableRowBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableRowBuilder")
            .field("items", &self.items.len())
            .field("actions", &self.actions)
            .finish()
    }
}
