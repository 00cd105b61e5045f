//! Rows: one bound item each.
//!
//! A [`TableRow<C>`] pairs a payload with a cell type `C`, a set of action
//! handlers, and optional height hints. Sections store rows type-erased as
//! `Arc<dyn Row>`, so rows for different cell types can sit side by side.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use horizon_table_core::logging::targets;
use parking_lot::RwLock;

use super::action::{ActionKind, ActionOptions, ActionPayload, ActionValue, RowAction};
use super::cell::{Cell, CellHandle, CellTemplate, ConfigurableCell};
use super::expandable::{ExpandableCell, Expansion, ExpansionHooks};
use super::index::{IndexPath, RowId};

/// The type-erased row capability.
///
/// Everything the director and the height calculator need from a row, without
/// knowing its payload or cell type.
pub trait Row: Send + Sync {
    /// The row's identity.
    fn id(&self) -> RowId;

    /// The identifier of the cell template this row renders with.
    fn reuse_identifier(&self) -> &str;

    /// A cheap height hint used before measurement.
    fn estimated_height(&self) -> Option<f64>;

    /// A fixed height that takes priority over measurement.
    fn default_height(&self) -> Option<f64>;

    /// Configures `cell` with this row's payload.
    ///
    /// Used both for rendered cells and for measurement prototypes, so a
    /// prototype is laid out with exactly what the rendered cell shows.
    fn configure(&self, cell: &mut (dyn Cell + 'static));

    /// Dispatches `kind` to this row's handlers.
    ///
    /// Runs every handler for `kind` in registration order and returns the
    /// last non-empty result, or `None` if no handler produced one.
    fn invoke(
        &self,
        kind: &ActionKind,
        cell: Option<&CellHandle>,
        path: IndexPath,
        user_info: Option<&ActionPayload>,
    ) -> Option<ActionValue>;

    /// Returns `true` if at least one handler is registered for `kind`.
    fn has_action(&self, kind: &ActionKind) -> bool;

    /// The swipe actions offered while editing.
    fn editing_actions(&self) -> Vec<EditingAction>;

    /// Whether the row at `path` may be edited.
    ///
    /// A [`ActionKind::CanEdit`] handler decides outright; without one, the row
    /// is editable if it offers editing actions or handles deletion.
    fn is_editing_allowed(&self, path: IndexPath) -> bool {
        if self.has_action(&ActionKind::CanEdit) {
            return self
                .invoke(&ActionKind::CanEdit, None, path, None)
                .and_then(|value| value.as_bool())
                .unwrap_or(false);
        }
        !self.editing_actions().is_empty() || self.has_action(&ActionKind::ClickDelete)
    }

    /// The template the host needs to create cells for this row.
    fn template(&self) -> CellTemplate;

    /// The row's collapsed/expanded flag, if its cell is expandable.
    fn expansion(&self) -> Option<Expansion> {
        None
    }

    /// Switches `cell` to its collapsed or expanded layout. Does nothing for
    /// rows that are not expandable.
    fn configure_appearance(&self, cell: &mut (dyn Cell + 'static), collapsed: bool) {
        let _ = (cell, collapsed);
    }
}

impl fmt::Debug for dyn Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("id", &self.id())
            .field("reuse_identifier", &self.reuse_identifier())
            .finish_non_exhaustive()
    }
}

/// Conversion into a shared, type-erased row.
pub trait IntoRow {
    /// Performs the conversion.
    fn into_row(self) -> Arc<dyn Row>;
}

impl<C: ConfigurableCell> IntoRow for TableRow<C> {
    fn into_row(self) -> Arc<dyn Row> {
        Arc::new(self)
    }
}

impl<C: ConfigurableCell> IntoRow for Arc<TableRow<C>> {
    fn into_row(self) -> Arc<dyn Row> {
        self
    }
}

impl IntoRow for Arc<dyn Row> {
    fn into_row(self) -> Arc<dyn Row> {
        self
    }
}

/// How a row looks while the list is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditingStyle {
    /// No editing control.
    #[default]
    None,
    /// A delete control.
    Delete,
    /// An insert control.
    Insert,
}

type EditingHandler = Arc<dyn Fn(IndexPath) + Send + Sync>;

/// A swipe action shown for a row while editing.
#[derive(Clone)]
pub struct EditingAction {
    title: String,
    style: EditingStyle,
    handler: EditingHandler,
}

impl EditingAction {
    /// Creates an editing action.
    pub fn new<F>(title: impl Into<String>, style: EditingStyle, handler: F) -> Self
    where
        F: Fn(IndexPath) + Send + Sync + 'static,
    {
        Self {
            title: title.into(),
            style,
            handler: Arc::new(handler),
        }
    }

    /// The button title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The editing style.
    pub fn style(&self) -> EditingStyle {
        self.style
    }

    /// Runs the action for the row at `path`.
    pub fn perform(&self, path: IndexPath) {
        (self.handler)(path)
    }
}

impl fmt::Debug for EditingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditingAction")
            .field("title", &self.title)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

/// A row rendering its payload with cell type `C`.
///
/// Rows are built with chained calls and then handed to a section.
///
/// # Example
///
/// ```
/// use horizon_table::model::{ActionKind, Cell, ConfigurableCell, Row, TableRow};
///
/// #[derive(Default)]
/// struct NameCell {
///     name: String,
/// }
///
/// impl Cell for NameCell {
///     fn fitting_height(&mut self, _width: f64) -> f64 {
///         44.0
///     }
/// }
///
/// impl ConfigurableCell for NameCell {
///     type Data = String;
///
///     fn configure(&mut self, data: &String) {
///         self.name = data.clone();
///     }
/// }
///
/// let row = TableRow::<NameCell>::new("Ada".to_string())
///     .on(ActionKind::Click, |options| println!("tapped {}", options.item))
///     .with_default_height(56.0);
///
/// assert!(row.has_action(&ActionKind::Click));
/// assert_eq!(row.default_height(), Some(56.0));
/// ```
pub struct TableRow<C: ConfigurableCell> {
    id: RowId,
    item: C::Data,
    reuse_identifier: String,
    estimated_height: Option<f64>,
    default_height: Option<f64>,
    actions: RwLock<HashMap<ActionKind, Vec<RowAction<C>>>>,
    editing_actions: Vec<EditingAction>,
    expansion: Option<ExpansionHooks<C>>,
}

impl<C: ConfigurableCell> TableRow<C> {
    /// Creates a row for `item` with height hints taken from `C`.
    pub fn new(item: C::Data) -> Self {
        Self {
            id: RowId::next(),
            item,
            reuse_identifier: C::reuse_identifier(),
            estimated_height: C::estimated_height(),
            default_height: C::default_height(),
            actions: RwLock::new(HashMap::new()),
            editing_actions: Vec::new(),
            expansion: None,
        }
    }

    /// Creates a row and registers `actions` on it.
    pub fn with_actions(item: C::Data, actions: impl IntoIterator<Item = RowAction<C>>) -> Self {
        let row = Self::new(item);
        for action in actions {
            row.add_action(action);
        }
        row
    }

    /// The payload.
    pub fn item(&self) -> &C::Data {
        &self.item
    }

    /// Appends a handler for `kind` that has no return value.
    pub fn on<F>(self, kind: ActionKind, handler: F) -> Self
    where
        F: Fn(&ActionOptions<'_, C>) + Send + Sync + 'static,
    {
        self.on_action(RowAction::new(kind, handler))
    }

    /// Appends a handler for `kind` that returns a value.
    pub fn on_value<F>(self, kind: ActionKind, handler: F) -> Self
    where
        F: Fn(&ActionOptions<'_, C>) -> Option<ActionValue> + Send + Sync + 'static,
    {
        self.on_action(RowAction::with_value(kind, handler))
    }

    /// Appends a handler for `kind` whose return value always counts.
    pub fn on_result<F, V>(self, kind: ActionKind, handler: F) -> Self
    where
        F: Fn(&ActionOptions<'_, C>) -> V + Send + Sync + 'static,
        V: Into<ActionValue>,
    {
        self.on_value(kind, move |options| Some(handler(options).into()))
    }

    /// Appends a handler for the custom action `name`.
    pub fn on_custom<F>(self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&ActionOptions<'_, C>) + Send + Sync + 'static,
    {
        self.on(ActionKind::custom(name), handler)
    }

    /// Appends a prepared [`RowAction`].
    pub fn on_action(self, action: RowAction<C>) -> Self {
        self.add_action(action);
        self
    }

    /// Sets a fixed height, skipping measurement.
    pub fn with_default_height(mut self, height: f64) -> Self {
        self.default_height = Some(height);
        self
    }

    /// Clears any fixed height, including one declared by `C`.
    pub fn without_default_height(mut self) -> Self {
        self.default_height = None;
        self
    }

    /// Makes the row expandable.
    ///
    /// Every configure, including the one on a measurement prototype, then
    /// also applies the payload's collapsed state to the cell.
    pub fn expandable(mut self) -> Self
    where
        C: ExpandableCell,
    {
        self.expansion = Some(ExpansionHooks::of());
        self
    }

    /// Sets the estimated height hint.
    pub fn with_estimated_height(mut self, height: f64) -> Self {
        self.estimated_height = Some(height);
        self
    }

    /// Sets the editing actions.
    pub fn with_editing_actions(mut self, actions: Vec<EditingAction>) -> Self {
        self.editing_actions = actions;
        self
    }

    /// Appends a handler to a row that is already shared.
    pub fn add_action(&self, action: RowAction<C>) {
        self.actions
            .write()
            .entry(action.kind().clone())
            .or_default()
            .push(action);
    }

    /// Removes every handler tagged with `id`. Returns how many were removed.
    pub fn remove_action(&self, id: &str) -> usize {
        let mut actions = self.actions.write();
        let mut removed = 0;
        actions.retain(|_, handlers| {
            let before = handlers.len();
            handlers.retain(|action| action.id() != Some(id));
            removed += before - handlers.len();
            !handlers.is_empty()
        });
        removed
    }

    /// Removes every handler.
    pub fn remove_all_actions(&self) {
        self.actions.write().clear();
    }

    /// Number of handlers registered for `kind`.
    pub fn action_count(&self, kind: &ActionKind) -> usize {
        self.actions.read().get(kind).map_or(0, Vec::len)
    }
}

impl<C: ConfigurableCell> Row for TableRow<C> {
    fn id(&self) -> RowId {
        self.id
    }

    fn reuse_identifier(&self) -> &str {
        &self.reuse_identifier
    }

    fn estimated_height(&self) -> Option<f64> {
        self.estimated_height
    }

    fn default_height(&self) -> Option<f64> {
        self.default_height
    }

    fn configure(&self, cell: &mut (dyn Cell + 'static)) {
        match cell.downcast_mut::<C>() {
            Some(cell) => {
                cell.configure(&self.item);
                if let Some(hooks) = self.expansion
                    && let Some(expansion) = (hooks.state)(&self.item)
                {
                    (hooks.appearance)(cell, expansion.is_collapsed());
                }
            }
            None => tracing::warn!(
                target: targets::MODEL,
                row = %self.id,
                expected = %self.reuse_identifier,
                "cell type does not match row; skipping configure"
            ),
        }
    }

    fn invoke(
        &self,
        kind: &ActionKind,
        cell: Option<&CellHandle>,
        path: IndexPath,
        user_info: Option<&ActionPayload>,
    ) -> Option<ActionValue> {
        // Snapshot so handlers can register or remove actions on this row.
        let handlers = self.actions.read().get(kind)?.clone();
        tracing::trace!(
            target: targets::ACTION,
            row = %self.id,
            action = %kind,
            %path,
            handlers = handlers.len(),
            "dispatching row action"
        );

        let options = ActionOptions::new(&self.item, cell, path, user_info);
        // Every handler runs; the last one that answered wins.
        handlers
            .iter()
            .fold(None, |answer, handler| handler.invoke(&options).or(answer))
    }

    fn has_action(&self, kind: &ActionKind) -> bool {
        self.actions
            .read()
            .get(kind)
            .is_some_and(|handlers| !handlers.is_empty())
    }

    fn editing_actions(&self) -> Vec<EditingAction> {
        self.editing_actions.clone()
    }

    fn template(&self) -> CellTemplate {
        CellTemplate::of::<C>()
    }

    fn expansion(&self) -> Option<Expansion> {
        let hooks = self.expansion?;
        (hooks.state)(&self.item).cloned()
    }

    fn configure_appearance(&self, cell: &mut (dyn Cell + 'static), collapsed: bool) {
        let Some(hooks) = self.expansion else {
            return;
        };
        if let Some(cell) = cell.downcast_mut::<C>() {
            (hooks.appearance)(cell, collapsed);
        }
    }
}

impl<C: ConfigurableCell> fmt::Debug for TableRow<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableRow")
            .field("id", &self.id)
            .field("reuse_identifier", &self.reuse_identifier)
            .field("expandable", &self.expansion.is_some())
            .field("estimated_height", &self.estimated_height)
            .field("default_height", &self.default_height)
            .finish_non_exhaustive()
    }
}
