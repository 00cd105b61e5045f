//! Row action dispatch.
//!
//! Every row carries a registry from [`ActionKind`] to an ordered list of
//! handlers. Dispatching a kind runs all of its handlers in registration order
//! and keeps the last non-empty result, so later registrations can refine the
//! answer of earlier ones while every handler still gets to run.
//!
//! "No result" (`None`) is deliberately distinct from a handler that ran and
//! answered with a neutral value such as `Some(ActionValue::Unit)` or
//! `Some(ActionValue::Bool(false))`.
//!
//! Actions that start inside a rendered cell travel as a [`CellAction`] over a
//! [`CellActionBus`]; the director owning the bus maps the cell back to its row.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use horizon_table_core::Signal;

use super::cell::{CellHandle, ConfigurableCell};
use super::index::IndexPath;

/// Opaque user data attached to an action.
pub type ActionPayload = Arc<dyn Any + Send + Sync>;

/// The events a row can respond to.
///
/// The built-in kinds form a closed set. [`ActionKind::Custom`] carries an
/// application-defined name and lives in its own variant, so a custom action
/// named `"click"` never collides with [`ActionKind::Click`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// A tap on the row. A non-empty result makes the row deselect immediately.
    Click,
    /// The row was deleted through editing.
    ClickDelete,
    /// The row became selected.
    Select,
    /// The row became deselected.
    Deselect,
    /// The row is about to be selected; may redirect to another index path.
    WillSelect,
    /// The row is about to be deselected; may redirect to another index path.
    WillDeselect,
    /// The row's cell is about to be displayed.
    WillDisplay,
    /// The row's cell left the screen.
    DidEndDisplaying,
    /// Whether the row highlights on touch.
    ShouldHighlight,
    /// A height override that bypasses measurement.
    Height,
    /// Whether the row can be edited.
    CanEdit,
    /// The row's cell was configured for display.
    Configure,
    /// An application-defined action.
    Custom(String),
}

impl ActionKind {
    /// Creates a custom action kind.
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// The string key for this kind.
    ///
    /// Built-in keys carry a leading underscore; custom keys are the bare name.
    pub fn key(&self) -> &str {
        match self {
            Self::Click => "_click",
            Self::ClickDelete => "_clickDelete",
            Self::Select => "_select",
            Self::Deselect => "_deselect",
            Self::WillSelect => "_willSelect",
            Self::WillDeselect => "_willDeselect",
            Self::WillDisplay => "_willDisplay",
            Self::DidEndDisplaying => "_didEndDisplaying",
            Self::ShouldHighlight => "_shouldHighlight",
            Self::Height => "_height",
            Self::CanEdit => "_canEdit",
            Self::Configure => "_configure",
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Returns `true` for [`ActionKind::Custom`].
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The result of a handler.
#[derive(Clone)]
pub enum ActionValue {
    /// The handler ran and has nothing to report.
    Unit,
    /// A boolean answer, e.g. for [`ActionKind::ShouldHighlight`].
    Bool(bool),
    /// A height, e.g. for [`ActionKind::Height`].
    Height(f64),
    /// An index path, e.g. for [`ActionKind::WillSelect`].
    IndexPath(IndexPath),
    /// Anything else.
    Custom(ActionPayload),
}

impl ActionValue {
    /// Returns the boolean if this is [`ActionValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the height if this is [`ActionValue::Height`].
    pub fn as_height(&self) -> Option<f64> {
        match self {
            Self::Height(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the index path if this is [`ActionValue::IndexPath`].
    pub fn as_index_path(&self) -> Option<IndexPath> {
        match self {
            Self::IndexPath(path) => Some(*path),
            _ => None,
        }
    }

    /// Returns the custom value if it is of type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(value) => (**value).downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns `true` for [`ActionValue::Unit`].
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }
}

impl fmt::Debug for ActionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => f.write_str("Unit"),
            Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Self::Height(value) => f.debug_tuple("Height").field(value).finish(),
            Self::IndexPath(path) => f.debug_tuple("IndexPath").field(path).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<()> for ActionValue {
    fn from(_: ()) -> Self {
        Self::Unit
    }
}

impl From<bool> for ActionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ActionValue {
    fn from(value: f64) -> Self {
        Self::Height(value)
    }
}

impl From<IndexPath> for ActionValue {
    fn from(path: IndexPath) -> Self {
        Self::IndexPath(path)
    }
}

/// What a handler sees when it runs.
pub struct ActionOptions<'a, C: ConfigurableCell> {
    /// The row's payload.
    pub item: &'a C::Data,
    /// The cell the action concerns, if there is one on screen.
    pub cell: Option<&'a CellHandle>,
    /// The row's position at dispatch time.
    pub index_path: IndexPath,
    /// Extra data supplied by whoever triggered the action.
    pub user_info: Option<&'a ActionPayload>,
    _cell: PhantomData<fn() -> C>,
}

impl<'a, C: ConfigurableCell> ActionOptions<'a, C> {
    pub(crate) fn new(
        item: &'a C::Data,
        cell: Option<&'a CellHandle>,
        index_path: IndexPath,
        user_info: Option<&'a ActionPayload>,
    ) -> Self {
        Self {
            item,
            cell,
            index_path,
            user_info,
            _cell: PhantomData,
        }
    }

    /// Runs `f` with the concrete cell, if a cell of type `C` is attached.
    ///
    /// The cell is locked for the duration of `f`.
    pub fn with_cell<R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        let cell = self.cell?;
        let mut guard = cell.lock();
        guard.downcast_mut::<C>().map(f)
    }

    /// Returns the user info if it is of type `T`.
    pub fn user_info_as<T: Any>(&self) -> Option<&T> {
        self.user_info.and_then(|info| (**info).downcast_ref::<T>())
    }
}

type VoidHandler<C> = Arc<dyn Fn(&ActionOptions<'_, C>) + Send + Sync>;
type ValueHandler<C> = Arc<dyn Fn(&ActionOptions<'_, C>) -> Option<ActionValue> + Send + Sync>;

enum Handler<C: ConfigurableCell> {
    Void(VoidHandler<C>),
    Value(ValueHandler<C>),
}

impl<C: ConfigurableCell> Clone for Handler<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Void(handler) => Self::Void(Arc::clone(handler)),
            Self::Value(handler) => Self::Value(Arc::clone(handler)),
        }
    }
}

/// A handler registered on a row for one [`ActionKind`].
///
/// A void handler always counts as handled and yields
/// `Some(ActionValue::Unit)`. A value handler may return `None` to pass.
pub struct RowAction<C: ConfigurableCell> {
    id: Option<String>,
    kind: ActionKind,
    handler: Handler<C>,
}

impl<C: ConfigurableCell> RowAction<C> {
    /// Creates a handler with no return value.
    pub fn new<F>(kind: ActionKind, handler: F) -> Self
    where
        F: Fn(&ActionOptions<'_, C>) + Send + Sync + 'static,
    {
        Self {
            id: None,
            kind,
            handler: Handler::Void(Arc::new(handler)),
        }
    }

    /// Creates a handler that returns a value.
    pub fn with_value<F>(kind: ActionKind, handler: F) -> Self
    where
        F: Fn(&ActionOptions<'_, C>) -> Option<ActionValue> + Send + Sync + 'static,
    {
        Self {
            id: None,
            kind,
            handler: Handler::Value(Arc::new(handler)),
        }
    }

    /// Tags the handler with an id so it can be removed later.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The handler's id, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The kind this handler responds to.
    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    /// Runs the handler.
    pub fn invoke(&self, options: &ActionOptions<'_, C>) -> Option<ActionValue> {
        match &self.handler {
            Handler::Void(handler) => {
                handler(options);
                Some(ActionValue::Unit)
            }
            Handler::Value(handler) => handler(options),
        }
    }
}

impl<C: ConfigurableCell> Clone for RowAction<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            kind: self.kind.clone(),
            handler: self.handler.clone(),
        }
    }
}

impl<C: ConfigurableCell> fmt::Debug for RowAction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// An action raised from inside a rendered cell.
///
/// The control that raises it only knows its own cell. The director that owns
/// the bus looks the cell up in its host, finds the row, and dispatches
/// [`ActionKind::Custom`] with `key` and `user_info`.
#[derive(Clone)]
pub struct CellAction {
    /// The custom action name.
    pub key: String,
    /// The cell the action came from.
    pub cell: CellHandle,
    /// Optional payload handed to the row's handler.
    pub user_info: Option<ActionPayload>,
}

impl CellAction {
    /// Creates an action without a payload.
    pub fn new(key: impl Into<String>, cell: CellHandle) -> Self {
        Self {
            key: key.into(),
            cell,
            user_info: None,
        }
    }

    /// Attaches a payload.
    pub fn with_user_info<T: Any + Send + Sync>(mut self, user_info: T) -> Self {
        self.user_info = Some(Arc::new(user_info));
        self
    }

    /// Emits the action on `bus`. Returns the number of subscribers reached.
    pub fn invoke(self, bus: &CellActionBus) -> usize {
        bus.emit(self)
    }
}

impl fmt::Debug for CellAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellAction")
            .field("key", &self.key)
            .field("has_user_info", &self.user_info.is_some())
            .finish_non_exhaustive()
    }
}

/// The channel cell actions travel on. Each director owns one.
pub type CellActionBus = Signal<CellAction>;
