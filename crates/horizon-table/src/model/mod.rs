//! The section/row model and everything attached to rows.
//!
//! # Core Types
//!
//! - [`IndexPath`]: A row's current position
//! - [`RowId`]: A row's identity, stable across moves
//! - [`Row`]: The type-erased row capability
//! - [`TableRow`]: A row bound to a concrete cell type
//! - [`Section`]: An ordered group of rows with header/footer descriptors
//! - [`ActionKind`]: The events a row can handle
//! - [`RowHeightCalculator`]: Measures and caches row heights
//! - [`ExpandableCell`]: A cell with collapsed and expanded layouts
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │   Section    │────>│ Arc<dyn Row> │────>│  TableRow<Cell>  │
//! └──────────────┘     └──────────────┘     └──────────────────┘
//!                              │                     │
//!                              │ configure           │ actions
//!                              v                     v
//!                      ┌──────────────┐     ┌──────────────────┐
//!                      │  CellHandle  │     │  RowAction<Cell> │
//!                      └──────────────┘     └──────────────────┘
//!                              ^
//!                              │ prototype
//!                      ┌──────────────────────┐
//!                      │ RowHeightCalculator  │
//!                      └──────────────────────┘
//! ```

mod action;
mod builder;
mod cell;
mod expandable;
mod height;
mod index;
mod row;
mod section;

pub use action::{
    ActionKind, ActionOptions, ActionPayload, ActionValue, CellAction, CellActionBus, RowAction,
};
pub use builder::{RowBuilder, TableRowBuilder};
pub use cell::{
    Cell, CellHandle, CellTemplate, ConfigurableCell, FixedView, SupplementaryView, cell_handle,
    same_cell,
};
pub use expandable::{ExpandableCell, Expansion};
pub use height::{
    ExpandableHeightCalculator, PrototypeHeightCalculator, RowHeight, RowHeightCalculator,
};
pub use index::{IndexPath, RowId};
pub use row::{EditingAction, EditingStyle, IntoRow, Row, TableRow};
pub use section::{RowUpdates, Section, SectionUpdates};
