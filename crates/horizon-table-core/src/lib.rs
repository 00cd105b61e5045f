//! Core systems for Horizon Table.
//!
//! This crate provides the small foundation the list-binding layer is built on:
//!
//! - **Signal/Slot System**: Type-safe, instance-scoped notification channels
//! - **Errors**: The [`TableError`] type returned by fallible model mutations
//! - **Logging**: Tracing targets, span names, and [`PerfSpan`]
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_table_core::Signal;
//! use std::sync::Arc;
//!
//! let cell_tapped = Arc::new(Signal::<String>::new());
//!
//! // The subscription lives as long as the guard.
//! let guard = cell_tapped.connect_scoped(|key| {
//!     println!("cell action: {}", key);
//! });
//!
//! cell_tapped.emit("favorite".to_string());
//! drop(guard);
//! assert_eq!(cell_tapped.connection_count(), 0);
//! ```

mod error;
pub mod logging;
pub mod signal;

pub use error::{Result, TableError};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
