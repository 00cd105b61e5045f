//! Horizon Table - declarative sections and rows for list widgets.
//!
//! Describe a list as sections of typed rows, hand it to a [`TableDirector`],
//! and let the director answer the host widget's data-source and delegate
//! calls: how many rows, which cell, how tall, and what happens on a tap.
//!
//! - [`model`]: rows, sections, actions, cells, and height calculators
//! - [`TableDirector`]: the host-facing protocol surface
//! - [`ListHost`] / [`CellProvider`]: what the host widget must provide
//! - [`DirectorConfig`]: registration and height strategy switches
//!
//! Row heights are measured with off-screen prototype cells and cached per row
//! identity and width, so each row is measured at most once until the cache is
//! invalidated.
//!
//! # Logging
//!
//! Everything is instrumented with `tracing`; see
//! [`horizon_table_core::logging::targets`] for the subsystem targets.

pub mod config;
pub mod director;
pub mod host;
pub mod model;
pub mod registrar;

pub use config::{DirectorConfig, HeightStrategy};
pub use director::{SelectionOutcome, TableDirector};
pub use host::{CellProvider, ListHost};
pub use registrar::{CellRegistrar, Registration};

pub use horizon_table_core::{Result, TableError};

/// Logging targets and helpers, re-exported from the core crate.
pub mod logging {
    pub use horizon_table_core::logging::*;
}
