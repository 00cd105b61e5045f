//! Director configuration.

/// Which height calculator a director starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightStrategy {
    /// Measure rows with prototype cells, cached by row identity and width.
    #[default]
    Prototype,
    /// Measure rows with prototype cells, cached by index path; cells may push
    /// their own heights after expanding.
    Expandable,
    /// No calculator: rows without an override or fixed height report
    /// [`RowHeight::Automatic`](crate::model::RowHeight::Automatic).
    Automatic,
}

/// Configuration for a [`TableDirector`](crate::TableDirector).
///
/// Cached heights are only dropped when asked for: reloading and clearing keep
/// them unless the matching `invalidate_on_*` switch is on. Rows removed through
/// the director always have their own entries dropped.
///
/// # Example
///
/// ```
/// use horizon_table::{DirectorConfig, HeightStrategy};
///
/// let config = DirectorConfig::default()
///     .with_height_strategy(HeightStrategy::Expandable)
///     .with_invalidate_on_reload(true);
///
/// assert!(config.automatic_cell_registration);
/// assert!(config.invalidate_on_reload);
/// assert!(!config.invalidate_on_clear);
/// assert_eq!(config.height_strategy, HeightStrategy::Expandable);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectorConfig {
    /// Register each row's cell template with the host the first time it is needed.
    pub automatic_cell_registration: bool,
    /// The initial height calculator.
    pub height_strategy: HeightStrategy,
    /// Drop cached heights when [`TableDirector::reload`](crate::TableDirector::reload) runs.
    /// Off by default.
    pub invalidate_on_reload: bool,
    /// Drop every cached height when all sections are cleared. Off by default.
    pub invalidate_on_clear: bool,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            automatic_cell_registration: true,
            height_strategy: HeightStrategy::Prototype,
            invalidate_on_reload: false,
            invalidate_on_clear: false,
        }
    }
}

impl DirectorConfig {
    /// Configuration for hosts that size rows themselves and register their own templates.
    pub fn host_sized() -> Self {
        Self {
            automatic_cell_registration: false,
            height_strategy: HeightStrategy::Automatic,
            ..Self::default()
        }
    }

    /// Sets automatic cell registration.
    pub fn with_automatic_cell_registration(mut self, enabled: bool) -> Self {
        self.automatic_cell_registration = enabled;
        self
    }

    /// Sets the height strategy.
    pub fn with_height_strategy(mut self, strategy: HeightStrategy) -> Self {
        self.height_strategy = strategy;
        self
    }

    /// Sets whether reloading drops cached heights.
    pub fn with_invalidate_on_reload(mut self, enabled: bool) -> Self {
        self.invalidate_on_reload = enabled;
        self
    }

    /// Sets whether clearing drops cached heights.
    pub fn with_invalidate_on_clear(mut self, enabled: bool) -> Self {
        self.invalidate_on_clear = enabled;
        self
    }
}
