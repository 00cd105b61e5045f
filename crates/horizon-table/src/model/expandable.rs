//! Cells that switch between a collapsed and an expanded layout.
//!
//! The collapsed flag lives in the row's payload as an [`Expansion`], so it
//! survives cell reuse: whichever cell ends up showing the row, and the
//! prototype that measures it, read the same flag. A row opts in with
//! [`TableRow::expandable`](super::TableRow::expandable), and
//! [`TableDirector::toggle_expanded`](crate::TableDirector::toggle_expanded)
//! flips the flag, updates the visible cell, re-measures the row and asks the
//! host to animate the height change.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::cell::ConfigurableCell;

/// Shared collapsed/expanded flag.
///
/// Clones share the flag, so a payload that is cloned into several places
/// (for example by a row builder) still toggles as one.
#[derive(Debug, Clone)]
pub struct Expansion {
    collapsed: Arc<AtomicBool>,
}

impl Expansion {
    pub fn new(collapsed: bool) -> Self {
        Self {
            collapsed: Arc::new(AtomicBool::new(collapsed)),
        }
    }

    /// A flag that starts collapsed.
    pub fn collapsed() -> Self {
        Self::new(true)
    }

    /// A flag that starts expanded.
    pub fn expanded() -> Self {
        Self::new(false)
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed.load(Ordering::SeqCst)
    }

    pub fn set_collapsed(&self, collapsed: bool) {
        self.collapsed.store(collapsed, Ordering::SeqCst);
    }

    /// Flips the flag and returns the new collapsed state.
    pub fn toggle(&self) -> bool {
        !self.collapsed.fetch_xor(true, Ordering::SeqCst)
    }
}

/// A cell with a collapsed and an expanded appearance.
///
/// ```
/// use horizon_table::model::{Cell, ConfigurableCell, ExpandableCell, Expansion};
///
/// pub struct Faq {
///     pub answer_lines: usize,
///     pub expansion: Expansion,
/// }
///
/// #[derive(Default)]
/// struct FaqCell {
///     answer_lines: usize,
///     collapsed: bool,
/// }
///
/// impl Cell for FaqCell {
///     fn fitting_height(&mut self, _width: f64) -> f64 {
///         let answer = if self.collapsed { 0 } else { self.answer_lines };
///         44.0 + answer as f64 * 18.0
///     }
/// }
///
/// impl ConfigurableCell for FaqCell {
///     type Data = Faq;
///
///     fn configure(&mut self, faq: &Faq) {
///         self.answer_lines = faq.answer_lines;
///     }
/// }
///
/// impl ExpandableCell for FaqCell {
///     fn expansion(faq: &Faq) -> Option<&Expansion> {
///         Some(&faq.expansion)
///     }
///
///     fn configure_appearance(&mut self, collapsed: bool) {
///         self.collapsed = collapsed;
///     }
/// }
/// ```
pub trait ExpandableCell: ConfigurableCell {
    /// The expansion flag carried by `data`. `None` makes the row behave as a
    /// plain, non-expandable row.
    fn expansion(data: &Self::Data) -> Option<&Expansion>;

    /// Switches the cell to its collapsed or expanded layout.
    fn configure_appearance(&mut self, collapsed: bool);
}

/// Expansion entry points of `C`, captured when a row opts in.
pub(crate) struct ExpansionHooks<C: ConfigurableCell> {
    pub(crate) state: fn(&C::Data) -> Option<&Expansion>,
    pub(crate) appearance: fn(&mut C, bool),
}

impl<C: ExpandableCell> ExpansionHooks<C> {
    pub(crate) fn of() -> Self {
        Self {
            state: C::expansion,
            appearance: C::configure_appearance,
        }
    }
}

impl<C: ConfigurableCell> Clone for ExpansionHooks<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ConfigurableCell> Copy for ExpansionHooks<C> {}
