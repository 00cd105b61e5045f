//! The director: the object a host list widget talks to.
//!
//! A [`TableDirector`] owns the sections and the height calculator, observes
//! the host through a weak reference, and answers the host's data-source and
//! delegate queries. Queries never fail: an index that does not exist, or a
//! host that has gone away, yields a neutral answer (no rows, no cell, zero
//! height, no action result). Only explicit mutations report errors.
//!
//! No director lock is held while a row handler runs, so handlers may call
//! back into the director, for example to remove the row that was tapped.
//! Closures passed to [`TableDirector::with_section_mut`] and
//! [`TableDirector::update_section`] run under the section lock and must not.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};

use horizon_table_core::logging::{span_names, targets};
use horizon_table_core::{ConnectionGuard, PerfSpan, Result, TableError};
use parking_lot::{Mutex, RwLock};

use crate::config::{DirectorConfig, HeightStrategy};
use crate::host::ListHost;
use crate::model::{
    ActionKind, ActionPayload, ActionValue, CellAction, CellActionBus, CellHandle, EditingAction,
    EditingStyle, ExpandableHeightCalculator, IndexPath, IntoRow, PrototypeHeightCalculator, Row,
    RowHeight, RowHeightCalculator, RowId, RowUpdates, Section, SupplementaryView,
};
use crate::registrar::CellRegistrar;

/// What a row did with a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// A tap handler answered; the row was deselected right away.
    Tapped,
    /// No tap handler answered; the select handlers ran and the row stays selected.
    Selected,
    /// There is no row at the selected path.
    Ignored,
}

/// State shared between the director and its cell-action subscription.
struct DirectorShared {
    sections: RwLock<Vec<Section>>,
    host: Weak<dyn ListHost>,
    heights: Mutex<Option<Box<dyn RowHeightCalculator>>>,
    registrar: Mutex<CellRegistrar>,
    config: DirectorConfig,
}

impl DirectorShared {
    fn host(&self) -> Option<Arc<dyn ListHost>> {
        self.host.upgrade()
    }

    fn row_at(&self, path: IndexPath) -> Option<Arc<dyn Row>> {
        self.sections
            .read()
            .get(path.section)
            .and_then(|section| section.row(path.row))
            .cloned()
    }

    fn register(&self, row: &dyn Row, host: &dyn ListHost) {
        if !self.config.automatic_cell_registration {
            return;
        }
        let mut registrar = self.registrar.lock();
        if !registrar.is_registered(row.reuse_identifier()) {
            registrar.register(row.template(), host);
        }
    }

    fn invalidate_heights(&self) {
        if let Some(calculator) = self.heights.lock().as_mut() {
            calculator.invalidate();
        }
    }

    /// Drops cached heights of `candidates` that no section holds any more.
    fn evict_removed(&self, candidates: impl IntoIterator<Item = RowId>) {
        let removed: HashSet<RowId> = {
            let sections = self.sections.read();
            let live: HashSet<RowId> = sections
                .iter()
                .flat_map(|section| section.rows().iter().map(|row| row.id()))
                .collect();
            candidates
                .into_iter()
                .filter(|id| !live.contains(id))
                .collect()
        };
        if removed.is_empty() {
            return;
        }
        if let Some(calculator) = self.heights.lock().as_mut() {
            calculator.evict(&removed);
        }
    }

    fn handle_cell_action(&self, action: &CellAction) {
        let Some(host) = self.host() else {
            return;
        };
        let Some(path) = host.index_path_for_cell(&action.cell) else {
            tracing::debug!(
                target: targets::ACTION,
                key = %action.key,
                "cell action from a cell this host does not display; ignoring"
            );
            return;
        };
        let Some(row) = self.row_at(path) else {
            return;
        };

        let _span = PerfSpan::with_subject(span_names::ACTION, &action.key);
        row.invoke(
            &ActionKind::custom(action.key.clone()),
            Some(&action.cell),
            path,
            action.user_info.as_ref(),
        );
    }
}

fn calculator_for(strategy: HeightStrategy) -> Option<Box<dyn RowHeightCalculator>> {
    match strategy {
        HeightStrategy::Prototype => Some(Box::new(PrototypeHeightCalculator::new())),
        HeightStrategy::Expandable => Some(Box::new(ExpandableHeightCalculator::new())),
        HeightStrategy::Automatic => None,
    }
}

/// Binds sections of rows to a host list widget.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_table::model::{
///     Cell, CellHandle, CellTemplate, ConfigurableCell, IndexPath, RowHeight, TableRow,
/// };
/// use horizon_table::{CellProvider, ListHost, TableDirector};
///
/// #[derive(Default)]
/// struct LabelCell;
///
/// impl Cell for LabelCell {
///     fn fitting_height(&mut self, _width: f64) -> f64 {
///         36.0
///     }
/// }
///
/// impl ConfigurableCell for LabelCell {
///     type Data = String;
///     fn configure(&mut self, _data: &String) {}
/// }
///
/// #[derive(Default)]
/// struct Host {
///     templates: parking_lot::Mutex<Vec<CellTemplate>>,
/// }
///
/// impl CellProvider for Host {
///     fn dequeue_reusable_cell(&self, id: &str) -> Option<CellHandle> {
///         let templates = self.templates.lock();
///         templates.iter().find(|t| t.reuse_identifier() == id).map(|t| t.instantiate())
///     }
/// }
///
/// impl ListHost for Host {
///     fn content_width(&self) -> f64 {
///         320.0
///     }
///     fn register_template(&self, template: CellTemplate) {
///         self.templates.lock().push(template);
///     }
///     fn index_path_for_cell(&self, _cell: &CellHandle) -> Option<IndexPath> {
///         None
///     }
/// }
///
/// let host = Arc::new(Host::default());
/// let director = TableDirector::new(&host);
/// director.append_rows([TableRow::<LabelCell>::new("Hello".into())]);
///
/// assert_eq!(director.number_of_rows(0), 1);
/// assert_eq!(director.height_for_row(IndexPath::new(0, 0)), RowHeight::Fixed(36.0));
/// ```
pub struct TableDirector {
    shared: Arc<DirectorShared>,
    bus: Arc<CellActionBus>,
    _subscription: ConnectionGuard<CellAction>,
}

impl TableDirector {
    /// Creates a director for `host` with the default configuration.
    pub fn new<H: ListHost + 'static>(host: &Arc<H>) -> Self {
        Self::with_config(host, DirectorConfig::default())
    }

    /// Creates a director for `host`.
    pub fn with_config<H: ListHost + 'static>(host: &Arc<H>, config: DirectorConfig) -> Self {
        let host: Weak<H> = Arc::downgrade(host);
        Self::from_weak(host, config)
    }

    /// Creates a director observing an already type-erased host.
    pub fn from_weak(host: Weak<dyn ListHost>, config: DirectorConfig) -> Self {
        let shared = Arc::new(DirectorShared {
            sections: RwLock::new(Vec::new()),
            host,
            heights: Mutex::new(calculator_for(config.height_strategy)),
            registrar: Mutex::new(CellRegistrar::new()),
            config,
        });

        let bus = Arc::new(CellActionBus::new());
        let weak = Arc::downgrade(&shared);
        let subscription = bus.connect_scoped(move |action: &CellAction| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_cell_action(action);
            }
        });

        horizon_table_core::table_debug!(?config, "director created");
        Self {
            shared,
            bus,
            _subscription: subscription,
        }
    }

    /// The director's configuration.
    pub fn config(&self) -> &DirectorConfig {
        &self.shared.config
    }

    /// The channel cells use to raise custom actions for this director's rows.
    pub fn cell_action_bus(&self) -> &Arc<CellActionBus> {
        &self.bus
    }

    /// The host, if it is still alive.
    pub fn host(&self) -> Option<Arc<dyn ListHost>> {
        self.shared.host()
    }

    /// The row at `path`, if any.
    pub fn row(&self, path: IndexPath) -> Option<Arc<dyn Row>> {
        self.shared.row_at(path)
    }

    // -------------------------------------------------------------------------
    // Data source
    // -------------------------------------------------------------------------

    /// Number of sections.
    pub fn number_of_sections(&self) -> usize {
        self.shared.sections.read().len()
    }

    /// Number of rows in `section`, or `0` if there is no such section.
    pub fn number_of_rows(&self, section: usize) -> usize {
        self.shared
            .sections
            .read()
            .get(section)
            .map_or(0, Section::number_of_rows)
    }

    /// Returns `true` if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.shared.sections.read().is_empty()
    }

    /// A configured cell for the row at `path`.
    ///
    /// Registers the row's template if needed, dequeues a cell from the host,
    /// configures it, and then runs the row's [`ActionKind::Configure`]
    /// handlers. Returns `None` if there is no row, no host, or the host cannot
    /// produce a cell.
    #[tracing::instrument(skip(self), target = "horizon_table::director", level = "trace")]
    pub fn cell_for_row(&self, path: IndexPath) -> Option<CellHandle> {
        let row = self.shared.row_at(path)?;
        let host = self.shared.host()?;
        self.shared.register(&*row, &*host);

        let Some(cell) = host.dequeue_cell_for_row(row.reuse_identifier(), path) else {
            tracing::warn!(
                target: targets::DIRECTOR,
                reuse_identifier = row.reuse_identifier(),
                %path,
                "host could not dequeue a cell"
            );
            return None;
        };

        row.configure(&mut *cell.lock());
        row.invoke(&ActionKind::Configure, Some(&cell), path, None);
        Some(cell)
    }

    /// The header title of `section`.
    pub fn title_for_header(&self, section: usize) -> Option<String> {
        self.shared
            .sections
            .read()
            .get(section)
            .and_then(|s| s.header_title.clone())
    }

    /// The footer title of `section`.
    pub fn title_for_footer(&self, section: usize) -> Option<String> {
        self.shared
            .sections
            .read()
            .get(section)
            .and_then(|s| s.footer_title.clone())
    }

    /// Index titles of the sections that have one, in section order.
    ///
    /// Returns `None` when no section has an index title, so the host shows
    /// no index at all.
    pub fn section_index_titles(&self) -> Option<Vec<String>> {
        let titles: Vec<String> = self
            .shared
            .sections
            .read()
            .iter()
            .filter_map(|s| s.index_title.clone())
            .collect();
        (!titles.is_empty()).then_some(titles)
    }

    /// The section the `index`-th index title belongs to.
    pub fn section_for_index_title(&self, index: usize) -> Option<usize> {
        self.shared
            .sections
            .read()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.index_title.is_some())
            .nth(index)
            .map(|(position, _)| position)
    }

    // -------------------------------------------------------------------------
    // Delegate: heights and supplementary views
    // -------------------------------------------------------------------------

    /// The height of the row at `path`.
    ///
    /// In order of priority: the row's [`ActionKind::Height`] handler, the
    /// row's fixed height, the height calculator, and finally
    /// [`RowHeight::Automatic`]. A path with no row reports `Fixed(0.0)`.
    pub fn height_for_row(&self, path: IndexPath) -> RowHeight {
        let Some(row) = self.shared.row_at(path) else {
            return RowHeight::Fixed(0.0);
        };

        if let Some(height) = row
            .invoke(&ActionKind::Height, None, path, None)
            .and_then(|value| value.as_height())
        {
            return RowHeight::Fixed(height);
        }
        if let Some(height) = row.default_height() {
            return RowHeight::Fixed(height);
        }

        let Some(host) = self.shared.host() else {
            return RowHeight::Automatic;
        };
        self.shared.register(&*row, &*host);
        let width = host.content_width();
        match self.shared.heights.lock().as_mut() {
            Some(calculator) => RowHeight::Fixed(calculator.height(&*row, path, width, &*host)),
            None => RowHeight::Automatic,
        }
    }

    /// A cheap height estimate for the row at `path`.
    ///
    /// Uses the height calculator's estimate when there is one; otherwise the
    /// row's positive estimated height, or [`RowHeight::Automatic`].
    pub fn estimated_height_for_row(&self, path: IndexPath) -> RowHeight {
        let Some(row) = self.shared.row_at(path) else {
            return RowHeight::Fixed(0.0);
        };

        if let Some(host) = self.shared.host() {
            self.shared.register(&*row, &*host);
            let width = host.content_width();
            if let Some(calculator) = self.shared.heights.lock().as_mut() {
                return calculator.estimated_height(&*row, path, width, &*host);
            }
        }

        match row.estimated_height() {
            Some(height) if height > 0.0 => RowHeight::Fixed(height),
            _ => RowHeight::Automatic,
        }
    }

    /// The header view of `section`.
    pub fn header_view(&self, section: usize) -> Option<Arc<dyn SupplementaryView>> {
        self.shared
            .sections
            .read()
            .get(section)
            .and_then(|s| s.header_view.clone())
    }

    /// The footer view of `section`.
    pub fn footer_view(&self, section: usize) -> Option<Arc<dyn SupplementaryView>> {
        self.shared
            .sections
            .read()
            .get(section)
            .and_then(|s| s.footer_view.clone())
    }

    /// The header height of `section`: fixed height, else view height, else `0`.
    pub fn height_for_header(&self, section: usize) -> f64 {
        self.shared.sections.read().get(section).map_or(0.0, |s| {
            s.header_height
                .or_else(|| s.header_view.as_ref().map(|view| view.height()))
                .unwrap_or(0.0)
        })
    }

    /// The footer height of `section`: fixed height, else view height, else `0`.
    pub fn height_for_footer(&self, section: usize) -> f64 {
        self.shared.sections.read().get(section).map_or(0.0, |s| {
            s.footer_height
                .or_else(|| s.footer_view.as_ref().map(|view| view.height()))
                .unwrap_or(0.0)
        })
    }

    // -------------------------------------------------------------------------
    // Delegate: interaction
    // -------------------------------------------------------------------------

    fn visible_cell(&self, path: IndexPath) -> Option<CellHandle> {
        self.shared.host().and_then(|host| host.visible_cell(path))
    }

    /// Handles a selection of the row at `path`.
    ///
    /// [`ActionKind::Click`] runs first. If a tap handler answers, the row is
    /// deselected immediately (a momentary highlight). Otherwise the
    /// [`ActionKind::Select`] handlers run and the row stays selected.
    pub fn did_select_row(&self, path: IndexPath) -> SelectionOutcome {
        let Some(row) = self.shared.row_at(path) else {
            return SelectionOutcome::Ignored;
        };
        let cell = self.visible_cell(path);

        if row.invoke(&ActionKind::Click, cell.as_ref(), path, None).is_some() {
            if let Some(host) = self.shared.host() {
                host.deselect_row(path, true);
            }
            SelectionOutcome::Tapped
        } else {
            row.invoke(&ActionKind::Select, cell.as_ref(), path, None);
            SelectionOutcome::Selected
        }
    }

    /// Handles a deselection of the row at `path`.
    pub fn did_deselect_row(&self, path: IndexPath) -> Option<ActionValue> {
        let cell = self.visible_cell(path);
        self.invoke(&ActionKind::Deselect, cell.as_ref(), path, None)
    }

    /// Where a selection at `path` should land.
    ///
    /// With a [`ActionKind::WillSelect`] handler, its index path answer (or
    /// `None` to refuse). Without one, `path` itself. `None` if there is no row.
    pub fn will_select_row(&self, path: IndexPath) -> Option<IndexPath> {
        self.redirect(&ActionKind::WillSelect, path)
    }

    /// Where a deselection at `path` should land. Same rules as [`Self::will_select_row`].
    pub fn will_deselect_row(&self, path: IndexPath) -> Option<IndexPath> {
        self.redirect(&ActionKind::WillDeselect, path)
    }

    fn redirect(&self, kind: &ActionKind, path: IndexPath) -> Option<IndexPath> {
        let row = self.shared.row_at(path)?;
        if !row.has_action(kind) {
            return Some(path);
        }
        let cell = self.visible_cell(path);
        row.invoke(kind, cell.as_ref(), path, None)
            .and_then(|value| value.as_index_path())
    }

    /// The host is about to display `cell` for the row at `path`.
    pub fn will_display(&self, cell: &CellHandle, path: IndexPath) -> Option<ActionValue> {
        self.invoke(&ActionKind::WillDisplay, Some(cell), path, None)
    }

    /// The host stopped displaying `cell` for the row at `path`.
    pub fn did_end_displaying(&self, cell: &CellHandle, path: IndexPath) -> Option<ActionValue> {
        self.invoke(&ActionKind::DidEndDisplaying, Some(cell), path, None)
    }

    /// Whether the row at `path` highlights when touched. Defaults to `true`.
    pub fn should_highlight(&self, path: IndexPath) -> bool {
        let Some(row) = self.shared.row_at(path) else {
            return false;
        };
        let cell = self.visible_cell(path);
        row.invoke(&ActionKind::ShouldHighlight, cell.as_ref(), path, None)
            .and_then(|value| value.as_bool())
            .unwrap_or(true)
    }

    /// Whether the row at `path` can be edited.
    pub fn can_edit_row(&self, path: IndexPath) -> bool {
        self.shared
            .row_at(path)
            .is_some_and(|row| row.is_editing_allowed(path))
    }

    /// The swipe actions for the row at `path`.
    pub fn editing_actions(&self, path: IndexPath) -> Vec<EditingAction> {
        self.shared
            .row_at(path)
            .map(|row| row.editing_actions())
            .unwrap_or_default()
    }

    /// Commits an edit. A delete runs the row's [`ActionKind::ClickDelete`] handlers.
    pub fn commit_edit(&self, style: EditingStyle, path: IndexPath) -> Option<ActionValue> {
        match style {
            EditingStyle::Delete => {
                let cell = self.visible_cell(path);
                self.invoke(&ActionKind::ClickDelete, cell.as_ref(), path, None)
            }
            EditingStyle::Insert | EditingStyle::None => None,
        }
    }

    // -------------------------------------------------------------------------
    // Generic dispatch
    // -------------------------------------------------------------------------

    /// Dispatches `kind` to the row at `path`.
    pub fn invoke(
        &self,
        kind: &ActionKind,
        cell: Option<&CellHandle>,
        path: IndexPath,
        user_info: Option<&ActionPayload>,
    ) -> Option<ActionValue> {
        self.shared
            .row_at(path)?
            .invoke(kind, cell, path, user_info)
    }

    /// Returns `true` if the row at `path` handles `kind`.
    pub fn has_action(&self, kind: &ActionKind, path: IndexPath) -> bool {
        self.shared
            .row_at(path)
            .is_some_and(|row| row.has_action(kind))
    }

    // -------------------------------------------------------------------------
    // Sections
    // -------------------------------------------------------------------------

    /// Appends a section.
    pub fn append_section(&self, section: Section) -> &Self {
        self.shared.sections.write().push(section);
        self
    }

    /// Appends sections in order.
    pub fn append_sections(&self, sections: impl IntoIterator<Item = Section>) -> &Self {
        self.shared.sections.write().extend(sections);
        self
    }

    /// Appends a new section holding `rows`.
    pub fn append_rows<R: IntoRow>(&self, rows: impl IntoIterator<Item = R>) -> &Self {
        self.append_section(Section::with_rows(rows))
    }

    /// Inserts a section at `index`. `index` may equal the section count.
    pub fn insert_section(&self, index: usize, section: Section) -> Result<()> {
        let mut sections = self.shared.sections.write();
        if index > sections.len() {
            return Err(TableError::section_out_of_bounds(index, sections.len()));
        }
        sections.insert(index, section);
        Ok(())
    }

    /// Replaces the section at `index`, returning the old one.
    pub fn replace_section(&self, index: usize, section: Section) -> Result<Section> {
        let old = {
            let mut sections = self.shared.sections.write();
            let len = sections.len();
            let slot = sections
                .get_mut(index)
                .ok_or_else(|| TableError::section_out_of_bounds(index, len))?;
            std::mem::replace(slot, section)
        };
        self.shared.evict_removed(row_ids(&old));
        Ok(old)
    }

    /// Removes and returns the section at `index`.
    pub fn remove_section(&self, index: usize) -> Result<Section> {
        let removed = {
            let mut sections = self.shared.sections.write();
            if index >= sections.len() {
                return Err(TableError::section_out_of_bounds(index, sections.len()));
            }
            sections.remove(index)
        };
        self.shared.evict_removed(row_ids(&removed));
        Ok(removed)
    }

    /// Removes every section.
    ///
    /// Heights of the removed rows are forgotten; with
    /// [`DirectorConfig::invalidate_on_clear`] the whole cache is dropped.
    pub fn clear(&self) {
        let removed: Vec<Section> = std::mem::take(&mut *self.shared.sections.write());
        if self.shared.config.invalidate_on_clear {
            self.shared.invalidate_heights();
        } else {
            self.shared.evict_removed(removed.iter().flat_map(row_ids));
        }
    }

    /// Runs `f` with the section at `index`.
    pub fn with_section<R>(&self, index: usize, f: impl FnOnce(&Section) -> R) -> Option<R> {
        self.shared.sections.read().get(index).map(f)
    }

    /// Runs `f` with mutable access to the section at `index`.
    ///
    /// Rows that `f` removes have their cached heights dropped. Row bounds
    /// errors returned by `f` are best re-addressed with
    /// [`TableError::in_section`].
    pub fn with_section_mut<R>(&self, index: usize, f: impl FnOnce(&mut Section) -> R) -> Result<R> {
        let (result, before) = {
            let mut sections = self.shared.sections.write();
            let len = sections.len();
            let section = sections
                .get_mut(index)
                .ok_or_else(|| TableError::section_out_of_bounds(index, len))?;
            let before = row_ids(section).collect::<Vec<_>>();
            (f(section), before)
        };
        self.shared.evict_removed(before);
        Ok(result)
    }

    /// Mutates the section at `index` and forwards the resulting row changes to the host.
    ///
    /// See [`Section::perform_updates`] for how changes are derived.
    pub fn update_section(
        &self,
        index: usize,
        reload_rows: bool,
        f: impl FnOnce(&mut Section),
    ) -> Result<RowUpdates> {
        let updates = self
            .with_section_mut(index, |section| section.perform_updates(reload_rows, f))?
            .in_section(index);

        if let Some(host) = self.shared.host() {
            host.apply_updates(&updates);
        }
        Ok(updates)
    }

    // -------------------------------------------------------------------------
    // Reloading and heights
    // -------------------------------------------------------------------------

    /// Asks the host to reload everything.
    pub fn reload(&self) -> Result<()> {
        if self.shared.config.invalidate_on_reload {
            self.shared.invalidate_heights();
        }
        let Some(host) = self.shared.host() else {
            horizon_table_core::table_warn!("reload requested after the host was dropped");
            return Err(TableError::HostUnavailable);
        };
        horizon_table_core::table_trace!(sections = self.number_of_sections(), "reloading host");
        host.reload_data();
        Ok(())
    }

    /// Toggles the row at `path` between collapsed and expanded.
    ///
    /// Flips the row's [`Expansion`](crate::model::Expansion), switches the
    /// visible cell's appearance, re-measures the row at the current width,
    /// and hands the host an empty update batch so it animates to the new
    /// height. Returns the new collapsed state, or `None` if there is no row
    /// at `path` or the row is not expandable.
    pub fn toggle_expanded(&self, path: IndexPath) -> Option<bool> {
        let row = self.shared.row_at(path)?;
        let expansion = row.expansion()?;
        let collapsed = expansion.toggle();

        if let Some(cell) = self.visible_cell(path) {
            row.configure_appearance(&mut *cell.lock(), collapsed);
        }

        let Some(host) = self.shared.host() else {
            return Some(collapsed);
        };
        let width = host.content_width();
        let height = self
            .shared
            .heights
            .lock()
            .as_mut()
            .map(|calculator| calculator.refresh(&*row, path, width, &*host));
        tracing::debug!(
            target: targets::DIRECTOR,
            %path,
            collapsed,
            ?height,
            "toggled expandable row"
        );

        host.apply_updates(&RowUpdates::default());
        Some(collapsed)
    }

    /// Drops every cached row height.
    pub fn invalidate_heights(&self) {
        self.shared.invalidate_heights();
    }

    /// Overwrites the cached height of the row at `path` at the current width.
    ///
    /// Used by cells that change height in place. Returns `false` if there is
    /// no row, no host, or no height calculator.
    pub fn update_cached_height(&self, path: IndexPath, height: f64) -> bool {
        let (Some(row), Some(host)) = (self.shared.row_at(path), self.shared.host()) else {
            return false;
        };
        let width = host.content_width();
        match self.shared.heights.lock().as_mut() {
            Some(calculator) => {
                calculator.update_cached(&*row, path, width, height);
                true
            }
            None => false,
        }
    }

    /// Replaces the height calculator. `None` hands row sizing to the host.
    pub fn set_height_calculator(&self, calculator: Option<Box<dyn RowHeightCalculator>>) {
        *self.shared.heights.lock() = calculator;
    }

    /// Runs `f` with the height calculator, if there is one.
    pub fn with_height_calculator<R>(
        &self,
        f: impl FnOnce(&mut dyn RowHeightCalculator) -> R,
    ) -> Option<R> {
        let mut heights = self.shared.heights.lock();
        heights.as_mut().map(|calculator| f(&mut **calculator))
    }
}

fn row_ids(section: &Section) -> impl Iterator<Item = RowId> + '_ {
    section.rows().iter().map(|row| row.id())
}

impl fmt::Debug for TableDirector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableDirector")
            .field("sections", &self.shared.sections.read().len())
            .field("host_alive", &(self.shared.host.strong_count() > 0))
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(TableDirector: Send, Sync);
