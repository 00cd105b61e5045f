//! Row height behaviour through the director.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{Measured, MeasuredCell, TestHost, WrappingCell, init_tracing, measured_row};
use horizon_table::model::{
    ActionKind, Cell, ConfigurableCell, ExpandableCell, ExpandableHeightCalculator, Expansion,
    IndexPath, IntoRow, RowHeight, RowUpdates, Section, TableRow,
};
use horizon_table::{DirectorConfig, HeightStrategy, TableDirector};

/// A badge whose payload may leave the line count unset.
#[derive(Default)]
struct BadgeCell {
    lines: usize,
}

impl Cell for BadgeCell {
    fn prepare_for_reuse(&mut self) {
        self.lines = 0;
    }

    fn fitting_height(&mut self, _width: f64) -> f64 {
        self.lines.max(1) as f64 * 20.0
    }
}

impl ConfigurableCell for BadgeCell {
    type Data = Option<usize>;

    fn configure(&mut self, lines: &Option<usize>) {
        if let Some(lines) = lines {
            self.lines = *lines;
        }
    }
}

struct Faq {
    answer_lines: usize,
    expansion: Expansion,
}

/// A question that shows its answer only when expanded.
#[derive(Default)]
struct FaqCell {
    answer_lines: usize,
    collapsed: bool,
}

impl Cell for FaqCell {
    fn prepare_for_reuse(&mut self) {
        self.answer_lines = 0;
        self.collapsed = false;
    }

    fn fitting_height(&mut self, _width: f64) -> f64 {
        let answer = if self.collapsed { 0 } else { self.answer_lines };
        44.0 + answer as f64 * 18.0
    }
}

impl ConfigurableCell for FaqCell {
    type Data = Faq;

    fn configure(&mut self, faq: &Faq) {
        self.answer_lines = faq.answer_lines;
    }
}

impl ExpandableCell for FaqCell {
    fn expansion(faq: &Faq) -> Option<&Expansion> {
        Some(&faq.expansion)
    }

    fn configure_appearance(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }
}

fn director_with(host: &Arc<TestHost>, strategy: HeightStrategy) -> TableDirector {
    TableDirector::with_config(host, DirectorConfig::default().with_height_strategy(strategy))
}

fn cached_len(director: &TableDirector) -> Option<usize> {
    director.with_height_calculator(|calculator| calculator.cached_len())
}

#[test]
fn measures_each_row_once_until_invalidated() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::new(&host);
    let (row, item) = measured_row("profile", 120.0);
    director.append_rows([row]);
    let path = IndexPath::new(0, 0);

    assert_eq!(director.height_for_row(path), RowHeight::Fixed(120.0));
    assert_eq!(director.height_for_row(path), RowHeight::Fixed(120.0));
    assert_eq!(item.count(), 1);

    director.invalidate_heights();
    assert_eq!(director.height_for_row(path), RowHeight::Fixed(120.0));
    assert_eq!(director.height_for_row(path), RowHeight::Fixed(120.0));
    assert_eq!(item.count(), 2);
}

#[test]
fn widths_are_cached_independently() {
    init_tracing();
    let host = TestHost::new(100.0);
    let director = TableDirector::new(&host);
    director.append_rows([TableRow::<WrappingCell>::new(
        "twenty-five characters!!!".to_string(),
    )]);
    let path = IndexPath::new(0, 0);

    let narrow = director.height_for_row(path);
    host.set_width(400.0);
    let wide = director.height_for_row(path);
    host.set_width(100.0);
    let narrow_again = director.height_for_row(path);

    assert_eq!(narrow, RowHeight::Fixed(66.0));
    assert_eq!(wide, RowHeight::Fixed(22.0));
    assert_eq!(narrow_again, narrow);
    assert_eq!(
        director.with_height_calculator(|calculator| calculator.cached_len()),
        Some(2)
    );
}

#[test]
fn height_precedence_override_then_fixed_then_measured() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::new(&host);

    let item = Measured::new("row", 120.0);
    let with_override = TableRow::<MeasuredCell>::new(item.clone())
        .with_default_height(50.0)
        .on_result(ActionKind::Height, |_| 70.0);
    let fixed_only = TableRow::<MeasuredCell>::new(item.clone()).with_default_height(50.0);
    let measured_only = TableRow::<MeasuredCell>::new(item.clone());

    director.append_rows([with_override, fixed_only, measured_only]);

    assert_eq!(director.height_for_row(IndexPath::new(0, 0)), RowHeight::Fixed(70.0));
    assert_eq!(director.height_for_row(IndexPath::new(0, 1)), RowHeight::Fixed(50.0));
    assert_eq!(director.height_for_row(IndexPath::new(0, 2)), RowHeight::Fixed(120.0));
    // Only the row without an override or fixed height was measured.
    assert_eq!(item.count(), 1);
}

#[test]
fn override_that_declines_falls_through() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::new(&host);
    let row = TableRow::<MeasuredCell>::new(Measured::new("row", 90.0))
        .on_value(ActionKind::Height, |_| None)
        .on(ActionKind::Height, |_| {});
    director.append_rows([row]);

    // Neither handler produced a height, so measurement decides.
    assert_eq!(director.height_for_row(IndexPath::new(0, 0)), RowHeight::Fixed(90.0));
}

#[test]
fn end_to_end_heights_with_single_measurement() {
    init_tracing();
    let host = TestHost::new(375.0);
    let director = TableDirector::new(&host);

    let section_a = Section::with_rows((0..3).map(|n| {
        TableRow::<MeasuredCell>::new(Measured::new(&format!("a{n}"), 999.0)).with_default_height(44.0)
    }));
    let (row_b, item_b) = measured_row("b", 80.0);
    director.append_sections([section_a, Section::with_rows([row_b])]);

    assert_eq!(host.render_heights(&director), vec![44.0, 44.0, 44.0, 80.0]);
    assert_eq!(host.render_heights(&director), vec![44.0, 44.0, 44.0, 80.0]);
    assert_eq!(item_b.count(), 1);
}

#[test]
fn separator_thickness_is_included() {
    init_tracing();
    let host = TestHost::new(320.0);
    host.set_separator(Some(0.5));
    let director = TableDirector::new(&host);
    director.append_rows([measured_row("row", 40.0).0]);

    assert_eq!(director.height_for_row(IndexPath::new(0, 0)), RowHeight::Fixed(40.5));
}

#[test]
fn cached_heights_follow_rows_when_reordered() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::new(&host);
    let (short, short_item) = measured_row("short", 30.0);
    let (tall, tall_item) = measured_row("tall", 90.0);
    director.append_rows([short, tall]);

    assert_eq!(host.render_heights(&director), vec![30.0, 90.0]);
    director
        .with_section_mut(0, |section| section.swap_rows(0, 1))
        .unwrap()
        .unwrap();
    assert_eq!(host.render_heights(&director), vec![90.0, 30.0]);

    assert_eq!(short_item.count(), 1);
    assert_eq!(tall_item.count(), 1);
}

#[test]
fn estimated_heights_never_measure() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::new(&host);
    let (plain, plain_item) = measured_row("plain", 60.0);
    director.append_rows([
        TableRow::<WrappingCell>::new("text".to_string()).into_row(),
        plain.with_estimated_height(0.0).into_row(),
    ]);

    assert_eq!(
        director.estimated_height_for_row(IndexPath::new(0, 0)),
        RowHeight::Fixed(44.0)
    );
    assert_eq!(
        director.estimated_height_for_row(IndexPath::new(0, 1)),
        RowHeight::Automatic
    );
    assert_eq!(plain_item.count(), 0);

    // Once measured, the estimate is the measured height.
    director.height_for_row(IndexPath::new(0, 1));
    assert_eq!(
        director.estimated_height_for_row(IndexPath::new(0, 1)),
        RowHeight::Fixed(60.0)
    );
}

#[test]
fn missing_template_reports_zero_height() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::with_config(
        &host,
        DirectorConfig::default().with_automatic_cell_registration(false),
    );
    director.append_rows([measured_row("row", 40.0).0]);

    assert_eq!(director.height_for_row(IndexPath::new(0, 0)), RowHeight::Fixed(0.0));
    assert!(director.cell_for_row(IndexPath::new(0, 0)).is_none());
    assert!(host.registrations.lock().is_empty());
}

#[test]
fn automatic_strategy_defers_to_host() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::with_config(&host, DirectorConfig::host_sized());
    let (row, item) = measured_row("row", 40.0);
    director.append_rows([row]);

    assert_eq!(director.height_for_row(IndexPath::new(0, 0)), RowHeight::Automatic);
    assert_eq!(item.count(), 0);
    assert!(!director.update_cached_height(IndexPath::new(0, 0), 10.0));
}

#[test]
fn expandable_rows_push_their_heights() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::with_config(
        &host,
        DirectorConfig::default().with_height_strategy(HeightStrategy::Expandable),
    );
    director.append_rows([measured_row("collapsed", 44.0).0]);
    let path = IndexPath::new(0, 0);

    assert_eq!(director.height_for_row(path), RowHeight::Fixed(44.0));
    assert!(director.update_cached_height(path, 160.0));
    assert_eq!(director.height_for_row(path), RowHeight::Fixed(160.0));
    assert_eq!(director.estimated_height_for_row(path), RowHeight::Fixed(160.0));
}

#[test]
fn calculator_can_be_swapped() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::new(&host);
    director.append_rows([measured_row("row", 44.0).0]);
    let path = IndexPath::new(0, 0);

    director.set_height_calculator(None);
    assert_eq!(director.height_for_row(path), RowHeight::Automatic);

    director.set_height_calculator(Some(Box::new(ExpandableHeightCalculator::new())));
    assert_eq!(director.height_for_row(path), RowHeight::Fixed(44.0));
}

#[test]
fn reload_keeps_cached_heights_by_default() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::new(&host);
    let (row, item) = measured_row("row", 44.0);
    director.append_rows([row]);
    let path = IndexPath::new(0, 0);

    director.height_for_row(path);
    director.reload().unwrap();
    director.reload().unwrap();
    director.height_for_row(path);
    assert_eq!(item.count(), 1);
    assert_eq!(host.reloads.load(Ordering::SeqCst), 2);
}

#[test]
fn reload_and_clear_invalidate_when_configured() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::with_config(
        &host,
        DirectorConfig::default()
            .with_invalidate_on_reload(true)
            .with_invalidate_on_clear(true),
    );
    let (row, item) = measured_row("row", 44.0);
    director.append_rows([row]);
    let path = IndexPath::new(0, 0);

    director.height_for_row(path);
    director.reload().unwrap();
    director.height_for_row(path);
    assert_eq!(item.count(), 2);

    director.clear();
    assert_eq!(cached_len(&director), Some(0));
}

#[test]
fn strategies_report_identical_heights() {
    init_tracing();
    for strategy in [HeightStrategy::Prototype, HeightStrategy::Expandable] {
        let host = TestHost::new(320.0);
        host.set_separator(Some(0.5));
        let director = director_with(&host, strategy);
        director.append_rows([
            TableRow::<BadgeCell>::new(Some(3)),
            TableRow::<BadgeCell>::new(None),
        ]);

        assert_eq!(
            director.height_for_row(IndexPath::new(0, 0)),
            RowHeight::Fixed(60.5),
            "{strategy:?}"
        );
        // The second row leaves the line count unset; nothing carries over
        // from the first row's measurement.
        assert_eq!(
            director.height_for_row(IndexPath::new(0, 1)),
            RowHeight::Fixed(20.5),
            "{strategy:?}"
        );
    }
}

#[test]
fn toggling_an_expandable_row_remeasures_it() {
    init_tracing();
    for strategy in [HeightStrategy::Prototype, HeightStrategy::Expandable] {
        let host = TestHost::new(320.0);
        let director = director_with(&host, strategy);
        let faq = Faq {
            answer_lines: 4,
            expansion: Expansion::collapsed(),
        };
        director.append_rows([TableRow::<FaqCell>::new(faq).expandable()]);
        let path = IndexPath::new(0, 0);

        let cell = host.display(&director, path).unwrap();
        let cell_collapsed = || cell.lock().downcast_ref::<FaqCell>().map(|c| c.collapsed);
        assert_eq!(cell_collapsed(), Some(true));
        assert_eq!(director.height_for_row(path), RowHeight::Fixed(44.0), "{strategy:?}");

        assert_eq!(director.toggle_expanded(path), Some(false));
        assert_eq!(cell_collapsed(), Some(false));
        assert_eq!(director.height_for_row(path), RowHeight::Fixed(116.0), "{strategy:?}");
        assert_eq!(*host.applied.lock(), vec![RowUpdates::default()]);

        assert_eq!(director.toggle_expanded(path), Some(true));
        assert_eq!(cell_collapsed(), Some(true));
        assert_eq!(director.height_for_row(path), RowHeight::Fixed(44.0), "{strategy:?}");
        assert_eq!(host.applied.lock().len(), 2);
    }
}

#[test]
fn toggling_requires_an_expandable_row() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::new(&host);
    let faq = Faq {
        answer_lines: 2,
        expansion: Expansion::collapsed(),
    };
    director.append_rows([TableRow::<FaqCell>::new(faq)]);

    assert_eq!(director.toggle_expanded(IndexPath::new(0, 0)), None);
    assert_eq!(director.toggle_expanded(IndexPath::new(3, 0)), None);
    assert!(host.applied.lock().is_empty());
}

#[test]
fn removed_rows_leave_the_height_cache() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::new(&host);
    director.append_rows([measured_row("kept", 30.0).0, measured_row("dropped", 40.0).0]);
    director.append_rows([measured_row("other", 50.0).0]);

    host.render_heights(&director);
    assert_eq!(cached_len(&director), Some(3));

    director
        .with_section_mut(0, |section| section.remove_row(1))
        .unwrap()
        .unwrap();
    assert_eq!(cached_len(&director), Some(2));

    director.remove_section(1).unwrap();
    assert_eq!(cached_len(&director), Some(1));

    director.clear();
    assert_eq!(cached_len(&director), Some(0));
}

#[test]
fn rows_still_listed_elsewhere_keep_their_height() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::new(&host);
    let (row, item) = measured_row("shared", 30.0);
    let shared = Arc::new(row);
    director.append_rows([shared.clone()]);
    director.append_rows([shared]);

    host.render_heights(&director);
    director.remove_section(0).unwrap();
    assert_eq!(cached_len(&director), Some(1));
    assert_eq!(director.height_for_row(IndexPath::new(0, 0)), RowHeight::Fixed(30.0));
    assert_eq!(item.count(), 1);
}

#[test]
fn host_gone_yields_automatic_heights() {
    init_tracing();
    let host = TestHost::new(320.0);
    let director = TableDirector::new(&host);
    director.append_rows([measured_row("row", 44.0).0]);
    drop(host);

    assert_eq!(director.height_for_row(IndexPath::new(0, 0)), RowHeight::Automatic);
    assert!(director.cell_for_row(IndexPath::new(0, 0)).is_none());
    assert_eq!(director.reload(), Err(horizon_table::TableError::HostUnavailable));
}
