//! Shared fixtures for the integration tests: an in-memory list host and a
//! few cell types with observable measurement.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_table::model::{
    Cell, CellHandle, CellTemplate, ConfigurableCell, IndexPath, RowUpdates, TableRow, same_cell,
};
use horizon_table::{CellProvider, ListHost, TableDirector};
use parking_lot::Mutex;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Payload for [`MeasuredCell`]: the height the cell will report and a
/// counter of how often it was measured.
#[derive(Clone)]
pub struct Measured {
    pub title: String,
    pub height: f64,
    pub measurements: Arc<AtomicUsize>,
}

impl Measured {
    pub fn new(title: &str, height: f64) -> Self {
        Self {
            title: title.to_string(),
            height,
            measurements: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn count(&self) -> usize {
        self.measurements.load(Ordering::SeqCst)
    }
}

/// A cell whose layout pass reports the configured payload's height.
#[derive(Default)]
pub struct MeasuredCell {
    pub title: String,
    height: f64,
    counter: Option<Arc<AtomicUsize>>,
}

impl Cell for MeasuredCell {
    fn prepare_for_reuse(&mut self) {
        self.title.clear();
        self.height = 0.0;
        self.counter = None;
    }

    fn fitting_height(&mut self, _width: f64) -> f64 {
        if let Some(counter) = &self.counter {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        self.height
    }
}

impl ConfigurableCell for MeasuredCell {
    type Data = Measured;

    fn configure(&mut self, data: &Measured) {
        self.title = data.title.clone();
        self.height = data.height;
        self.counter = Some(data.measurements.clone());
    }
}

/// A cell whose height depends on the width it is laid out at.
#[derive(Default)]
pub struct WrappingCell {
    text: String,
}

impl Cell for WrappingCell {
    fn fitting_height(&mut self, width: f64) -> f64 {
        let per_line = ((width / 10.0) as usize).max(1);
        self.text.len().div_ceil(per_line).max(1) as f64 * 22.0
    }
}

impl ConfigurableCell for WrappingCell {
    type Data = String;

    fn estimated_height() -> Option<f64> {
        Some(44.0)
    }

    fn configure(&mut self, data: &String) {
        self.text = data.clone();
    }
}

pub fn measured_row(title: &str, height: f64) -> (TableRow<MeasuredCell>, Measured) {
    let item = Measured::new(title, height);
    (TableRow::new(item.clone()), item)
}

/// An in-memory list widget.
pub struct TestHost {
    width: Mutex<f64>,
    separator: Mutex<Option<f64>>,
    templates: Mutex<HashMap<String, CellTemplate>>,
    pub registrations: Mutex<Vec<String>>,
    displayed: Mutex<Vec<(IndexPath, CellHandle)>>,
    pub deselected: Mutex<Vec<IndexPath>>,
    pub applied: Mutex<Vec<RowUpdates>>,
    pub reloads: AtomicUsize,
}

impl TestHost {
    pub fn new(width: f64) -> Arc<Self> {
        Arc::new(Self {
            width: Mutex::new(width),
            separator: Mutex::new(None),
            templates: Mutex::new(HashMap::new()),
            registrations: Mutex::new(Vec::new()),
            displayed: Mutex::new(Vec::new()),
            deselected: Mutex::new(Vec::new()),
            applied: Mutex::new(Vec::new()),
            reloads: AtomicUsize::new(0),
        })
    }

    pub fn set_width(&self, width: f64) {
        *self.width.lock() = width;
    }

    pub fn set_separator(&self, thickness: Option<f64>) {
        *self.separator.lock() = thickness;
    }

    /// Registers a template the way an application would, bypassing the director.
    pub fn preregister(&self, template: CellTemplate) {
        self.templates
            .lock()
            .insert(template.reuse_identifier().to_string(), template);
    }

    /// Renders the row at `path` and remembers the cell as displayed there.
    pub fn display(&self, director: &TableDirector, path: IndexPath) -> Option<CellHandle> {
        let cell = director.cell_for_row(path)?;
        let mut displayed = self.displayed.lock();
        displayed.retain(|(p, _)| *p != path);
        displayed.push((path, cell.clone()));
        Some(cell)
    }

    /// Renders every row and returns the reported heights in row order.
    pub fn render_heights(&self, director: &TableDirector) -> Vec<f64> {
        let mut heights = Vec::new();
        for section in 0..director.number_of_sections() {
            for row in 0..director.number_of_rows(section) {
                let path = IndexPath::new(section, row);
                self.display(director, path);
                heights.push(director.height_for_row(path).value_or(-1.0));
            }
        }
        heights
    }
}

impl CellProvider for TestHost {
    fn dequeue_reusable_cell(&self, reuse_identifier: &str) -> Option<CellHandle> {
        self.templates
            .lock()
            .get(reuse_identifier)
            .map(CellTemplate::instantiate)
    }

    fn separator_thickness(&self) -> Option<f64> {
        *self.separator.lock()
    }
}

impl ListHost for TestHost {
    fn content_width(&self) -> f64 {
        *self.width.lock()
    }

    fn register_template(&self, template: CellTemplate) {
        self.registrations
            .lock()
            .push(template.reuse_identifier().to_string());
        self.preregister(template);
    }

    fn visible_cell(&self, path: IndexPath) -> Option<CellHandle> {
        self.displayed
            .lock()
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, cell)| cell.clone())
    }

    fn index_path_for_cell(&self, cell: &CellHandle) -> Option<IndexPath> {
        self.displayed
            .lock()
            .iter()
            .find(|(_, displayed)| same_cell(displayed, cell))
            .map(|(path, _)| *path)
    }

    fn deselect_row(&self, path: IndexPath, _animated: bool) {
        self.deselected.lock().push(path);
    }

    fn reload_data(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }

    fn apply_updates(&self, updates: &RowUpdates) {
        self.applied.lock().push(updates.clone());
    }
}
