//! Horizon Table Contacts Example
//!
//! Drives a director against a console "list widget":
//! - Two sections with headers and fixed-height rows
//! - Rows measured once with a prototype cell, then served from cache
//! - A tap row, a selectable row, and a "favorite" action raised from a cell
//!
//! Run with: RUST_LOG=horizon_table=debug cargo run -p horizon-table --example contacts

use std::collections::HashMap;
use std::sync::Arc;

use horizon_table::model::{
    ActionKind, Cell, CellAction, CellHandle, CellTemplate, ConfigurableCell, FixedView,
    IndexPath, RowUpdates, Section, TableRow, same_cell,
};
use horizon_table::{CellProvider, ListHost, TableDirector};
use parking_lot::Mutex;

/// A contact shown in the list.
#[derive(Clone)]
struct Contact {
    name: String,
    bio: String,
}

/// Cell showing a name and a wrapped biography.
#[derive(Default)]
struct ContactCell {
    name: String,
    bio: String,
}

impl Cell for ContactCell {
    fn prepare_for_reuse(&mut self) {
        self.name.clear();
        self.bio.clear();
    }

    fn fitting_height(&mut self, width: f64) -> f64 {
        let chars_per_line = ((width - 32.0) / 8.0).max(1.0) as usize;
        let bio_lines = self.bio.len().div_ceil(chars_per_line).max(1);
        24.0 + bio_lines as f64 * 18.0
    }
}

impl ConfigurableCell for ContactCell {
    type Data = Contact;

    fn estimated_height() -> Option<f64> {
        Some(60.0)
    }

    fn configure(&mut self, data: &Contact) {
        self.name = data.name.clone();
        self.bio = data.bio.clone();
    }
}

/// Cell for a single line of text.
#[derive(Default)]
struct LinkCell {
    title: String,
}

impl Cell for LinkCell {
    fn fitting_height(&mut self, _width: f64) -> f64 {
        44.0
    }
}

impl ConfigurableCell for LinkCell {
    type Data = &'static str;

    fn default_height() -> Option<f64> {
        Some(44.0)
    }

    fn configure(&mut self, data: &&'static str) {
        self.title = data.to_string();
    }
}

/// A list widget that prints what it is asked to do.
struct ConsoleList {
    width: f64,
    templates: Mutex<HashMap<String, CellTemplate>>,
    on_screen: Mutex<Vec<(IndexPath, CellHandle)>>,
}

impl ConsoleList {
    fn new(width: f64) -> Arc<Self> {
        Arc::new(Self {
            width,
            templates: Mutex::new(HashMap::new()),
            on_screen: Mutex::new(Vec::new()),
        })
    }

    fn render(&self, director: &TableDirector) {
        self.on_screen.lock().clear();
        for section in 0..director.number_of_sections() {
            let title = director.title_for_header(section).unwrap_or_default();
            println!("== {title} (header {}pt)", director.height_for_header(section));
            for row in 0..director.number_of_rows(section) {
                let path = IndexPath::new(section, row);
                if let Some(cell) = director.cell_for_row(path) {
                    director.will_display(&cell, path);
                    self.on_screen.lock().push((path, cell));
                }
                println!("   {path} height {:?}", director.height_for_row(path));
            }
        }
    }
}

impl CellProvider for ConsoleList {
    fn dequeue_reusable_cell(&self, reuse_identifier: &str) -> Option<CellHandle> {
        self.templates
            .lock()
            .get(reuse_identifier)
            .map(CellTemplate::instantiate)
    }

    fn separator_thickness(&self) -> Option<f64> {
        Some(0.5)
    }
}

impl ListHost for ConsoleList {
    fn content_width(&self) -> f64 {
        self.width
    }

    fn register_template(&self, template: CellTemplate) {
        println!("registering {}", template.reuse_identifier());
        self.templates
            .lock()
            .insert(template.reuse_identifier().to_string(), template);
    }

    fn visible_cell(&self, path: IndexPath) -> Option<CellHandle> {
        self.on_screen
            .lock()
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, cell)| cell.clone())
    }

    fn index_path_for_cell(&self, cell: &CellHandle) -> Option<IndexPath> {
        self.on_screen
            .lock()
            .iter()
            .find(|(_, shown)| same_cell(shown, cell))
            .map(|(path, _)| *path)
    }

    fn deselect_row(&self, path: IndexPath, _animated: bool) {
        println!("deselecting {path}");
    }

    fn apply_updates(&self, updates: &RowUpdates) {
        println!("applying {updates:?}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let list = ConsoleList::new(375.0);
    let director = TableDirector::new(&list);

    let contacts = [
        Contact {
            name: "Ada".into(),
            bio: "Wrote the first published algorithm intended for a machine.".into(),
        },
        Contact {
            name: "Grace".into(),
            bio: "Built one of the first compilers and popularised machine-independent languages, among many other things.".into(),
        },
    ];

    let people = Section::with_rows(contacts.into_iter().map(|contact| {
        TableRow::<ContactCell>::new(contact)
            .on(ActionKind::Select, |options| println!("selected {}", options.item.name))
            .on_custom("favorite", |options| {
                println!("{} favorited from {}", options.item.name, options.index_path)
            })
    }))
    .with_titles(Some("People".to_string()), None)
    .with_views(Some(Arc::new(FixedView::new(28.0))), None);

    let links = Section::with_rows([
        TableRow::<LinkCell>::new("Settings").on(ActionKind::Click, |options| {
            println!("open {}", options.item)
        }),
        TableRow::<LinkCell>::new("About"),
    ])
    .with_titles(Some("More".to_string()), None);

    director.append_sections([people, links]);

    println!("-- first render");
    list.render(&director);
    println!("-- second render (heights served from cache)");
    list.render(&director);

    director.did_select_row(IndexPath::new(0, 1));
    director.did_select_row(IndexPath::new(1, 0));

    if let Some(cell) = list.visible_cell(IndexPath::new(0, 0)) {
        CellAction::new("favorite", cell).invoke(director.cell_action_bus());
    }

    let result = director.update_section(1, false, |section| {
        section.append_row(TableRow::<LinkCell>::new("Help"));
    });
    if let Err(err) = result {
        eprintln!("update failed: {err}");
    }
}
