//! Automatic cell template registration.

use std::collections::HashSet;

use horizon_table_core::table_debug;

use crate::host::ListHost;
use crate::model::CellTemplate;

/// Remembers which reuse identifiers the host already knows about.
///
/// The first time an identifier is seen, the host is asked for a cell. If it
/// can already produce one (the application registered the template itself),
/// the identifier is only recorded. Otherwise the row's template is registered.
#[derive(Debug, Default)]
pub struct CellRegistrar {
    registered: HashSet<String>,
}

/// What [`CellRegistrar::register`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The identifier had been seen before.
    AlreadyKnown,
    /// The host could already dequeue the identifier.
    ProvidedByHost,
    /// The template was registered with the host.
    Registered,
}

impl CellRegistrar {
    /// Creates an empty registrar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures `host` can create cells for `template`'s reuse identifier.
    pub fn register(&mut self, template: CellTemplate, host: &dyn ListHost) -> Registration {
        let reuse_identifier = template.reuse_identifier();
        if self.registered.contains(reuse_identifier) {
            return Registration::AlreadyKnown;
        }

        let outcome = if host.dequeue_reusable_cell(reuse_identifier).is_some() {
            Registration::ProvidedByHost
        } else {
            Registration::Registered
        };
        self.registered.insert(reuse_identifier.to_string());
        table_debug!(reuse_identifier, ?outcome, "cell registration");

        if outcome == Registration::Registered {
            host.register_template(template);
        }
        outcome
    }

    /// Returns `true` if `reuse_identifier` has been handled.
    pub fn is_registered(&self, reuse_identifier: &str) -> bool {
        self.registered.contains(reuse_identifier)
    }

    /// Number of handled identifiers.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CellProvider;
    use crate::model::{Cell, CellHandle, IndexPath, cell_handle};
    use parking_lot::Mutex;
    use std::collections::HashMap;

    struct Plain;

    impl Cell for Plain {
        fn fitting_height(&mut self, _width: f64) -> f64 {
            44.0
        }
    }

    #[derive(Default)]
    struct Host {
        templates: Mutex<HashMap<String, CellTemplate>>,
        registrations: Mutex<Vec<String>>,
    }

    impl CellProvider for Host {
        fn dequeue_reusable_cell(&self, reuse_identifier: &str) -> Option<CellHandle> {
            self.templates
                .lock()
                .get(reuse_identifier)
                .map(CellTemplate::instantiate)
        }
    }

    impl ListHost for Host {
        fn content_width(&self) -> f64 {
            320.0
        }

        fn register_template(&self, template: CellTemplate) {
            self.registrations
                .lock()
                .push(template.reuse_identifier().to_string());
            self.templates
                .lock()
                .insert(template.reuse_identifier().to_string(), template);
        }

        fn index_path_for_cell(&self, _cell: &CellHandle) -> Option<IndexPath> {
            None
        }
    }

    fn template(id: &str) -> CellTemplate {
        CellTemplate::new(id, || cell_handle(Plain))
    }

    #[test]
    fn test_registers_once() {
        let host = Host::default();
        let mut registrar = CellRegistrar::new();

        assert_eq!(registrar.register(template("A"), &host), Registration::Registered);
        assert_eq!(registrar.register(template("A"), &host), Registration::AlreadyKnown);
        assert!(registrar.is_registered("A"));
        assert_eq!(*host.registrations.lock(), vec!["A".to_string()]);
    }

    #[test]
    fn test_host_provided_templates_are_only_recorded() {
        let host = Host::default();
        host.templates.lock().insert("B".into(), template("B"));
        let mut registrar = CellRegistrar::new();

        assert_eq!(registrar.register(template("B"), &host), Registration::ProvidedByHost);
        assert!(host.registrations.lock().is_empty());
        assert_eq!(registrar.len(), 1);
    }
}
