//! In-memory template loader

use std::collections::BTreeMap;

use crate::loader::{LoaderError, TemplateLoader};

/// Loads templates from an in-memory map.
///
/// Useful for embedded template sets and as the simplest loader to test
/// against. Enumeration order follows the sorted template names.
#[derive(Debug, Default)]
pub struct DictLoader {
    templates: BTreeMap<String, String>,
}

impl DictLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template source under `name`
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(name.into(), source.into());
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_template(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }
}

impl TemplateLoader for DictLoader {
    fn get_source(&self, name: &str) -> Result<String, LoaderError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| LoaderError::not_found(name))
    }

    fn list_templates(&self) -> Option<Vec<String>> {
        Some(self.templates.keys().cloned().collect())
    }
}
