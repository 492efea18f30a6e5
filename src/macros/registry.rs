//! Macro name registry backing short-name resolution

use std::collections::HashMap;

use thiserror::Error;

use crate::loader::{LoaderError, TemplateLoader, MACRO_NAMESPACE};
use crate::macros::detector::{DefinitionDetector, PatternDetector};

/// Errors that can occur during macro registration
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Macro name already registered against a different template
    #[error("macro '{name}' is already declared in '{template}'")]
    Duplicate { name: String, template: String },

    /// Mounting macro loaders requires the application loader to be wrapped
    /// in one exposing the private macro namespace
    #[error("the macro system requires the application loader to be wrapped in a loader exposing the private macro namespace")]
    MissingMacroLoader,

    /// Loader failure while reading template source
    #[error(transparent)]
    Loader(#[from] LoaderError),
}

/// Registry mapping macro names to the templates that define them.
///
/// Two independent mappings compose through [`resolve`](Self::resolve):
/// aliases rewrite a name once (never chained), then the template map is
/// consulted. Populated at configuration time; rendering only reads it.
#[derive(Debug)]
pub struct MacroRegistry {
    templates: HashMap<String, String>,
    aliases: HashMap<String, String>,
    detector: Box<dyn DefinitionDetector>,
}

impl MacroRegistry {
    /// Registry with the default definition detector
    pub fn new() -> Self {
        Self::with_detector(Box::new(PatternDetector::new()))
    }

    /// Registry with a custom definition detector
    pub fn with_detector(detector: Box<dyn DefinitionDetector>) -> Self {
        Self {
            templates: HashMap::new(),
            aliases: HashMap::new(),
            detector,
        }
    }

    /// Register `name` as defined by `template`.
    ///
    /// Registering a name against a different template fails unless
    /// `replace` is set; re-registering the same pair is a no-op.
    pub fn register(&mut self, name: &str, template: &str, replace: bool) -> Result<(), RegistryError> {
        if !replace {
            if let Some(existing) = self.templates.get(name) {
                if existing != template {
                    return Err(RegistryError::Duplicate {
                        name: name.to_string(),
                        template: existing.clone(),
                    });
                }
                return Ok(());
            }
        }
        self.templates.insert(name.to_string(), template.to_string());
        Ok(())
    }

    /// Scan raw template source for macro definitions and register each
    pub fn register_from_source(
        &mut self,
        source: &str,
        template: &str,
        replace: bool,
    ) -> Result<(), RegistryError> {
        for name in self.detector.detect(source) {
            self.register(&name, template, replace)?;
        }
        Ok(())
    }

    /// Load a template through `loader` and register its macro definitions
    pub fn register_from_template(
        &mut self,
        loader: &dyn TemplateLoader,
        template: &str,
        replace: bool,
    ) -> Result<(), RegistryError> {
        let source = loader.get_source(template)?;
        self.register_from_source(&source, template, replace)
    }

    /// Register macros from every template `loader` can enumerate, filtered
    /// to the given file extensions (no filter when empty). A loader that
    /// cannot enumerate makes this a no-op.
    pub fn register_from_environment(
        &mut self,
        loader: &dyn TemplateLoader,
        extensions: &[&str],
    ) -> Result<(), RegistryError> {
        let Some(templates) = loader.list_templates() else {
            return Ok(());
        };
        for template in templates {
            let matches = extensions.is_empty()
                || matches!(template.rsplit_once('.'), Some((_, ext)) if extensions.contains(&ext));
            if matches {
                self.register_from_template(loader, &template, false)?;
            }
        }
        Ok(())
    }

    /// Mount `loader` into the host loader's private macro namespace and
    /// register the macros of every template it exposes, addressed under
    /// the namespace.
    pub fn register_loader(
        &mut self,
        host: &mut dyn TemplateLoader,
        loader: Box<dyn TemplateLoader>,
        prefix: Option<&str>,
        replace: bool,
    ) -> Result<(), RegistryError> {
        let namespace = host
            .macro_namespace()
            .ok_or(RegistryError::MissingMacroLoader)?;
        let mounted = namespace.mount(loader, prefix);
        for template in mounted {
            let addressed = format!("{}/{}", MACRO_NAMESPACE, template);
            self.register_from_template(host, &addressed, replace)?;
        }
        Ok(())
    }

    /// Record `alias` as an alternate name for `name`
    pub fn alias(&mut self, name: &str, alias: &str) {
        self.aliases.insert(alias.to_string(), name.to_string());
    }

    /// Resolve an alias to its canonical name; unknown names resolve to
    /// themselves. A single hop, never chained.
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// The template defining `name`, without alias resolution
    pub fn resolve_template(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    /// Resolve a name, alias first, to its canonical name and defining
    /// template
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<(&'a str, &'a str)> {
        let canonical = self.resolve_alias(name);
        let template = self.resolve_template(canonical)?;
        Some((canonical, template))
    }

    /// Whether `name` is a known macro name or alias
    pub fn exists(&self, name: &str) -> bool {
        self.aliases.contains_key(name) || self.templates.contains_key(name)
    }

    /// All registered macro names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

impl Default for MacroRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DictLoader;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = MacroRegistry::new();
        registry
            .register("panel", "widgets.html", false)
            .expect("Should register");
        assert_eq!(registry.resolve("panel"), Some(("panel", "widgets.html")));
        assert!(registry.exists("panel"));
    }

    #[test]
    fn test_duplicate_without_replace_fails() {
        let mut registry = MacroRegistry::new();
        registry
            .register("panel", "widgets.html", false)
            .expect("First register should succeed");
        let err = registry
            .register("panel", "other.html", false)
            .expect_err("Should fail");
        assert!(matches!(err, RegistryError::Duplicate { .. }));
        assert_eq!(
            err.to_string(),
            "macro 'panel' is already declared in 'widgets.html'"
        );
    }

    #[test]
    fn test_duplicate_with_replace_overwrites() {
        let mut registry = MacroRegistry::new();
        registry
            .register("panel", "widgets.html", false)
            .expect("Should register");
        registry
            .register("panel", "other.html", true)
            .expect("Replace should succeed");
        assert_eq!(registry.resolve("panel"), Some(("panel", "other.html")));
    }

    #[test]
    fn test_reregistering_same_pair_is_a_no_op() {
        let mut registry = MacroRegistry::new();
        registry
            .register("panel", "widgets.html", false)
            .expect("Should register");
        registry
            .register("panel", "widgets.html", false)
            .expect("Same pair should not conflict");
    }

    #[test]
    fn test_alias_resolution_is_single_hop() {
        let mut registry = MacroRegistry::new();
        registry.alias("button", "btn");
        assert_eq!(registry.resolve_alias("btn"), "button");
        assert_eq!(registry.resolve_alias("unknown"), "unknown");

        // An alias pointing at another alias resolves one level only.
        registry.alias("btn", "b");
        assert_eq!(registry.resolve_alias("b"), "btn");
    }

    #[test]
    fn test_resolve_through_alias() {
        let mut registry = MacroRegistry::new();
        registry
            .register("button", "widgets.html", false)
            .expect("Should register");
        registry.alias("button", "btn");
        assert_eq!(registry.resolve("btn"), Some(("button", "widgets.html")));
        assert!(registry.exists("btn"));
        assert_eq!(registry.resolve("missing"), None);
    }

    #[test]
    fn test_register_from_source_scans_definitions() {
        let mut registry = MacroRegistry::new();
        let source = r#"
            {% macro panel(title) %}{% endmacro %}
            {% macro button(label) %}{% endmacro %}
        "#;
        registry
            .register_from_source(source, "widgets.html", false)
            .expect("Should register");
        assert_eq!(registry.resolve("panel"), Some(("panel", "widgets.html")));
        assert_eq!(registry.resolve("button"), Some(("button", "widgets.html")));
    }

    #[test]
    fn test_register_from_template_uses_loader() {
        let loader = DictLoader::new()
            .with_template("widgets.html", "{% macro panel() %}{% endmacro %}");
        let mut registry = MacroRegistry::new();
        registry
            .register_from_template(&loader, "widgets.html", false)
            .expect("Should register");
        assert!(registry.exists("panel"));
    }

    #[test]
    fn test_register_from_template_missing_template() {
        let loader = DictLoader::new();
        let mut registry = MacroRegistry::new();
        let err = registry
            .register_from_template(&loader, "missing.html", false)
            .expect_err("Should fail");
        assert!(matches!(
            err,
            RegistryError::Loader(LoaderError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn test_register_from_environment_filters_extensions() {
        let loader = DictLoader::new()
            .with_template("widgets.html", "{% macro panel() %}{% endmacro %}")
            .with_template("readme.txt", "{% macro ignored() %}{% endmacro %}");
        let mut registry = MacroRegistry::new();
        registry
            .register_from_environment(&loader, &["html"])
            .expect("Should register");
        assert!(registry.exists("panel"));
        assert!(!registry.exists("ignored"));
    }

    #[test]
    fn test_register_from_environment_non_enumerable_is_no_op() {
        #[derive(Debug)]
        struct Opaque;
        impl TemplateLoader for Opaque {
            fn get_source(&self, name: &str) -> Result<String, LoaderError> {
                Err(LoaderError::not_found(name))
            }
        }
        let mut registry = MacroRegistry::new();
        registry
            .register_from_environment(&Opaque, &["html"])
            .expect("Should be a no-op");
        assert_eq!(registry.names().count(), 0);
    }

    #[test]
    fn test_register_loader_requires_namespace_capability() {
        let mut host = DictLoader::new();
        let macros = DictLoader::new()
            .with_template("widgets.html", "{% macro panel() %}{% endmacro %}");
        let mut registry = MacroRegistry::new();
        let err = registry
            .register_loader(&mut host, Box::new(macros), None, false)
            .expect_err("Should fail");
        assert!(matches!(err, RegistryError::MissingMacroLoader));
    }

    #[test]
    fn test_register_loader_addresses_under_namespace() {
        use crate::loader::MacroLoader;

        let mut host = MacroLoader::empty();
        let macros = DictLoader::new()
            .with_template("widgets.html", "{% macro panel() %}{% endmacro %}");
        let mut registry = MacroRegistry::new();
        registry
            .register_loader(&mut host, Box::new(macros), None, false)
            .expect("Should register");
        assert_eq!(
            registry.resolve("panel"),
            Some(("panel", "__macros__/widgets.html"))
        );
    }

    #[test]
    fn test_register_loader_with_prefix() {
        use crate::loader::MacroLoader;

        let mut host = MacroLoader::empty();
        let macros = DictLoader::new()
            .with_template("buttons.html", "{% macro button() %}{% endmacro %}");
        let mut registry = MacroRegistry::new();
        registry
            .register_loader(&mut host, Box::new(macros), Some("ui"), false)
            .expect("Should register");
        assert_eq!(
            registry.resolve("button"),
            Some(("button", "__macros__/ui/buttons.html"))
        );
    }

    #[test]
    fn test_custom_detector_swaps_pattern() {
        use crate::macros::detector::PatternDetector;
        use regex::Regex;

        let detector = PatternDetector::with_pattern(
            Regex::new(r"@def ([a-z_]+)").unwrap(),
        );
        let mut registry = MacroRegistry::with_detector(Box::new(detector));
        registry
            .register_from_source("@def chip", "chips.html", false)
            .expect("Should register");
        assert!(registry.exists("chip"));
    }
}
