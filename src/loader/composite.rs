//! Composite loaders: ordered fallback, prefix routing, and the macro
//! namespace wrapper

use std::collections::BTreeMap;

use crate::loader::{LoaderError, MacroNamespace, TemplateLoader, MACRO_NAMESPACE};

/// Tries each loader in order; the first that finds the template wins.
/// Only not-found falls through to the next loader, read errors propagate.
#[derive(Debug, Default)]
pub struct ChoiceLoader {
    loaders: Vec<Box<dyn TemplateLoader>>,
}

impl ChoiceLoader {
    pub fn new(loaders: Vec<Box<dyn TemplateLoader>>) -> Self {
        Self { loaders }
    }

    pub fn push(&mut self, loader: Box<dyn TemplateLoader>) {
        self.loaders.push(loader);
    }
}

impl TemplateLoader for ChoiceLoader {
    fn get_source(&self, name: &str) -> Result<String, LoaderError> {
        for loader in &self.loaders {
            match loader.get_source(name) {
                Err(LoaderError::TemplateNotFound { .. }) => continue,
                other => return other,
            }
        }
        Err(LoaderError::not_found(name))
    }

    /// Enumerable only when every member loader is
    fn list_templates(&self) -> Option<Vec<String>> {
        let mut names = Vec::new();
        for loader in &self.loaders {
            names.extend(loader.list_templates()?);
        }
        names.sort();
        names.dedup();
        Some(names)
    }
}

/// Routes `prefix/rest` template names to the loader mounted at `prefix`
#[derive(Debug, Default)]
pub struct PrefixLoader {
    mounts: BTreeMap<String, Box<dyn TemplateLoader>>,
}

impl PrefixLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, prefix: impl Into<String>, loader: Box<dyn TemplateLoader>) {
        self.mounts.insert(prefix.into(), loader);
    }
}

impl TemplateLoader for PrefixLoader {
    fn get_source(&self, name: &str) -> Result<String, LoaderError> {
        let (prefix, rest) = name.split_once('/').ok_or_else(|| LoaderError::not_found(name))?;
        let loader = self.mounts.get(prefix).ok_or_else(|| LoaderError::not_found(name))?;
        loader.get_source(rest).map_err(|e| match e {
            // report the full requested name, not the routed remainder
            LoaderError::TemplateNotFound { .. } => LoaderError::not_found(name),
            other => other,
        })
    }

    fn list_templates(&self) -> Option<Vec<String>> {
        let mut names = Vec::new();
        for (prefix, loader) in &self.mounts {
            for name in loader.list_templates()? {
                names.push(format!("{}/{}", prefix, name));
            }
        }
        Some(names)
    }
}

/// Wraps the application loader and adds the private macro namespace.
///
/// Application templates are consulted first; names under `__macros__/` are
/// routed to the mounted macro source loaders. This wrapper is what gives a
/// registry somewhere to mount loaders, so environments configured without
/// it cannot register macro files or directories.
#[derive(Debug)]
pub struct MacroLoader {
    app: Option<Box<dyn TemplateLoader>>,
    macros: ChoiceLoader,
}

impl MacroLoader {
    /// Wrap an application loader
    pub fn new(app: Box<dyn TemplateLoader>) -> Self {
        Self {
            app: Some(app),
            macros: ChoiceLoader::default(),
        }
    }

    /// A macro-only loader with no application templates
    pub fn empty() -> Self {
        Self {
            app: None,
            macros: ChoiceLoader::default(),
        }
    }
}

impl TemplateLoader for MacroLoader {
    fn get_source(&self, name: &str) -> Result<String, LoaderError> {
        if let Some(app) = &self.app {
            match app.get_source(name) {
                Err(LoaderError::TemplateNotFound { .. }) => {}
                other => return other,
            }
        }
        let rest = name
            .strip_prefix(MACRO_NAMESPACE)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| LoaderError::not_found(name))?;
        self.macros.get_source(rest).map_err(|e| match e {
            LoaderError::TemplateNotFound { .. } => LoaderError::not_found(name),
            other => other,
        })
    }

    fn list_templates(&self) -> Option<Vec<String>> {
        let mut names = match &self.app {
            Some(app) => app.list_templates()?,
            None => Vec::new(),
        };
        names.extend(
            self.macros
                .list_templates()?
                .into_iter()
                .map(|name| format!("{}/{}", MACRO_NAMESPACE, name)),
        );
        names.sort();
        names.dedup();
        Some(names)
    }

    fn macro_namespace(&mut self) -> Option<&mut dyn MacroNamespace> {
        Some(self)
    }
}

impl MacroNamespace for MacroLoader {
    fn mount(&mut self, loader: Box<dyn TemplateLoader>, prefix: Option<&str>) -> Vec<String> {
        let names = loader.list_templates().unwrap_or_default();
        match prefix {
            Some(prefix) => {
                let names = names
                    .into_iter()
                    .map(|name| format!("{}/{}", prefix, name))
                    .collect();
                let mut routed = PrefixLoader::new();
                routed.mount(prefix, loader);
                self.macros.push(Box::new(routed));
                names
            }
            None => {
                self.macros.push(loader);
                names
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DictLoader;

    fn dict(pairs: &[(&str, &str)]) -> Box<dyn TemplateLoader> {
        let mut loader = DictLoader::new();
        for (name, source) in pairs {
            loader.insert(*name, *source);
        }
        Box::new(loader)
    }

    #[test]
    fn test_choice_loader_first_match_wins() {
        let loader = ChoiceLoader::new(vec![
            dict(&[("a.html", "first")]),
            dict(&[("a.html", "second"), ("b.html", "other")]),
        ]);
        assert_eq!(loader.get_source("a.html").expect("Should load"), "first");
        assert_eq!(loader.get_source("b.html").expect("Should load"), "other");
        assert!(matches!(
            loader.get_source("c.html"),
            Err(LoaderError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn test_prefix_loader_routes_and_reports_full_name() {
        let mut loader = PrefixLoader::new();
        loader.mount("ui", dict(&[("widgets.html", "w")]));
        assert_eq!(loader.get_source("ui/widgets.html").expect("Should load"), "w");
        let err = loader.get_source("ui/missing.html").expect_err("Should fail");
        let LoaderError::TemplateNotFound { name } = err else {
            panic!("expected not found, got {err:?}");
        };
        assert_eq!(name, "ui/missing.html");
    }

    #[test]
    fn test_prefix_loader_lists_prefixed_names() {
        let mut loader = PrefixLoader::new();
        loader.mount("ui", dict(&[("widgets.html", "w")]));
        assert_eq!(
            loader.list_templates(),
            Some(vec!["ui/widgets.html".to_string()])
        );
    }

    #[test]
    fn test_macro_loader_app_templates_first() {
        let mut loader = MacroLoader::new(dict(&[("page.html", "app page")]));
        loader.mount(dict(&[("widgets.html", "macros")]), None);
        assert_eq!(loader.get_source("page.html").expect("Should load"), "app page");
        assert_eq!(
            loader
                .get_source("__macros__/widgets.html")
                .expect("Should load"),
            "macros"
        );
        assert!(matches!(
            loader.get_source("widgets.html"),
            Err(LoaderError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn test_macro_loader_mount_returns_exposed_names() {
        let mut loader = MacroLoader::empty();
        let names = loader.mount(dict(&[("widgets.html", "w")]), None);
        assert_eq!(names, vec!["widgets.html".to_string()]);
        let names = loader.mount(dict(&[("buttons.html", "b")]), Some("ui"));
        assert_eq!(names, vec!["ui/buttons.html".to_string()]);
        assert_eq!(
            loader
                .get_source("__macros__/ui/buttons.html")
                .expect("Should load"),
            "b"
        );
    }

    #[test]
    fn test_macro_loader_lists_namespaced_names() {
        let mut loader = MacroLoader::new(dict(&[("page.html", "p")]));
        loader.mount(dict(&[("widgets.html", "w")]), None);
        assert_eq!(
            loader.list_templates(),
            Some(vec![
                "__macros__/widgets.html".to_string(),
                "page.html".to_string(),
            ])
        );
    }

    #[test]
    fn test_macro_loader_exposes_namespace_capability() {
        let mut wrapped = MacroLoader::empty();
        assert!(wrapped.macro_namespace().is_some());

        let mut plain = DictLoader::new();
        plain.insert("a.html", "a");
        assert!(plain.macro_namespace().is_none());
    }
}
