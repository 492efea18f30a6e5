//! Macro environment facade
//!
//! Ties the pieces together: a template loader (usually wrapped in the
//! macro namespace wrapper), the macro registry, the syntax rewriter, and
//! the instruction expander. An environment is configured up front, then
//! installed into a minijinja environment where it preprocesses every
//! template on load.

use std::path::Path;

use thiserror::Error;

use crate::config::Config;
use crate::error::RewriteError;
use crate::expand::Expander;
use crate::loader::{FileLoader, FileSystemLoader, LoaderError, MacroLoader, TemplateLoader};
use crate::macros::{MacroRegistry, RegistryError};
use crate::preprocess_with;
use crate::rewriter::TagSyntax;

/// Errors that can occur in the template preprocessing pipeline
#[derive(Debug, Error)]
pub enum EngineError {
    /// Error rewriting author tag syntax
    #[error("rewrite error: {0}")]
    Rewrite(#[from] RewriteError),

    /// Error registering macros
    #[error("registration error: {0}")]
    Registry(#[from] RegistryError),

    /// Error loading template source
    #[error("loader error: {0}")]
    Loader(#[from] LoaderError),
}

/// Configured macro system for one template environment.
///
/// Holds the loader templates are read from, the registry mapping macro
/// names to defining templates, and the active tag syntaxes. Registration
/// happens at configuration time; [`preprocess`](Self::preprocess),
/// [`expand`](Self::expand), and [`load_source`](Self::load_source) only
/// read the configured state.
#[derive(Debug)]
pub struct MacroEnvironment {
    loader: Box<dyn TemplateLoader>,
    registry: MacroRegistry,
    syntaxes: Vec<TagSyntax>,
    expander: Expander,
    extensions: Vec<String>,
}

impl MacroEnvironment {
    /// Wrap an application loader in the macro namespace wrapper.
    ///
    /// Application templates keep their names; macro source loaders mount
    /// under the private namespace.
    pub fn new(app_loader: Box<dyn TemplateLoader>) -> Self {
        Self::from_loader(Box::new(MacroLoader::new(app_loader)))
    }

    /// An environment with no application templates, only macro sources
    pub fn empty() -> Self {
        Self::from_loader(Box::new(MacroLoader::empty()))
    }

    /// Use `loader` as-is, without the macro namespace wrapper.
    ///
    /// Registering macro files, directories, or loaders fails with
    /// [`RegistryError::MissingMacroLoader`] unless the loader exposes the
    /// namespace itself.
    pub fn without_loader_wrapping(loader: Box<dyn TemplateLoader>) -> Self {
        Self::from_loader(loader)
    }

    fn from_loader(loader: Box<dyn TemplateLoader>) -> Self {
        Self {
            loader,
            registry: MacroRegistry::new(),
            syntaxes: vec![TagSyntax::jinja(), TagSyntax::html()],
            expander: Expander::new(),
            extensions: vec!["html".to_string()],
        }
    }

    /// Build an environment from a config, with no application loader
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        let mut env = Self::empty();
        env.apply_config(config)?;
        Ok(env)
    }

    /// Set the active tag syntaxes, in rewrite order
    pub fn with_syntaxes(mut self, syntaxes: Vec<TagSyntax>) -> Self {
        self.syntaxes = syntaxes;
        self
    }

    /// Set the file extensions considered when scanning loaders for macro
    /// definitions
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Apply syntax selection, macro sources, and aliases from a config
    pub fn apply_config(&mut self, config: &Config) -> Result<(), RegistryError> {
        self.syntaxes = config.syntaxes();
        self.extensions = config.extensions.clone();
        for dir in &config.directories {
            self.register_directory(&dir.path, dir.prefix.as_deref(), config.replace)?;
        }
        for file in &config.files {
            self.register_file(&file.path, file.alias.as_deref(), config.replace)?;
        }
        for (alias, name) in &config.aliases {
            self.alias(name, alias);
        }
        Ok(())
    }

    /// Register `name` as defined by `template`
    pub fn register(
        &mut self,
        name: &str,
        template: &str,
        replace: bool,
    ) -> Result<(), RegistryError> {
        self.registry.register(name, template, replace)
    }

    /// Register the macros defined by a template this environment can load
    pub fn register_from_template(
        &mut self,
        template: &str,
        replace: bool,
    ) -> Result<(), RegistryError> {
        self.registry
            .register_from_template(self.loader.as_ref(), template, replace)
    }

    /// Scan every template the loader can enumerate and register the macros
    /// of those matching the configured extensions
    pub fn register_from_environment(&mut self) -> Result<(), RegistryError> {
        let extensions: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        self.registry
            .register_from_environment(self.loader.as_ref(), &extensions)
    }

    /// Mount a macro source loader and register the macros of every
    /// template it exposes
    pub fn register_loader(
        &mut self,
        loader: Box<dyn TemplateLoader>,
        prefix: Option<&str>,
        replace: bool,
    ) -> Result<(), RegistryError> {
        self.registry
            .register_loader(self.loader.as_mut(), loader, prefix, replace)
    }

    /// Register a single macro template file, published under its file name
    /// or the given alias
    pub fn register_file(
        &mut self,
        path: &Path,
        alias: Option<&str>,
        replace: bool,
    ) -> Result<(), RegistryError> {
        let loader: Box<dyn TemplateLoader> = match alias {
            Some(alias) => Box::new(FileLoader::with_aliases(path, vec![alias.to_string()])),
            None => Box::new(FileLoader::new(path)),
        };
        self.register_loader(loader, None, replace)
    }

    /// Register a directory of macro templates, optionally mounted under a
    /// prefix
    pub fn register_directory(
        &mut self,
        path: &Path,
        prefix: Option<&str>,
        replace: bool,
    ) -> Result<(), RegistryError> {
        self.register_loader(Box::new(FileSystemLoader::new(path)), prefix, replace)
    }

    /// Record `alias` as an alternate name for `name`
    pub fn alias(&mut self, name: &str, alias: &str) {
        self.registry.alias(name, alias);
    }

    pub fn registry(&self) -> &MacroRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MacroRegistry {
        &mut self.registry
    }

    /// Rewrite author tag syntax in `source` to canonical instructions,
    /// applying each active syntax in order
    pub fn preprocess(&self, source: &str) -> Result<String, RewriteError> {
        preprocess_with(source, &self.syntaxes)
    }

    /// Expand canonical instructions in `source` into native template
    /// syntax
    pub fn expand(&self, source: &str) -> String {
        self.expander.expand(source, &self.registry)
    }

    /// Load a template and run it through the full pipeline: rewrite author
    /// syntax, then expand the canonical instructions
    pub fn load_source(&self, name: &str) -> Result<String, EngineError> {
        let source = self.loader.get_source(name)?;
        let canonical = self.preprocess(&source)?;
        Ok(self.expand(&canonical))
    }

    /// Install this environment as the template loader of a minijinja
    /// environment, so every template is preprocessed on load.
    ///
    /// Missing templates surface as minijinja's own not-found error; any
    /// other pipeline failure is attached as the error source.
    pub fn install(self, env: &mut minijinja::Environment<'_>) {
        env.set_loader(move |name| match self.load_source(name) {
            Ok(source) => Ok(Some(source)),
            Err(EngineError::Loader(LoaderError::TemplateNotFound { .. })) => Ok(None),
            Err(err) => Err(minijinja::Error::new(
                minijinja::ErrorKind::InvalidOperation,
                "macro preprocessing failed",
            )
            .with_source(err)),
        });
    }
}
