//! Template source loaders and the private macro namespace
//!
//! Loaders resolve template identifiers to raw source text. Macro source
//! loaders are mounted under a reserved prefix so macro templates stay
//! isolated from the application's own template names.

use std::fmt::Debug;
use std::path::PathBuf;

use thiserror::Error;

pub mod composite;
pub mod filesystem;
pub mod memory;

pub use composite::{ChoiceLoader, MacroLoader, PrefixLoader};
pub use filesystem::{FileLoader, FileSystemLoader};
pub use memory::DictLoader;

/// Reserved prefix under which macro source loaders are mounted
pub const MACRO_NAMESPACE: &str = "__macros__";

/// Errors that can occur while loading template source
#[derive(Debug, Error)]
pub enum LoaderError {
    /// No loader knows the requested template
    #[error("template not found: {name}")]
    TemplateNotFound { name: String },

    /// Error reading template source from disk
    #[error("error reading template file {path}: {message}")]
    FileReadError { path: PathBuf, message: String },
}

impl LoaderError {
    pub(crate) fn not_found(name: &str) -> Self {
        LoaderError::TemplateNotFound {
            name: name.to_string(),
        }
    }
}

/// Resolves template identifiers to raw source text
pub trait TemplateLoader: Send + Sync + Debug {
    /// Load the raw source of the named template
    fn get_source(&self, name: &str) -> Result<String, LoaderError>;

    /// Enumerate every template this loader exposes, as sorted
    /// `/`-separated names. `None` means the loader cannot enumerate.
    fn list_templates(&self) -> Option<Vec<String>> {
        None
    }

    /// Access the private macro namespace when this loader hosts one.
    /// Mounting macro source loaders requires this capability.
    fn macro_namespace(&mut self) -> Option<&mut dyn MacroNamespace> {
        None
    }
}

/// Capability of hosting dynamically mounted macro source loaders under
/// [`MACRO_NAMESPACE`]
pub trait MacroNamespace {
    /// Mount `loader`, optionally nested under `prefix`. Returns the
    /// template names the loader exposes, relative to the namespace root
    /// (prefix included); loaders that cannot enumerate contribute none.
    fn mount(&mut self, loader: Box<dyn TemplateLoader>, prefix: Option<&str>) -> Vec<String>;
}
