//! Filesystem-backed template loaders

use std::path::PathBuf;

use walkdir::WalkDir;

use crate::loader::{LoaderError, TemplateLoader};

/// Loads templates from a directory tree.
///
/// Template names are `/`-separated paths relative to the root. Empty
/// segments, `.`/`..` traversal, and backslashes are rejected as not found,
/// so a template name can never escape the root.
#[derive(Debug)]
pub struct FileSystemLoader {
    root: PathBuf,
}

impl FileSystemLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn safe_join(&self, name: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for piece in name.split('/') {
            if piece.is_empty() || piece == "." || piece == ".." || piece.contains('\\') {
                return None;
            }
            path.push(piece);
        }
        Some(path)
    }
}

impl TemplateLoader for FileSystemLoader {
    fn get_source(&self, name: &str) -> Result<String, LoaderError> {
        let path = self
            .safe_join(name)
            .filter(|path| path.is_file())
            .ok_or_else(|| LoaderError::not_found(name))?;
        std::fs::read_to_string(&path).map_err(|e| LoaderError::FileReadError {
            path,
            message: e.to_string(),
        })
    }

    /// Walks the root recursively. The returned list is sorted so
    /// registration order is deterministic.
    fn list_templates(&self) -> Option<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = match entry.path().strip_prefix(&self.root) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            let pieces: Option<Vec<&str>> = rel
                .components()
                .map(|c| c.as_os_str().to_str())
                .collect();
            if let Some(pieces) = pieces {
                names.push(pieces.join("/"));
            }
        }
        names.sort();
        Some(names)
    }
}

/// Exposes a single file under one or more alias names
#[derive(Debug)]
pub struct FileLoader {
    path: PathBuf,
    aliases: Vec<String>,
}

impl FileLoader {
    /// Expose `path` under its file name
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let alias = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Self {
            path,
            aliases: vec![alias],
        }
    }

    /// Expose `path` under the given alias names instead of its file name
    pub fn with_aliases(path: impl Into<PathBuf>, aliases: Vec<String>) -> Self {
        Self {
            path: path.into(),
            aliases,
        }
    }
}

impl TemplateLoader for FileLoader {
    fn get_source(&self, name: &str) -> Result<String, LoaderError> {
        if !self.aliases.iter().any(|alias| alias == name) {
            return Err(LoaderError::not_found(name));
        }
        std::fs::read_to_string(&self.path).map_err(|e| LoaderError::FileReadError {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn list_templates(&self) -> Option<Vec<String>> {
        Some(self.aliases.clone())
    }
}
