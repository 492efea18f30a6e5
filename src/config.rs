//! TOML configuration for macro discovery and preprocessing
//!
//! A config file selects which author syntaxes are active and describes
//! where macro-defining templates live, so a project can declare its macro
//! sources once instead of wiring loaders up in code.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::rewriter::TagSyntax;

/// Errors that can occur when loading or parsing a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A directory of macro-defining templates, optionally mounted under a
/// prefix
#[derive(Debug, Clone)]
pub struct DirectorySource {
    pub path: PathBuf,
    /// Mount prefix, so `widgets.html` registers as `<prefix>/widgets.html`
    pub prefix: Option<String>,
}

/// A single macro-defining template file
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
    /// Template name to publish the file under instead of its file name
    pub alias: Option<String>,
}

/// Preprocessor and macro discovery settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether the bracket author syntax is rewritten
    pub jinja_syntax: bool,
    /// Whether the HTML-style author syntax is rewritten
    pub html_syntax: bool,
    /// Directories scanned for macro definitions
    pub directories: Vec<DirectorySource>,
    /// Individual macro template files
    pub files: Vec<FileSource>,
    /// File extensions considered when scanning, without the leading dot
    pub extensions: Vec<String>,
    /// Whether later registrations replace earlier ones instead of erroring
    pub replace: bool,
    /// Macro name aliases: alias -> canonical name
    pub aliases: HashMap<String, String>,
}

/// TOML structure for deserializing configs
#[derive(Deserialize)]
struct TomlConfig {
    syntaxes: Option<TomlSyntaxes>,
    macros: Option<TomlMacros>,
}

#[derive(Deserialize)]
struct TomlSyntaxes {
    jinja: Option<bool>,
    html: Option<bool>,
}

#[derive(Deserialize)]
struct TomlMacros {
    extensions: Option<Vec<String>>,
    replace: Option<bool>,
    directories: Option<Vec<TomlDirectory>>,
    files: Option<Vec<TomlFile>>,
    aliases: Option<HashMap<String, String>>,
}

#[derive(Deserialize)]
struct TomlDirectory {
    path: PathBuf,
    prefix: Option<String>,
}

#[derive(Deserialize)]
struct TomlFile {
    path: PathBuf,
    alias: Option<String>,
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load config from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Config::default();

        if let Some(syntaxes) = parsed.syntaxes {
            if let Some(jinja) = syntaxes.jinja {
                config.jinja_syntax = jinja;
            }
            if let Some(html) = syntaxes.html {
                config.html_syntax = html;
            }
        }
        if let Some(macros) = parsed.macros {
            if let Some(extensions) = macros.extensions {
                config.extensions = extensions;
            }
            if let Some(replace) = macros.replace {
                config.replace = replace;
            }
            config.directories = macros
                .directories
                .unwrap_or_default()
                .into_iter()
                .map(|d| DirectorySource {
                    path: d.path,
                    prefix: d.prefix,
                })
                .collect();
            config.files = macros
                .files
                .unwrap_or_default()
                .into_iter()
                .map(|f| FileSource {
                    path: f.path,
                    alias: f.alias,
                })
                .collect();
            config.aliases = macros.aliases.unwrap_or_default();
        }

        Ok(config)
    }

    /// The tag syntaxes this config enables, in rewrite order
    pub fn syntaxes(&self) -> Vec<TagSyntax> {
        let mut syntaxes = Vec::new();
        if self.jinja_syntax {
            syntaxes.push(TagSyntax::jinja());
        }
        if self.html_syntax {
            syntaxes.push(TagSyntax::html());
        }
        syntaxes
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            jinja_syntax: true,
            html_syntax: true,
            directories: Vec::new(),
            files: Vec::new(),
            extensions: vec!["html".to_string()],
            replace: false,
            aliases: HashMap::new(),
        }
    }
}
