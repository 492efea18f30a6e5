//! Macro tags for minijinja templates
//!
//! This library lets template authors call macros as component-style tags,
//! `<{ panel title="Hi" /}>` or `<m:panel title="Hi" />`, instead of writing
//! import-and-call boilerplate. Author tags are rewritten to canonical macro
//! instructions, and the instructions expand into native `{% from %}` imports
//! and call expressions against a registry of known macros.
//!
//! # Example
//!
//! ```rust
//! use minijinja_macro_tags::preprocess;
//!
//! let out = preprocess(r#"<{ panel title="Hi" /}>"#).unwrap();
//! assert_eq!(
//!     out,
//!     "{% load_macro panel %}\n{% macro_tag panel title=\"Hi\" %}"
//! );
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod expand;
pub mod loader;
pub mod macros;
pub mod rewriter;

pub use config::{Config, ConfigError, DirectorySource, FileSource};
pub use engine::{EngineError, MacroEnvironment};
pub use error::{RewriteError, Span};
pub use expand::Expander;
pub use loader::{
    ChoiceLoader, DictLoader, FileLoader, FileSystemLoader, LoaderError, MacroLoader,
    MacroNamespace, PrefixLoader, TemplateLoader, MACRO_NAMESPACE,
};
pub use macros::{DefinitionDetector, MacroRegistry, PatternDetector, RegistryError};
pub use rewriter::{preprocess_tags, rewrite_tags, TagMatch, TagSyntax};

/// Rewrite author macro tags in `source` to canonical instructions, with the
/// default syntaxes: the bracket style first, then the HTML style.
///
/// Canonical output is a fixed point, so preprocessing is safe to run on
/// already-preprocessed text.
///
/// # Example
///
/// ```rust
/// use minijinja_macro_tags::preprocess;
///
/// let out = preprocess(r#"<m:nav-bar />"#).unwrap();
/// assert_eq!(out, "{% load_macro nav_bar %}\n{% macro_tag nav_bar  %}");
/// ```
pub fn preprocess(source: &str) -> Result<String, RewriteError> {
    preprocess_with(source, &[TagSyntax::jinja(), TagSyntax::html()])
}

/// Rewrite author macro tags with an explicit syntax list, applied in order.
///
/// Each syntax pass that rewrites at least one tag prepends its own
/// `load_macro` line, so a source mixing syntaxes accumulates one line per
/// syntax.
pub fn preprocess_with(source: &str, syntaxes: &[TagSyntax]) -> Result<String, RewriteError> {
    let mut out = source.to_string();
    for syntax in syntaxes {
        out = preprocess_tags(&out, syntax)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_bracket_syntax() {
        let out = preprocess(r#"<{ button label="Go" /}>"#).expect("Should preprocess");
        assert_eq!(
            out,
            "{% load_macro button %}\n{% macro_tag button label=\"Go\" %}"
        );
    }

    #[test]
    fn test_preprocess_html_syntax() {
        let out = preprocess(r#"<m:button label="Go" />"#).expect("Should preprocess");
        assert_eq!(
            out,
            "{% load_macro button %}\n{% macro_tag button label=\"Go\" %}"
        );
    }

    #[test]
    fn test_preprocess_mixed_syntaxes_accumulate_load_lines() {
        let out = preprocess("<{ panel /}>\n<m:button />").expect("Should preprocess");
        assert_eq!(
            out,
            "{% load_macro button %}\n{% load_macro panel %}\n\
             {% macro_tag panel  %}\n{% macro_tag button  %}"
        );
    }

    #[test]
    fn test_preprocess_canonical_text_is_fixed_point() {
        let canonical = "{% load_macro panel %}\n{% macro_tag panel %}";
        let out = preprocess(canonical).expect("Should preprocess");
        assert_eq!(out, canonical);
    }

    #[test]
    fn test_preprocess_plain_text_untouched() {
        let source = "<div class=\"panel\">no tags here</div>";
        assert_eq!(preprocess(source).expect("Should preprocess"), source);
    }

    #[test]
    fn test_preprocess_unterminated_tag_error() {
        let err = preprocess(r#"<{ panel title="x"#).expect_err("Should fail");
        assert_eq!(err.span(), 0..8);
    }
}
