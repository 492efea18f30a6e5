//! Rewriting of sugared macro tags into canonical call instructions

use indexmap::IndexSet;

use crate::error::{RewriteError, Span};
use crate::rewriter::scanner::find_closing;
use crate::rewriter::syntax::TagSyntax;

/// A single matched macro tag, produced transiently while rewriting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch<'a> {
    /// Macro name with hyphens normalized to underscores
    pub name: String,
    /// Byte range of the opening marker in the source
    pub span: Span,
    /// Raw argument text between the name and the closing delimiter,
    /// trimmed but otherwise unparsed
    pub args: &'a str,
    /// Whether the tag opened a block rather than self-closing
    pub is_block: bool,
}

impl TagMatch<'_> {
    /// The canonical call instruction this tag rewrites to
    pub fn instruction(&self) -> String {
        let keyword = if self.is_block {
            "call_macro_tag"
        } else {
            "macro_tag"
        };
        format!("{{% {} {} {} %}}", keyword, self.name, self.args)
    }
}

/// Rewrite every opening macro tag of `syntax` into its canonical call
/// instruction, collecting referenced macro names in first-reference order.
///
/// Argument text is carried over verbatim and never re-scanned for nested
/// tags; the host engine parses it later. A source without any opening tag
/// is returned unchanged, so canonical text passes through untouched.
pub fn rewrite_tags(
    source: &str,
    syntax: &TagSyntax,
) -> Result<(String, IndexSet<String>), RewriteError> {
    let mut referenced = IndexSet::new();
    let mut caps = match syntax.open_tag().captures(source) {
        Some(caps) => caps,
        None => return Ok((source.to_string(), referenced)),
    };

    let mut out = String::with_capacity(source.len() + 64);
    let mut pos = 0;
    loop {
        let open = caps.get(0).unwrap();
        let name = caps.get(1).unwrap().as_str().replace('-', "_");
        let args_start = open.end();

        let (close_pos, close) = find_closing(source, &syntax.closing_candidates(), args_start)
            .ok_or_else(|| RewriteError::MissingClosingBracket {
                name: name.clone(),
                span: open.range(),
            })?;

        let tag = TagMatch {
            name,
            span: open.range(),
            args: source[args_start..close_pos].trim(),
            is_block: close == syntax.block_delimiter(),
        };
        referenced.insert(tag.name.clone());

        out.push_str(&source[pos..tag.span.start]);
        out.push_str(&tag.instruction());
        pos = close_pos + close.len();

        caps = match syntax.open_tag().captures_at(source, pos) {
            Some(caps) => caps,
            None => break,
        };
    }
    out.push_str(&source[pos..]);
    Ok((out, referenced))
}

/// Preprocess one tag syntax: rewrite opening tags, replace closing block
/// markers with `{% endmacrotag %}`, and prepend a single `{% load_macro %}`
/// instruction listing every referenced name.
///
/// Closing markers are replaced wherever they occur; a name inside one is
/// informational and not validated against the opening tag.
pub fn preprocess_tags(source: &str, syntax: &TagSyntax) -> Result<String, RewriteError> {
    let (rewritten, referenced) = rewrite_tags(source, syntax)?;
    let closed = syntax
        .close_block()
        .replace_all(&rewritten, "{% endmacrotag %}");
    if referenced.is_empty() {
        return Ok(closed.into_owned());
    }
    let names = referenced
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("{{% load_macro {} %}}\n{}", names, closed))
}
