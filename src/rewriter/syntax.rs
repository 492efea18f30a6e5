//! Tag syntax definitions for the two author-facing macro tag styles

use regex::Regex;

/// Patterns and delimiters for one macro tag syntax.
///
/// A syntax is described by an opening pattern whose first capture group is
/// the macro name, the pair of delimiters that end an opening tag (block form
/// vs self-closing form), and the pattern for the closing block marker.
#[derive(Debug, Clone)]
pub struct TagSyntax {
    name: &'static str,
    open_tag: Regex,
    close_block: Regex,
    block_delimiter: &'static str,
    self_closing_delimiter: &'static str,
}

impl TagSyntax {
    /// The generic bracket syntax: `<{ name args }>` opens a block,
    /// `<{ name args /}>` is self-closing, `</{ name? }>` closes a block.
    pub fn jinja() -> Self {
        TagSyntax {
            name: "jinja",
            open_tag: Regex::new(r"<\{\s*([a-zA-Z_0-9]+)").unwrap(),
            close_block: Regex::new(r"</\{(\s*([a-zA-Z_0-9]+)\s*)?\}>").unwrap(),
            block_delimiter: "}>",
            self_closing_delimiter: "/}>",
        }
    }

    /// The HTML-element-like syntax: `<m:name args>` opens a block,
    /// `<m:name args />` is self-closing, `</m:name?>` closes a block.
    /// Hyphens are allowed in tag names and normalized to underscores.
    pub fn html() -> Self {
        TagSyntax {
            name: "html",
            open_tag: Regex::new(r"<m:([a-zA-Z_0-9\-]+)").unwrap(),
            close_block: Regex::new(r"</m:([a-zA-Z_0-9\-]+)?>").unwrap(),
            block_delimiter: ">",
            self_closing_delimiter: "/>",
        }
    }

    /// Syntax name for CLI selection and diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn open_tag(&self) -> &Regex {
        &self.open_tag
    }

    pub(crate) fn close_block(&self) -> &Regex {
        &self.close_block
    }

    pub(crate) fn block_delimiter(&self) -> &'static str {
        self.block_delimiter
    }

    /// Closing candidates in scan order. The block delimiter is listed first;
    /// the self-closing form still wins whenever it matches because it starts
    /// one byte earlier than the block delimiter embedded in it.
    pub(crate) fn closing_candidates(&self) -> [&'static str; 2] {
        [self.block_delimiter, self.self_closing_delimiter]
    }
}
