//! Expansion of canonical macro instructions into native template syntax
//!
//! The host engine has no statement-parser plugin, so the canonical
//! instructions the preprocessor emits are compiled here as a second text
//! pass: `load_macro` becomes grouped `{% from %}` imports, `macro_tag`
//! becomes a call expression, and `call_macro_tag`/`endmacrotag` become a
//! `{% call %}` block.

pub mod signature;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;

use crate::macros::MacroRegistry;
use crate::rewriter::find_closing;
use signature::join_call_arguments;

/// Compiles canonical macro instructions into native import and call syntax,
/// resolving names through a registry.
///
/// Expansion is lenient: an instruction that does not parse as canonical
/// text is passed through verbatim so the host engine reports it. Names a
/// `load_macro` cannot resolve are skipped, deferring to the host engine's
/// undefined-name error at render time.
#[derive(Debug)]
pub struct Expander {
    instruction: Regex,
}

impl Expander {
    pub fn new() -> Self {
        Self {
            instruction: Regex::new(r"\{%\s*(load_macro|call_macro_tag|macro_tag|endmacrotag)\b")
                .unwrap(),
        }
    }

    /// Expand every canonical instruction in `source`
    pub fn expand(&self, source: &str, registry: &MacroRegistry) -> String {
        let mut out = String::with_capacity(source.len());
        let mut pos = 0;
        while let Some(caps) = self.instruction.captures_at(source, pos) {
            let whole = caps.get(0).unwrap();
            let keyword = caps.get(1).unwrap();
            // Instruction ends are located with the quote-aware scanner, so
            // `%}` inside an argument string literal is never the end.
            let Some((close_pos, _)) = find_closing(source, &["%}"], keyword.end()) else {
                // Unterminated instruction: pass its opener through and keep
                // scanning, so later instructions still expand.
                out.push_str(&source[pos..keyword.end()]);
                pos = keyword.end();
                continue;
            };
            let raw = source[keyword.end()..close_pos].trim();
            let expanded = match keyword.as_str() {
                "load_macro" => expand_load(raw, registry),
                "macro_tag" => expand_call(raw, registry, false),
                "call_macro_tag" => expand_call(raw, registry, true),
                "endmacrotag" if raw.is_empty() => Some("{% endcall %}".to_string()),
                _ => None,
            };
            out.push_str(&source[pos..whole.start()]);
            let end = close_pos + "%}".len();
            match expanded {
                Some(text) => out.push_str(&text),
                None => out.push_str(&source[whole.start()..end]),
            }
            pos = end;
        }
        out.push_str(&source[pos..]);
        out
    }
}

impl Default for Expander {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand a `load_macro` name list into one `{% from %}` import per defining
/// template, grouped in first-reference order
fn expand_load(raw: &str, registry: &MacroRegistry) -> Option<String> {
    let mut segments: Vec<&str> = raw.split(',').map(str::trim).collect();
    if segments.last() == Some(&"") {
        segments.pop();
    }
    if segments.is_empty() {
        return Some(String::new());
    }
    if !segments.iter().all(|s| is_identifier(s)) {
        return None;
    }

    let mut imports: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
    for name in segments {
        let Some((canonical, template)) = registry.resolve(name) else {
            continue;
        };
        imports.entry(template).or_default().insert(canonical);
    }

    let mut out = String::new();
    for (template, names) in &imports {
        let list = names.iter().copied().collect::<Vec<_>>().join(", ");
        out.push_str(&format!("{{% from \"{}\" import {} %}}", template, list));
    }
    Some(out)
}

/// Expand a call instruction body (`name` plus raw signature) into a call
/// expression or call block opener
fn expand_call(raw: &str, registry: &MacroRegistry, is_block: bool) -> Option<String> {
    let (name, args) = match raw.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (raw, ""),
    };
    if !is_identifier(name) {
        return None;
    }
    let call = format!("{}({})", registry.resolve_alias(name), join_call_arguments(args));
    Some(if is_block {
        format!("{{% call {} %}}", call)
    } else {
        format!("{{{{ {} }}}}", call)
    })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
