//! Splitting raw tag argument text into call arguments

/// Split raw argument text into top-level expressions.
///
/// Expressions are separated by ASCII whitespace that sits outside string
/// literals and outside `()`/`[]`/`{}` nesting, so `title="a b"` or
/// `items=[1, 2]` stay single arguments. Quote escaping follows the same
/// single-backslash rule as tag scanning.
pub fn split_arguments(raw: &str) -> Vec<&str> {
    let bytes = raw.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut start: Option<usize> = None;

    for (i, &b) in bytes.iter().enumerate() {
        if let Some(q) = quote {
            if b == q && bytes[i - 1] != b'\\' {
                quote = None;
            }
            continue;
        }
        match b {
            b'\'' | b'"' => {
                start.get_or_insert(i);
                quote = Some(b);
            }
            b'(' | b'[' | b'{' => {
                start.get_or_insert(i);
                depth += 1;
            }
            b')' | b']' | b'}' => {
                start.get_or_insert(i);
                depth = depth.saturating_sub(1);
            }
            _ if b.is_ascii_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    parts.push(&raw[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        parts.push(&raw[s..]);
    }
    parts
}

/// Join top-level expressions with commas, turning a space-separated tag
/// signature into a call argument list
pub fn join_call_arguments(raw: &str) -> String {
    split_arguments(raw).join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_top_level_whitespace() {
        assert_eq!(split_arguments("a b c"), vec!["a", "b", "c"]);
        assert_eq!(split_arguments("  a   b  "), vec!["a", "b"]);
        assert!(split_arguments("").is_empty());
        assert!(split_arguments("   ").is_empty());
    }

    #[test]
    fn test_quoted_whitespace_stays_together() {
        assert_eq!(
            split_arguments(r#"title="test panel" width=2"#),
            vec![r#"title="test panel""#, "width=2"]
        );
        assert_eq!(split_arguments("a='x y'"), vec!["a='x y'"]);
    }

    #[test]
    fn test_bracketed_whitespace_stays_together() {
        assert_eq!(
            split_arguments("items=[1, 2, 3] size=(4, 5)"),
            vec!["items=[1, 2, 3]", "size=(4, 5)"]
        );
        assert_eq!(
            split_arguments(r#"opts={"a": 1, "b": 2}"#),
            vec![r#"opts={"a": 1, "b": 2}"#]
        );
    }

    #[test]
    fn test_escaped_quote_does_not_close_literal() {
        assert_eq!(
            split_arguments(r#"label="a \" b" x"#),
            vec![r#"label="a \" b""#, "x"]
        );
    }

    #[test]
    fn test_join_call_arguments() {
        assert_eq!(
            join_call_arguments(r#"type="button" class="btn btn-default""#),
            r#"type="button", class="btn btn-default""#
        );
        assert_eq!(join_call_arguments(""), "");
    }
}
