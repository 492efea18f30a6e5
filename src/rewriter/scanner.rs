//! Quote-aware scanning for tag closing delimiters

/// Find the earliest occurrence of any candidate delimiter at or after `start`.
///
/// Ties between candidates at the same position resolve to the first candidate
/// in list order. Offsets are byte positions; all delimiters are ASCII.
pub fn find_next<'a>(
    source: &str,
    candidates: &[&'a str],
    start: usize,
) -> Option<(usize, &'a str)> {
    let mut best: Option<(usize, &'a str)> = None;
    for &candidate in candidates {
        if let Some(rel) = source[start..].find(candidate) {
            let pos = start + rel;
            if best.map_or(true, |(best_pos, _)| pos < best_pos) {
                best = Some((pos, candidate));
            }
        }
    }
    best
}

/// Find the closing delimiter of a tag, treating quoted string literals as
/// opaque.
///
/// From `start`, the earliest candidate delimiter wins unless a single- or
/// double-quoted literal opens before it. The literal is skipped wholesale
/// (a quote preceded by a backslash does not close it) and the search resumes
/// just after its closing quote. Returns `None` when no candidate occurs
/// outside a literal, or when a literal never terminates.
pub fn find_closing<'a>(
    source: &str,
    candidates: &[&'a str],
    start: usize,
) -> Option<(usize, &'a str)> {
    let mut pos = start;
    loop {
        let (close_pos, close) = find_next(source, candidates, pos)?;
        match find_next(source, &["'", "\""], pos) {
            Some((quote_pos, quote)) if quote_pos < close_pos => {
                pos = skip_string_literal(source, quote, quote_pos + 1)?;
            }
            _ => return Some((close_pos, close)),
        }
    }
}

/// Scan past a string literal opened by `quote`, returning the offset just
/// after the closing quote.
fn skip_string_literal(source: &str, quote: &str, mut pos: usize) -> Option<usize> {
    loop {
        let rel = source[pos..].find(quote)?;
        let close = pos + rel;
        if source.as_bytes()[close - 1] == b'\\' {
            // escaped quote, keep scanning
            pos = close + 1;
        } else {
            return Some(close + 1);
        }
    }
}
