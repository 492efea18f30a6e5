//! Error types for tag rewriting

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors raised while rewriting macro tags into canonical instructions
#[derive(Error, Debug)]
pub enum RewriteError {
    /// An opened tag has no closing delimiter before end of input. This also
    /// covers an unterminated string literal inside the tag's argument text,
    /// which makes the delimiter scan fail.
    #[error("missing closing bracket for macro tag '{name}'")]
    MissingClosingBracket { name: String, span: Span },
}

impl RewriteError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            RewriteError::MissingClosingBracket { name, span } => {
                Report::build(ReportKind::Error, filename, span.start)
                    .with_message(format!("missing closing bracket for macro tag '{}'", name))
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message("this tag is never closed")
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf)
                    .unwrap();
            }
        }
        String::from_utf8(buf).unwrap()
    }

    /// The byte range of the offending tag
    pub fn span(&self) -> Span {
        match self {
            RewriteError::MissingClosingBracket { span, .. } => span.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_points_at_open_tag() {
        let source = "before <{ panel title=\"x\" and nothing closes it";
        let err = RewriteError::MissingClosingBracket {
            name: "panel".to_string(),
            span: 7..9,
        };
        let report = err.format(source, "page.html");
        assert!(report.contains("panel"));
        assert!(report.contains("page.html"));
    }

    #[test]
    fn test_display_names_the_macro() {
        let err = RewriteError::MissingClosingBracket {
            name: "button".to_string(),
            span: 0..4,
        };
        assert_eq!(
            err.to_string(),
            "missing closing bracket for macro tag 'button'"
        );
    }
}
