//! Detection of macro definitions in raw template source

use regex::Regex;

/// Finds macro definitions in raw template source.
///
/// Detection is pattern matching over the host engine's concrete definition
/// syntax, not a parse. Swapping the pattern adapts the registry to another
/// host grammar without touching registry logic.
pub trait DefinitionDetector: Send + Sync + std::fmt::Debug {
    /// Names of the macros defined in `source`, in order of appearance
    fn detect(&self, source: &str) -> Vec<String>;
}

/// Regex-driven detector whose first capture group is the macro name
#[derive(Debug, Clone)]
pub struct PatternDetector {
    pattern: Regex,
}

impl PatternDetector {
    /// Detector for the host engine's native definition syntax,
    /// `{% macro name(...) %}`
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"\{% macro ([a-zA-Z_0-9]+)").unwrap(),
        }
    }

    /// Detector with a custom definition pattern
    pub fn with_pattern(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionDetector for PatternDetector {
    fn detect(&self, source: &str) -> Vec<String> {
        self.pattern
            .captures_iter(source)
            .map(|caps| caps[1].to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_macro_definitions_in_order() {
        let source = r#"
            {% macro panel(title) %}<div>{{ title }}</div>{% endmacro %}
            some text
            {% macro button(label) %}<button>{{ label }}</button>{% endmacro %}
        "#;
        let names = PatternDetector::new().detect(source);
        assert_eq!(names, vec!["panel", "button"]);
    }

    #[test]
    fn test_ignores_calls_and_other_blocks() {
        let source = "{{ panel(title=1) }} {% if x %}{% endif %}";
        assert!(PatternDetector::new().detect(source).is_empty());
    }

    #[test]
    fn test_custom_pattern() {
        let detector =
            PatternDetector::with_pattern(Regex::new(r"#define ([a-z_]+)").unwrap());
        assert_eq!(detector.detect("#define widget"), vec!["widget"]);
    }
}
