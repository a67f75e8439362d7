//! Regex utilities for gdgen
//! Extracted to a separate crate for compilation optimization

use once_cell::sync::Lazy;
use regex::Regex;

/// Debugger type-name patterns
pub mod type_pattern {
    use super::*;

    /// A type-name matcher with search semantics: the pattern may match
    /// anywhere in the name unless it is anchored.
    #[derive(Debug, Clone)]
    pub struct TypePattern {
        source: String,
        regex: Regex,
    }

    impl TypePattern {
        pub fn new(pattern: &str) -> Result<Self, regex::Error> {
            Ok(Self { source: pattern.to_string(), regex: Regex::new(pattern)? })
        }

        pub fn as_str(&self) -> &str {
            &self.source
        }

        pub fn matches(&self, type_name: &str) -> bool {
            self.regex.is_match(type_name)
        }
    }
}

/// Summary template tokens such as `${var.size.width}` or `${svar%#}`
pub mod summary_template {
    use super::*;

    pub static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\$\{(var|svar)((?:\.[A-Za-z_][A-Za-z0-9_]*)*)(?:%([s#]))?\}")
            .expect("Invalid regex pattern")
    });

    /// One piece of a parsed template
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Segment {
        /// Text copied to the output, with `\{` and `\}` unescaped
        Literal(String),
        /// A member of the value itself
        Var { path: Vec<String>, format: Option<char> },
        /// A property of the synthetic (provider-backed) value
        Synthetic { path: Vec<String>, format: Option<char> },
    }

    /// Split a template into literal text and substitution tokens
    pub fn parse(template: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in TOKEN_PATTERN.captures_iter(template) {
            let whole = caps.get(0).expect("capture 0 always present");
            if whole.start() > last {
                segments.push(Segment::Literal(unescape(&template[last..whole.start()])));
            }

            let path: Vec<String> = caps
                .get(2)
                .map(|m| m.as_str())
                .unwrap_or_default()
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            let format = caps.get(3).and_then(|m| m.as_str().chars().next());

            segments.push(match &caps[1] {
                "var" => Segment::Var { path, format },
                _ => Segment::Synthetic { path, format },
            });
            last = whole.end();
        }

        if last < template.len() {
            segments.push(Segment::Literal(unescape(&template[last..])));
        }

        segments
    }

    fn unescape(text: &str) -> String {
        text.replace("\\{", "{").replace("\\}", "}")
    }
}

/// Script encryption key validation
pub mod hex_key {
    use super::*;

    pub static KEY_PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{64}$").expect("Invalid regex pattern"));

    /// True for exactly 64 hexadecimal digits
    pub fn is_valid(key: &str) -> bool {
        KEY_PATTERN.is_match(key)
    }
}
