//! Resolver configuration.
//!
//! A [`PlaceholderResolver`] is nothing more than an immutable bundle of
//! markers and policies. All per-call state (the set of keys currently being
//! expanded, the optional trace) lives in `resolve.rs`, so a single resolver
//! can be shared freely between threads.
//!
//! ## Simple prefix
//!
//! Nested placeholders are balanced by counting a *simple prefix* rather than
//! the full prefix. For `${`/`}` the simple prefix is `{`, which lets
//! `${a{b}c}` close on the last `}` even though `{b}` is not a placeholder.
//! Only the three well-known bracket pairs get this treatment; any other
//! marker style balances on the full prefix.

use crate::PlaceholderError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Recursion limit applied unless [`PlaceholderResolver::with_max_depth`]
/// says otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 128;

static WELL_KNOWN_SIMPLE_PREFIXES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("}", "{"), ("]", "["), (")", "(")]));

/// Placeholder syntax and resolution policy.
///
/// # Example
/// ```
/// use placeholdr::PlaceholderResolver;
///
/// let resolver = PlaceholderResolver::with_options("${", "}", Some(":"), false).unwrap();
/// assert_eq!(resolver.simple_prefix(), "{");
/// assert_eq!(resolver.separator(), Some(":"));
/// assert!(!resolver.ignore_unresolvable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderResolver {
    prefix: String,
    suffix: String,
    simple_prefix: String,
    separator: Option<String>,
    ignore_unresolvable: bool,
    max_depth: Option<usize>,
}

impl PlaceholderResolver {
    /// Create a lenient resolver without a default-value separator.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Result<Self, PlaceholderError> {
        Self::with_options(prefix, suffix, None::<String>, true)
    }

    /// Create a resolver with every policy spelled out.
    ///
    /// Fails with [`PlaceholderError::InvalidConfig`] when `prefix` or
    /// `suffix` is empty. An empty separator is treated as no separator.
    pub fn with_options(
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        separator: Option<impl Into<String>>,
        ignore_unresolvable: bool,
    ) -> Result<Self, PlaceholderError> {
        let prefix = prefix.into();
        let suffix = suffix.into();
        if prefix.is_empty() {
            return Err(PlaceholderError::InvalidConfig { reason: "placeholder prefix must not be empty" });
        }
        if suffix.is_empty() {
            return Err(PlaceholderError::InvalidConfig { reason: "placeholder suffix must not be empty" });
        }

        let simple_prefix = derive_simple_prefix(&prefix, &suffix);
        let separator = separator.map(Into::into).filter(|s: &String| !s.is_empty());

        Ok(Self {
            prefix,
            suffix,
            simple_prefix,
            separator,
            ignore_unresolvable,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        })
    }

    /// `${name:default}` syntax, unresolvable placeholders left in place.
    pub fn spring_style() -> Self {
        Self {
            prefix: "${".to_string(),
            suffix: "}".to_string(),
            simple_prefix: "{".to_string(),
            separator: Some(":".to_string()),
            ignore_unresolvable: true,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }

    /// Same syntax as [`spring_style`](Self::spring_style), but unresolvable
    /// placeholders are an error.
    pub fn strict() -> Self {
        Self { ignore_unresolvable: false, ..Self::spring_style() }
    }

    /// Replace the recursion limit. `None` removes it entirely.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The token counted when balancing nested placeholders.
    pub fn simple_prefix(&self) -> &str {
        &self.simple_prefix
    }

    pub fn separator(&self) -> Option<&str> {
        self.separator.as_deref()
    }

    pub fn ignore_unresolvable(&self) -> bool {
        self.ignore_unresolvable
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}

impl Default for PlaceholderResolver {
    fn default() -> Self {
        Self::spring_style()
    }
}

fn derive_simple_prefix(prefix: &str, suffix: &str) -> String {
    match WELL_KNOWN_SIMPLE_PREFIXES.get(suffix) {
        Some(bracket) if prefix.ends_with(bracket) => (*bracket).to_string(),
        _ => prefix.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_prefix_uses_matching_bracket() {
        assert_eq!(PlaceholderResolver::new("${", "}").unwrap().simple_prefix(), "{");
        assert_eq!(PlaceholderResolver::new("$[", "]").unwrap().simple_prefix(), "[");
        assert_eq!(PlaceholderResolver::new("#(", ")").unwrap().simple_prefix(), "(");
    }

    #[test]
    fn simple_prefix_falls_back_to_full_prefix() {
        // Bracket suffix, but the prefix ends with a different bracket.
        assert_eq!(PlaceholderResolver::new("$(", "}").unwrap().simple_prefix(), "$(");
        assert_eq!(PlaceholderResolver::new("%", "%").unwrap().simple_prefix(), "%");
        assert_eq!(PlaceholderResolver::new("{{", "}}").unwrap().simple_prefix(), "{{");
    }

    #[test]
    fn empty_markers_are_rejected() {
        assert!(matches!(PlaceholderResolver::new("", "}"), Err(PlaceholderError::InvalidConfig { .. })));
        assert!(matches!(PlaceholderResolver::new("${", ""), Err(PlaceholderError::InvalidConfig { .. })));
    }

    #[test]
    fn defaults_are_lenient_without_separator() {
        let resolver = PlaceholderResolver::new("${", "}").unwrap();
        assert_eq!(resolver.separator(), None);
        assert!(resolver.ignore_unresolvable());
        assert_eq!(resolver.max_depth(), Some(DEFAULT_MAX_DEPTH));
    }

    #[test]
    fn empty_separator_means_none() {
        let resolver = PlaceholderResolver::with_options("${", "}", Some(""), true).unwrap();
        assert_eq!(resolver.separator(), None);
    }

    #[test]
    fn presets_match_explicit_construction() {
        let explicit = PlaceholderResolver::with_options("${", "}", Some(":"), true).unwrap();
        assert_eq!(PlaceholderResolver::spring_style(), explicit);
        assert!(!PlaceholderResolver::strict().ignore_unresolvable());
        assert_eq!(PlaceholderResolver::default(), explicit);
    }
}
