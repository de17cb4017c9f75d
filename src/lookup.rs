//! Lookup capability and stock adapters.
//!
//! The engine only ever asks one question: "what is the value for this
//! name?". Anything that can answer it implements [`PlaceholderLookup`].
//!
//! ```text
//! PlaceholderLookup
//!   ├─ Fn(&str) -> Option<String>
//!   ├─ HashMap<String, String> / BTreeMap<String, String>
//!   ├─ EnvLookup         (process environment)
//!   ├─ PropertiesLookup  (parsed `key=value` text)
//!   └─ ChainLookup       (ordered sources, first hit wins)
//! ```

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Maps a placeholder name to its value.
pub trait PlaceholderLookup {
    /// Return the value for `name`, or `None` when it is unknown.
    fn resolve_placeholder(&self, name: &str) -> Option<String>;
}

impl<F> PlaceholderLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self(name)
    }
}

impl<S: BuildHasher> PlaceholderLookup for HashMap<String, String, S> {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl PlaceholderLookup for BTreeMap<String, String> {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

// --- Environment -------------------------------------------------------------

/// Resolves names from the process environment.
///
/// With a prefix, `${port}` reads `{prefix}port`.
#[derive(Debug, Clone, Default)]
pub struct EnvLookup {
    prefix: Option<String>,
}

impl EnvLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: Some(prefix.into()) }
    }
}

impl PlaceholderLookup for EnvLookup {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        let var = match &self.prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        };
        // Names containing '=' or NUL would make `std::env::var` panic on
        // some platforms; they can never be set anyway.
        if var.is_empty() || var.contains(['=', '\0']) {
            return None;
        }
        std::env::var(var).ok()
    }
}

// --- Properties --------------------------------------------------------------

/// A flat key/value table parsed from `.properties`-style text.
///
/// Supported syntax:
///
/// - `key=value`, `key: value` and `key value`
/// - `#` and `!` comment lines, blank lines
/// - a trailing `\` joins the next line (leading whitespace dropped); comment
///   lines never continue
/// - a key with no separator maps to the empty string, a line starting with
///   a separator (`=x`) defines the empty key
/// - trailing whitespace in a value is kept
///
/// Later definitions override earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesLookup {
    entries: BTreeMap<String, String>,
}

impl PropertiesLookup {
    pub fn parse(source: &str) -> Self {
        let line_re = crate::regex!(r"^([^=:\s]*)(?:\s*[=:]\s*|\s+)?(.*)$");
        let mut entries = BTreeMap::new();

        for line in logical_lines(source) {
            let line = line.trim_start();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some(caps) = line_re.captures(line) else {
                continue;
            };
            let key = caps.get(1).map_or("", |m| m.as_str());
            let value = caps.get(2).map_or("", |m| m.as_str());
            entries.insert(key.to_string(), value.to_string());
        }

        Self { entries }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PlaceholderLookup for PropertiesLookup {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self.entries.get(name).cloned()
    }
}

/// Join physical lines ending in an odd number of backslashes. A comment
/// line is always a line of its own.
fn logical_lines(source: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pending: Option<String> = None;

    for raw in source.lines() {
        if pending.is_none() && raw.trim_start().starts_with(['#', '!']) {
            out.push(raw.to_string());
            continue;
        }
        let piece = match pending {
            Some(_) => raw.trim_start(),
            None => raw,
        };
        let trailing = piece.len() - piece.trim_end_matches('\\').len();
        let continues = trailing % 2 == 1;
        let piece = if continues { &piece[..piece.len() - 1] } else { piece };

        let mut line = pending.take().unwrap_or_default();
        line.push_str(piece);
        if continues {
            pending = Some(line);
        } else {
            out.push(line);
        }
    }
    if let Some(line) = pending {
        out.push(line);
    }
    out
}

// --- Chain -------------------------------------------------------------------

/// An ordered list of lookups; the first source that knows a name wins.
#[derive(Default)]
pub struct ChainLookup {
    sources: Vec<Box<dyn PlaceholderLookup + Send + Sync>>,
}

impl ChainLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source with lower precedence than those already present.
    pub fn push(&mut self, source: impl PlaceholderLookup + Send + Sync + 'static) {
        self.sources.push(Box::new(source));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, source: impl PlaceholderLookup + Send + Sync + 'static) -> Self {
        self.push(source);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for ChainLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainLookup").field("sources", &self.sources.len()).finish()
    }
}

impl PlaceholderLookup for ChainLookup {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.resolve_placeholder(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_and_maps_are_lookups() {
        let upper = |name: &str| Some(name.to_uppercase());
        assert_eq!(upper.resolve_placeholder("abc"), Some("ABC".to_string()));

        let map = crate::props! { "a" => "1" };
        assert_eq!(map.resolve_placeholder("a"), Some("1".to_string()));
        assert_eq!(map.resolve_placeholder("b"), None);

        let tree: BTreeMap<String, String> = BTreeMap::from([("k".to_string(), "v".to_string())]);
        assert_eq!(tree.resolve_placeholder("k"), Some("v".to_string()));
    }

    #[test]
    fn properties_parse_common_forms() {
        let props = PropertiesLookup::parse(
            "# comment\n\
             ! another\n\
             \n\
             a=1\n\
             b : two words  \n\
             c   spaced\n\
             bare\n\
             url=http://host:8080/x\n\
             a=override\n",
        );

        assert_eq!(props.get("a"), Some("override"));
        assert_eq!(props.get("b"), Some("two words  "));
        assert_eq!(props.get("c"), Some("spaced"));
        assert_eq!(props.get("bare"), Some(""));
        assert_eq!(props.get("url"), Some("http://host:8080/x"));
        assert_eq!(props.len(), 5);
    }

    #[test]
    fn properties_join_continuation_lines() {
        let props = PropertiesLookup::parse("list=a,\\\n    b,\\\n    c\nnext=x\n");
        assert_eq!(props.get("list"), Some("a,b,c"));
        assert_eq!(props.get("next"), Some("x"));
    }

    #[test]
    fn comment_ending_in_backslash_does_not_swallow_next_line() {
        let props = PropertiesLookup::parse("# path is C:\\dir\\\nkey=v\n! also\\\nother=w\n");
        assert_eq!(props.get("key"), Some("v"));
        assert_eq!(props.get("other"), Some("w"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn empty_key_and_trailing_whitespace_are_kept() {
        let props = PropertiesLookup::parse("=x\npadded = y \t\n");
        assert_eq!(props.get(""), Some("x"));
        assert_eq!(props.get("padded"), Some("y \t"));
    }

    #[test]
    fn escaped_backslash_does_not_continue() {
        let props = PropertiesLookup::parse("path=C:\\\\\nother=y\n");
        assert_eq!(props.get("path"), Some("C:\\\\"));
        assert_eq!(props.get("other"), Some("y"));
    }

    #[test]
    fn chain_prefers_earlier_sources() {
        let chain = ChainLookup::new()
            .with(crate::props! { "a" => "first" })
            .with(crate::props! { "a" => "second", "b" => "only-second" });

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.resolve_placeholder("a"), Some("first".to_string()));
        assert_eq!(chain.resolve_placeholder("b"), Some("only-second".to_string()));
        assert_eq!(chain.resolve_placeholder("c"), None);
    }

    #[test]
    fn env_lookup_rejects_impossible_names() {
        let env = EnvLookup::new();
        assert_eq!(env.resolve_placeholder(""), None);
        assert_eq!(env.resolve_placeholder("a=b"), None);
    }

    #[test]
    fn env_lookup_reads_path() {
        // PATH is set in every test environment we run in.
        let env = EnvLookup::new();
        assert_eq!(env.resolve_placeholder("PATH"), std::env::var("PATH").ok());
    }
}
