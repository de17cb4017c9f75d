//! Recursive placeholder substitution.
//!
//! One [`Resolution`] is created per top-level call. It owns the set of raw
//! keys currently being expanded, which is what turns `a -> ${a}` into a
//! [`PlaceholderError::CircularReference`] instead of a stack overflow.
//!
//! ```text
//! text ── find prefix ── find_placeholder_end ── raw key
//!                                                  │
//!              visited.insert(raw key) ◀───────────┘
//!                         │
//!               parse(raw key)  ──▶ expanded key
//!                         │
//!          lookup(expanded key) ─┬─ hit ─────────────┐
//!                                └─ miss ─ separator?│
//!                                     lookup(actual) │
//!                                     or default ────┤
//!                                                    v
//!                                          parse(value) ── splice
//!                         │
//!               visited.remove(raw key)
//! ```
//!
//! Failure anywhere aborts the whole call, so the half-built string is simply
//! dropped.

use super::config::PlaceholderResolver;
use super::metrics::{Outcome, PlaceholderEvent, ResolutionMetrics};
use super::scan::{find_from, find_placeholder_end};
use crate::{PlaceholderError, PlaceholderLookup};
use std::collections::HashSet;

pub(crate) struct Resolution<'a, L: ?Sized> {
    resolver: &'a PlaceholderResolver,
    lookup: &'a L,
    visited: HashSet<String>,
    metrics: ResolutionMetrics,
    events: Option<Vec<PlaceholderEvent>>,
}

impl<'a, L> Resolution<'a, L>
where
    L: PlaceholderLookup + ?Sized,
{
    pub(crate) fn new(resolver: &'a PlaceholderResolver, lookup: &'a L) -> Self {
        Self { resolver, lookup, visited: HashSet::new(), metrics: ResolutionMetrics::default(), events: None }
    }

    /// Keep a per-placeholder trace while resolving.
    pub(crate) fn traced(mut self) -> Self {
        self.events = Some(Vec::new());
        self
    }

    pub(crate) fn run(&mut self, text: &str) -> Result<String, PlaceholderError> {
        self.parse(text, 0)
    }

    pub(crate) fn into_parts(self) -> (ResolutionMetrics, Vec<PlaceholderEvent>) {
        (self.metrics, self.events.unwrap_or_default())
    }

    fn parse(&mut self, value: &str, depth: usize) -> Result<String, PlaceholderError> {
        let resolver = self.resolver;
        let prefix = resolver.prefix();
        let suffix = resolver.suffix();

        let Some(first) = value.find(prefix) else {
            return Ok(value.to_string());
        };
        if let Some(max_depth) = resolver.max_depth().filter(|max| depth > *max) {
            return Err(PlaceholderError::MaxDepthExceeded { max_depth });
        }

        let mut result = value.to_string();
        let mut start = Some(first);

        while let Some(start_index) = start {
            let Some(end_index) = find_placeholder_end(resolver, &result, start_index) else {
                // Unclosed: the prefix is literal text.
                start = find_from(&result, prefix, start_index + prefix.len());
                continue;
            };

            let original = result[start_index + prefix.len()..end_index].to_string();
            if !self.visited.insert(original.clone()) {
                return Err(PlaceholderError::CircularReference { key: original });
            }

            let mut outcome = Outcome::empty();
            let key = self.parse(&original, depth + 1)?;
            if key != original {
                outcome |= Outcome::NESTED_KEY;
            }

            let raw_value = self.lookup_with_default(&key, &mut outcome);

            match raw_value {
                Some(raw_value) => {
                    let resolved = self.parse(&raw_value, depth + 1)?;
                    if resolved != raw_value {
                        outcome |= Outcome::NESTED_VALUE;
                    }
                    tracing::trace!(placeholder = %original, key = %key, ?outcome, depth, "resolved placeholder");

                    result.replace_range(start_index..end_index + suffix.len(), &resolved);
                    start = find_from(&result, prefix, start_index + resolved.len());
                    self.record(original.clone(), key, Some(resolved), outcome, depth);
                }
                None if resolver.ignore_unresolvable() => {
                    outcome |= Outcome::LEFT_UNRESOLVED;
                    start = find_from(&result, prefix, end_index + suffix.len());
                    self.record(original.clone(), key, None, outcome, depth);
                }
                None => {
                    return Err(PlaceholderError::Unresolvable { key, text: value.to_string() });
                }
            }

            self.visited.remove(&original);
        }

        Ok(result)
    }

    /// Look `key` up; on a miss, split at the first separator and try the
    /// short key, then the inline default.
    fn lookup_with_default(&mut self, key: &str, outcome: &mut Outcome) -> Option<String> {
        self.metrics.lookups += 1;
        if let Some(value) = self.lookup.resolve_placeholder(key) {
            *outcome |= Outcome::LOOKUP_HIT;
            return Some(value);
        }

        let separator = self.resolver.separator()?;
        let (actual_key, default_value) = key.split_once(separator)?;

        self.metrics.lookups += 1;
        match self.lookup.resolve_placeholder(actual_key) {
            Some(value) => {
                *outcome |= Outcome::FALLBACK_KEY_HIT;
                Some(value)
            }
            None => {
                *outcome |= Outcome::DEFAULT_USED;
                Some(default_value.to_string())
            }
        }
    }

    fn record(&mut self, placeholder: String, key: String, value: Option<String>, outcome: Outcome, depth: usize) {
        self.metrics.record(outcome, depth);
        if let Some(events) = self.events.as_mut() {
            events.push(PlaceholderEvent { placeholder, key, value, outcome, depth });
        }
    }
}
