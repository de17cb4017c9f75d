//! Resolution trace and metrics.
//!
//! Collected only by the verbose entry points. The plain path keeps a pair of
//! counters and nothing else.

use bitflags::bitflags;
use std::time::Duration;

bitflags! {
    /// How a single placeholder was handled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Outcome: u8 {
        /// The expanded key was found by the lookup.
        const LOOKUP_HIT       = 1 << 0;
        /// The key before the separator was found by the lookup.
        const FALLBACK_KEY_HIT = 1 << 1;
        /// The inline default after the separator was used.
        const DEFAULT_USED     = 1 << 2;
        /// No value; the placeholder was left in the output.
        const LEFT_UNRESOLVED  = 1 << 3;
        /// Placeholders inside the key were substituted.
        const NESTED_KEY       = 1 << 4;
        /// Placeholders inside the value were substituted.
        const NESTED_VALUE     = 1 << 5;
    }
}

impl Outcome {
    pub fn is_resolved(self) -> bool {
        self.intersects(Outcome::LOOKUP_HIT | Outcome::FALLBACK_KEY_HIT | Outcome::DEFAULT_USED)
    }
}

/// One processed placeholder, recorded after its value (if any) was fully
/// expanded. Inner placeholders are therefore recorded before outer ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderEvent {
    /// The raw key as written between prefix and suffix.
    pub placeholder: String,
    /// The key after its own placeholders were resolved.
    pub key: String,
    /// The fully expanded value, or `None` when left unresolved.
    pub value: Option<String>,
    pub outcome: Outcome,
    /// Nesting depth at which the placeholder was found (0 = input text).
    pub depth: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolutionMetrics {
    /// Total elapsed time for the call.
    pub total: Duration,
    /// Placeholder spans processed, at any depth.
    pub placeholders: usize,
    /// Spans replaced by a value.
    pub resolved: usize,
    /// Spans replaced by their inline default.
    pub defaults_applied: usize,
    /// Spans left in place (lenient mode only).
    pub left_unresolved: usize,
    /// Calls made into the lookup.
    pub lookups: usize,
    /// Deepest nesting level reached.
    pub max_depth_reached: usize,
}

impl ResolutionMetrics {
    pub(crate) fn record(&mut self, outcome: Outcome, depth: usize) {
        self.placeholders += 1;
        if outcome.is_resolved() {
            self.resolved += 1;
        }
        if outcome.contains(Outcome::DEFAULT_USED) {
            self.defaults_applied += 1;
        }
        if outcome.contains(Outcome::LEFT_UNRESOLVED) {
            self.left_unresolved += 1;
        }
        self.max_depth_reached = self.max_depth_reached.max(depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_by_outcome() {
        let mut metrics = ResolutionMetrics::default();
        metrics.record(Outcome::LOOKUP_HIT, 0);
        metrics.record(Outcome::DEFAULT_USED | Outcome::NESTED_KEY, 2);
        metrics.record(Outcome::LEFT_UNRESOLVED, 1);

        assert_eq!(metrics.placeholders, 3);
        assert_eq!(metrics.resolved, 2);
        assert_eq!(metrics.defaults_applied, 1);
        assert_eq!(metrics.left_unresolved, 1);
        assert_eq!(metrics.max_depth_reached, 2);
    }
}
