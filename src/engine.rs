//! Placeholder resolution engine.
//!
//! The engine turns `prefix…key…suffix` spans into values supplied by a
//! [`PlaceholderLookup`](crate::PlaceholderLookup). Keys and values are
//! themselves resolved recursively, so `${${env}.url}` and values that refer
//! to other placeholders both work.
//!
//! ## How the parts work together
//!
//! ```text
//! PlaceholderResolver (config.rs)   immutable markers + policies
//!            │
//!            v
//! Resolution::run (resolve.rs) ─── per-call visited set + counters
//!     │   find prefix / find_placeholder_end (scan.rs)
//!     │   recurse into key, lookup, default fallback, recurse into value
//!     v
//! String  (+ ResolutionMetrics / PlaceholderEvent trace, metrics.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `config.rs`: validated construction, simple-prefix derivation, presets.
//! - `scan.rs`: byte-level marker search and nested-bracket balancing.
//! - `resolve.rs`: the recursive substitution loop, cycle detection, default
//!   values and the recursion limit.
//! - `metrics.rs`: opt-in per-placeholder trace and aggregate counters.
//!
//! ## Debugging
//!
//! Every resolved placeholder is logged at `trace` level under the
//! `placeholdr::engine` target.

#[path = "engine/config.rs"]
mod config;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/scan.rs"]
mod scan;


pub use config::{DEFAULT_MAX_DEPTH, PlaceholderResolver};
pub use metrics::{Outcome, PlaceholderEvent, ResolutionMetrics};
pub(crate) use resolve::Resolution;

use crate::{PlaceholderError, PlaceholderLookup};
use std::collections::HashMap;
use std::hash::BuildHasher;

impl PlaceholderResolver {
    /// Replace every placeholder in `text` with the value supplied by
    /// `lookup`.
    ///
    /// # Example
    /// ```
    /// use placeholdr::{PlaceholderResolver, props};
    ///
    /// let resolver = PlaceholderResolver::spring_style();
    /// let lookup = props! { "user" => "ada", "home" => "/home/${user}" };
    /// assert_eq!(resolver.replace_placeholders("${home}/.cfg", &lookup).unwrap(), "/home/ada/.cfg");
    /// ```
    pub fn replace_placeholders<L>(&self, text: &str, lookup: &L) -> Result<String, PlaceholderError>
    where
        L: PlaceholderLookup + ?Sized,
    {
        if !text.contains(self.prefix()) {
            return Ok(text.to_string());
        }

        Resolution::new(self, lookup).run(text)
    }

    /// Same as [`replace_placeholders`](Self::replace_placeholders).
    pub fn resolve<L>(&self, text: &str, lookup: &L) -> Result<String, PlaceholderError>
    where
        L: PlaceholderLookup + ?Sized,
    {
        self.replace_placeholders(text, lookup)
    }

    /// Resolve against a flat key/value map.
    pub fn replace_placeholders_from_map<S: BuildHasher>(
        &self,
        text: &str,
        values: &HashMap<String, String, S>,
    ) -> Result<String, PlaceholderError> {
        self.replace_placeholders(text, values)
    }
}
