//! Placeholder resolution for configuration strings.
//!
//! Scans text for `prefix…key…suffix` spans (by default `${key}`), replaces
//! each with a value from a [`PlaceholderLookup`], and resolves keys and
//! values recursively. Supports inline defaults (`${key:default}`), nested
//! keys (`${${env}.url}`), balanced brackets inside keys, and reports
//! circular references instead of looping.
//!
//! ```
//! use placeholdr::{PlaceholderResolver, props};
//!
//! let resolver = PlaceholderResolver::strict();
//! let lookup = props! { "env" => "prod", "prod.db" => "db-1:${port:5432}" };
//! assert_eq!(resolver.replace_placeholders("${${env}.db}", &lookup).unwrap(), "db-1:5432");
//! ```

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod lookup;

pub use api::{
    ResolutionDetails, ResolutionReport, replace_placeholders, replace_placeholders_verbose_with,
    replace_placeholders_with,
};
pub use engine::{DEFAULT_MAX_DEPTH, Outcome, PlaceholderEvent, PlaceholderResolver, ResolutionMetrics};
pub use error::PlaceholderError;
pub use lookup::{ChainLookup, EnvLookup, PlaceholderLookup, PropertiesLookup};
