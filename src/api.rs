use crate::engine::Resolution;
use crate::{PlaceholderError, PlaceholderEvent, PlaceholderLookup, PlaceholderResolver, ResolutionMetrics};
use once_cell::sync::Lazy;
use std::time::{Duration, Instant};

static DEFAULT_RESOLVER: Lazy<PlaceholderResolver> = Lazy::new(PlaceholderResolver::spring_style);

/// Additional details returned by [`replace_placeholders_verbose_with`].
#[derive(Debug, Clone, Default)]
pub struct ResolutionDetails {
    /// Aggregate counters and total elapsed time.
    pub metrics: ResolutionMetrics,
    /// One entry per processed placeholder, innermost first.
    pub events: Vec<PlaceholderEvent>,
}

/// Result from [`replace_placeholders_verbose_with`].
#[derive(Debug, Clone)]
pub struct ResolutionReport {
    /// The input text.
    pub text: String,
    /// The resolved text.
    pub output: String,
    /// Total elapsed time.
    pub elapsed: Duration,
    pub details: ResolutionDetails,
}

/// Resolve `text` with the default `${name:default}` syntax, leaving
/// unresolvable placeholders in place.
///
/// # Example
/// ```
/// use placeholdr::replace_placeholders;
///
/// let lookup = |name: &str| (name == "user").then(|| "ada".to_string());
/// let out = replace_placeholders("hi ${user}, ${mood:fine}? ${other}", &lookup).unwrap();
/// assert_eq!(out, "hi ada, fine? ${other}");
/// ```
pub fn replace_placeholders<L>(text: &str, lookup: &L) -> Result<String, PlaceholderError>
where
    L: PlaceholderLookup + ?Sized,
{
    DEFAULT_RESOLVER.replace_placeholders(text, lookup)
}

/// Resolve `text` using an explicit `resolver`.
pub fn replace_placeholders_with<L>(
    text: &str,
    resolver: &PlaceholderResolver,
    lookup: &L,
) -> Result<String, PlaceholderError>
where
    L: PlaceholderLookup + ?Sized,
{
    resolver.replace_placeholders(text, lookup)
}

/// Resolve `text` and return a per-placeholder trace alongside the output.
///
/// The default [`replace_placeholders_with`] path does not allocate the
/// trace.
pub fn replace_placeholders_verbose_with<L>(
    text: &str,
    resolver: &PlaceholderResolver,
    lookup: &L,
) -> Result<ResolutionReport, PlaceholderError>
where
    L: PlaceholderLookup + ?Sized,
{
    let started = Instant::now();
    let mut resolution = Resolution::new(resolver, lookup).traced();
    let output = resolution.run(text)?;
    let (mut metrics, events) = resolution.into_parts();

    let elapsed = started.elapsed();
    metrics.total = elapsed;

    Ok(ResolutionReport { text: text.to_string(), output, elapsed, details: ResolutionDetails { metrics, events } })
}
