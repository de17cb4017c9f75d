use thiserror::Error;

/// Errors produced while configuring or running a [`PlaceholderResolver`].
///
/// Every resolution error aborts the whole call: the engine never hands back
/// a partially substituted string.
///
/// [`PlaceholderResolver`]: crate::PlaceholderResolver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
    /// The resolver was constructed with an empty prefix or suffix.
    #[error("invalid placeholder configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration.
        reason: &'static str,
    },

    /// A placeholder key re-entered its own expansion path.
    #[error("circular placeholder reference '{key}' in property definitions")]
    CircularReference {
        /// The raw key (as written between prefix and suffix) that repeated.
        key: String,
    },

    /// A placeholder had no value and no usable default while running in
    /// strict mode.
    #[error("could not resolve placeholder '{key}' in value \"{text}\"")]
    Unresolvable {
        /// The fully expanded key that was looked up.
        key: String,
        /// The text that contained the placeholder.
        text: String,
    },

    /// Key/value recursion went deeper than the configured limit.
    #[error("placeholder nesting exceeded the maximum depth of {max_depth}")]
    MaxDepthExceeded {
        /// The limit that was hit.
        max_depth: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_key() {
        let err = PlaceholderError::Unresolvable { key: "missing".into(), text: "x${missing}y".into() };
        assert_eq!(err.to_string(), "could not resolve placeholder 'missing' in value \"x${missing}y\"");

        let err = PlaceholderError::CircularReference { key: "a".into() };
        assert!(err.to_string().contains("'a'"));
    }
}
