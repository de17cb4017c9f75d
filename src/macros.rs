/// Compile a regex literal once and return a `&'static Regex`.
#[macro_export]
#[doc(hidden)]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a `HashMap<String, String>` usable as a placeholder lookup.
///
/// ```
/// use placeholdr::{PlaceholderLookup, props};
///
/// let lookup = props! { "host" => "localhost", "port" => 8080 };
/// assert_eq!(lookup.resolve_placeholder("port").as_deref(), Some("8080"));
/// ```
#[macro_export]
macro_rules! props {
    () => {
        ::std::collections::HashMap::<String, String>::new()
    };
    ( $($key:expr => $value:expr),+ $(,)? ) => {{
        let mut map = ::std::collections::HashMap::<String, String>::new();
        $( map.insert(($key).to_string(), ($value).to_string()); )+
        map
    }};
}
