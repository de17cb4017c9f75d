//! Marker scanning.
//!
//! All searches work on bytes. Markers are valid UTF-8 strings, so a marker
//! match always starts and ends on a char boundary even though the cursor
//! itself advances one byte at a time.

use super::config::PlaceholderResolver;

/// Byte index of the first `needle` at or after `from`.
pub(crate) fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack.get(from..)?.find(needle).map(|idx| idx + from)
}

fn matches_at(haystack: &[u8], index: usize, needle: &[u8]) -> bool {
    haystack.get(index..).is_some_and(|rest| rest.starts_with(needle))
}

/// Find the suffix that closes the placeholder whose prefix starts at
/// `start`.
///
/// Every simple prefix seen on the way opens a nested level that must be
/// closed by its own suffix first. The suffix is tested before the simple
/// prefix so that identical markers (`%name%`) still terminate.
///
/// Returns `None` when the placeholder is never closed.
pub(crate) fn find_placeholder_end(resolver: &PlaceholderResolver, text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let suffix = resolver.suffix().as_bytes();
    let simple_prefix = resolver.simple_prefix().as_bytes();

    let mut index = start + resolver.prefix().len();
    let mut within_nested = 0usize;

    while index < bytes.len() {
        if matches_at(bytes, index, suffix) {
            if within_nested == 0 {
                return Some(index);
            }
            within_nested -= 1;
            index += suffix.len();
        } else if matches_at(bytes, index, simple_prefix) {
            within_nested += 1;
            index += simple_prefix.len();
        } else {
            index += 1;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dollar_brace() -> PlaceholderResolver {
        PlaceholderResolver::new("${", "}").unwrap()
    }

    #[test]
    fn finds_plain_end() {
        assert_eq!(find_placeholder_end(&dollar_brace(), "${abc}", 0), Some(5));
        assert_eq!(find_placeholder_end(&dollar_brace(), "x ${a} ${b}", 7), Some(10));
    }

    #[test]
    fn skips_nested_placeholders() {
        let text = "${a${b}c}";
        assert_eq!(find_placeholder_end(&dollar_brace(), text, 0), Some(8));
    }

    #[test]
    fn balances_bare_brackets_through_simple_prefix() {
        let text = "${a{b}c}tail";
        assert_eq!(find_placeholder_end(&dollar_brace(), text, 0), Some(7));
    }

    #[test]
    fn unclosed_placeholder_has_no_end() {
        assert_eq!(find_placeholder_end(&dollar_brace(), "${abc", 0), None);
        assert_eq!(find_placeholder_end(&dollar_brace(), "${a${b}", 0), None);
    }

    #[test]
    fn identical_markers_terminate() {
        let percent = PlaceholderResolver::new("%", "%").unwrap();
        assert_eq!(find_placeholder_end(&percent, "%HOME%/bin", 0), Some(5));
    }

    #[test]
    fn multibyte_text_is_walked_safely() {
        let text = "${clé}→";
        let end = find_placeholder_end(&dollar_brace(), text, 0).unwrap();
        assert_eq!(&text[2..end], "clé");
    }

    #[test]
    fn find_from_respects_offset() {
        assert_eq!(find_from("${a}${b}", "${", 1), Some(4));
        assert_eq!(find_from("${a}", "${", 10), None);
        assert_eq!(find_from("abc", "${", 3), None);
    }
}
