//! Value normalization used when comparing intended records against live DNS answers.
//!
//! Validation never normalizes: a [`Record`][crate::model::Record] keeps its value exactly as it
//! was written. These transforms are applied only at check time, to both sides of a comparison.
use std::borrow::Cow;

/// Split a TXT value written in zone-file presentation form into the raw contents of its quoted
/// segments, or return `None` if the quoting is malformed.
///
/// Segments must be separated by whitespace. Backslash escapes inside a segment are kept as they
/// are, so `"a \"b\""` yields the single segment `a \"b\"`.
#[must_use]
pub fn txt_segments(value: &str) -> Option<Vec<&str>> {
    let bytes = value.as_bytes();
    let mut segments = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let start = i + 1;
                let mut end = start;
                loop {
                    match bytes.get(end)? {
                        b'\\' => end += 2,
                        b'"' => break,
                        _ => end += 1,
                    }
                }
                segments.push(&value[start..end]);
                i = end + 1;
                if bytes.get(i).is_some_and(|b| !b.is_ascii_whitespace()) {
                    return None;
                }
            }
            b if b.is_ascii_whitespace() => i += 1,
            _ => return None,
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

/// Join the segments of a multi-segment TXT value into one quoted string.
///
/// Authoritative servers split long TXT data into 255 byte strings; the logical value is the
/// concatenation of the segments with no separator. With `concat` unset, or for values that
/// aren't well-formed quoted TXT data, the value is returned unchanged.
#[must_use]
pub fn concat_txt(value: &str, concat: bool) -> Cow<'_, str> {
    if !concat {
        return Cow::Borrowed(value);
    }
    match txt_segments(value) {
        Some(segments) if segments.len() > 1 => Cow::Owned(format!("\"{}\"", segments.concat())),
        _ => Cow::Borrowed(value),
    }
}

/// Canonicalize a hostname found in a record value relative to the zone it belongs to.
///
/// Absolute names (trailing dot) lose the dot and ignore the zone. Relative names get the zone
/// name appended.
#[must_use]
pub fn expected_hostname(value: &str, zone_name: &str) -> String {
    match value.strip_suffix('.') {
        Some(absolute) => absolute.to_string(),
        None => format!("{value}.{zone_name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_joins_segments_without_separator() {
        assert_eq!(concat_txt(r#""Simple TXT value""#, true), r#""Simple TXT value""#);
        assert_eq!(
            concat_txt(r#""First part" "Second part""#, true),
            r#""First partSecond part""#
        );
        assert_eq!(
            concat_txt(r#""Part 1" "Part 2" "Part 3""#, true),
            r#""Part 1Part 2Part 3""#
        );
        assert_eq!(
            concat_txt(r#""Contains \"quotes\"" " and spaces""#, true),
            r#""Contains \"quotes\" and spaces""#
        );
        assert_eq!(concat_txt("Not quoted", true), "Not quoted");
        assert_eq!(concat_txt(r#""""#, true), r#""""#);
    }

    #[test]
    fn concat_disabled_preserves_original() {
        assert_eq!(
            concat_txt(r#""First part"   "Second part""#, false),
            r#""First part"   "Second part""#
        );
        assert_eq!(concat_txt(r#""Simple TXT value""#, false), r#""Simple TXT value""#);
    }

    #[test]
    fn segments_reject_malformed_quoting() {
        assert_eq!(txt_segments(r#""a" "b""#), Some(vec!["a", "b"]));
        assert_eq!(txt_segments(r#""unterminated"#), None);
        assert_eq!(txt_segments(r#"text "a""#), None);
        assert_eq!(txt_segments(r#""a"text"#), None);
        assert_eq!(txt_segments(r#""a""b""#), None);
        assert_eq!(txt_segments(r#""ends with escape\""#), None);
        assert_eq!(txt_segments("   "), None);
    }

    #[test]
    fn absolute_hostnames_ignore_zone() {
        assert_eq!(expected_hostname("mail.example.com.", "example.org"), "mail.example.com");
        assert_eq!(expected_hostname("example.com.", "example.org"), "example.com");
        assert_eq!(
            expected_hostname("service.other-domain.com.", "example.com"),
            "service.other-domain.com"
        );
    }

    #[test]
    fn relative_hostnames_get_zone_appended() {
        assert_eq!(expected_hostname("mail", "example.com"), "mail.example.com");
        assert_eq!(expected_hostname("www", "example.org"), "www.example.org");
        assert_eq!(expected_hostname("sub.domain", "example.com"), "sub.domain.example.com");
    }
}
