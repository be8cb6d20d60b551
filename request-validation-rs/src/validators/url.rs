//! Secret reference helpers
//!
//! A container's `secret_ref` may be a bare identifier or a URL whose last
//! non-empty path segment is the identifier. Doubled and trailing slashes do
//! not change the identifier a reference resolves to.

use ::url::Url;

/// Extract the secret identifier from a `secret_ref` value
pub fn secret_id_from_ref(secret_ref: &str) -> String {
    let secret_ref = secret_ref.trim();

    if let Ok(parsed) = Url::parse(secret_ref) {
        if let Some(segments) = parsed.path_segments() {
            if let Some(last) = segments.filter(|segment| !segment.is_empty()).last() {
                return last.to_string();
            }
        }
    }

    secret_ref
        .split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .unwrap_or(secret_ref)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1231", "1231" ; "bare id")]
    #[test_case("http://localhost:9311/v1/12345/secrets/1231", "1231" ; "url")]
    #[test_case("http://localhost:9311/v1/12345/secrets//1231/", "1231" ; "doubled and trailing slash")]
    #[test_case("https://kms.example.com/v1/secrets/ab-cd?version=2", "ab-cd" ; "query ignored")]
    #[test_case("secrets//1232/", "1232" ; "relative path")]
    #[test_case("  1233  ", "1233" ; "whitespace")]
    fn test_secret_id_from_ref(secret_ref: &str, expected: &str) {
        assert_eq!(secret_id_from_ref(secret_ref), expected);
    }

    #[test]
    fn test_formats_resolve_to_same_id() {
        assert_eq!(
            secret_id_from_ref("http://localhost:9311/v1/12345/secrets/1231"),
            secret_id_from_ref("http://localhost:9311/v1/12345/secrets//1231/")
        );
        assert_ne!(
            secret_id_from_ref("http://localhost:9311/v1/12345/secrets/1231"),
            secret_id_from_ref("http://localhost:9311/v1/12345/secrets//1232")
        );
    }
}
