//! Supported payload content types and encodings

/// Plain-text content types, matched case-insensitively
pub const PLAIN_TEXT: &[&str] = &[
    "text/plain",
    "text/plain;charset=utf-8",
    "text/plain; charset=utf-8",
];

/// Binary content types; these require a `payload_content_encoding`
pub const BINARY: &[&str] = &[
    "application/octet-stream",
    "application/pkcs8",
    "application/pkix-cert",
];

/// Encodings accepted for binary content types
pub const ENCODINGS: &[&str] = &["base64"];

/// Lower-case and trim a content type for table lookups
pub fn normalize_content_type(content_type: &str) -> String {
    content_type.trim().to_lowercase()
}

/// Whether the content type is one of the supported secret content types
pub fn is_supported(content_type: &str) -> bool {
    is_plain_text(content_type) || is_binary(content_type)
}

/// Whether the content type is a plain-text type
pub fn is_plain_text(content_type: &str) -> bool {
    PLAIN_TEXT.contains(&normalize_content_type(content_type).as_str())
}

/// Whether the content type is a binary type
pub fn is_binary(content_type: &str) -> bool {
    BINARY.contains(&normalize_content_type(content_type).as_str())
}

/// Whether the encoding is accepted for the given content type
pub fn is_content_type_with_encoding_supported(content_type: &str, encoding: &str) -> bool {
    is_binary(content_type) && ENCODINGS.contains(&encoding.trim().to_lowercase().as_str())
}

/// Every supported content type, for error messages
pub fn supported_list() -> String {
    PLAIN_TEXT
        .iter()
        .chain(BINARY.iter())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("text/plain" ; "plain")]
    #[test_case("TeXT/PlaiN" ; "mixed case")]
    #[test_case("TEXT/PLAIN; charset=UTF-8" ; "upper charset")]
    #[test_case("application/octet-stream" ; "octet stream")]
    #[test_case("application/pkix-cert" ; "pkix cert")]
    fn test_supported(content_type: &str) {
        assert!(is_supported(content_type));
    }

    #[test_case("plain/text" ; "reversed")]
    #[test_case("TEXT/PLANE" ; "typo")]
    #[test_case("" ; "empty")]
    fn test_unsupported(content_type: &str) {
        assert!(!is_supported(content_type));
    }

    #[test]
    fn test_encoding_pairs() {
        assert!(is_content_type_with_encoding_supported("application/octet-stream", "base64"));
        assert!(is_content_type_with_encoding_supported("application/pkcs8", "BASE64"));
        assert!(!is_content_type_with_encoding_supported("application/octet-stream", "unsupported"));
        assert!(!is_content_type_with_encoding_supported("text/plain", "base64"));
    }
}
