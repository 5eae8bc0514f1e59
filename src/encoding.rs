//! Encoding-Tag Codecs
//!
//! Byte-level text conversion for the encoding tags threaded through the
//! marshaling layer. The tag travels as a plain string; encode and decode
//! must use the same tag or the byte-level round trip is not guaranteed.
//!
//! Supported tags: `UTF-8` (default) and `ISO-8859-1`. Decoding follows the
//! usual host-runtime convention of substituting rather than failing:
//! malformed UTF-8 decodes to replacement characters, and characters
//! without an ISO-8859-1 mapping encode to `?`.

/// The tag assumed when a caller does not pass one.
pub const DEFAULT_ENCODING: &str = "UTF-8";

const LATIN1_SUBSTITUTE: u8 = b'?';

fn normalize(tag: &str) -> Option<&'static str> {
    if tag.eq_ignore_ascii_case("UTF-8") || tag.eq_ignore_ascii_case("UTF8") {
        Some("UTF-8")
    } else if tag.eq_ignore_ascii_case("ISO-8859-1")
        || tag.eq_ignore_ascii_case("ISO8859-1")
        || tag.eq_ignore_ascii_case("LATIN1")
    {
        Some("ISO-8859-1")
    } else {
        None
    }
}

/// True if the tag names an encoding this build can convert.
pub fn is_supported(tag: &str) -> bool {
    normalize(tag).is_some()
}

/// Encode native text into bytes under the given tag. `None` for an
/// unsupported tag.
pub fn encode(text: &str, tag: &str) -> Option<Vec<u8>> {
    match normalize(tag)? {
        "UTF-8" => Some(text.as_bytes().to_vec()),
        "ISO-8859-1" => Some(
            text.chars()
                .map(|c| {
                    let cp = c as u32;
                    if cp <= 0xFF {
                        cp as u8
                    } else {
                        LATIN1_SUBSTITUTE
                    }
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Decode bytes into native text under the given tag. `None` for an
/// unsupported tag.
pub fn decode(bytes: &[u8], tag: &str) -> Option<String> {
    match normalize(tag)? {
        "UTF-8" => Some(String::from_utf8_lossy(bytes).into_owned()),
        "ISO-8859-1" => Some(bytes.iter().map(|&b| b as char).collect()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_round_trip() {
        for s in ["", "ascii", "naïve café", "emoji \u{1F980}", "nul\0inside"] {
            let bytes = encode(s, "UTF-8").unwrap();
            assert_eq!(decode(&bytes, "UTF-8").unwrap(), s);
        }
    }

    #[test]
    fn test_tag_aliases() {
        assert!(is_supported("utf-8"));
        assert!(is_supported("UTF8"));
        assert!(is_supported("latin1"));
        assert!(!is_supported("Shift_JIS"));
    }

    #[test]
    fn test_latin1_round_trip() {
        let s = "déjà vu";
        let bytes = encode(s, "ISO-8859-1").unwrap();
        assert_eq!(bytes.len(), s.chars().count());
        assert_eq!(decode(&bytes, "ISO-8859-1").unwrap(), s);
    }

    #[test]
    fn test_latin1_substitution() {
        let bytes = encode("snow\u{2603}man", "ISO-8859-1").unwrap();
        assert_eq!(decode(&bytes, "ISO-8859-1").unwrap(), "snow?man");
    }

    #[test]
    fn test_unsupported_tag() {
        assert!(encode("x", "EBCDIC").is_none());
        assert!(decode(b"x", "EBCDIC").is_none());
    }
}
