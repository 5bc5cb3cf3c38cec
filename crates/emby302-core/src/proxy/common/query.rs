//! Query string lookup.

use url::form_urlencoded;

/// First value of `key` in a raw query string, percent-decoded.
///
/// Only the first occurrence counts; an empty first value is returned as-is so callers can
/// treat it as absent.
pub fn first_value(query: Option<&str>, key: &str) -> Option<String> {
    let query = query?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Like [`first_value`] but treats an empty value as missing.
pub fn non_empty(query: Option<&str>, key: &str) -> Option<String> {
    first_value(query, key).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_decodes() {
        let q = Some("MediaSourceId=mediasource_1%2F2&api_key=K");
        assert_eq!(first_value(q, "MediaSourceId").as_deref(), Some("mediasource_1/2"));
        assert_eq!(first_value(q, "api_key").as_deref(), Some("K"));
        assert_eq!(first_value(q, "missing"), None);
        assert_eq!(first_value(None, "api_key"), None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let q = Some("api_key=&api_key=second");
        assert_eq!(first_value(q, "api_key").as_deref(), Some(""));
        assert_eq!(non_empty(q, "api_key"), None);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let q = Some("mediaSourceId=abc");
        assert_eq!(first_value(q, "MediaSourceId"), None);
        assert_eq!(first_value(q, "mediaSourceId").as_deref(), Some("abc"));
    }
}
