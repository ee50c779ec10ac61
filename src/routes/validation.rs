use chrono::{DateTime, Utc};

/// Convert Unix timestamp to RFC3339 string, defaulting to now if invalid
pub fn timestamp_to_rfc3339(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_else(Utc::now)
        .to_rfc3339()
}

/// Trim an optional form/JSON field down to a non-empty value
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_rfc3339() {
        let rendered = timestamp_to_rfc3339(1733788800);
        assert!(rendered.starts_with("2024-12-10T00:00:00"));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  hello ")), Some("hello"));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(None), None);
    }
}
