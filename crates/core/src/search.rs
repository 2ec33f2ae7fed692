//! Search query helpers.

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Maximum number of search results.
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Clamp a caller-supplied limit into `1..=max`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Trim a raw query string. Returns `None` when nothing searchable is left.
pub fn normalize_query(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(clamp_limit(None, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT), 20);
        assert_eq!(clamp_limit(Some(0), DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT), 1);
        assert_eq!(clamp_limit(Some(500), DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT), 100);
        assert_eq!(clamp_limit(Some(42), DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT), 42);
    }

    #[test]
    fn blank_queries_are_dropped() {
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query("  release notes "), Some("release notes"));
    }
}
