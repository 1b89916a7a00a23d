//! Input normalization shared by the API and persistence layers.

/// Lowercases and trims an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trims an optional free-text field and maps blank input to `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Builds an `ILIKE` pattern that matches `term` as a literal substring.
///
/// `%`, `_` and `\` in the term are escaped so user input cannot widen the
/// match. Postgres uses `\` as the default `LIKE` escape character.
pub fn like_contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{faker::internet::en::SafeEmail, Fake};

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_normalize_email_is_idempotent() {
        for _ in 0..20 {
            let email: String = SafeEmail().fake();
            let once = normalize_email(&format!(" {} ", email.to_uppercase()));
            assert_eq!(once, email.to_lowercase());
            assert_eq!(normalize_email(&once), once);
        }
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  hi ")), Some("hi".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_like_pattern_plain() {
        assert_eq!(like_contains_pattern("Feedback"), "%Feedback%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_like_pattern_empty() {
        assert_eq!(like_contains_pattern(""), "%%");
    }
}
