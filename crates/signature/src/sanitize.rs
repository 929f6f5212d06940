//! Input cleaning and HTML escaping.
//!
//! Every function here is total: malformed input yields an empty string (or
//! `false`), never an error. Rejection is silent, the caller simply omits the
//! element that would have carried the value.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Schemes a rendered link may use.
pub const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

pub const MAX_PHONE_LEN: usize = 50;
pub const MAX_EMAIL_LEN: usize = 254;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

fn has_allowed_scheme(url: &Url) -> bool {
    ALLOWED_SCHEMES.contains(&url.scheme())
}

/// Normalize a user-supplied link.
///
/// Scheme-less input is retried with `https://` in front. Returns the
/// canonical serialization, or `""` when the result is not an allowed scheme.
pub fn sanitize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let parsed = Url::parse(trimmed).or_else(|_| Url::parse(&format!("https://{trimmed}")));
    match parsed {
        Ok(url) if has_allowed_scheme(&url) => url.into(),
        _ => String::new(),
    }
}

/// [`sanitize_url`] restricted to `http`/`https`, for links that are fetched
/// rather than followed (images).
pub fn sanitize_web_url(raw: &str) -> String {
    let url = sanitize_url(raw);
    if url.starts_with("https://") || url.starts_with("http://") {
        url
    } else {
        String::new()
    }
}

/// Keep digits and the usual phone punctuation, capped at [`MAX_PHONE_LEN`].
pub fn sanitize_phone(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')' | '.'))
        .take(MAX_PHONE_LEN)
        .collect()
}

pub fn sanitize_email(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() > MAX_EMAIL_LEN || !EMAIL_SHAPE.is_match(trimmed) {
        return String::new();
    }
    trimmed.to_string()
}

/// Escape the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// True iff `raw` is already an absolute URL with an allowed scheme.
pub fn is_safe_url(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    Url::parse(trimmed).is_ok_and(|url| has_allowed_scheme(&url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn url_without_scheme_gets_https() {
        assert_eq!(sanitize_url("  example.com "), "https://example.com/");
        assert_eq!(
            sanitize_url("http://example.com/a b"),
            "http://example.com/a%20b"
        );
        assert_eq!(sanitize_url(""), "");
        assert_eq!(sanitize_url("   "), "");
    }

    #[test]
    fn url_rejects_disallowed_schemes() {
        assert_eq!(sanitize_url("javascript:alert(1)"), "");
        assert_eq!(sanitize_url("data:text/html,<b>x</b>"), "");
        assert_eq!(sanitize_url("ftp://example.com"), "");
        assert_eq!(sanitize_url("mailto:ada@example.com"), "mailto:ada@example.com");
        assert_eq!(sanitize_url("tel:+32470012345"), "tel:+32470012345");
    }

    #[test]
    fn web_url_drops_non_web_schemes() {
        assert_eq!(sanitize_web_url("cdn.example.com/logo.png"), "https://cdn.example.com/logo.png");
        assert_eq!(sanitize_web_url("http://example.com"), "http://example.com/");
        assert_eq!(sanitize_web_url("mailto:a@b.co"), "");
        assert_eq!(sanitize_web_url("tel:+32"), "");
    }

    #[test]
    fn phone_keeps_only_allowed_characters() {
        assert_eq!(
            sanitize_phone("+32 (470) 01-23.45<script>"),
            "+32 (470) 01-23.45"
        );
        assert_eq!(sanitize_phone(&"1".repeat(80)).len(), MAX_PHONE_LEN);
        assert_eq!(sanitize_phone("\t+32\t470"), "+32470");
    }

    #[test]
    fn email_shape() {
        assert_eq!(sanitize_email(" a@b.co "), "a@b.co");
        assert_eq!(sanitize_email("a@b"), "");
        assert_eq!(sanitize_email("a b@c.d"), "");
        assert_eq!(sanitize_email(""), "");

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(sanitize_email(&long), "");
    }

    #[test]
    fn escape_covers_all_five() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn safe_url_needs_a_scheme() {
        assert!(is_safe_url("https://example.com"));
        assert!(is_safe_url("  mailto:ada@example.com "));
        assert!(!is_safe_url("example.com"));
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url(""));
    }
}
