//! Per-field validation rules and their user-facing messages.
//!
//! Validation is advisory: it produces messages for the UI but never stops a
//! value from being stored.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::form::{ErrorMap, FieldId, FieldKind, FormState};
use crate::sanitize::{is_safe_url, sanitize_web_url};

pub const NAME_TOO_LONG: &str = "Name is too long (max 400 characters)";
pub const ROLE_TOO_LONG: &str = "Role is too long (max 400 characters)";
pub const LOCATION_TOO_LONG: &str = "Location is too long (max 500 characters)";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_URL: &str = "Please enter a valid URL (http:// or https://)";
pub const INVALID_LOGO_URL: &str = "Logo must be an http:// or https:// image link";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Za-z0-9_'+\-\.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("valid email regex")
});

/// Shape check applied to non-blank values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    None,
    Email,
    Url,
    /// A URL that is also fetched as an image, so only web schemes pass.
    ImageUrl,
}

/// Rule attached to a field: an optional length cap plus a shape check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Maximum number of characters and the message shown past it.
    pub max_len: Option<(usize, &'static str)>,
    pub check: Check,
}

impl FieldRule {
    const fn unchecked() -> Self {
        Self {
            max_len: None,
            check: Check::None,
        }
    }

    const fn max(len: usize, message: &'static str) -> Self {
        Self {
            max_len: Some((len, message)),
            check: Check::None,
        }
    }

    const fn check(check: Check) -> Self {
        Self {
            max_len: None,
            check,
        }
    }

    /// First violated constraint, in declaration order.
    pub fn violation(&self, value: &str) -> Option<&'static str> {
        if let Some((max, message)) = self.max_len {
            if value.chars().count() > max {
                return Some(message);
            }
        }

        if value.trim().is_empty() {
            return None;
        }

        match self.check {
            Check::None => None,
            Check::Email => (!is_email(value)).then_some(INVALID_EMAIL),
            Check::Url => (!is_link(value)).then_some(INVALID_URL),
            Check::ImageUrl if !is_link(value) => Some(INVALID_URL),
            Check::ImageUrl => sanitize_web_url(value).is_empty().then_some(INVALID_LOGO_URL),
        }
    }
}

/// Rule table lookup.
pub fn rule_for(id: FieldId) -> FieldRule {
    match id {
        FieldId::Name => FieldRule::max(400, NAME_TOO_LONG),
        FieldId::Role => FieldRule::max(400, ROLE_TOO_LONG),
        FieldId::Location1 | FieldId::Location2 => FieldRule::max(500, LOCATION_TOO_LONG),
        FieldId::Email => FieldRule::check(Check::Email),
        FieldId::Phone => FieldRule::unchecked(),
        FieldId::LogoUrl => FieldRule::check(Check::ImageUrl),
        id if id.definition().kind == FieldKind::Url => FieldRule::check(Check::Url),
        _ => FieldRule::unchecked(),
    }
}

fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL.is_match(value)
}

/// Links may omit the scheme; `https://` is assumed.
fn is_link(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        is_safe_url(trimmed)
    } else {
        is_safe_url(&format!("https://{trimmed}"))
    }
}

/// Message for the first rule `value` breaks, if any.
pub fn validate_field(id: FieldId, value: &str) -> Option<&'static str> {
    rule_for(id).violation(value)
}

/// String-keyed variant. Unknown keys never carry an error.
pub fn validate_field_key(key: &str, value: &str) -> Option<&'static str> {
    key.parse::<FieldId>()
        .ok()
        .and_then(|id| validate_field(id, value))
}

/// Whole-form verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValidation {
    pub is_valid: bool,
    pub errors: ErrorMap,
}

pub fn validate_form(state: &FormState) -> FormValidation {
    let errors: ErrorMap = state
        .iter()
        .filter_map(|(id, value)| validate_field(id, value).map(|m| (id, m.to_string())))
        .collect();

    FormValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn length_limits_count_characters() {
        assert_eq!(validate_field(FieldId::Name, &"é".repeat(400)), None);
        assert_eq!(
            validate_field(FieldId::Name, &"a".repeat(401)),
            Some(NAME_TOO_LONG)
        );
        assert_eq!(
            validate_field(FieldId::Role, &"a".repeat(401)),
            Some(ROLE_TOO_LONG)
        );
        assert_eq!(
            validate_field(FieldId::Location2, &"a".repeat(501)),
            Some(LOCATION_TOO_LONG)
        );
        assert_eq!(validate_field(FieldId::Location1, &"a".repeat(500)), None);
    }

    #[test]
    fn email_rule() {
        assert_eq!(validate_field(FieldId::Email, ""), None);
        assert_eq!(validate_field(FieldId::Email, "   "), None);
        assert_eq!(validate_field(FieldId::Email, "ada@example.com"), None);
        assert_eq!(validate_field(FieldId::Email, "first.last+tag@mail.example.be"), None);
        assert_eq!(validate_field(FieldId::Email, "ada@"), Some(INVALID_EMAIL));
        assert_eq!(validate_field(FieldId::Email, "ada@example"), Some(INVALID_EMAIL));
        assert_eq!(validate_field(FieldId::Email, "a..b@example.com"), Some(INVALID_EMAIL));
        assert_eq!(validate_field(FieldId::Email, ".ada@example.com"), Some(INVALID_EMAIL));
    }

    #[test]
    fn url_rule_assumes_https() {
        for id in [FieldId::Website, FieldId::Facebook, FieldId::LogoUrl] {
            assert_eq!(validate_field(id, ""), None);
            assert_eq!(validate_field(id, "example.com"), None);
            assert_eq!(validate_field(id, "http://example.com/page"), None);
            assert_eq!(validate_field(id, "exa mple.com"), Some(INVALID_URL));
        }
        // The prefix turns this into a host-less https URL.
        assert_eq!(
            validate_field(FieldId::Website, "https://"),
            Some(INVALID_URL)
        );
    }

    #[test]
    fn logo_needs_a_web_scheme() {
        assert_eq!(validate_field(FieldId::LogoUrl, "cdn.example.com/logo.png"), None);
        assert_eq!(
            validate_field(FieldId::LogoUrl, "mailto:a@b.co"),
            Some(INVALID_LOGO_URL)
        );
        assert_eq!(
            validate_field(FieldId::LogoUrl, "https://cdn.example.com/logo.png"),
            None
        );
        // Other link fields keep the looser rule.
        assert_eq!(validate_field(FieldId::Website, "mailto:a@b.co"), None);
    }

    #[test]
    fn phone_is_free_form() {
        assert_eq!(validate_field(FieldId::Phone, "call me maybe"), None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        assert_eq!(validate_field_key("utm_source", &"x".repeat(1000)), None);
        assert_eq!(
            validate_field_key("input-naam", &"x".repeat(1000)),
            Some(NAME_TOO_LONG)
        );
    }

    #[test]
    fn form_collects_one_message_per_field() {
        let mut state = FormState::defaults();
        assert!(validate_form(&state).is_valid);

        state.set(FieldId::Email, "nope");
        state.set(FieldId::Website, "exa mple.com");
        let verdict = validate_form(&state);

        assert!(!verdict.is_valid);
        assert_eq!(verdict.errors.len(), 2);
        assert_eq!(verdict.errors[&FieldId::Email], INVALID_EMAIL);
        assert_eq!(verdict.errors[&FieldId::Website], INVALID_URL);
    }
}
