//! Client-side form validation.
//!
//! All checks run before any request is sent. Thresholds are fixed constants;
//! the create and edit flows share [`validate_post`] so they cannot drift.
//!
//! Post form:
//! - Title: non-empty after trimming, at least 5 characters
//! - Content: markup stripped, non-empty after trimming, at least 50 characters
//!
//! Tag names (admin panel):
//! - Non-empty after trimming, at most 50 characters
//!
//! Registration:
//! - Username 3 to 32 characters, password 6 to 128 characters
//! - E-mail has exactly one `@` with text on both sides

use crate::i18n::{Language, MessageKey};
use crate::model::RegisterRequest;
use crate::text::text_content;
use std::collections::BTreeMap;

/// Field name → message. Shared with the server's `validationErrors`.
pub type FieldErrors = BTreeMap<String, String>;

pub const TITLE_MIN_CHARS: usize = 5;
pub const CONTENT_MIN_CHARS: usize = 50;
pub const TAG_NAME_MAX_CHARS: usize = 50;
pub const USERNAME_CHARS: std::ops::RangeInclusive<usize> = 3..=32;
pub const PASSWORD_CHARS: std::ops::RangeInclusive<usize> = 6..=128;

/// Validates a post title and HTML body.
///
/// # Examples
/// ```
/// use blogapp::i18n::Language;
/// use blogapp::validation::validate_post;
///
/// let body = "<p>".to_string() + &"x".repeat(50) + "</p>";
/// assert!(validate_post("Hello", &body, Language::En).is_empty());
/// assert!(validate_post("Hi", &body, Language::En).contains_key("title"));
/// assert!(validate_post("Hello", "<p>short</p>", Language::En).contains_key("content"));
/// ```
pub fn validate_post(title: &str, content: &str, language: Language) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let title = title.trim();
    if title.is_empty() {
        errors.insert("title".into(), MessageKey::TitleRequired.text(language).into());
    } else if title.chars().count() < TITLE_MIN_CHARS {
        errors.insert("title".into(), MessageKey::TitleTooShort.text(language).into());
    }

    let text = text_content(content);
    let text = text.trim();
    if text.is_empty() {
        errors.insert(
            "content".into(),
            MessageKey::ContentRequired.text(language).into(),
        );
    } else if text.chars().count() < CONTENT_MIN_CHARS {
        errors.insert(
            "content".into(),
            MessageKey::ContentTooShort.text(language).into(),
        );
    }

    errors
}

/// Error type for tag name validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagNameError {
    /// Name is empty or whitespace only
    Empty,
    /// Name is longer than [`TAG_NAME_MAX_CHARS`] (actual length attached)
    TooLong(usize),
}

impl TagNameError {
    pub fn message_key(&self) -> MessageKey {
        match self {
            TagNameError::Empty => MessageKey::TagNameEmpty,
            TagNameError::TooLong(_) => MessageKey::TagNameTooLong,
        }
    }
}

impl std::fmt::Display for TagNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagNameError::Empty => write!(f, "tag name cannot be empty"),
            TagNameError::TooLong(len) => write!(
                f,
                "tag name is {} characters long (at most {} allowed)",
                len, TAG_NAME_MAX_CHARS
            ),
        }
    }
}

impl std::error::Error for TagNameError {}

/// Validates a tag name and returns it trimmed.
pub fn validate_tag_name(name: &str) -> Result<String, TagNameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TagNameError::Empty);
    }
    let len = name.chars().count();
    if len > TAG_NAME_MAX_CHARS {
        return Err(TagNameError::TooLong(len));
    }
    Ok(name.to_string())
}

pub fn validate_registration(request: &RegisterRequest, language: Language) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if !USERNAME_CHARS.contains(&request.username.trim().chars().count()) {
        errors.insert(
            "username".into(),
            MessageKey::UsernameLength.text(language).into(),
        );
    }
    if !is_plausible_email(request.email.trim()) {
        errors.insert("email".into(), MessageKey::EmailInvalid.text(language).into());
    }
    if !PASSWORD_CHARS.contains(&request.password.chars().count()) {
        errors.insert(
            "password".into(),
            MessageKey::PasswordLength.text(language).into(),
        );
    }

    errors
}

fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        _ => false,
    }
}
