use crate::i18n::{Language, MessageKey};
use crate::validation::FieldErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlogError {
    /// Rejected locally before any request was sent.
    #[error("validation failed: {}", first_message(.0).unwrap_or("invalid input"))]
    Validation(FieldErrors),

    /// The server answered 401. Outside `/auth/*` the adapter has already
    /// cleared the session.
    #[error("{}", .message.as_deref().unwrap_or("not authorized"))]
    Unauthorized { message: Option<String> },

    #[error("{}", api_message(.status, .message))]
    Api {
        status: u16,
        message: Option<String>,
        validation_errors: FieldErrors,
    },

    /// No response at all: connection refused, DNS failure, timeout.
    #[error("server unreachable: {0}")]
    Unreachable(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid route: {0}")]
    Route(String),
}

pub type Result<T> = std::result::Result<T, BlogError>;

fn api_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) if !message.trim().is_empty() => message.clone(),
        _ => format!("request failed with status {}", status),
    }
}

fn first_message(errors: &FieldErrors) -> Option<&str> {
    errors.values().next().map(String::as_str)
}

impl BlogError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BlogError::Api { status, .. } => Some(*status),
            BlogError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, BlogError::Unreachable(_))
    }

    /// The message shown to the user for a failed operation.
    ///
    /// Priority: the server's `message`, then its first field error, then the
    /// generic network message, then `fallback`.
    pub fn user_message(&self, language: Language, fallback: MessageKey) -> String {
        match self {
            BlogError::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            BlogError::Unauthorized {
                message: Some(message),
            } if !message.trim().is_empty() => message.clone(),
            BlogError::Api {
                validation_errors, ..
            } if !validation_errors.is_empty() => first_message(validation_errors)
                .map(str::to_string)
                .unwrap_or_else(|| fallback.text(language).to_string()),
            BlogError::Validation(errors) if !errors.is_empty() => first_message(errors)
                .map(str::to_string)
                .unwrap_or_else(|| fallback.text(language).to_string()),
            BlogError::Unreachable(_) => MessageKey::ServerUnreachable.text(language).to_string(),
            _ => fallback.text(language).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: Option<&str>, fields: &[(&str, &str)]) -> BlogError {
        BlogError::Api {
            status,
            message: message.map(str::to_string),
            validation_errors: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_server_message_wins() {
        let err = api(400, Some("Title taken"), &[("title", "too short")]);
        assert_eq!(
            err.user_message(Language::En, MessageKey::PostUpdateFailed),
            "Title taken"
        );
    }

    #[test]
    fn test_first_field_error_when_no_message() {
        let err = api(400, None, &[("content", "too short"), ("title", "blank")]);
        assert_eq!(
            err.user_message(Language::En, MessageKey::PostUpdateFailed),
            "too short"
        );
    }

    #[test]
    fn test_blank_server_message_is_ignored() {
        let err = api(500, Some("  "), &[]);
        assert_eq!(
            err.user_message(Language::En, MessageKey::LoginFailed),
            MessageKey::LoginFailed.text(Language::En)
        );
    }

    #[test]
    fn test_unreachable_uses_network_message() {
        let err = BlogError::Unreachable("connection refused".into());
        assert_eq!(
            err.user_message(Language::Tr, MessageKey::LoginFailed),
            MessageKey::ServerUnreachable.text(Language::Tr)
        );
    }

    #[test]
    fn test_unexpected_falls_back() {
        let err = BlogError::Unexpected("boom".into());
        assert_eq!(
            err.user_message(Language::En, MessageKey::Unexpected),
            MessageKey::Unexpected.text(Language::En)
        );
    }

    #[test]
    fn test_api_display_always_has_text() {
        assert_eq!(api(500, None, &[]).to_string(), "request failed with status 500");
        assert_eq!(api(409, Some("Duplicate"), &[]).to_string(), "Duplicate");
    }

    #[test]
    fn test_status_helpers() {
        assert!(api(404, None, &[]).is_not_found());
        assert_eq!(BlogError::Unauthorized { message: None }.status(), Some(401));
        assert_eq!(BlogError::Store("x".into()).status(), None);
    }

    #[test]
    fn test_unauthorized_prefers_server_message() {
        let err = BlogError::Unauthorized {
            message: Some("Invalid username or password".into()),
        };
        assert_eq!(
            err.user_message(Language::Tr, MessageKey::LoginFailed),
            "Invalid username or password"
        );
        assert_eq!(err.to_string(), "Invalid username or password");

        let bare = BlogError::Unauthorized { message: None };
        assert_eq!(
            bare.user_message(Language::En, MessageKey::LoginFailed),
            MessageKey::LoginFailed.text(Language::En)
        );
        assert_eq!(bare.to_string(), "not authorized");
    }
}
