//! # Pages
//!
//! UI-agnostic page logic. Each module mirrors one route: loaders fetch
//! through the [`crate::api::BlogApi`] and return plain view models, actions
//! perform a mutation, emit exactly one notice and navigate where the page
//! would.
//!
//! | Module | Route(s) |
//! |--------|----------|
//! | [`home`] | `/` |
//! | [`post_detail`] | `/post/:id` |
//! | [`editor`] | `/create-post`, `/edit-post/:id` |
//! | [`profile`] | `/profile` |
//! | [`admin`] | `/admin` |
//!
//! ## Failed Reads
//!
//! Listings never fail outright. When the server cannot be reached the page
//! shows an empty listing and only a warning is logged; when the server
//! answers with an error the user is notified and the listing is empty. The
//! admin panel notifies in both cases.
//!
//! Pages do not check access themselves. Callers open them through
//! [`crate::guard::Navigator::open`].

pub mod admin;
pub mod editor;
pub mod home;
pub mod post_detail;
pub mod profile;

use crate::app::BlogApp;
use crate::error::BlogError;
use crate::http::Transport;
use crate::i18n::MessageKey;
use crate::store::StorageBackend;

/// Degrades a failed listing read: log when offline, notify otherwise.
pub(crate) fn report_read_failure<T: Transport, B: StorageBackend + 'static>(
    app: &BlogApp<T, B>,
    err: &BlogError,
    key: MessageKey,
    what: &str,
) {
    match err {
        BlogError::Unreachable(reason) => {
            tracing::warn!(%reason, "Server unreachable, showing empty {}", what);
        }
        BlogError::Unexpected(reason) => {
            tracing::error!(%reason, "Failed to load {}", what);
        }
        other => {
            tracing::debug!(error = %other, "Failed to load {}", what);
            app.notify_error(key);
        }
    }
}
