//! Post detail page (`/post/:id`).

use crate::app::BlogApp;
use crate::error::BlogError;
use crate::guard::Route;
use crate::http::Transport;
use crate::i18n::MessageKey;
use crate::model::Post;
use crate::notice::Notice;
use crate::store::StorageBackend;
use crate::text::format_date;

#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    /// Date with time, in the active language.
    pub date: String,
    /// The viewer is the author or an admin.
    pub can_edit: bool,
}

/// Loads a post. Any failure is reported and sends the user back home.
pub fn load<T: Transport, B: StorageBackend + 'static>(app: &BlogApp<T, B>, id: i64) -> Option<PostView> {
    match app.api.get_post_by_id(id) {
        Ok(post) => {
            let can_edit = app
                .session
                .current()
                .is_some_and(|user| post.is_editable_by(&user));
            Some(PostView {
                date: format_date(&post.created_at, app.language(), true),
                can_edit,
                post,
            })
        }
        Err(e) => {
            tracing::debug!(id, error = %e, "Failed to load post");
            app.notifier.notify(Notice::error(load_error_message(app, &e)));
            app.navigator.navigate(Route::Home);
            None
        }
    }
}

/// Deletes the post. On success the user lands on the home page.
pub fn delete<T: Transport, B: StorageBackend + 'static>(app: &BlogApp<T, B>, id: i64) -> bool {
    match app.api.delete_post(id) {
        Ok(()) => {
            tracing::info!(id, "Post deleted");
            app.notify_success(MessageKey::PostDeleted);
            app.navigator.navigate(Route::Home);
            true
        }
        Err(e) => {
            tracing::debug!(id, error = %e, "Failed to delete post");
            app.notify_failure(&e, MessageKey::PostDeleteFailed);
            false
        }
    }
}

/// 404 first, then the server's message, then the network, then generic.
fn load_error_message<T: Transport, B: StorageBackend + 'static>(
    app: &BlogApp<T, B>,
    err: &BlogError,
) -> String {
    if err.is_not_found() {
        return app.text(MessageKey::PostNotFound).to_string();
    }
    match err {
        BlogError::Api {
            message: Some(message),
            ..
        } => message.clone(),
        BlogError::Unreachable(_) => app.text(MessageKey::ServerUnreachable).to_string(),
        _ => app.text(MessageKey::Unexpected).to_string(),
    }
}
