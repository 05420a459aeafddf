//! Profile page (`/profile`): the signed-in user and their posts.

use super::report_read_failure;
use crate::app::BlogApp;
use crate::error::{BlogError, Result};
use crate::http::Transport;
use crate::i18n::MessageKey;
use crate::model::{Post, ProfileUpdate, User};
use crate::store::StorageBackend;

#[derive(Debug, Clone)]
pub struct ProfileView {
    pub user: User,
    pub posts: Vec<Post>,
}

/// `None` when nobody is signed in.
pub fn load<T: Transport, B: StorageBackend + 'static>(app: &BlogApp<T, B>) -> Option<ProfileView> {
    let user = app.session.current()?;
    let posts = match app.api.get_posts_by_user(user.id) {
        Ok(posts) => posts,
        Err(e) => {
            report_read_failure(app, &e, MessageKey::UserPostsLoadError, "user posts");
            Vec::new()
        }
    };
    Some(ProfileView { user, posts })
}

/// Deletes one of the listed posts and drops it from the view.
pub fn delete_post<T: Transport, B: StorageBackend + 'static>(
    app: &BlogApp<T, B>,
    view: &mut ProfileView,
    id: i64,
) -> bool {
    match app.api.delete_post(id) {
        Ok(()) => {
            view.posts.retain(|p| p.id != id);
            app.notify_success(MessageKey::PostDeleted);
            true
        }
        Err(e) => {
            tracing::debug!(id, error = %e, "Failed to delete post");
            app.notify_failure(&e, MessageKey::PostDeleteFailed);
            false
        }
    }
}

/// Sends a profile change and adopts the returned user as the session user.
/// A blank password is left out of the request.
pub fn update<T: Transport, B: StorageBackend + 'static>(
    app: &BlogApp<T, B>,
    mut update: ProfileUpdate,
) -> Result<User> {
    update.username = update.username.trim().to_string();
    update.email = update.email.trim().to_string();
    update.password = update.password.filter(|p| !p.is_empty());

    let user = app.api.update_profile(&update).inspect_err(|e| {
        tracing::debug!(error = %e, "Profile update failed");
        app.notify_failure(e, MessageKey::ProfileUpdateFailed);
    })?;

    if let Err(e) = app.session.replace_user(user.clone()) {
        tracing::warn!(error = %e, "Failed to persist updated profile");
        app.notify_failure(&e, MessageKey::ProfileUpdateFailed);
        return Err(e);
    }
    app.notify_success(MessageKey::ProfileUpdated);
    Ok(user)
}

/// Fetches the server's view of the signed-in user.
pub fn fetch<T: Transport, B: StorageBackend + 'static>(app: &BlogApp<T, B>) -> Result<User> {
    if !app.session.is_authenticated() {
        return Err(BlogError::Unauthorized { message: None });
    }
    app.api.get_profile().inspect_err(|e| {
        app.notify_failure(e, MessageKey::ProfileLoadError);
    })
}
