//! Admin panel (`/admin`): posts, tags and users.
//!
//! Loads always notify on failure, whatever the cause, and fall back to an
//! empty tab. Tag names are validated before any request.

use crate::app::BlogApp;
use crate::http::Transport;
use crate::i18n::MessageKey;
use crate::model::{Page, Post, Tag, TagRequest, User};
use crate::pagination::{total_pages, Pager};
use crate::store::StorageBackend;
use crate::validation::validate_tag_name;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Posts,
    Tags,
    Users,
}

impl fmt::Display for AdminTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AdminTab::Posts => "posts",
            AdminTab::Tags => "tags",
            AdminTab::Users => "users",
        })
    }
}

impl FromStr for AdminTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "posts" => Ok(AdminTab::Posts),
            "tags" => Ok(AdminTab::Tags),
            "users" => Ok(AdminTab::Users),
            other => Err(format!("unknown admin tab: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminPosts {
    pub page: Page<Post>,
    pub pager: Pager,
    pub page_size: u32,
}

pub fn load_posts<T: Transport, B: StorageBackend + 'static>(
    app: &BlogApp<T, B>,
    page: u32,
) -> AdminPosts {
    let size = app.config.admin_page_size;
    let result = app.api.get_all_posts(page, size, None).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load posts for the admin panel");
        app.notify_error(MessageKey::PostsLoadError);
        Page::empty()
    });
    let pages = if result.total_pages == 0 {
        total_pages(result.total_elements, size)
    } else {
        result.total_pages
    };
    AdminPosts {
        pager: Pager::new(page, pages),
        page: result,
        page_size: size,
    }
}

pub fn load_tags<T: Transport, B: StorageBackend + 'static>(app: &BlogApp<T, B>) -> Vec<Tag> {
    app.api.get_all_tags().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load tags");
        app.notify_error(MessageKey::TagsLoadError);
        Vec::new()
    })
}

pub fn load_users<T: Transport, B: StorageBackend + 'static>(app: &BlogApp<T, B>) -> Vec<User> {
    app.api.get_all_users().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load users");
        app.notify_error(MessageKey::UsersLoadError);
        Vec::new()
    })
}

pub fn delete_post<T: Transport, B: StorageBackend + 'static>(app: &BlogApp<T, B>, id: i64) -> bool {
    match app.api.delete_post(id) {
        Ok(()) => {
            app.notify_success(MessageKey::PostDeleted);
            true
        }
        Err(e) => {
            app.notify_failure(&e, MessageKey::PostDeleteFailed);
            false
        }
    }
}

pub fn create_tag<T: Transport, B: StorageBackend + 'static>(
    app: &BlogApp<T, B>,
    name: &str,
) -> Option<Tag> {
    let name = match validate_tag_name(name) {
        Ok(name) => name,
        Err(e) => {
            app.notify_error(e.message_key());
            return None;
        }
    };
    match app.api.create_tag(&TagRequest { name }) {
        Ok(tag) => {
            tracing::info!(id = tag.id, name = %tag.name, "Tag created");
            app.notify_success(MessageKey::TagCreated);
            Some(tag)
        }
        Err(e) => {
            app.notify_failure(&e, MessageKey::TagCreateFailed);
            None
        }
    }
}

pub fn rename_tag<T: Transport, B: StorageBackend + 'static>(
    app: &BlogApp<T, B>,
    id: i64,
    name: &str,
) -> Option<Tag> {
    let name = match validate_tag_name(name) {
        Ok(name) => name,
        Err(e) => {
            app.notify_error(e.message_key());
            return None;
        }
    };
    match app.api.update_tag(id, &TagRequest { name }) {
        Ok(tag) => {
            app.notify_success(MessageKey::TagUpdated);
            Some(tag)
        }
        Err(e) => {
            app.notify_failure(&e, MessageKey::TagUpdateFailed);
            None
        }
    }
}

pub fn delete_tag<T: Transport, B: StorageBackend + 'static>(app: &BlogApp<T, B>, id: i64) -> bool {
    match app.api.delete_tag(id) {
        Ok(()) => {
            app.notify_success(MessageKey::TagDeleted);
            true
        }
        Err(e) => {
            app.notify_failure(&e, MessageKey::TagDeleteFailed);
            false
        }
    }
}
