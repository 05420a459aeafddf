//! Post editor for `/create-post` and `/edit-post/:id`.
//!
//! Both routes share [`PostForm`] and its validation, so the rules for a new
//! post and an edited one are the same by construction. A form with errors
//! never reaches the network.

use crate::app::BlogApp;
use crate::guard::Route;
use crate::http::Transport;
use crate::i18n::{Language, MessageKey};
use crate::model::{Post, PostRequest, Tag};
use crate::store::StorageBackend;
use crate::validation::{validate_post, FieldErrors};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    /// HTML body.
    pub content: String,
    pub tag_ids: Vec<i64>,
    pub errors: FieldErrors,
}

impl PostForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-filled from an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            tag_ids: post.tag_ids(),
            errors: FieldErrors::new(),
        }
    }

    /// Editing a field clears its error.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.errors.remove("title");
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.errors.remove("content");
    }

    /// Selects the tag if unselected, otherwise deselects it.
    pub fn toggle_tag(&mut self, id: i64) {
        if let Some(pos) = self.tag_ids.iter().position(|&t| t == id) {
            self.tag_ids.remove(pos);
        } else {
            self.tag_ids.push(id);
        }
    }

    /// Runs validation, storing the errors. True when the form can be sent.
    pub fn validate(&mut self, language: Language) -> bool {
        self.errors = validate_post(&self.title, &self.content, language);
        self.errors.is_empty()
    }

    pub fn to_request(&self) -> PostRequest {
        PostRequest {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
            tag_ids: self.tag_ids.clone(),
        }
    }

    pub fn selected_tags<'a>(&self, available: &'a [Tag]) -> Vec<&'a Tag> {
        available
            .iter()
            .filter(|t| self.tag_ids.contains(&t.id))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(i64),
}

impl EditorMode {
    fn success_key(self) -> MessageKey {
        match self {
            EditorMode::Create => MessageKey::PostCreated,
            EditorMode::Edit(_) => MessageKey::PostUpdated,
        }
    }

    fn failure_key(self) -> MessageKey {
        match self {
            EditorMode::Create => MessageKey::PostCreateFailed,
            EditorMode::Edit(_) => MessageKey::PostUpdateFailed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorView {
    pub mode: EditorMode,
    pub form: PostForm,
    pub available_tags: Vec<Tag>,
}

/// An empty form for a new post.
pub fn open_create<T: Transport, B: StorageBackend + 'static>(app: &BlogApp<T, B>) -> EditorView {
    EditorView {
        mode: EditorMode::Create,
        form: PostForm::new(),
        available_tags: load_tags(app),
    }
}

/// A form pre-filled from post `id`. If the post cannot be loaded the user
/// is notified and sent home.
pub fn open_edit<T: Transport, B: StorageBackend + 'static>(
    app: &BlogApp<T, B>,
    id: i64,
) -> Option<EditorView> {
    let available_tags = load_tags(app);
    match app.api.get_post_by_id(id) {
        Ok(post) => Some(EditorView {
            mode: EditorMode::Edit(id),
            form: PostForm::from_post(&post),
            available_tags,
        }),
        Err(e) => {
            tracing::debug!(id, error = %e, "Failed to load post for editing");
            app.notify_error(MessageKey::PostsLoadError);
            app.navigator.navigate(Route::Home);
            None
        }
    }
}

/// Validates and sends the form. Returns the saved post on success, after
/// navigating to it.
pub fn submit<T: Transport, B: StorageBackend + 'static>(
    app: &BlogApp<T, B>,
    view: &mut EditorView,
) -> Option<Post> {
    if !view.form.validate(app.language()) {
        tracing::debug!(errors = ?view.form.errors, "Post form rejected");
        return None;
    }

    let request = view.form.to_request();
    let result = match view.mode {
        EditorMode::Create => app.api.create_post(&request),
        EditorMode::Edit(id) => app.api.update_post(id, &request),
    };

    match result {
        Ok(post) => {
            tracing::info!(id = post.id, "Post saved");
            app.notify_success(view.mode.success_key());
            let id = match view.mode {
                EditorMode::Edit(id) => id,
                EditorMode::Create => post.id,
            };
            app.navigator.navigate(Route::Post(id));
            Some(post)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to save post");
            app.notify_failure(&e, view.mode.failure_key());
            None
        }
    }
}

fn load_tags<T: Transport, B: StorageBackend + 'static>(app: &BlogApp<T, B>) -> Vec<Tag> {
    app.api.get_all_tags().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load tags for the editor");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_tag_is_a_set() {
        let mut form = PostForm::new();
        form.toggle_tag(1);
        form.toggle_tag(2);
        form.toggle_tag(1);
        assert_eq!(form.tag_ids, vec![2]);
    }

    #[test]
    fn test_editing_clears_field_error() {
        let mut form = PostForm::new();
        assert!(!form.validate(Language::En));
        assert!(form.errors.contains_key("title"));

        form.set_title("A good title");
        assert!(!form.errors.contains_key("title"));
        assert!(form.errors.contains_key("content"));
    }

    #[test]
    fn test_request_trims_title() {
        let mut form = PostForm::new();
        form.set_title("  Hello there ");
        form.set_content("<p>body</p>");
        form.toggle_tag(4);
        let request = form.to_request();
        assert_eq!(request.title, "Hello there");
        assert_eq!(request.tag_ids, vec![4]);
    }

    #[test]
    fn test_selected_tags() {
        let tags = vec![
            Tag {
                id: 1,
                name: "rust".into(),
            },
            Tag {
                id: 2,
                name: "go".into(),
            },
        ];
        let mut form = PostForm::new();
        form.toggle_tag(2);
        let selected = form.selected_tags(&tags);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "go");
    }
}
