//! Home page: the paged, searchable post listing.

use super::report_read_failure;
use crate::app::BlogApp;
use crate::http::Transport;
use crate::i18n::{Language, MessageKey};
use crate::model::{Page, Post};
use crate::pagination::{total_pages, Pager};
use crate::store::StorageBackend;
use crate::text::{excerpt, format_date};
use chrono::NaiveDateTime;

/// Tags shown on a card before collapsing the rest into a count.
pub const MAX_CARD_TAGS: usize = 3;

/// One post as shown in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub created_at: NaiveDateTime,
    pub date: String,
    pub tags: Vec<String>,
    /// Tags beyond [`MAX_CARD_TAGS`], shown as `+N`.
    pub hidden_tags: usize,
}

impl PostCard {
    pub fn from_post(post: &Post, language: Language, excerpt_chars: usize) -> Self {
        let tags: Vec<String> = post
            .tags
            .iter()
            .take(MAX_CARD_TAGS)
            .map(|t| t.name.clone())
            .collect();
        Self {
            id: post.id,
            title: post.title.clone(),
            excerpt: excerpt(&post.content, excerpt_chars),
            author: post.author_username.clone(),
            created_at: post.created_at,
            date: format_date(&post.created_at, language, false),
            hidden_tags: post.tags.len().saturating_sub(MAX_CARD_TAGS),
            tags,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HomeView {
    pub cards: Vec<PostCard>,
    pub pager: Pager,
    pub page_size: u32,
    pub total_elements: u64,
    pub search: Option<String>,
}

impl HomeView {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// 1-based range of posts on this page.
    pub fn showing(&self) -> (u64, u64) {
        self.pager.showing(self.page_size, self.total_elements)
    }
}

/// Loads page `page` of the listing, filtered by `search` when given.
pub fn load<T: Transport, B: StorageBackend + 'static>(
    app: &BlogApp<T, B>,
    page: u32,
    search: Option<&str>,
) -> HomeView {
    let size = app.config.page_size;
    let search = search.map(str::trim).filter(|s| !s.is_empty());

    let result = match app.api.get_all_posts(page, size, search) {
        Ok(result) => result,
        Err(e) => {
            report_read_failure(app, &e, MessageKey::PostsLoadError, "post listing");
            Page::empty()
        }
    };

    build(app, result, page, size, search)
}

fn build<T: Transport, B: StorageBackend + 'static>(
    app: &BlogApp<T, B>,
    result: Page<Post>,
    page: u32,
    size: u32,
    search: Option<&str>,
) -> HomeView {
    let language = app.language();
    let pages = if result.total_pages == 0 && result.total_elements > 0 {
        total_pages(result.total_elements, size)
    } else {
        result.total_pages
    };

    HomeView {
        cards: result
            .content
            .iter()
            .map(|post| PostCard::from_post(post, language, app.config.excerpt_chars))
            .collect(),
        pager: Pager::new(page, pages),
        page_size: size,
        total_elements: result.total_elements,
        search: search.map(str::to_string),
    }
}
