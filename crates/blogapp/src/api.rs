//! # API Facade
//!
//! A **thin facade** over the HTTP adapter: one typed function per remote
//! endpoint, grouped by resource. It is the single entry point for data access
//! regardless of the UI in front of it.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Builds requests**: paths, query parameters and request bodies
//! - **Normalizes inputs**: search terms are trimmed and omitted when blank
//! - **Enforces response invariants**: a page never holds more than the
//!   requested size and a post's tags are unique by id
//! - **Returns typed results** (`Result<Post>`, `Result<Page<Post>>`, ...)
//!
//! ## What the Facade Does NOT Do
//!
//! - **Session changes**: persisting a login is the session store's job
//! - **Notifications**: callers decide what the user sees
//! - **401 handling**: already done by the adapter before an error reaches here
//!
//! ## Endpoints
//!
//! | Function | Request |
//! |----------|---------|
//! | [`BlogApi::login`] | `POST /auth/login` |
//! | [`BlogApi::register`] | `POST /auth/register` |
//! | [`BlogApi::get_all_posts`] | `GET /posts?page&size[&search]` |
//! | [`BlogApi::get_post_by_id`] | `GET /posts/{id}` |
//! | [`BlogApi::create_post`] | `POST /posts` |
//! | [`BlogApi::update_post`] | `PUT /posts/{id}` |
//! | [`BlogApi::delete_post`] | `DELETE /posts/{id}` |
//! | [`BlogApi::get_posts_by_user`] | `GET /posts/user/{userId}` |
//! | [`BlogApi::get_all_tags`] | `GET /tags` |
//! | [`BlogApi::get_tag_by_id`] | `GET /tags/{id}` |
//! | [`BlogApi::create_tag`] | `POST /tags` |
//! | [`BlogApi::update_tag`] | `PUT /tags/{id}` |
//! | [`BlogApi::delete_tag`] | `DELETE /tags/{id}` |
//! | [`BlogApi::get_all_users`] | `GET /users` |
//! | [`BlogApi::get_user_by_id`] | `GET /users/{id}` |
//! | [`BlogApi::get_profile`] | `GET /users/profile` |
//! | [`BlogApi::update_profile`] | `PUT /users/profile` |
//!
//! ## Generic Over Transport and Storage
//!
//! `BlogApi<T: Transport, B: StorageBackend>`:
//! - Production: `BlogApi<ReqwestTransport, FsBackend>`
//! - Testing: `BlogApi<FakeBlogServer, MemBackend>`

use crate::error::Result;
use crate::http::{HttpClient, Transport};
use crate::model::{
    LoginRequest, LoginResponse, Page, Post, PostRequest, ProfileUpdate, RegisterRequest, Tag,
    TagRequest, User,
};
use crate::store::StorageBackend;

/// Typed access to the blog API.
pub struct BlogApi<T: Transport, B: StorageBackend> {
    client: HttpClient<T, B>,
}

impl<T: Transport, B: StorageBackend> BlogApi<T, B> {
    pub fn new(client: HttpClient<T, B>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &HttpClient<T, B> {
        &self.client
    }

    // --- Auth ---

    pub fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        self.client.post("/auth/login", credentials)
    }

    /// Creates an account. The response body is not used: registering never
    /// logs anyone in.
    pub fn register(&self, profile: &RegisterRequest) -> Result<()> {
        self.client.post_unit("/auth/register", profile)
    }

    // --- Posts ---

    /// One page of posts, newest first as ordered by the server.
    ///
    /// `search` is trimmed and left out of the query entirely when blank.
    pub fn get_all_posts(&self, page: u32, size: u32, search: Option<&str>) -> Result<Page<Post>> {
        let mut query = vec![("page", page.to_string()), ("size", size.to_string())];
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            query.push(("search", term.to_string()));
        }

        let mut result: Page<Post> = self.client.get("/posts", &query)?;
        if result.content.len() > size as usize {
            tracing::warn!(
                returned = result.content.len(),
                size,
                "Server returned more posts than requested, truncating"
            );
            result.content.truncate(size as usize);
        }
        result.content.iter_mut().for_each(Post::dedup_tags);
        Ok(result)
    }

    pub fn get_post_by_id(&self, id: i64) -> Result<Post> {
        let mut post: Post = self.client.get(&format!("/posts/{}", id), &[])?;
        post.dedup_tags();
        Ok(post)
    }

    pub fn create_post(&self, post: &PostRequest) -> Result<Post> {
        let mut created: Post = self.client.post("/posts", &dedup_ids(post))?;
        created.dedup_tags();
        Ok(created)
    }

    pub fn update_post(&self, id: i64, post: &PostRequest) -> Result<Post> {
        let mut updated: Post = self.client.put(&format!("/posts/{}", id), &dedup_ids(post))?;
        updated.dedup_tags();
        Ok(updated)
    }

    pub fn delete_post(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/posts/{}", id))
    }

    /// Every post by one author, as a flat list.
    pub fn get_posts_by_user(&self, user_id: i64) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.client.get(&format!("/posts/user/{}", user_id), &[])?;
        posts.iter_mut().for_each(Post::dedup_tags);
        Ok(posts)
    }

    // --- Tags ---

    pub fn get_all_tags(&self) -> Result<Vec<Tag>> {
        self.client.get("/tags", &[])
    }

    pub fn get_tag_by_id(&self, id: i64) -> Result<Tag> {
        self.client.get(&format!("/tags/{}", id), &[])
    }

    pub fn create_tag(&self, tag: &TagRequest) -> Result<Tag> {
        self.client.post("/tags", tag)
    }

    pub fn update_tag(&self, id: i64, tag: &TagRequest) -> Result<Tag> {
        self.client.put(&format!("/tags/{}", id), tag)
    }

    pub fn delete_tag(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/tags/{}", id))
    }

    // --- Users ---

    pub fn get_all_users(&self) -> Result<Vec<User>> {
        self.client.get("/users", &[])
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<User> {
        self.client.get(&format!("/users/{}", id), &[])
    }

    pub fn get_profile(&self) -> Result<User> {
        self.client.get("/users/profile", &[])
    }

    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.client.put("/users/profile", update)
    }
}

/// Tag ids form a set; the first occurrence wins.
fn dedup_ids(post: &PostRequest) -> PostRequest {
    let mut seen = std::collections::HashSet::new();
    PostRequest {
        title: post.title.clone(),
        content: post.content.clone(),
        tag_ids: post
            .tag_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ApiRequest, ApiResponse, Method, TransportError};
    use crate::store::mem_backend::MemBackend;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Replies with a queued body to each request and records the request.
    #[derive(Default)]
    struct Scripted {
        replies: RefCell<Vec<String>>,
        seen: RefCell<Vec<ApiRequest>>,
    }

    impl Transport for Scripted {
        fn send(&self, request: &ApiRequest) -> std::result::Result<ApiResponse, TransportError> {
            self.seen.borrow_mut().push(request.clone());
            let body = self.replies.borrow_mut().pop().unwrap_or_default();
            Ok(ApiResponse { status: 200, body })
        }
    }

    fn api_replying(body: &str) -> BlogApi<Scripted, MemBackend> {
        let transport = Scripted::default();
        transport.replies.borrow_mut().push(body.to_string());
        let client = HttpClient::new(
            "http://api.test/api",
            transport,
            Rc::new(MemBackend::new()),
            Box::new(|| {}),
        );
        BlogApi::new(client)
    }

    fn last_request(api: &BlogApi<Scripted, MemBackend>) -> ApiRequest {
        api.client()
            .transport()
            .seen
            .borrow()
            .last()
            .cloned()
            .unwrap()
    }

    fn post_json(id: i64, tags: &str) -> String {
        format!(
            r#"{{"id":{},"title":"Title {}","content":"<p>x</p>","authorUsername":"ayse","createdAt":"2024-05-01T10:00:00","tags":{}}}"#,
            id, id, tags
        )
    }

    #[test]
    fn test_search_is_trimmed() {
        let api = api_replying("{}");
        api.get_all_posts(0, 6, Some("  rust  ")).unwrap();

        let req = last_request(&api);
        assert_eq!(req.path, "/posts");
        assert_eq!(req.query_param("page"), Some("0"));
        assert_eq!(req.query_param("size"), Some("6"));
        assert_eq!(req.query_param("search"), Some("rust"));
    }

    #[test]
    fn test_blank_search_is_omitted() {
        for search in [None, Some(""), Some("   \t")] {
            let api = api_replying("{}");
            api.get_all_posts(1, 6, search).unwrap();
            assert_eq!(last_request(&api).query_param("search"), None);
        }
    }

    #[test]
    fn test_oversized_page_is_truncated() {
        let posts: Vec<String> = (1..=4).map(|id| post_json(id, "[]")).collect();
        let body = format!(
            r#"{{"content":[{}],"totalPages":2,"totalElements":4}}"#,
            posts.join(",")
        );
        let api = api_replying(&body);

        let page = api.get_all_posts(0, 3, None).unwrap();
        assert_eq!(page.content.len(), 3);
        assert_eq!(page.total_elements, 4);
    }

    #[test]
    fn test_post_tags_are_deduplicated() {
        let api = api_replying(&post_json(9, r#"[{"id":1,"name":"a"},{"id":1,"name":"a"}]"#));
        let post = api.get_post_by_id(9).unwrap();
        assert_eq!(post.tag_ids(), vec![1]);
        assert_eq!(last_request(&api).path, "/posts/9");
    }

    #[test]
    fn test_create_post_sends_unique_tag_ids() {
        let api = api_replying(&post_json(1, "[]"));
        let request = PostRequest {
            title: "Hello".into(),
            content: "<p>body</p>".into(),
            tag_ids: vec![3, 1, 3],
        };
        api.create_post(&request).unwrap();

        let req = last_request(&api);
        assert_eq!(req.method, Method::Post);
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["tagIds"], serde_json::json!([3, 1]));
    }

    #[test]
    fn test_register_ignores_response_body() {
        let api = api_replying("Kayıt başarılı");
        // A non-JSON success body must not fail the call
        let request = RegisterRequest {
            username: "ayse".into(),
            email: "a@b".into(),
            password: "secret1".into(),
        };
        assert!(api.register(&request).is_ok());
        assert_eq!(last_request(&api).path, "/auth/register");
    }

    #[test]
    fn test_resource_paths() {
        let api = api_replying("[]");
        api.get_posts_by_user(5).unwrap();
        assert_eq!(last_request(&api).path, "/posts/user/5");

        let api = api_replying(r#"{"id":2,"name":"go"}"#);
        api.update_tag(2, &TagRequest { name: "go".into() }).unwrap();
        let req = last_request(&api);
        assert_eq!((req.method, req.path.as_str()), (Method::Put, "/tags/2"));

        let api = api_replying("");
        api.delete_post(4).unwrap();
        let req = last_request(&api);
        assert_eq!((req.method, req.path.as_str()), (Method::Delete, "/posts/4"));

        let api = api_replying(r#"{"id":1,"username":"a","email":"a@b","role":"USER"}"#);
        api.get_profile().unwrap();
        assert_eq!(last_request(&api).path, "/users/profile");
    }
}
