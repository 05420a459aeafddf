//! Test doubles: an in-memory blog server and a ready-wired app.
//!
//! [`FakeBlogServer`] implements [`Transport`] by answering requests the way
//! the real API does (auth, pagination, search, ownership and admin checks,
//! 401/403/404 bodies), all in memory. Clones share state, so a test can keep
//! a handle while the HTTP client owns another.
//!
//! [`TestEnv`] wires a [`BlogApp`] over the fake server, a [`MemBackend`], a
//! [`RecordingNotifier`] and a [`RootFlags`] display root.

use crate::app::BlogApp;
use crate::config::BlogConfig;
use crate::http::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use crate::model::{Post, Role, Tag, User};
use crate::notice::RecordingNotifier;
use crate::pagination::total_pages;
use crate::preference::RootFlags;
use crate::store::mem_backend::MemBackend;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub const FAKE_API_URL: &str = "http://fake.blog/api";

#[derive(Default)]
struct ServerState {
    users: Vec<(User, String)>,
    tokens: HashMap<String, i64>,
    posts: Vec<Post>,
    tags: Vec<Tag>,
    next_id: i64,
    token_seq: u64,
    offline: bool,
    fail_next: Option<(u16, String)>,
    duplicate_tags: bool,
    ignore_page_size: bool,
    requests: Vec<ApiRequest>,
}

impl ServerState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().map(|(u, _)| u).find(|u| u.id == id)
    }
}

/// In-memory stand-in for the blog API.
#[derive(Clone, Default)]
pub struct FakeBlogServer {
    state: Rc<RefCell<ServerState>>,
}

type Reply = (u16, String);

fn reply(status: u16, body: Value) -> Reply {
    (status, body.to_string())
}

fn error(status: u16, message: &str) -> Reply {
    reply(status, json!({ "code": status.to_string(), "message": message }))
}

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 1)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap_or_default()
}

impl FakeBlogServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, username: &str, password: &str, role: Role) -> User {
        let mut state = self.state.borrow_mut();
        let user = User {
            id: state.next_id(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            role,
        };
        state.users.push((user.clone(), password.to_string()));
        user
    }

    pub fn add_tag(&self, name: &str) -> Tag {
        let mut state = self.state.borrow_mut();
        let tag = Tag {
            id: state.next_id(),
            name: name.to_string(),
        };
        state.tags.push(tag.clone());
        tag
    }

    pub fn add_post(&self, author: &User, title: &str, content: &str, tag_ids: &[i64]) -> Post {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let tags = state
            .tags
            .iter()
            .filter(|t| tag_ids.contains(&t.id))
            .cloned()
            .collect();
        let post = Post {
            id,
            title: title.to_string(),
            content: content.to_string(),
            author_id: Some(author.id),
            author_username: author.username.clone(),
            created_at: epoch() + Duration::minutes(id),
            tags,
        };
        state.posts.push(post.clone());
        post
    }

    /// Issues a token as a successful login would.
    pub fn issue_token(&self, user_id: i64) -> String {
        let mut state = self.state.borrow_mut();
        state.token_seq += 1;
        let token = format!("token-{}-{}", user_id, state.token_seq);
        state.tokens.insert(token.clone(), user_id);
        token
    }

    /// Every issued token stops working, as after a server-side expiry.
    pub fn revoke_tokens(&self) {
        self.state.borrow_mut().tokens.clear();
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.borrow_mut().offline = offline;
    }

    /// Answers the next request with `status` and `body`, whatever it is.
    pub fn fail_next(&self, status: u16, body: &str) {
        self.state.borrow_mut().fail_next = Some((status, body.to_string()));
    }

    /// Repeats every tag in post responses.
    pub fn set_duplicate_tags(&self, on: bool) {
        self.state.borrow_mut().duplicate_tags = on;
    }

    /// Returns every matching post regardless of the requested size.
    pub fn set_ignore_page_size(&self, on: bool) {
        self.state.borrow_mut().ignore_page_size = on;
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.state.borrow().requests.last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.state.borrow().posts.clone()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.state.borrow().tags.clone()
    }

    fn route(&self, request: &ApiRequest) -> Reply {
        let segments: Vec<&str> = request
            .path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        let body: Value = request
            .body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
            .unwrap_or(Value::Null);

        let caller = match self.caller(request) {
            Ok(caller) => caller,
            Err(reply) => return reply,
        };

        match (request.method, segments.as_slice()) {
            (Method::Post, ["auth", "login"]) => self.login(&body),
            (Method::Post, ["auth", "register"]) => self.register(&body),

            (Method::Get, ["posts"]) => self.list_posts(request),
            (Method::Post, ["posts"]) => match caller {
                Some(user) => self.save_post(None, &user, &body),
                None => error(401, "Authentication required"),
            },
            (Method::Get, ["posts", "user", id]) => match id.parse::<i64>() {
                Ok(id) => {
                    let state = self.state.borrow();
                    let posts: Vec<Post> = state
                        .posts
                        .iter()
                        .filter(|p| p.author_id == Some(id))
                        .cloned()
                        .collect();
                    reply(200, json!(self.decorate_all(posts)))
                }
                Err(_) => error(400, "Invalid user id"),
            },
            (method, ["posts", id]) => {
                let Ok(id) = id.parse::<i64>() else {
                    return error(400, "Invalid post id");
                };
                match method {
                    Method::Get => self.get_post(id),
                    _ => match caller {
                        Some(user) if method == Method::Put => self.save_post(Some(id), &user, &body),
                        Some(user) if method == Method::Delete => self.delete_post(id, &user),
                        Some(_) => error(405, "Method not allowed"),
                        None => error(401, "Authentication required"),
                    },
                }
            }

            (Method::Get, ["tags"]) => reply(200, json!(self.state.borrow().tags)),
            (Method::Get, ["tags", id]) => {
                let id = id.parse::<i64>().ok();
                let found = self.tags().into_iter().find(|t| Some(t.id) == id);
                match found {
                    Some(tag) => reply(200, json!(tag)),
                    None => error(404, "Tag not found"),
                }
            }
            (method, ["tags", rest @ ..]) => match caller {
                None => error(401, "Authentication required"),
                Some(user) if !user.is_admin() => error(403, "Access denied"),
                Some(_) => self.manage_tag(method, rest.first().copied(), &body),
            },

            (Method::Get, ["users", "profile"]) => match caller {
                Some(user) => reply(200, json!(user)),
                None => error(401, "Authentication required"),
            },
            (Method::Put, ["users", "profile"]) => match caller {
                Some(user) => self.update_profile(&user, &body),
                None => error(401, "Authentication required"),
            },
            (Method::Get, ["users"]) => match caller {
                Some(user) if user.is_admin() => {
                    let state = self.state.borrow();
                    let users: Vec<&User> = state.users.iter().map(|(u, _)| u).collect();
                    reply(200, json!(users))
                }
                Some(_) => error(403, "Access denied"),
                None => error(401, "Authentication required"),
            },
            (Method::Get, ["users", id]) => {
                let found = id
                    .parse::<i64>()
                    .ok()
                    .and_then(|id| self.state.borrow().user(id).cloned());
                match found {
                    Some(user) => reply(200, json!(user)),
                    None => error(404, "User not found"),
                }
            }

            _ => error(404, "Not found"),
        }
    }

    /// Resolves the bearer token. A token that is present but unknown is a
    /// 401 on every endpoint.
    fn caller(&self, request: &ApiRequest) -> Result<Option<User>, Reply> {
        let Some(header) = request.header("Authorization") else {
            return Ok(None);
        };
        let token = header.trim_start_matches("Bearer ").trim();
        let state = self.state.borrow();
        let user = state.tokens.get(token).and_then(|id| state.user(*id)).cloned();
        match user {
            Some(user) => Ok(Some(user)),
            None => Err(error(401, "Invalid or expired token")),
        }
    }

    fn login(&self, body: &Value) -> Reply {
        let username = body["username"].as_str().unwrap_or_default();
        let password = body["password"].as_str().unwrap_or_default();
        if username.trim().is_empty() || password.is_empty() {
            return reply(
                400,
                json!({
                    "code": "VALIDATION_ERROR",
                    "validationErrors": { "username": "Username is required" }
                }),
            );
        }

        let found = self
            .state
            .borrow()
            .users
            .iter()
            .find(|(u, p)| u.username == username && p == password)
            .map(|(u, _)| u.clone());
        match found {
            Some(user) => {
                let token = self.issue_token(user.id);
                reply(200, json!({ "token": token, "user": user }))
            }
            None => error(401, "Invalid username or password"),
        }
    }

    fn register(&self, body: &Value) -> Reply {
        let username = body["username"].as_str().unwrap_or_default();
        let password = body["password"].as_str().unwrap_or_default();
        let exists = self
            .state
            .borrow()
            .users
            .iter()
            .any(|(u, _)| u.username == username);
        if exists {
            return error(409, "Username is already taken");
        }
        let mut state = self.state.borrow_mut();
        let user = User {
            id: state.next_id(),
            username: username.to_string(),
            email: body["email"].as_str().unwrap_or_default().to_string(),
            role: Role::User,
        };
        state.users.push((user, password.to_string()));
        drop(state);
        reply(201, json!({ "message": "User registered successfully" }))
    }

    fn list_posts(&self, request: &ApiRequest) -> Reply {
        let page: u32 = request
            .query_param("page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(0);
        let size: u32 = request
            .query_param("size")
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);
        let search = request.query_param("search").map(str::to_lowercase);

        let state = self.state.borrow();
        let mut matching: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| match &search {
                Some(term) => {
                    p.title.to_lowercase().contains(term) || p.content.to_lowercase().contains(term)
                }
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let content: Vec<Post> = if state.ignore_page_size {
            matching
        } else {
            matching
                .into_iter()
                .skip(page as usize * size as usize)
                .take(size as usize)
                .collect()
        };
        drop(state);

        reply(
            200,
            json!({
                "content": self.decorate_all(content),
                "totalPages": total_pages(total, size),
                "totalElements": total,
            }),
        )
    }

    fn get_post(&self, id: i64) -> Reply {
        let post = self.state.borrow().posts.iter().find(|p| p.id == id).cloned();
        match post {
            Some(post) => reply(200, json!(self.decorate(post))),
            None => error(404, "Post not found"),
        }
    }

    fn save_post(&self, id: Option<i64>, user: &User, body: &Value) -> Reply {
        let title = body["title"].as_str().unwrap_or_default().to_string();
        let content = body["content"].as_str().unwrap_or_default().to_string();
        if title.trim().is_empty() {
            return reply(
                400,
                json!({ "code": "VALIDATION_ERROR", "validationErrors": { "title": "Title is required" } }),
            );
        }
        let tag_ids: Vec<i64> = body["tagIds"]
            .as_array()
            .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
            .unwrap_or_default();

        let id = match id {
            None => {
                let post = self.add_post(user, &title, &content, &tag_ids);
                return reply(201, json!(self.decorate(post)));
            }
            Some(id) => id,
        };

        let mut state = self.state.borrow_mut();
        let tags: Vec<Tag> = state
            .tags
            .iter()
            .filter(|t| tag_ids.contains(&t.id))
            .cloned()
            .collect();
        let Some(post) = state.posts.iter_mut().find(|p| p.id == id) else {
            return error(404, "Post not found");
        };
        if !post.is_editable_by(user) {
            return error(403, "You can only edit your own posts");
        }
        post.title = title;
        post.content = content;
        post.tags = tags;
        let post = post.clone();
        drop(state);
        reply(200, json!(self.decorate(post)))
    }

    fn delete_post(&self, id: i64, user: &User) -> Reply {
        let mut state = self.state.borrow_mut();
        let Some(pos) = state.posts.iter().position(|p| p.id == id) else {
            return error(404, "Post not found");
        };
        if !state.posts[pos].is_editable_by(user) {
            return error(403, "You can only delete your own posts");
        }
        state.posts.remove(pos);
        (204, String::new())
    }

    fn manage_tag(&self, method: Method, id: Option<&str>, body: &Value) -> Reply {
        let name = body["name"].as_str().unwrap_or_default().trim().to_string();
        let id = id.and_then(|id| id.parse::<i64>().ok());
        let taken = |state: &ServerState, except: Option<i64>| {
            state
                .tags
                .iter()
                .any(|t| t.name.eq_ignore_ascii_case(&name) && Some(t.id) != except)
        };

        match (method, id) {
            (Method::Post, None) => {
                if taken(&*self.state.borrow(), None) {
                    return error(409, "Tag already exists");
                }
                reply(201, json!(self.add_tag(&name)))
            }
            (Method::Put, Some(id)) => {
                let mut state = self.state.borrow_mut();
                if taken(&state, Some(id)) {
                    return error(409, "Tag already exists");
                }
                let updated = state.tags.iter_mut().find(|t| t.id == id).map(|tag| {
                    tag.name = name;
                    tag.clone()
                });
                match updated {
                    Some(tag) => reply(200, json!(tag)),
                    None => error(404, "Tag not found"),
                }
            }
            (Method::Delete, Some(id)) => {
                let mut state = self.state.borrow_mut();
                let before = state.tags.len();
                state.tags.retain(|t| t.id != id);
                if state.tags.len() == before {
                    return error(404, "Tag not found");
                }
                for post in state.posts.iter_mut() {
                    post.tags.retain(|t| t.id != id);
                }
                (204, String::new())
            }
            _ => error(405, "Method not allowed"),
        }
    }

    fn update_profile(&self, user: &User, body: &Value) -> Reply {
        let mut state = self.state.borrow_mut();
        let Some(entry) = state.users.iter_mut().find(|(u, _)| u.id == user.id) else {
            return error(404, "User not found");
        };
        if let Some(username) = body["username"].as_str().filter(|s| !s.is_empty()) {
            entry.0.username = username.to_string();
        }
        if let Some(email) = body["email"].as_str().filter(|s| !s.is_empty()) {
            entry.0.email = email.to_string();
        }
        if let Some(password) = body["password"].as_str() {
            entry.1 = password.to_string();
        }
        let user = entry.0.clone();
        reply(200, json!(user))
    }

    fn decorate(&self, mut post: Post) -> Post {
        if self.state.borrow().duplicate_tags {
            let copy = post.tags.clone();
            post.tags.extend(copy);
        }
        post
    }

    fn decorate_all(&self, posts: Vec<Post>) -> Vec<Post> {
        posts.into_iter().map(|p| self.decorate(p)).collect()
    }
}

impl Transport for FakeBlogServer {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let forced = {
            let mut state = self.state.borrow_mut();
            state.requests.push(request.clone());
            if state.offline {
                return Err(TransportError::Unreachable("connection refused".into()));
            }
            state.fail_next.take()
        };

        let (status, body) = match forced {
            Some(forced) => forced,
            None => self.route(request),
        };
        Ok(ApiResponse { status, body })
    }
}

/// A fully wired app over the fake server.
pub struct TestEnv {
    pub app: BlogApp<FakeBlogServer, MemBackend>,
    pub server: FakeBlogServer,
    pub storage: Rc<MemBackend>,
    pub notifier: Rc<RecordingNotifier>,
    pub root: Rc<RootFlags>,
}

impl TestEnv {
    /// Started app (session restored) with default config.
    pub fn new() -> Self {
        let env = Self::unstarted(FakeBlogServer::new(), Rc::new(MemBackend::new()));
        env.app.start();
        env
    }

    /// Wired but not started: the session is still loading.
    pub fn unstarted(server: FakeBlogServer, storage: Rc<MemBackend>) -> Self {
        Self::with_config(server, storage, test_config())
    }

    pub fn with_config(server: FakeBlogServer, storage: Rc<MemBackend>, config: BlogConfig) -> Self {
        let notifier = Rc::new(RecordingNotifier::new());
        let root = Rc::new(RootFlags::new());
        let app = BlogApp::new(
            config,
            server.clone(),
            storage.clone(),
            root.clone(),
            notifier.clone(),
            || None,
        );
        Self {
            app,
            server,
            storage,
            notifier,
            root,
        }
    }

    /// Creates the account on the server and logs in through the session.
    pub fn sign_in(&self, username: &str, role: Role) -> User {
        self.server.add_user(username, "secret1", role);
        let user = self
            .app
            .session
            .login(&self.app.api, username, "secret1")
            .expect("test login failed");
        self.notifier.take();
        user
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_config() -> BlogConfig {
    BlogConfig {
        api_url: FAKE_API_URL.to_string(),
        ..BlogConfig::default()
    }
}

/// HTML body with `chars` visible characters.
pub fn body_of(chars: usize) -> String {
    format!("<p>{}</p>", "a".repeat(chars))
}
