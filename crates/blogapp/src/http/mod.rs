//! # HTTP Client Adapter
//!
//! One configured client shared by every API call. It owns three concerns:
//!
//! - **Base URL**: every path is resolved against the configured API base.
//! - **Headers**: JSON content type and accept headers on every request, plus
//!   `Authorization: Bearer <token>` whenever a token is persisted. The token is
//!   read from storage on each call, so a login or logout takes effect on the
//!   very next request.
//! - **Global 401 policy**: a 401 from any endpoint outside `/auth/*` removes
//!   the persisted `authToken` and `user`, runs the injected
//!   [`UnauthorizedPolicy`] (in the app: clear the session and navigate to
//!   `/login`) and fails the call with [`BlogError::Unauthorized`]. A 401 from
//!   `/auth/*` only means the credentials were wrong, so it fails the call and
//!   leaves the session alone.
//!
//! Every other failure is normalized before it reaches the caller:
//!
//! | Outcome | Error |
//! |---------|-------|
//! | No response | [`BlogError::Unreachable`] |
//! | Non-2xx status | [`BlogError::Api`] with the body's `message` and `validationErrors` |
//! | 2xx with an undecodable body | [`BlogError::Unexpected`] |
//!
//! Nothing is retried.

pub mod transport;

pub use transport::{ReqwestTransport, Transport, TransportError};

use crate::error::{BlogError, Result};
use crate::model::ErrorBody;
use crate::store::{keys, StorageBackend};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// A fully prepared request, independent of any HTTP library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub base_url: String,
    /// Path relative to the base, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    /// Base URL joined with the path, without the query string.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Reaction to a 401, run after the persisted credentials are removed.
pub trait UnauthorizedPolicy {
    fn on_unauthorized(&self);
}

impl<F: Fn()> UnauthorizedPolicy for F {
    fn on_unauthorized(&self) {
        (self)()
    }
}

/// The shared HTTP client.
pub struct HttpClient<T: Transport, B: StorageBackend> {
    base_url: String,
    transport: T,
    storage: Rc<B>,
    policy: Box<dyn UnauthorizedPolicy>,
}

impl<T: Transport, B: StorageBackend> HttpClient<T, B> {
    pub fn new(
        base_url: impl Into<String>,
        transport: T,
        storage: Rc<B>,
        policy: Box<dyn UnauthorizedPolicy>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            storage,
            policy,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get<R: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<R> {
        let body = self.execute(Method::Get, path, query, None)?;
        decode(&body)
    }

    pub fn post<Q: Serialize, R: DeserializeOwned>(&self, path: &str, payload: &Q) -> Result<R> {
        let body = self.execute(Method::Post, path, &[], Some(serde_json::to_string(payload)?))?;
        decode(&body)
    }

    /// POST whose response body is ignored.
    pub fn post_unit<Q: Serialize>(&self, path: &str, payload: &Q) -> Result<()> {
        self.execute(Method::Post, path, &[], Some(serde_json::to_string(payload)?))?;
        Ok(())
    }

    pub fn put<Q: Serialize, R: DeserializeOwned>(&self, path: &str, payload: &Q) -> Result<R> {
        let body = self.execute(Method::Put, path, &[], Some(serde_json::to_string(payload)?))?;
        decode(&body)
    }

    pub fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::Delete, path, &[], None)?;
        Ok(())
    }

    fn prepare(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<String>,
    ) -> Result<ApiRequest> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if let Some(token) = self.storage.get_item(keys::AUTH_TOKEN)? {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        Ok(ApiRequest {
            method,
            base_url: self.base_url.clone(),
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            headers,
            body,
        })
    }

    fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<String>,
    ) -> Result<String> {
        let request = self.prepare(method, path, query, body)?;
        tracing::debug!(
            method = %request.method,
            url = %request.endpoint(),
            authorized = request.header("Authorization").is_some(),
            "API request"
        );

        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(TransportError::Unreachable(reason)) => {
                tracing::debug!(url = %request.endpoint(), %reason, "No response from server");
                return Err(BlogError::Unreachable(reason));
            }
            Err(TransportError::Other(reason)) => return Err(BlogError::Unexpected(reason)),
        };

        tracing::debug!(status = response.status, url = %request.endpoint(), "API response");

        if response.status == 401 {
            if !is_credential_exchange(path) {
                self.force_logout();
            }
            return Err(BlogError::Unauthorized {
                message: error_body(&response).message,
            });
        }
        if !response.is_success() {
            return Err(api_error(&response));
        }
        Ok(response.body)
    }

    fn force_logout(&self) {
        for key in [keys::AUTH_TOKEN, keys::USER] {
            if let Err(e) = self.storage.remove_item(key) {
                tracing::warn!(key, error = %e, "Failed to clear credential after 401");
            }
        }
        self.policy.on_unauthorized();
    }
}

fn decode<R: DeserializeOwned>(body: &str) -> Result<R> {
    // Endpoints without a payload still decode into `()` or `Option<_>`.
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body)
        .map_err(|e| BlogError::Unexpected(format!("invalid response body: {}", e)))
}

// Login and register answer 401 for bad credentials, not for a stale token
fn is_credential_exchange(path: &str) -> bool {
    path.trim_start_matches('/').starts_with("auth/")
}

fn error_body(response: &ApiResponse) -> ErrorBody {
    let mut parsed: ErrorBody = serde_json::from_str(&response.body).unwrap_or_default();
    parsed.message = parsed.message.filter(|m| !m.trim().is_empty());
    parsed
}

fn api_error(response: &ApiResponse) -> BlogError {
    let parsed = error_body(response);
    BlogError::Api {
        status: response.status,
        message: parsed.message,
        validation_errors: parsed.validation_errors.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use std::cell::{Cell, RefCell};

    /// Answers every request with a fixed response and records what it saw.
    struct Canned {
        response: std::result::Result<ApiResponse, TransportError>,
        seen: RefCell<Vec<ApiRequest>>,
    }

    impl Canned {
        fn status(status: u16, body: &str) -> Self {
            Self {
                response: Ok(ApiResponse {
                    status,
                    body: body.to_string(),
                }),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn offline() -> Self {
            Self {
                response: Err(TransportError::Unreachable("connection refused".into())),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn send(&self, request: &ApiRequest) -> std::result::Result<ApiResponse, TransportError> {
            self.seen.borrow_mut().push(request.clone());
            self.response.clone()
        }
    }

    fn client(transport: Canned, storage: Rc<MemBackend>) -> (HttpClient<Canned, MemBackend>, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let policy = Box::new(move || counter.set(counter.get() + 1));
        (
            HttpClient::new("http://api.test/api/", transport, storage, policy),
            calls,
        )
    }

    #[test]
    fn test_headers_without_token() {
        let storage = Rc::new(MemBackend::new());
        let (client, _) = client(Canned::status(200, "[]"), storage);

        let _: Vec<i64> = client.get("/tags", &[]).unwrap();

        let seen = client.transport().seen.borrow();
        assert_eq!(seen[0].endpoint(), "http://api.test/api/tags");
        assert_eq!(seen[0].header("content-type"), Some("application/json"));
        assert_eq!(seen[0].header("Authorization"), None);
    }

    #[test]
    fn test_token_read_on_every_call() {
        let storage = Rc::new(MemBackend::new());
        let (client, _) = client(Canned::status(200, "[]"), storage.clone());

        let _: Vec<i64> = client.get("/tags", &[]).unwrap();
        storage.set_item(keys::AUTH_TOKEN, "abc").unwrap();
        let _: Vec<i64> = client.get("/tags", &[]).unwrap();

        let seen = client.transport().seen.borrow();
        assert_eq!(seen[0].header("Authorization"), None);
        assert_eq!(seen[1].header("Authorization"), Some("Bearer abc"));
    }

    #[test]
    fn test_401_clears_credentials_and_runs_policy() {
        let storage = Rc::new(MemBackend::new());
        storage.set_item(keys::AUTH_TOKEN, "stale").unwrap();
        storage.set_item(keys::USER, "{}").unwrap();
        storage.set_item(keys::DARK_MODE, "true").unwrap();
        let (client, calls) = client(Canned::status(401, ""), storage.clone());

        let err = client.get::<Vec<i64>>("/posts", &[]).unwrap_err();

        assert!(matches!(err, BlogError::Unauthorized { message: None }));
        assert_eq!(calls.get(), 1);
        assert_eq!(storage.get_item(keys::AUTH_TOKEN).unwrap(), None);
        assert_eq!(storage.get_item(keys::USER).unwrap(), None);
        // Preferences survive a forced logout
        assert_eq!(storage.get_item(keys::DARK_MODE).unwrap(), Some("true".into()));
    }

    #[test]
    fn test_401_from_login_keeps_session() {
        let storage = Rc::new(MemBackend::new());
        storage.set_item(keys::AUTH_TOKEN, "live").unwrap();
        storage.set_item(keys::USER, "{}").unwrap();
        let body = r#"{"message":"Invalid username or password"}"#;
        let (client, calls) = client(Canned::status(401, body), storage.clone());

        let err = client
            .post::<_, serde_json::Value>("/auth/login", &serde_json::json!({}))
            .unwrap_err();

        match err {
            BlogError::Unauthorized { message } => {
                assert_eq!(message.as_deref(), Some("Invalid username or password"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(calls.get(), 0);
        assert_eq!(storage.get_item(keys::AUTH_TOKEN).unwrap(), Some("live".into()));
        assert_eq!(storage.get_item(keys::USER).unwrap(), Some("{}".into()));
    }

    #[test]
    fn test_401_message_survives_forced_logout() {
        let storage = Rc::new(MemBackend::new());
        storage.set_item(keys::AUTH_TOKEN, "stale").unwrap();
        let body = r#"{"message":"Invalid or expired token"}"#;
        let (client, calls) = client(Canned::status(401, body), storage.clone());

        let err = client.get::<Vec<i64>>("/users/profile", &[]).unwrap_err();

        assert_eq!(err.to_string(), "Invalid or expired token");
        assert_eq!(calls.get(), 1);
        assert_eq!(storage.get_item(keys::AUTH_TOKEN).unwrap(), None);
    }

    #[test]
    fn test_403_does_not_log_out() {
        let storage = Rc::new(MemBackend::new());
        storage.set_item(keys::AUTH_TOKEN, "t").unwrap();
        let (client, calls) = client(Canned::status(403, r#"{"message":"Forbidden"}"#), storage.clone());

        let err = client.delete("/tags/1").unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "Forbidden");
        assert_eq!(calls.get(), 0);
        assert_eq!(storage.get_item(keys::AUTH_TOKEN).unwrap(), Some("t".into()));
    }

    #[test]
    fn test_error_body_is_normalized() {
        let body = r#"{"code":"VALIDATION","validationErrors":{"title":"too short"}}"#;
        let (client, _) = client(Canned::status(400, body), Rc::new(MemBackend::new()));

        match client.post_unit("/posts", &serde_json::json!({})).unwrap_err() {
            BlogError::Api {
                status,
                message,
                validation_errors,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, None);
                assert_eq!(validation_errors["title"], "too short");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_json_error_body() {
        let (client, _) = client(Canned::status(502, "<html>Bad Gateway</html>"), Rc::new(MemBackend::new()));
        let err = client.get::<Vec<i64>>("/posts", &[]).unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "request failed with status 502");
    }

    #[test]
    fn test_unreachable() {
        let (client, calls) = client(Canned::offline(), Rc::new(MemBackend::new()));
        let err = client.get::<Vec<i64>>("/posts", &[]).unwrap_err();
        assert!(err.is_unreachable());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_undecodable_success_body() {
        let (client, _) = client(Canned::status(200, "not json"), Rc::new(MemBackend::new()));
        let err = client.get::<Vec<i64>>("/tags", &[]).unwrap_err();
        assert!(matches!(err, BlogError::Unexpected(_)));
    }

    #[test]
    fn test_query_is_passed_through() {
        let (client, _) = client(Canned::status(200, "{}"), Rc::new(MemBackend::new()));
        let _: serde_json::Value = client
            .get("/posts", &[("page", "2".to_string()), ("size", "6".to_string())])
            .unwrap();
        let seen = client.transport().seen.borrow();
        assert_eq!(seen[0].query_param("page"), Some("2"));
        assert_eq!(seen[0].query_param("search"), None);
    }
}
