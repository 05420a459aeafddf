//! # Application Context
//!
//! [`BlogApp`] is the explicitly passed context every page works against. It
//! wires the pieces in dependency order:
//!
//! ```text
//! storage ──► preferences ──► session ──► navigator ──► 401 policy ──► HTTP client ──► API
//! ```
//!
//! Nothing here is global: a UI builds one `BlogApp` at startup (see
//! [`initialize`]) and hands references to whatever needs them. Tests build
//! theirs over a `MemBackend` and a fake transport.

use crate::api::BlogApi;
use crate::config::{BlogConfig, BlogPaths};
use crate::error::{BlogError, Result};
use crate::guard::{ForceLogout, Navigator, Route};
use crate::http::{HttpClient, ReqwestTransport, Transport};
use crate::i18n::{Language, MessageKey};
use crate::notice::{Notice, Notifier};
use crate::preference::{platform_prefers_dark, DisplayRoot, PreferenceStore};
use crate::session::SessionStore;
use crate::store::fs_backend::FsBackend;
use crate::store::StorageBackend;
use std::rc::Rc;

pub struct BlogApp<T: Transport, B: StorageBackend> {
    pub config: BlogConfig,
    pub storage: Rc<B>,
    pub preferences: Rc<PreferenceStore<B>>,
    pub session: Rc<SessionStore<B>>,
    pub navigator: Rc<Navigator>,
    pub notifier: Rc<dyn Notifier>,
    pub api: BlogApi<T, B>,
}

impl<T: Transport, B: StorageBackend + 'static> BlogApp<T, B> {
    /// Wires the context. The session stays in its loading state until
    /// [`BlogApp::start`] runs.
    pub fn new(
        config: BlogConfig,
        transport: T,
        storage: Rc<B>,
        root: Rc<dyn DisplayRoot>,
        notifier: Rc<dyn Notifier>,
        platform_dark: impl FnOnce() -> Option<bool>,
    ) -> Self {
        let preferences = Rc::new(PreferenceStore::new(storage.clone(), root, platform_dark));
        let session = Rc::new(SessionStore::new(
            storage.clone(),
            preferences.clone(),
            notifier.clone(),
        ));
        let navigator = Rc::new(Navigator::new());
        let policy = ForceLogout::new(session.clone(), navigator.clone());
        let client = HttpClient::new(
            config.api_base().to_string(),
            transport,
            storage.clone(),
            Box::new(policy),
        );

        Self {
            config,
            storage,
            preferences,
            session,
            navigator,
            notifier,
            api: BlogApi::new(client),
        }
    }

    /// Restores the persisted session.
    pub fn start(&self) {
        self.session.restore();
    }

    /// Visits a route through its guard. See [`Navigator::open`].
    pub fn open(&self, route: Route) -> Option<Route> {
        self.navigator.open(route, &self.session)
    }

    pub fn language(&self) -> Language {
        self.preferences.language()
    }

    pub fn text(&self, key: MessageKey) -> &'static str {
        key.text(self.language())
    }

    pub fn notify_success(&self, key: MessageKey) {
        self.notifier.notify(Notice::success(self.text(key)));
    }

    pub fn notify_error(&self, key: MessageKey) {
        self.notifier.notify(Notice::error(self.text(key)));
    }

    /// Error notice following the usual priority: server message, first
    /// field error, unreachable server, then `fallback`.
    pub fn notify_failure(&self, err: &BlogError, fallback: MessageKey) {
        self.notifier
            .notify(Notice::error(err.user_message(self.language(), fallback)));
    }
}

/// Builds the production context: config from disk and environment, state
/// in the data directory, `reqwest` transport, platform theme detection.
pub fn initialize(
    paths: &BlogPaths,
    root: Rc<dyn DisplayRoot>,
    notifier: Rc<dyn Notifier>,
) -> Result<BlogApp<ReqwestTransport, FsBackend>> {
    let config = BlogConfig::load(&paths.config_file)?;
    tracing::debug!(api_url = %config.api_url, data_dir = %paths.data_dir.display(), "Initializing");

    let transport = ReqwestTransport::new().map_err(|e| BlogError::Unexpected(e.to_string()))?;
    let storage = Rc::new(FsBackend::new(paths.data_dir.clone()));

    let app = BlogApp::new(
        config,
        transport,
        storage,
        root,
        notifier,
        platform_prefers_dark,
    );
    app.start();
    Ok(app)
}
