//! # Session Store
//!
//! Holds the current identity (zero or one [`User`]) and keeps it in sync with
//! the persisted `authToken` / `user` entries.
//!
//! ## Lifecycle
//!
//! ```text
//!   new() ──► Loading ──restore()──► Guest ◄──logout()/invalidate()── Authenticated
//!                                      │                                   ▲
//!                                      └──────────── login() ──────────────┘
//! ```
//!
//! - [`SessionStore::restore`] runs once at startup. Until it completes the
//!   store reports [`SessionStore::is_loading`] and route guards wait.
//! - A failed login leaves every piece of prior state untouched.
//! - [`SessionStore::invalidate`] is the silent path taken after a 401; the
//!   HTTP adapter has already removed the persisted credentials by then.
//!
//! Every change bumps [`SessionStore::revision`], which is what guards watch.
//!
//! ## Notifications
//!
//! Each `login`, `register` and `logout` call emits exactly one notice
//! describing its outcome.

use crate::api::BlogApi;
use crate::error::{BlogError, Result};
use crate::http::Transport;
use crate::i18n::{Language, MessageKey};
use crate::model::{LoginRequest, RegisterRequest, User};
use crate::notice::{Notice, Notifier};
use crate::preference::PreferenceStore;
use crate::store::{keys, StorageBackend};
use crate::validation::validate_registration;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub struct SessionStore<B: StorageBackend> {
    storage: Rc<B>,
    preferences: Rc<PreferenceStore<B>>,
    notifier: Rc<dyn Notifier>,
    user: RefCell<Option<User>>,
    loading: Cell<bool>,
    revision: Cell<u64>,
}

impl<B: StorageBackend> SessionStore<B> {
    pub fn new(
        storage: Rc<B>,
        preferences: Rc<PreferenceStore<B>>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self {
            storage,
            preferences,
            notifier,
            user: RefCell::new(None),
            loading: Cell::new(true),
            revision: Cell::new(0),
        }
    }

    /// Rehydrates the session from storage. Both a token and a valid user must
    /// be present; anything else leaves a guest session.
    pub fn restore(&self) {
        let token = self.read(keys::AUTH_TOKEN);
        let raw_user = self.read(keys::USER);

        let user = match (token, raw_user) {
            (Some(_), Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding corrupt persisted user");
                    self.clear_persisted();
                    None
                }
            },
            _ => None,
        };

        if let Some(user) = &user {
            tracing::debug!(username = %user.username, "Session restored");
        }
        self.set_user(user);
        self.loading.set(false);
    }

    /// Authenticates and, on success, persists and adopts the new session.
    pub fn login<T: Transport>(
        &self,
        api: &BlogApi<T, B>,
        username: &str,
        password: &str,
    ) -> Result<User> {
        let language = self.language();
        let credentials = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };

        let response = match api.login(&credentials) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "Login failed");
                self.notify_error(&e, language, MessageKey::LoginFailed);
                return Err(e);
            }
        };

        if let Err(e) = self.persist(&response.token, &response.user) {
            tracing::warn!(error = %e, "Failed to persist session");
            self.notify_error(&e, language, MessageKey::LoginFailed);
            return Err(e);
        }

        tracing::info!(username = %response.user.username, "Logged in");
        self.set_user(Some(response.user.clone()));
        self.notifier
            .notify(Notice::success(MessageKey::LoginSuccess.text(language)));
        Ok(response.user)
    }

    /// Creates an account. Never establishes a session.
    pub fn register<T: Transport>(&self, api: &BlogApi<T, B>, profile: RegisterRequest) -> Result<()> {
        let language = self.language();
        let profile = RegisterRequest {
            username: profile.username.trim().to_string(),
            email: profile.email.trim().to_string(),
            password: profile.password,
        };

        let errors = validate_registration(&profile, language);
        if !errors.is_empty() {
            let err = BlogError::Validation(errors);
            self.notify_error(&err, language, MessageKey::RegisterFailed);
            return Err(err);
        }

        match api.register(&profile) {
            Ok(()) => {
                tracing::info!(username = %profile.username, "Registered");
                self.notifier
                    .notify(Notice::success(MessageKey::RegisterSuccess.text(language)));
                Ok(())
            }
            Err(e) => {
                self.notify_error(&e, language, MessageKey::RegisterFailed);
                Err(e)
            }
        }
    }

    /// Ends the session. Always succeeds; calling it twice is harmless.
    pub fn logout(&self) {
        self.clear_persisted();
        self.set_user(None);
        tracing::info!("Logged out");
        self.notifier
            .notify(Notice::success(MessageKey::LogoutSuccess.text(self.language())));
    }

    /// Drops the in-memory session without touching storage or notifying.
    pub fn invalidate(&self) {
        if self.user.borrow().is_some() {
            tracing::info!("Session invalidated by server");
        }
        self.set_user(None);
    }

    /// Replaces the current user after a profile change and persists it.
    pub fn replace_user(&self, user: User) -> Result<()> {
        if self.user.borrow().is_none() {
            return Err(BlogError::Unauthorized { message: None });
        }
        self.storage
            .set_item(keys::USER, &serde_json::to_string(&user)?)?;
        self.set_user(Some(user));
        Ok(())
    }

    pub fn current(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.borrow().as_ref().is_some_and(User::is_admin)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Increments on every session change.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    pub fn language(&self) -> Language {
        self.preferences.language()
    }

    fn set_user(&self, user: Option<User>) {
        *self.user.borrow_mut() = user;
        self.revision.set(self.revision.get() + 1);
    }

    /// Writes token then user; rolls the token back if the user cannot be
    /// written so storage never holds half a session.
    fn persist(&self, token: &str, user: &User) -> Result<()> {
        let serialized = serde_json::to_string(user)?;
        let previous = self.read(keys::AUTH_TOKEN);

        self.storage.set_item(keys::AUTH_TOKEN, token)?;
        if let Err(e) = self.storage.set_item(keys::USER, &serialized) {
            let rollback = match previous {
                Some(previous) => self.storage.set_item(keys::AUTH_TOKEN, &previous),
                None => self.storage.remove_item(keys::AUTH_TOKEN),
            };
            if let Err(rollback) = rollback {
                tracing::warn!(error = %rollback, "Failed to roll back token");
            }
            return Err(e);
        }
        Ok(())
    }

    fn clear_persisted(&self) {
        for key in [keys::AUTH_TOKEN, keys::USER] {
            if let Err(e) = self.storage.remove_item(key) {
                tracing::warn!(key, error = %e, "Failed to remove session entry");
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read session entry");
                None
            }
        }
    }

    fn notify_error(&self, err: &BlogError, language: Language, fallback: MessageKey) {
        self.notifier
            .notify(Notice::error(err.user_message(language, fallback)));
    }
}
