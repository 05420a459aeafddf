//! # blogapp
//!
//! UI-agnostic core of the blog platform client. Everything a front end needs
//! lives here: typed access to the remote API, the signed-in session, display
//! preferences, route guards, form validation and page logic. The library
//! never prints; user-facing outcomes are reported through an injected
//! [`notice::Notifier`].
//!
//! ## Layering
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Pages (pages/*) + Guards (guard.rs)                         │
//! │  - Load view models, run actions, emit notices, navigate     │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  API Facade (api.rs)                                         │
//! │  - One typed function per endpoint                           │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  HTTP Client Adapter (http/)                                 │
//! │  - Base URL, JSON headers, bearer token, global 401 policy   │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//!                  Transport (reqwest, or a fake)
//! ```
//!
//! Alongside, with no network access of their own:
//! - [`session::SessionStore`]: current identity, persisted across runs
//! - [`preference::PreferenceStore`]: dark mode and language
//! - [`store`]: the persisted key/value client state both stores use
//!
//! All of these are explicit values wired together in [`app::BlogApp`]; there
//! is no global state. The client is single-threaded and shares components
//! through `Rc`.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod i18n;
pub mod model;
pub mod notice;
pub mod pages;
pub mod pagination;
pub mod preference;
pub mod session;
pub mod store;
pub mod text;
pub mod validation;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
