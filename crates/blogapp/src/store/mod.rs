//! # Client State Storage
//!
//! The client persists a handful of string entries between runs, the way the
//! web client uses browser local storage. The [`backend::StorageBackend`]
//! trait is the whole interface: get, set and remove a string under a key.
//!
//! ## Keys
//!
//! | Key | Value | Owner |
//! |-----|-------|-------|
//! | `authToken` | Opaque bearer token | Session store, HTTP adapter |
//! | `user` | JSON-serialized [`crate::model::User`] | Session store, HTTP adapter |
//! | `darkMode` | JSON boolean | Preference store |
//! | `i18nextLng` | Language code | Preference store |
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: a single `state.json` object in the data
//!   directory, rewritten atomically on every change.
//! - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! └── state.json    # {"authToken": "...", "user": "{...}", "darkMode": "true"}
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::StorageBackend;

/// Fixed storage keys, shared with the web client.
pub mod keys {
    pub const AUTH_TOKEN: &str = "authToken";
    pub const USER: &str = "user";
    pub const DARK_MODE: &str = "darkMode";
    pub const LANGUAGE: &str = "i18nextLng";
}
