//! # CLI Behavior
//!
//! This is **one possible UI client** for the blog platform. The CLI is the
//! only place that knows about terminal I/O, exit codes and output
//! formatting; everything else lives in `blogapp`.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ## Pages as Commands
//!
//! Each command stands for one page of the web client and is guarded like
//! it:
//!
//! | Command | Route | Access |
//! |---------|-------|--------|
//! | `list` (also naked `blog`) | `/` | anyone |
//! | `view <id>`, `delete <id>` | `/post/:id` | anyone (delete: author or admin) |
//! | `login`, `register` | `/login`, `/register` | guests |
//! | `create` | `/create-post` | signed in |
//! | `edit <id>` | `/edit-post/:id` | signed in |
//! | `profile` | `/profile` | signed in |
//! | `admin ...` | `/admin` | admins |
//!
//! `blog open <path>` visits any path and prints where its guard leads, which
//! makes the routing rules easy to check from a shell.
//!
//! ## Session and Preferences
//!
//! The session token, the signed-in user, dark mode and language persist in
//! the data directory between runs. An expired token is dropped on the first
//! request that gets a 401; the next command runs as a guest.
//!
//! ## Module Structure
//!
//! - `commands`: dispatch, guards, per-command handlers
//! - `render`: output formatting
//! - `setup`: argument parsing via clap, help text
//! - `styles`: light and dark palettes
//! - `terminal`: the terminal as display root and notice sink

mod commands;
mod render;
pub mod setup;
mod styles;
mod terminal;

pub use commands::{run, Outcome};
