//! # Blog CLI Architecture
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination. UI concerns
//! stay **entirely separate** from the client logic.
//!
//! ## Workspace Structure
//!
//! - `crates/blogapp/`: UI-agnostic client library (API, session, guards, pages)
//! - `crates/blog/`: this CLI, depends on `blogapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/blog/src/cli/)                           │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Guarded dispatch + context wiring (commands.rs)          │
//! │  - Terminal rendering with console styles (render.rs)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Pages + Guards (crates/blogapp/src/pages, guard.rs)        │
//! │  - View models, actions, notices, navigation                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Facade + HTTP Adapter (crates/blogapp/src/api.rs, http)│
//! │  - Typed endpoints, bearer token, global 401 policy         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything below the CLI layer is UI agnostic: it takes normal Rust
//! values, returns normal Rust types and reports outcomes through a
//! `Notifier` instead of printing.
//!
//! ## Testing Approach
//!
//! - **Library (`crates/blogapp`)**: unit tests next to the code, plus
//!   integration tests against an in-memory fake of the blog API.
//! - **CLI (`src/cli/`)**: argument parsing and rendering are unit tested
//!   with canned values; `tests/` drives the real binary with `assert_cmd`
//!   against an unreachable API to check guards, degradation and persisted
//!   preferences.

mod cli;

fn main() {
    match cli::run() {
        Ok(cli::Outcome::Done) => {}
        Ok(cli::Outcome::Failed) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
