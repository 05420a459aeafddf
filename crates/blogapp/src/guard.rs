//! # Routes and Guards
//!
//! Every page lives at a [`Route`]; each route has an [`Access`] level. A
//! [`RouteGuard`] resolves the level against the session into a
//! [`GuardState`]:
//!
//! | Access | Loading | Guest | User | Admin |
//! |--------|---------|-------|------|-------|
//! | `Public` | Allowed | Allowed | Allowed | Allowed |
//! | `GuestOnly` | Loading | Allowed | → `/` | → `/` |
//! | `Authenticated` | Loading | → `/login` | Allowed | Allowed |
//! | `Admin` | Loading | → `/login` | → `/` | Allowed |
//!
//! While the session is still being restored a protected page renders
//! nothing and never redirects. Once resolved, a guard's state is final until
//! the session itself changes (login, logout, a 401).

use crate::error::{BlogError, Result};
use crate::http::UnauthorizedPolicy;
use crate::session::SessionStore;
use crate::store::StorageBackend;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Post(i64),
    CreatePost,
    EditPost(i64),
    Profile,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    GuestOnly,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Allowed,
    Redirected(Route),
}

impl Route {
    pub fn access(&self) -> Access {
        match self {
            Route::Home | Route::Post(_) => Access::Public,
            Route::Login | Route::Register => Access::GuestOnly,
            Route::CreatePost | Route::EditPost(_) | Route::Profile => Access::Authenticated,
            Route::Admin => Access::Admin,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Login => write!(f, "/login"),
            Route::Register => write!(f, "/register"),
            Route::Post(id) => write!(f, "/post/{}", id),
            Route::CreatePost => write!(f, "/create-post"),
            Route::EditPost(id) => write!(f, "/edit-post/{}", id),
            Route::Profile => write!(f, "/profile"),
            Route::Admin => write!(f, "/admin"),
        }
    }
}

impl FromStr for Route {
    type Err = BlogError;

    fn from_str(s: &str) -> Result<Self> {
        let path = s.trim();
        let path = path
            .split(|c: char| c == '?' || c == '#')
            .next()
            .unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        let id = |raw: &str| -> Result<i64> {
            raw.parse()
                .map_err(|_| BlogError::Route(format!("invalid id in {}", s)))
        };

        match segments.as_slice() {
            [] if path.starts_with('/') => Ok(Route::Home),
            ["login"] => Ok(Route::Login),
            ["register"] => Ok(Route::Register),
            ["post", raw] => Ok(Route::Post(id(*raw)?)),
            ["create-post"] => Ok(Route::CreatePost),
            ["edit-post", raw] => Ok(Route::EditPost(id(*raw)?)),
            ["profile"] => Ok(Route::Profile),
            ["admin"] => Ok(Route::Admin),
            _ => Err(BlogError::Route(s.to_string())),
        }
    }
}

/// Pure guard decision.
pub fn evaluate(access: Access, loading: bool, authenticated: bool, admin: bool) -> GuardState {
    if access == Access::Public {
        return GuardState::Allowed;
    }
    if loading {
        return GuardState::Loading;
    }
    match access {
        Access::Public => GuardState::Allowed,
        Access::GuestOnly if authenticated => GuardState::Redirected(Route::Home),
        Access::GuestOnly => GuardState::Allowed,
        Access::Authenticated if authenticated => GuardState::Allowed,
        Access::Authenticated => GuardState::Redirected(Route::Login),
        Access::Admin if !authenticated => GuardState::Redirected(Route::Login),
        Access::Admin if !admin => GuardState::Redirected(Route::Home),
        Access::Admin => GuardState::Allowed,
    }
}

/// Guard for one route, cached per session revision.
pub struct RouteGuard {
    route: Route,
    cached: RefCell<Option<(u64, GuardState)>>,
}

impl RouteGuard {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            cached: RefCell::new(None),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn state<B: StorageBackend>(&self, session: &SessionStore<B>) -> GuardState {
        let revision = session.revision();
        if let Some((seen, state)) = *self.cached.borrow() {
            if seen == revision {
                return state;
            }
        }
        let state = evaluate(
            self.route.access(),
            session.is_loading(),
            session.is_authenticated(),
            session.is_admin(),
        );
        *self.cached.borrow_mut() = Some((revision, state));
        state
    }
}

/// Navigation history. The last entry is the current page.
#[derive(Debug, Default)]
pub struct Navigator {
    history: RefCell<Vec<Route>>,
}

impl Navigator {
    /// Redirect chains are short (`/admin` → `/login` → `/`); anything longer
    /// is a bug.
    const MAX_REDIRECTS: usize = 4;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate(&self, route: Route) {
        tracing::debug!(%route, "Navigate");
        self.history.borrow_mut().push(route);
    }

    pub fn current(&self) -> Option<Route> {
        self.history.borrow().last().copied()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.borrow().clone()
    }

    /// Visits `route` through its guard, following redirects. Returns the
    /// route finally shown, or `None` while the session is loading.
    pub fn open<B: StorageBackend>(&self, route: Route, session: &SessionStore<B>) -> Option<Route> {
        let mut target = route;
        for _ in 0..Self::MAX_REDIRECTS {
            match RouteGuard::new(target).state(session) {
                GuardState::Loading => return None,
                GuardState::Allowed => {
                    self.navigate(target);
                    return Some(target);
                }
                GuardState::Redirected(next) => {
                    tracing::debug!(from = %target, to = %next, "Guard redirect");
                    target = next;
                }
            }
        }
        self.navigate(Route::Home);
        Some(Route::Home)
    }
}

/// The app's reaction to a 401: drop the session and go to `/login`.
pub struct ForceLogout<B: StorageBackend> {
    session: Rc<SessionStore<B>>,
    navigator: Rc<Navigator>,
}

impl<B: StorageBackend> ForceLogout<B> {
    pub fn new(session: Rc<SessionStore<B>>, navigator: Rc<Navigator>) -> Self {
        Self { session, navigator }
    }
}

impl<B: StorageBackend> UnauthorizedPolicy for ForceLogout<B> {
    fn on_unauthorized(&self) {
        self.session.invalidate();
        self.navigator.navigate(Route::Login);
    }
}
