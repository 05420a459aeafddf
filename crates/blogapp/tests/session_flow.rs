use blogapp::guard::{GuardState, Route, RouteGuard};
use blogapp::i18n::{Language, MessageKey};
use blogapp::model::{RegisterRequest, Role};
use blogapp::notice::NoticeLevel;
use blogapp::pages::{home, profile};
use blogapp::store::backend::StorageBackend;
use blogapp::store::keys;
use blogapp::store::mem_backend::MemBackend;
use blogapp::test_utils::{FakeBlogServer, TestEnv};
use std::rc::Rc;

fn registration(username: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: "secret1".to_string(),
    }
}

// --- login ---

#[test]
fn test_login_persists_session() {
    let env = TestEnv::new();
    env.server.add_user("ayse", "secret1", Role::User);

    let user = env.app.session.login(&env.app.api, "ayse", "secret1").unwrap();

    assert_eq!(user.username, "ayse");
    assert!(env.app.session.is_authenticated());
    assert!(!env.app.session.is_admin());
    assert!(env.storage.get_item(keys::AUTH_TOKEN).unwrap().is_some());
    let stored = env.storage.get_item(keys::USER).unwrap().unwrap();
    assert!(stored.contains("\"role\":\"USER\""));

    let notices = env.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].content, MessageKey::LoginSuccess.text(Language::Tr));
}

#[test]
fn test_token_sent_after_login() {
    let env = TestEnv::new();
    env.sign_in("ayse", Role::User);

    home::load(&env.app, 0, None);

    let request = env.server.last_request().unwrap();
    let header = request.header("Authorization").unwrap();
    assert!(header.starts_with("Bearer token-"));
}

#[test]
fn test_wrong_password_leaves_guest_state_unchanged() {
    let env = TestEnv::new();
    env.server.add_user("ayse", "secret1", Role::User);
    env.storage.set_item(keys::DARK_MODE, "true").unwrap();
    let before = env.storage.snapshot();

    let result = env.app.session.login(&env.app.api, "ayse", "wrong");

    assert!(result.is_err());
    assert!(!env.app.session.is_authenticated());
    assert_eq!(env.storage.snapshot(), before);

    let notices = env.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].content, "Invalid username or password");
}

#[test]
fn test_wrong_password_keeps_signed_in_session() {
    let env = TestEnv::new();
    let ayse = env.sign_in("ayse", Role::Admin);
    let before = env.storage.snapshot();

    let err = env
        .app
        .session
        .login(&env.app.api, "ayse", "definitely-wrong")
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(env.storage.snapshot(), before);
    assert_eq!(env.app.session.current(), Some(ayse));
    assert!(!env.app.navigator.history().contains(&Route::Login));
    assert_eq!(
        env.notifier.last().unwrap().content,
        "Invalid username or password"
    );
}

#[test]
fn test_failed_login_keeps_prior_session() {
    let env = TestEnv::new();
    let ayse = env.sign_in("ayse", Role::Admin);
    let before = env.storage.snapshot();

    // Blank username is rejected by the server with a field error
    let result = env.app.session.login(&env.app.api, "  ", "whatever");

    assert!(result.is_err());
    assert_eq!(env.storage.snapshot(), before);
    assert_eq!(env.app.session.current(), Some(ayse));
    assert_eq!(env.notifier.last().unwrap().content, "Username is required");
}

#[test]
fn test_login_server_message_wins() {
    let env = TestEnv::new();
    env.server
        .fail_next(503, r#"{"message":"Bakım çalışması var"}"#);

    env.app.session.login(&env.app.api, "ayse", "secret1").unwrap_err();

    assert_eq!(env.notifier.last().unwrap().content, "Bakım çalışması var");
}

#[test]
fn test_login_offline() {
    let env = TestEnv::new();
    env.server.set_offline(true);
    let before = env.storage.snapshot();

    let err = env.app.session.login(&env.app.api, "ayse", "secret1").unwrap_err();

    assert!(err.is_unreachable());
    assert_eq!(env.storage.snapshot(), before);
    assert_eq!(
        env.notifier.last().unwrap().content,
        MessageKey::ServerUnreachable.text(Language::Tr)
    );
}

#[test]
fn test_login_storage_failure_leaves_no_half_session() {
    let env = TestEnv::new();
    env.server.add_user("ayse", "secret1", Role::User);
    env.storage.set_simulate_write_error(true);

    assert!(env.app.session.login(&env.app.api, "ayse", "secret1").is_err());

    assert!(!env.app.session.is_authenticated());
    assert!(env.storage.snapshot().is_empty());
    assert_eq!(env.notifier.len(), 1);
}

// --- register ---

#[test]
fn test_register_does_not_log_in() {
    let env = TestEnv::new();

    env.app
        .session
        .register(&env.app.api, registration("mehmet"))
        .unwrap();

    assert!(!env.app.session.is_authenticated());
    assert!(env.storage.get_item(keys::AUTH_TOKEN).unwrap().is_none());
    assert_eq!(
        env.notifier.last().unwrap().content,
        MessageKey::RegisterSuccess.text(Language::Tr)
    );

    // The new account can now log in
    env.app
        .session
        .login(&env.app.api, "mehmet", "secret1")
        .unwrap();
}

#[test]
fn test_register_duplicate_shows_server_message() {
    let env = TestEnv::new();
    env.server.add_user("mehmet", "x", Role::User);

    let err = env
        .app
        .session
        .register(&env.app.api, registration("mehmet"))
        .unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert_eq!(env.notifier.last().unwrap().content, "Username is already taken");
}

#[test]
fn test_register_invalid_profile_sends_nothing() {
    let env = TestEnv::new();
    let mut profile = registration("ab");
    profile.email = "nope".into();

    assert!(env.app.session.register(&env.app.api, profile).is_err());

    assert_eq!(env.server.request_count(), 0);
    assert_eq!(env.notifier.len(), 1);
}

// --- logout ---

#[test]
fn test_logout_clears_credentials() {
    let env = TestEnv::new();
    env.sign_in("ayse", Role::User);

    env.app.session.logout();
    env.app.session.logout();

    assert!(!env.app.session.is_authenticated());
    assert_eq!(env.storage.get_item(keys::AUTH_TOKEN).unwrap(), None);
    assert_eq!(env.storage.get_item(keys::USER).unwrap(), None);

    home::load(&env.app, 0, None);
    let request = env.server.last_request().unwrap();
    assert_eq!(request.header("Authorization"), None);
}

#[test]
fn test_logout_without_session_still_clears_keys() {
    let env = TestEnv::new();
    // Stale token without a user: not a session, but still cleared
    env.storage.set_item(keys::AUTH_TOKEN, "stale").unwrap();

    env.app.session.logout();

    assert_eq!(env.storage.get_item(keys::AUTH_TOKEN).unwrap(), None);
    assert_eq!(
        env.notifier.last().unwrap().content,
        MessageKey::LogoutSuccess.text(Language::Tr)
    );
}

// --- restore ---

#[test]
fn test_session_survives_restart() {
    let server = FakeBlogServer::new();
    let storage = Rc::new(MemBackend::new());

    let first = TestEnv::unstarted(server.clone(), storage.clone());
    first.app.start();
    first.sign_in("ayse", Role::Admin);

    let second = TestEnv::unstarted(server, storage);
    assert!(second.app.session.is_loading());
    second.app.start();

    assert!(second.app.session.is_admin());
    assert_eq!(second.app.session.current().unwrap().username, "ayse");
}

// --- 401 policy ---

#[test]
fn test_401_from_listing_forces_logout() {
    let env = TestEnv::new();
    env.sign_in("ayse", Role::User);
    env.server.revoke_tokens();

    home::load(&env.app, 0, None);

    assert!(!env.app.session.is_authenticated());
    assert_eq!(env.storage.get_item(keys::AUTH_TOKEN).unwrap(), None);
    assert_eq!(env.storage.get_item(keys::USER).unwrap(), None);
    assert_eq!(env.app.navigator.current(), Some(Route::Login));
}

#[test]
fn test_401_from_any_endpoint_forces_logout() {
    let env = TestEnv::new();
    env.sign_in("ayse", Role::User);
    env.server.revoke_tokens();

    assert!(profile::fetch(&env.app).is_err());

    assert!(!env.app.session.is_authenticated());
    assert_eq!(env.storage.get_item(keys::AUTH_TOKEN).unwrap(), None);
    assert_eq!(env.app.navigator.current(), Some(Route::Login));
}

#[test]
fn test_401_keeps_preferences() {
    let env = TestEnv::new();
    env.sign_in("ayse", Role::User);
    env.app.preferences.toggle().unwrap();
    env.server.revoke_tokens();

    home::load(&env.app, 0, None);

    assert_eq!(
        env.storage.get_item(keys::DARK_MODE).unwrap(),
        Some("true".to_string())
    );
}

// --- guards ---

#[test]
fn test_guard_waits_for_restore() {
    let env = TestEnv::unstarted(FakeBlogServer::new(), Rc::new(MemBackend::new()));
    let guard = RouteGuard::new(Route::Admin);

    assert_eq!(guard.state(&env.app.session), GuardState::Loading);
    assert_eq!(env.app.open(Route::Profile), None);
    assert_eq!(env.app.open(Route::Home), Some(Route::Home));

    env.app.start();
    assert_eq!(
        guard.state(&env.app.session),
        GuardState::Redirected(Route::Login)
    );
}

#[test]
fn test_admin_route_scenarios() {
    let env = TestEnv::new();
    assert_eq!(env.app.open(Route::Admin), Some(Route::Login));

    env.sign_in("ayse", Role::User);
    assert_eq!(env.app.open(Route::Admin), Some(Route::Home));

    env.app.session.logout();
    env.sign_in("root", Role::Admin);
    assert_eq!(env.app.open(Route::Admin), Some(Route::Admin));
}

#[test]
fn test_guest_only_routes_redirect_home() {
    let env = TestEnv::new();
    assert_eq!(env.app.open(Route::Login), Some(Route::Login));

    env.sign_in("ayse", Role::User);
    assert_eq!(env.app.open(Route::Register), Some(Route::Home));
}

#[test]
fn test_guard_reevaluates_on_session_change() {
    let env = TestEnv::new();
    let guard = RouteGuard::new(Route::CreatePost);
    assert_eq!(
        guard.state(&env.app.session),
        GuardState::Redirected(Route::Login)
    );

    env.sign_in("ayse", Role::User);
    assert_eq!(guard.state(&env.app.session), GuardState::Allowed);

    env.server.revoke_tokens();
    home::load(&env.app, 0, None);
    assert_eq!(
        guard.state(&env.app.session),
        GuardState::Redirected(Route::Login)
    );
}
