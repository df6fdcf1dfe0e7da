//! Account flows across restarts: signup, login, persisted session, logout.

use std::time::Duration;

use tempfile::TempDir;

use ecobot::auth::storage::UserStorage;
use ecobot::auth::{AuthError, AuthStore, DEMO_EMAIL, DEMO_PASSWORD};
use ecobot::site::dashboard;
use ecobot::site::signup::SignupForm;
use ecobot::site::{FormError, SubmitError};

fn open(tmp: &TempDir) -> AuthStore {
    AuthStore::open(UserStorage::new(tmp.path()), Duration::ZERO)
}

fn jane() -> SignupForm {
    SignupForm {
        name: "Jane".into(),
        email: "jane@x.com".into(),
        password: "abcdef".into(),
        confirm_password: "abcdef".into(),
        agree_terms: true,
    }
}

#[tokio::test]
async fn signup_persists_across_restart() {
    let tmp = TempDir::new().unwrap();

    let id = {
        let mut auth = open(&tmp);
        let user = jane().submit(&mut auth).await.unwrap();
        assert_eq!(user.name, "Jane");
        assert_eq!(user.email, "jane@x.com");
        assert_eq!(user.id.len(), 9);
        user.id.clone()
    };

    let auth = open(&tmp);
    let restored = auth.current_user().unwrap();
    assert_eq!(restored.id, id);
    assert_eq!(dashboard::load(&auth).unwrap().greeting, "Welcome back, Jane!");
}

#[tokio::test]
async fn rejected_signup_leaves_session_alone() {
    let tmp = TempDir::new().unwrap();
    let mut auth = open(&tmp);
    auth.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

    let short = SignupForm { password: "abc".into(), confirm_password: "abc".into(), ..jane() };
    let err = short.submit(&mut auth).await.unwrap_err();
    assert!(matches!(err, SubmitError::Form(FormError::PasswordTooShort)));
    assert_eq!(auth.current_user().unwrap().email, DEMO_EMAIL);
}

#[tokio::test]
async fn demo_login_and_logout() {
    let tmp = TempDir::new().unwrap();
    let mut auth = open(&tmp);

    assert!(matches!(
        auth.login(DEMO_EMAIL, "wrong").await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(!auth.is_authenticated());

    let user = auth.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
    assert_eq!(user.id, "1");
    assert_eq!(user.name, "Demo User");

    auth.logout().unwrap();
    assert!(!auth.is_authenticated());
    assert!(!open(&tmp).is_authenticated());
    assert!(matches!(dashboard::load(&auth), Err(AuthError::NotAuthenticated)));
}
