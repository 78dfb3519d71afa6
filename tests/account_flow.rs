//! Account lifecycle against the in-memory store: no database required.

use accounts::auth::TokenIssuer;
use accounts::db::{AccountStore, InMemoryAccountStore};
use accounts::models::{LoginRequest, RegisterAccount, UpdateAccount};
use accounts::validation::ViolationKind;
use accounts::{AccountService, AppError};
use chrono::{Duration, Utc};

fn service() -> AccountService {
    AccountService::new(
        TokenIssuer::new("test-jwt-secret-min-32-chars!!!!", Duration::minutes(30)).unwrap(),
    )
}

fn registration(nickname: &str) -> RegisterAccount {
    RegisterAccount {
        nickname: nickname.to_string(),
        email: format!("{}@example.com", nickname),
        password: "SecurePassword123!".to_string(),
        first_name: Some("John".to_string()),
        last_name: Some("Doe".to_string()),
        bio: Some("I am a software engineer.".to_string()),
        profile_picture_url: Some("https://example.com/profile_pictures/john_doe.jpg".to_string()),
        linkedin_profile_url: Some("https://linkedin.com/in/johndoe".to_string()),
        github_profile_url: None,
    }
}

fn login(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn duplicate_registration_is_reported() {
    let svc = service();
    let mut store = InMemoryAccountStore::new();
    svc.register(&mut store, registration("alice"), Utc::now())
        .await
        .unwrap();

    let err = svc
        .register(&mut store, registration("alice"), Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "duplicate_identity");

    let mut same_email = registration("alice2");
    same_email.email = "ALICE@example.com".to_string();
    let err = svc
        .register(&mut store, same_email, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateIdentity(ref f) if f == "email"));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let svc = service();
    let mut store = InMemoryAccountStore::new();
    svc.register(&mut store, registration("alice"), Utc::now())
        .await
        .unwrap();

    let wrong = svc
        .login(&mut store, login("alice", "not-the-password"), Utc::now())
        .await
        .unwrap_err();
    let unknown = svc
        .login(&mut store, login("bob", "not-the-password"), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(wrong, AppError::InvalidCredentials));
    assert!(matches!(unknown, AppError::InvalidCredentials));
    assert_eq!(wrong.to_string(), unknown.to_string());
}

#[tokio::test]
async fn login_by_email_and_token_expiry() {
    let svc = service();
    let mut store = InMemoryAccountStore::new();
    let t0 = Utc::now();
    let account = svc
        .register(&mut store, registration("alice"), t0)
        .await
        .unwrap();

    let token = svc
        .login(&mut store, login("Alice@Example.com", "SecurePassword123!"), t0)
        .await
        .unwrap();
    let ttl = svc.tokens().ttl();

    let identity = svc
        .tokens()
        .verify(&token.access_token, t0 + ttl - Duration::seconds(1))
        .unwrap();
    assert_eq!(identity.account_id, account.id);
    assert!(svc
        .tokens()
        .verify(&token.access_token, t0 + ttl + Duration::seconds(1))
        .is_err());
}

#[tokio::test]
async fn partial_update_changes_only_given_fields() {
    let svc = service();
    let mut store = InMemoryAccountStore::new();
    let before = svc
        .register(&mut store, registration("john_doe_123"), Utc::now())
        .await
        .unwrap();

    let update = UpdateAccount {
        email: Some("john.doe.new@example.com".to_string()),
        bio: Some("I specialize in backend development.".to_string()),
        ..Default::default()
    };
    let after = svc
        .update(&mut store, before.id, update, Utc::now())
        .await
        .unwrap();

    assert_eq!(after.email, "john.doe.new@example.com");
    assert_eq!(after.bio.as_deref(), Some("I specialize in backend development."));
    assert_eq!(after.nickname, before.nickname);
    assert_eq!(after.first_name, before.first_name);
    assert_eq!(after.last_name, before.last_name);
    assert_eq!(after.profile_picture_url, before.profile_picture_url);
    assert_eq!(after.hashed_password, before.hashed_password);
    assert_eq!(after.role, before.role);

    let stored = store.find_by_id(before.id).await.unwrap().unwrap();
    assert_eq!(stored.email, "john.doe.new@example.com");
}

#[tokio::test]
async fn invalid_update_reports_all_fields_and_changes_nothing() {
    let svc = service();
    let mut store = InMemoryAccountStore::new();
    let before = svc
        .register(&mut store, registration("alice"), Utc::now())
        .await
        .unwrap();

    let update = UpdateAccount {
        nickname: Some("test user".to_string()),
        email: Some("invalid-email-format".to_string()),
        profile_picture_url: Some("ftp://invalid-url.com/profile.jpg".to_string()),
        ..Default::default()
    };
    let err = svc
        .update(&mut store, before.id, update, Utc::now())
        .await
        .unwrap_err();
    let AppError::Validation(fields) = err else {
        panic!("expected validation failure");
    };
    let kinds: Vec<_> = fields.iter().map(|f| (f.field.as_str(), f.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            ("email", ViolationKind::PatternMismatch),
            ("nickname", ViolationKind::PatternMismatch),
            ("profile_picture_url", ViolationKind::SchemeNotAllowed),
        ]
    );

    let stored = store.find_by_id(before.id).await.unwrap().unwrap();
    assert_eq!(stored.email, before.email);
}

#[tokio::test]
async fn update_cannot_take_another_nickname() {
    let svc = service();
    let mut store = InMemoryAccountStore::new();
    svc.register(&mut store, registration("alice"), Utc::now())
        .await
        .unwrap();
    let bob = svc
        .register(&mut store, registration("bobby"), Utc::now())
        .await
        .unwrap();

    let update = UpdateAccount {
        nickname: Some("alice".to_string()),
        ..Default::default()
    };
    let err = svc
        .update(&mut store, bob.id, update, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateIdentity(ref f) if f == "nickname"));
}

#[tokio::test]
async fn missing_accounts_are_not_found() {
    let svc = service();
    let mut store = InMemoryAccountStore::new();
    let id = uuid::Uuid::new_v4();

    assert_eq!(svc.get(&mut store, id).await.unwrap_err().kind(), "not_found");
    assert_eq!(svc.delete(&mut store, id).await.unwrap_err().kind(), "not_found");
    assert_eq!(
        svc.update(&mut store, id, UpdateAccount::default(), Utc::now())
            .await
            .unwrap_err()
            .kind(),
        "not_found"
    );
}

#[tokio::test]
async fn delete_removes_account() {
    let svc = service();
    let mut store = InMemoryAccountStore::new();
    let account = svc
        .register(&mut store, registration("alice"), Utc::now())
        .await
        .unwrap();
    svc.delete(&mut store, account.id).await.unwrap();
    assert!(store.is_empty());
    assert!(svc
        .login(&mut store, login("alice", "SecurePassword123!"), Utc::now())
        .await
        .is_err());
}
