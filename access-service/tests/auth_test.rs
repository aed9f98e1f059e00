//! Session issuer tests: authentication branches, redaction, token
//! confirmation and federated login.

mod common;

use access_service::services::{Credentials, GoogleClaim, ServiceError};
use access_service::utils::{digest_password, Password};
use common::{login, register_active_account, test_context};

#[tokio::test]
async fn login_with_correct_password_returns_session_with_redacted_account() {
    let ctx = test_context();
    let account = register_active_account(&ctx, "a@x.com", "p").await;

    let authenticated = login(&ctx, "a@x.com", "p").await;

    assert_eq!(authenticated.account.id, account.id);
    assert_eq!(authenticated.session.account, account.id);
    assert_eq!(authenticated.session.token.len(), 64);
    assert!(authenticated
        .session
        .token
        .chars()
        .all(|c| c.is_ascii_alphanumeric()));

    // The returned account must not contain the plaintext nor the stored
    // digest in any serialized form.
    let serialized = serde_json::to_string(&authenticated.account).expect("serialize account");
    let stored_digest = digest_password(&Password::new("p".to_string()));
    assert!(!serialized.contains(&stored_digest));
    assert!(!serialized.contains("\"password\""));
}

#[tokio::test]
async fn login_with_wrong_password_fails_and_creates_no_session() {
    let ctx = test_context();
    register_active_account(&ctx, "a@x.com", "p").await;

    let err = ctx
        .sessions
        .authenticate(
            &Credentials {
                email: Some("a@x.com".to_string()),
                ..Credentials::default()
            },
            "wrong",
        )
        .await
        .expect_err("wrong password must not authenticate");

    assert!(matches!(err, ServiceError::InvalidCredentials));
    assert_eq!(ctx.store.session_count(), 0);
}

#[tokio::test]
async fn login_with_unknown_email_fails_with_not_found() {
    let ctx = test_context();

    let err = ctx
        .sessions
        .authenticate(
            &Credentials {
                email: Some("nobody@x.com".to_string()),
                ..Credentials::default()
            },
            "p",
        )
        .await
        .expect_err("unknown email must not authenticate");

    assert!(matches!(err, ServiceError::AccountNotFound));
}

#[tokio::test]
async fn login_before_activation_fails_with_not_found() {
    let ctx = test_context();
    ctx.accounts
        .register(common::draft("a@x.com", "p"))
        .await
        .expect("registration failed");

    let err = ctx
        .sessions
        .authenticate(
            &Credentials {
                email: Some("a@x.com".to_string()),
                ..Credentials::default()
            },
            "p",
        )
        .await
        .expect_err("inactive account must not authenticate by email");

    assert!(matches!(err, ServiceError::AccountNotFound));
}

#[tokio::test]
async fn login_requires_exactly_one_identity_field() {
    let ctx = test_context();
    register_active_account(&ctx, "a@x.com", "p").await;

    for credentials in [
        Credentials::default(),
        Credentials {
            email: Some("a@x.com".to_string()),
            username: Some("a".to_string()),
            application: None,
        },
        Credentials {
            email: Some("a@x.com".to_string()),
            username: Some("a".to_string()),
            application: Some("app-1".to_string()),
        },
    ] {
        let err = ctx
            .sessions
            .authenticate(&credentials, "p")
            .await
            .expect_err("ambiguous credentials must be rejected");
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}

#[tokio::test]
async fn login_by_username_selects_the_username_branch() {
    let ctx = test_context();
    register_active_account(&ctx, "a@x.com", "p").await;

    let authenticated = ctx
        .sessions
        .authenticate(
            &Credentials {
                username: Some("a".to_string()),
                ..Credentials::default()
            },
            "p",
        )
        .await
        .expect("username authentication failed");

    assert_eq!(
        authenticated.session.method,
        access_service::models::AuthMethod::Username
    );
}

#[tokio::test]
async fn application_login_verifies_the_shared_secret() {
    let ctx = test_context();
    let mut draft = common::draft("machine@x.com", "shared-secret");
    draft.applications = vec!["app-1".to_string()];
    // Application accounts authenticate without activation; the lookup
    // matches any account carrying the application id.
    ctx.accounts.register(draft).await.expect("registration failed");

    let authenticated = ctx
        .sessions
        .authenticate(
            &Credentials {
                application: Some("app-1".to_string()),
                ..Credentials::default()
            },
            "shared-secret",
        )
        .await
        .expect("application authentication failed");
    assert_eq!(
        authenticated.session.method,
        access_service::models::AuthMethod::Application
    );

    let err = ctx
        .sessions
        .authenticate(
            &Credentials {
                application: Some("app-1".to_string()),
                ..Credentials::default()
            },
            "not-the-secret",
        )
        .await
        .expect_err("wrong shared secret must not authenticate");
    assert!(matches!(err, ServiceError::InvalidCredentials));
}

#[tokio::test]
async fn confirm_token_resolves_the_authenticated_account() {
    let ctx = test_context();
    let account = register_active_account(&ctx, "a@x.com", "p").await;
    let authenticated = login(&ctx, "a@x.com", "p").await;

    let confirmed = ctx
        .sessions
        .confirm_token(Some(&authenticated.session.token))
        .await
        .expect("token confirmation failed");

    assert_eq!(confirmed.account.id, account.id);
    assert_eq!(confirmed.session.token, authenticated.session.token);
}

#[tokio::test]
async fn confirm_token_rejects_fabricated_tokens() {
    let ctx = test_context();
    register_active_account(&ctx, "a@x.com", "p").await;
    login(&ctx, "a@x.com", "p").await;

    let err = ctx
        .sessions
        .confirm_token(Some("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"))
        .await
        .expect_err("fabricated token must not confirm");

    assert!(matches!(err, ServiceError::SessionNotFound));
}

#[tokio::test]
async fn confirm_token_rejects_absent_tokens() {
    let ctx = test_context();

    let err = ctx
        .sessions
        .confirm_token(None)
        .await
        .expect_err("absent token must not confirm");

    assert!(matches!(err, ServiceError::MissingToken));
}

#[tokio::test]
async fn sessions_are_additive_across_logins() {
    let ctx = test_context();
    register_active_account(&ctx, "a@x.com", "p").await;

    let first = login(&ctx, "a@x.com", "p").await;
    let second = login(&ctx, "a@x.com", "p").await;

    assert_ne!(first.session.token, second.session.token);
    assert_eq!(ctx.store.session_count(), 2);

    // Both remain valid; neither login revoked the other.
    ctx.sessions
        .confirm_token(Some(&first.session.token))
        .await
        .expect("first session should still confirm");
    ctx.sessions
        .confirm_token(Some(&second.session.token))
        .await
        .expect("second session should still confirm");
}

#[tokio::test]
async fn google_login_is_idempotent_per_email() {
    let ctx = test_context();
    let claim = GoogleClaim {
        subject: "s1".to_string(),
        email: "g@x.com".to_string(),
        given_name: "Gee".to_string(),
        family_name: "Okta".to_string(),
    };

    let first = ctx
        .sessions
        .google_authenticate(&claim)
        .await
        .expect("first google login failed");
    let second = ctx
        .sessions
        .google_authenticate(&claim)
        .await
        .expect("second google login failed");

    assert_eq!(first.account.id, second.account.id);
    assert_ne!(first.session.token, second.session.token);
    assert_eq!(first.account.username, "Gee Okta");
    assert!(first.account.active);
}

#[tokio::test]
async fn google_login_cannot_take_over_a_password_account() {
    let ctx = test_context();
    register_active_account(&ctx, "a@x.com", "p").await;

    let err = ctx
        .sessions
        .google_authenticate(&GoogleClaim {
            subject: "s1".to_string(),
            email: "a@x.com".to_string(),
            given_name: "Eve".to_string(),
            family_name: "Adams".to_string(),
        })
        .await
        .expect_err("federated login must not hijack a password account");

    assert!(matches!(err, ServiceError::AccountConflict));
}

#[tokio::test]
async fn google_login_rejects_subject_mismatch() {
    let ctx = test_context();
    let claim = GoogleClaim {
        subject: "s1".to_string(),
        email: "g@x.com".to_string(),
        given_name: "Gee".to_string(),
        family_name: "Okta".to_string(),
    };
    ctx.sessions
        .google_authenticate(&claim)
        .await
        .expect("first google login failed");

    let err = ctx
        .sessions
        .google_authenticate(&GoogleClaim {
            subject: "s2".to_string(),
            ..claim
        })
        .await
        .expect_err("different subject on the same email must be rejected");

    assert!(matches!(err, ServiceError::AccountConflict));
}
