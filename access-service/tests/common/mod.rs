//! Common test utilities for access-service integration tests.
//!
//! Everything runs against the in-memory stores; no external database or
//! mail transport is needed.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Once;

use access_service::config::{
    AccessConfig, Environment, GoogleOAuthConfig, MongoConfig, RateLimitConfig, SecurityConfig,
    SmtpConfig, SwaggerConfig, SwaggerMode,
};
use access_service::models::SanitizedAccount;
use access_service::services::{
    AccountDraft, AccountService, AuthenticatedSession, Credentials, GroupDraft, GroupService,
    MemberService, MockGoogleVerifier, MockMailer, PermissionService, SessionService,
};
use access_service::stores::MemoryStore;
use access_service::AppState;
use service_core::config::Config as CommonConfig;
use service_core::middleware::rate_limit::create_ip_rate_limiter;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,access_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Fully wired services over one shared in-memory store.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<MockMailer>,
    pub google: Arc<MockGoogleVerifier>,
    pub accounts: AccountService,
    pub sessions: SessionService,
    pub permissions: PermissionService,
    pub groups: GroupService,
    pub members: MemberService,
}

pub fn test_context() -> TestContext {
    init_tracing();

    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(MockMailer::new());
    let google = Arc::new(MockGoogleVerifier::new());

    let permissions = PermissionService::new(store.clone(), store.clone());
    let accounts = AccountService::new(store.clone(), mailer.clone());
    let sessions = SessionService::new(store.clone(), store.clone());
    let groups = GroupService::new(store.clone(), store.clone(), permissions.clone());
    let members = MemberService::new(store.clone(), store.clone(), permissions.clone());

    TestContext {
        store,
        mailer,
        google,
        accounts,
        sessions,
        permissions,
        groups,
        members,
    }
}

pub fn test_config() -> AccessConfig {
    AccessConfig {
        common: CommonConfig { port: 0 },
        environment: Environment::Dev,
        service_name: "access-service-test".to_string(),
        service_version: "test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "access-test".to_string(),
        },
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            user: "test@localhost".to_string(),
            password: String::new(),
            from_address: "no-reply@localhost".to_string(),
        },
        google: GoogleOAuthConfig {
            client_id: "test-client".to_string(),
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        swagger: SwaggerConfig {
            enabled: SwaggerMode::Disabled,
        },
        rate_limit: RateLimitConfig {
            login_attempts: 1000,
            login_window_seconds: 60,
            register_attempts: 1000,
            register_window_seconds: 60,
            global_ip_limit: 10_000,
            global_ip_window_seconds: 60,
        },
    }
}

/// App state over the context's stores, for router-level tests.
pub fn test_state(ctx: &TestContext) -> AppState {
    let rate_limit = test_config().rate_limit;
    AppState {
        config: test_config(),
        accounts: ctx.accounts.clone(),
        sessions: ctx.sessions.clone(),
        groups: ctx.groups.clone(),
        members: ctx.members.clone(),
        permissions: ctx.permissions.clone(),
        google: ctx.google.clone(),
        health: ctx.store.clone(),
        login_rate_limiter: create_ip_rate_limiter(
            rate_limit.login_attempts,
            rate_limit.login_window_seconds,
        ),
        register_rate_limiter: create_ip_rate_limiter(
            rate_limit.register_attempts,
            rate_limit.register_window_seconds,
        ),
        ip_rate_limiter: create_ip_rate_limiter(
            rate_limit.global_ip_limit,
            rate_limit.global_ip_window_seconds,
        ),
    }
}

pub fn draft(email: &str, password: &str) -> AccountDraft {
    AccountDraft {
        email: email.to_string(),
        password: Some(password.to_string()),
        username: email.split('@').next().unwrap_or(email).to_string(),
        fullname: None,
        role: None,
        applications: Vec::new(),
    }
}

/// Register an account and walk it through email activation.
pub async fn register_active_account(
    ctx: &TestContext,
    email: &str,
    password: &str,
) -> SanitizedAccount {
    ctx.accounts
        .register(draft(email, password))
        .await
        .expect("registration failed");
    let code = ctx
        .mailer
        .last_activation_code()
        .expect("no activation email recorded");
    ctx.accounts.activate(&code).await.expect("activation failed")
}

/// Log in with email credentials.
pub async fn login(ctx: &TestContext, email: &str, password: &str) -> AuthenticatedSession {
    ctx.sessions
        .authenticate(
            &Credentials {
                email: Some(email.to_string()),
                ..Credentials::default()
            },
            password,
        )
        .await
        .expect("authentication failed")
}

/// Create a group owned by `creator`.
pub async fn create_group(
    ctx: &TestContext,
    creator: &SanitizedAccount,
    name: &str,
) -> access_service::models::Group {
    let (group, _member) = ctx
        .groups
        .create_group(
            GroupDraft {
                name: name.to_string(),
                business_code: "1234567-8".to_string(),
                address: "Example Street 1".to_string(),
                domains: "example.com".to_string(),
            },
            creator,
        )
        .await
        .expect("group creation failed");
    group
}
