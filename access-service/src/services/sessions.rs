use std::sync::Arc;

use super::{GoogleClaim, ServiceError};
use crate::models::{Account, AuthMethod, SanitizedAccount, Session};
use crate::stores::{AccountStore, SessionStore};
use crate::utils::crypto::SESSION_TOKEN_LENGTH;
use crate::utils::{generate_token, verify_password, Password};

const GOOGLE_SOURCE: &str = "google";

/// Identity part of a credential pair. Exactly one field may be set; the
/// populated field selects the account lookup.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: Option<String>,
    pub username: Option<String>,
    pub application: Option<String>,
}

/// A freshly confirmed or created session together with its account.
/// The account is always the sanitized view; the credential digest never
/// crosses this boundary.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub session: Session,
    pub account: SanitizedAccount,
}

/// Issues and resolves opaque bearer sessions.
#[derive(Clone)]
pub struct SessionService {
    accounts: Arc<dyn AccountStore>,
    sessions: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(accounts: Arc<dyn AccountStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { accounts, sessions }
    }

    /// Authenticate with a password (or shared application secret).
    ///
    /// Sessions are additive: concurrent logins for the same account each
    /// get their own row, none invalidates another.
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
        password: &str,
    ) -> Result<AuthenticatedSession, ServiceError> {
        let (account, method) = match (
            &credentials.email,
            &credentials.username,
            &credentials.application,
        ) {
            (Some(email), None, None) => (
                self.accounts.find_active_by_email(email).await?,
                AuthMethod::Email,
            ),
            (None, Some(username), None) => (
                self.accounts.find_active_by_username(username).await?,
                AuthMethod::Username,
            ),
            (None, None, Some(application)) => (
                self.accounts.find_by_application(application).await?,
                AuthMethod::Application,
            ),
            _ => {
                return Err(ServiceError::Validation(
                    "exactly one of email, username or application must be supplied".to_string(),
                ))
            }
        };

        let account = account.ok_or(ServiceError::AccountNotFound)?;

        // The digest comparison applies to every branch; for application
        // credentials the password doubles as the shared secret.
        let digest = account
            .password
            .as_deref()
            .ok_or(ServiceError::InvalidCredentials)?;
        if !verify_password(&Password::new(password.to_string()), digest) {
            tracing::warn!(account = %account.id, method = %method, "Credential verification failed");
            return Err(ServiceError::InvalidCredentials);
        }

        self.issue(&account, method).await
    }

    /// Establish a session from a verified federated claim.
    ///
    /// First sight of an email creates the account; afterwards the claim
    /// must match the stored federation tag and subject, so a federated
    /// login can never take over a local password account that happens to
    /// share the email.
    pub async fn google_authenticate(
        &self,
        claim: &GoogleClaim,
    ) -> Result<AuthenticatedSession, ServiceError> {
        let account = match self.accounts.find_by_email(&claim.email).await? {
            None => {
                let account = Account::new_federated(
                    claim.email.clone(),
                    format!("{} {}", claim.given_name, claim.family_name),
                    GOOGLE_SOURCE.to_string(),
                    claim.subject.clone(),
                );
                self.accounts.insert(&account).await?;
                tracing::info!(account = %account.id, "Created federated account");
                account
            }
            Some(account) => {
                if account.source.as_deref() != Some(GOOGLE_SOURCE)
                    || account.source_sub.as_deref() != Some(claim.subject.as_str())
                {
                    tracing::warn!(account = %account.id, "Federated claim does not match stored identity");
                    return Err(ServiceError::AccountConflict);
                }
                account
            }
        };

        self.issue(&account, AuthMethod::Google).await
    }

    /// Resolve a bearer token to its session and account.
    ///
    /// The sole gate: every authorized operation passes through here before
    /// anything else happens on its behalf.
    pub async fn confirm_token(
        &self,
        token: Option<&str>,
    ) -> Result<AuthenticatedSession, ServiceError> {
        let token = token.ok_or(ServiceError::MissingToken)?;
        let session = self
            .sessions
            .find_by_token(token)
            .await?
            .ok_or(ServiceError::SessionNotFound)?;
        let account = self
            .accounts
            .find_by_id(&session.account)
            .await?
            .ok_or(ServiceError::AccountNotFound)?;
        Ok(AuthenticatedSession {
            session,
            account: account.sanitized(),
        })
    }

    async fn issue(
        &self,
        account: &Account,
        method: AuthMethod,
    ) -> Result<AuthenticatedSession, ServiceError> {
        let token = generate_token(SESSION_TOKEN_LENGTH);
        let session = Session::new(token, account.id.clone(), method);
        self.sessions.insert(&session).await?;
        tracing::info!(account = %account.id, method = %method, "Session created");
        Ok(AuthenticatedSession {
            session,
            account: account.sanitized(),
        })
    }
}
