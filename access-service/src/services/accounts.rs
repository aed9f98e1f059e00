use std::sync::Arc;

use super::{EmailProvider, ServiceError};
use crate::models::{Account, SanitizedAccount};
use crate::stores::AccountStore;
use crate::utils::crypto::ACTIVATION_CODE_LENGTH;
use crate::utils::{digest_password, generate_token, Password};

/// Caller-supplied registration fields.
#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub email: String,
    pub password: Option<String>,
    pub username: String,
    pub fullname: Option<String>,
    pub role: Option<String>,
    pub applications: Vec<String>,
}

/// Registration and activation of local accounts.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    mailer: Arc<dyn EmailProvider>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>, mailer: Arc<dyn EmailProvider>) -> Self {
        Self { accounts, mailer }
    }

    /// Register a local account and send the activation email.
    ///
    /// The account stays inactive until the code comes back. A mail
    /// failure is reported to the caller but the account is already
    /// persisted at that point; re-registration of the email then reports
    /// `EmailTaken`.
    pub async fn register(&self, draft: AccountDraft) -> Result<SanitizedAccount, ServiceError> {
        let password = match draft.password {
            Some(ref password) if !password.is_empty() => password.clone(),
            _ => {
                return Err(ServiceError::Validation(
                    "account password was empty".to_string(),
                ))
            }
        };

        if self.accounts.find_by_email(&draft.email).await?.is_some() {
            return Err(ServiceError::EmailTaken);
        }

        let activation_code = generate_token(ACTIVATION_CODE_LENGTH);
        let account = Account::new_local(
            draft.email,
            digest_password(&Password::new(password)),
            draft.username,
            draft.fullname,
            draft.role,
            draft.applications,
            activation_code.clone(),
        );
        self.accounts.insert(&account).await?;
        tracing::info!(account = %account.id, "Account registered");

        self.mailer
            .send_activation_email(&account.email, &activation_code)
            .await?;

        Ok(account.sanitized())
    }

    /// Flip an account active by its activation code.
    pub async fn activate(&self, code: &str) -> Result<SanitizedAccount, ServiceError> {
        let account = self
            .accounts
            .activate_by_code(code)
            .await?
            .ok_or(ServiceError::AccountNotFound)?;
        tracing::info!(account = %account.id, "Account activated");
        Ok(account.sanitized())
    }

    pub async fn get_account(&self, id: &str) -> Result<SanitizedAccount, ServiceError> {
        let account = self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::AccountNotFound)?;
        Ok(account.sanitized())
    }
}
