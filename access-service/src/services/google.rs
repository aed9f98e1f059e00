use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;

use super::ServiceError;
use crate::config::GoogleOAuthConfig;

/// A verified federated identity claim.
///
/// Producing one of these means the upstream provider vouched for the
/// subject/email pair; the session layer trusts it as-is.
#[derive(Debug, Clone)]
pub struct GoogleClaim {
    pub subject: String,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
}

#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<GoogleClaim, ServiceError>;
}

/// Shape of Google's tokeninfo response, trimmed to the fields we read.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    sub: String,
    aud: String,
    email: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
}

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Verifier backed by Google's tokeninfo endpoint.
#[derive(Clone)]
pub struct GoogleVerifier {
    http: reqwest::Client,
    client_id: String,
}

impl GoogleVerifier {
    pub fn new(config: &GoogleOAuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
        }
    }
}

#[async_trait]
impl GoogleTokenVerifier for GoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleClaim, ServiceError> {
        if self.client_id.is_empty() {
            return Err(ServiceError::TokenVerification(
                "Google authentication has not been configured".to_string(),
            ));
        }

        let response = self
            .http
            .get(TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| ServiceError::TokenVerification(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::TokenVerification(format!(
                "tokeninfo returned {}",
                response.status()
            )));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| ServiceError::TokenVerification(e.to_string()))?;

        // The token must have been issued for this application.
        if info.aud != self.client_id {
            return Err(ServiceError::TokenVerification(
                "token audience mismatch".to_string(),
            ));
        }

        let email = info.email.ok_or_else(|| {
            ServiceError::TokenVerification("claim carried no email".to_string())
        })?;

        Ok(GoogleClaim {
            subject: info.sub,
            email,
            given_name: info.given_name.unwrap_or_default(),
            family_name: info.family_name.unwrap_or_default(),
        })
    }
}

/// Verifier that resolves tokens from a fixed map. Unknown tokens fail the
/// same way an invalid live token does.
#[derive(Default)]
pub struct MockGoogleVerifier {
    claims: DashMap<String, GoogleClaim>,
}

impl MockGoogleVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id_token: &str, claim: GoogleClaim) {
        self.claims.insert(id_token.to_string(), claim);
    }
}

#[async_trait]
impl GoogleTokenVerifier for MockGoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleClaim, ServiceError> {
        self.claims
            .get(id_token)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ServiceError::TokenVerification("unknown token".to_string()))
    }
}
