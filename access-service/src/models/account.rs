use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An identity record as stored in the accounts collection.
///
/// `password` holds the credential digest, never the plaintext. An account
/// is either local (digest present, must be activated before it can
/// authenticate) or federated (`source` + `source_sub` present, created
/// active, no digest).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub password: Option<String>,
    pub username: String,
    pub fullname: Option<String>,
    pub role: String,
    pub applications: Vec<String>,
    pub active: bool,
    pub activation_code: Option<String>,
    pub source: Option<String>,
    pub source_sub: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a local, not-yet-activated account.
    pub fn new_local(
        email: String,
        password_digest: String,
        username: String,
        fullname: Option<String>,
        role: Option<String>,
        applications: Vec<String>,
        activation_code: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password: Some(password_digest),
            username,
            fullname,
            role: role.unwrap_or_else(|| "none".to_string()),
            applications,
            active: false,
            activation_code: Some(activation_code),
            source: None,
            source_sub: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an account for a federated identity. Federated accounts are
    /// active from the start and never carry a credential digest.
    pub fn new_federated(email: String, username: String, source: String, source_sub: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password: None,
            username,
            fullname: None,
            role: "none".to_string(),
            applications: Vec::new(),
            active: true,
            activation_code: None,
            source: Some(source),
            source_sub: Some(source_sub),
            created_at: now,
            updated_at: now,
        }
    }

    /// View of the account that may cross the authorization boundary.
    pub fn sanitized(&self) -> SanitizedAccount {
        SanitizedAccount {
            id: self.id.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            fullname: self.fullname.clone(),
            role: self.role.clone(),
            active: self.active,
            source: self.source.clone(),
            created_at: self.created_at,
        }
    }
}

/// Account without credential material (no digest, no activation code).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SanitizedAccount {
    pub id: String,
    pub email: String,
    pub username: String,
    pub fullname: Option<String>,
    pub role: String,
    pub active: bool,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}
