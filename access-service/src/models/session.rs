use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// How a session was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Email,
    Username,
    Application,
    Google,
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AuthMethod::Email => "email",
            AuthMethod::Username => "username",
            AuthMethod::Application => "application",
            AuthMethod::Google => "google",
        };
        f.write_str(name)
    }
}

/// Proof of authentication. The token is the bearer credential: possession
/// is equivalent to the account itself, so it is only ever handed to the
/// caller that authenticated. Sessions carry no TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: String,
    pub token: String,
    pub account: String,
    pub method: AuthMethod,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: String, account: String, method: AuthMethod) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            token,
            account,
            method,
            created_at: now,
            updated_at: now,
        }
    }
}
