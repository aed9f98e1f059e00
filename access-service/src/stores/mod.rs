//! Store handles for the four record collections.
//!
//! One trait per entity, injected into the services so the Mongo-backed
//! implementation can be swapped for the in-memory one in tests.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoDb;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Account, Group, Member, Right, Session};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert(&self, account: &Account) -> Result<(), StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
    async fn find_active_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
    async fn find_active_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;
    /// Lookup by application id; matches any account whose applications
    /// list contains the id, active or not.
    async fn find_by_application(&self, application: &str) -> Result<Option<Account>, StoreError>;
    /// Flip `active` on the account carrying this activation code,
    /// returning the updated record.
    async fn activate_by_code(&self, code: &str) -> Result<Option<Account>, StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: &Session) -> Result<(), StoreError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, StoreError>;
}

#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn insert(&self, group: &Group) -> Result<(), StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Group>, StoreError>;
    async fn find_all(&self) -> Result<Vec<Group>, StoreError>;
    /// Update-by-id returning the new value, or None when the id is gone.
    async fn update(&self, group: &Group) -> Result<Option<Group>, StoreError>;
    /// Delete-by-id returning the old value, or None when the id is gone.
    async fn delete_by_id(&self, id: &str) -> Result<Option<Group>, StoreError>;
}

#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn insert(&self, member: &Member) -> Result<(), StoreError>;
    /// The singular membership lookup: an account has at most one.
    async fn find_by_account(&self, account_id: &str) -> Result<Option<Member>, StoreError>;
    async fn find_by_group_and_account(
        &self,
        group_id: &str,
        account_id: &str,
    ) -> Result<Option<Member>, StoreError>;
    async fn find_by_group(&self, group_id: &str) -> Result<Vec<Member>, StoreError>;
    async fn update_rights(
        &self,
        group_id: &str,
        account_id: &str,
        rights: &[Right],
    ) -> Result<Option<Member>, StoreError>;
    async fn delete(
        &self,
        group_id: &str,
        account_id: &str,
    ) -> Result<Option<Member>, StoreError>;
}

/// Liveness probe for whatever backs the stores.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;
}
