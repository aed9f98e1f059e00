use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use super::{
    AccountStore, GroupStore, MemberStore, SessionStore, StoreError, StoreHealth,
};
use crate::models::{Account, Group, Member, Right, Session};

/// In-memory store over concurrent maps.
///
/// Implements all four store traits so a single instance can back every
/// service in tests and local runs. Mirrors the per-document atomicity of
/// the Mongo implementation: each call touches one record.
#[derive(Default)]
pub struct MemoryStore {
    accounts: DashMap<String, Account>,
    sessions: DashMap<String, Session>,
    groups: DashMap<String, Group>,
    members: DashMap<String, Member>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions. Test hook: authentication failures must
    /// not leave session rows behind.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of stored groups. Test hook for the create-group rollback.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        self.accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.email == email)
            .map(|entry| entry.value().clone()))
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.email == email && entry.active)
            .map(|entry| entry.value().clone()))
    }

    async fn find_active_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.username == username && entry.active)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_application(&self, application: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.applications.iter().any(|a| a == application))
            .map(|entry| entry.value().clone()))
    }

    async fn activate_by_code(&self, code: &str) -> Result<Option<Account>, StoreError> {
        let id = self
            .accounts
            .iter()
            .find(|entry| entry.activation_code.as_deref() == Some(code))
            .map(|entry| entry.id.clone());
        match id {
            Some(id) => {
                let mut entry = self
                    .accounts
                    .get_mut(&id)
                    .ok_or_else(|| StoreError::Unavailable("account vanished".to_string()))?;
                entry.active = true;
                Ok(Some(entry.value().clone()))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, session: &Session) -> Result<(), StoreError> {
        self.sessions.insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.get(token).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn insert(&self, group: &Group) -> Result<(), StoreError> {
        self.groups.insert(group.id.clone(), group.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Group>, StoreError> {
        Ok(self.groups.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_all(&self) -> Result<Vec<Group>, StoreError> {
        Ok(self.groups.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn update(&self, group: &Group) -> Result<Option<Group>, StoreError> {
        match self.groups.get_mut(&group.id) {
            Some(mut entry) => {
                *entry = group.clone();
                Ok(Some(entry.value().clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Group>, StoreError> {
        Ok(self.groups.remove(id).map(|(_, group)| group))
    }
}

#[async_trait]
impl MemberStore for MemoryStore {
    async fn insert(&self, member: &Member) -> Result<(), StoreError> {
        self.members.insert(member.id.clone(), member.clone());
        Ok(())
    }

    async fn find_by_account(&self, account_id: &str) -> Result<Option<Member>, StoreError> {
        Ok(self
            .members
            .iter()
            .find(|entry| entry.account == account_id)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_group_and_account(
        &self,
        group_id: &str,
        account_id: &str,
    ) -> Result<Option<Member>, StoreError> {
        Ok(self
            .members
            .iter()
            .find(|entry| entry.group == group_id && entry.account == account_id)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_group(&self, group_id: &str) -> Result<Vec<Member>, StoreError> {
        Ok(self
            .members
            .iter()
            .filter(|entry| entry.group == group_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn update_rights(
        &self,
        group_id: &str,
        account_id: &str,
        rights: &[Right],
    ) -> Result<Option<Member>, StoreError> {
        let id = self
            .members
            .iter()
            .find(|entry| entry.group == group_id && entry.account == account_id)
            .map(|entry| entry.id.clone());
        match id {
            Some(id) => {
                let mut entry = self
                    .members
                    .get_mut(&id)
                    .ok_or_else(|| StoreError::Unavailable("member vanished".to_string()))?;
                entry.rights = rights.to_vec();
                entry.updated_at = Utc::now();
                Ok(Some(entry.value().clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(
        &self,
        group_id: &str,
        account_id: &str,
    ) -> Result<Option<Member>, StoreError> {
        let id = self
            .members
            .iter()
            .find(|entry| entry.group == group_id && entry.account == account_id)
            .map(|entry| entry.id.clone());
        Ok(id
            .and_then(|id| self.members.remove(&id))
            .map(|(_, member)| member))
    }
}
