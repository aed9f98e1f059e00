use std::sync::Arc;

use super::{PermissionService, ServiceError};
use crate::models::{Member, Right, SanitizedAccount};
use crate::stores::{AccountStore, MemberStore};

/// Membership management within a group. Every operation re-checks the
/// caller's rights against the target group before touching anything.
#[derive(Clone)]
pub struct MemberService {
    accounts: Arc<dyn AccountStore>,
    members: Arc<dyn MemberStore>,
    permissions: PermissionService,
}

impl MemberService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        members: Arc<dyn MemberStore>,
        permissions: PermissionService,
    ) -> Self {
        Self {
            accounts,
            members,
            permissions,
        }
    }

    /// Enroll another account into a group. Caller needs WRITE; the target
    /// must exist and must not already belong to any group.
    pub async fn add_member(
        &self,
        group_id: &str,
        account_id: &str,
        rights: Vec<Right>,
        caller: &SanitizedAccount,
    ) -> Result<Member, ServiceError> {
        let group = self.permissions.group(group_id).await?;
        self.permissions
            .confirm_group_permission(Right::Write, &group, caller)
            .await?;

        let target = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(ServiceError::AccountNotFound)?;

        if self.members.find_by_account(&target.id).await?.is_some() {
            return Err(ServiceError::MembershipConflict);
        }

        let member = Member::new(group.id.clone(), target.id.clone(), rights);
        self.members.insert(&member).await?;
        tracing::info!(group = %group.id, account = %target.id, "Member added");
        Ok(member)
    }

    /// Replace a member's rights. Caller needs WRITE.
    pub async fn update_member(
        &self,
        group_id: &str,
        account_id: &str,
        rights: Vec<Right>,
        caller: &SanitizedAccount,
    ) -> Result<Member, ServiceError> {
        let group = self.permissions.group(group_id).await?;
        self.permissions
            .confirm_group_permission(Right::Write, &group, caller)
            .await?;

        self.members
            .update_rights(&group.id, account_id, &rights)
            .await?
            .ok_or(ServiceError::MembershipNotFound)
    }

    /// Remove a member from a group. Caller needs DELETE.
    pub async fn remove_member(
        &self,
        group_id: &str,
        account_id: &str,
        caller: &SanitizedAccount,
    ) -> Result<Member, ServiceError> {
        let group = self.permissions.group(group_id).await?;
        self.permissions
            .confirm_group_permission(Right::Delete, &group, caller)
            .await?;

        let removed = self
            .members
            .delete(&group.id, account_id)
            .await?
            .ok_or(ServiceError::MembershipNotFound)?;
        tracing::info!(group = %group.id, account = %account_id, "Member removed");
        Ok(removed)
    }

    /// List a group's members. Caller needs READ.
    pub async fn members_of_group(
        &self,
        group_id: &str,
        caller: &SanitizedAccount,
    ) -> Result<Vec<Member>, ServiceError> {
        let group = self.permissions.group(group_id).await?;
        self.permissions
            .confirm_group_permission(Right::Read, &group, caller)
            .await?;

        Ok(self.members.find_by_group(&group.id).await?)
    }
}
