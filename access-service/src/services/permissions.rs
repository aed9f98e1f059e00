use std::sync::Arc;

use super::ServiceError;
use crate::models::{Group, Right, SanitizedAccount};
use crate::stores::{GroupStore, MemberStore};

/// Positive permission outcome.
///
/// Only ever constructed on the grant path; a denial is always the
/// `PermissionDenied` error, so no caller can mistake a default value for
/// an approval.
#[derive(Debug, Clone, Copy)]
pub struct PermissionGrant {
    pub granted: bool,
}

impl PermissionGrant {
    fn granted() -> Self {
        Self { granted: true }
    }
}

/// Grant together with the group it was resolved against.
#[derive(Debug, Clone)]
pub struct GroupPermission {
    pub group: Group,
    pub grant: PermissionGrant,
}

/// Resolves an account's membership and checks it for required rights.
#[derive(Clone)]
pub struct PermissionService {
    groups: Arc<dyn GroupStore>,
    members: Arc<dyn MemberStore>,
}

impl PermissionService {
    pub fn new(groups: Arc<dyn GroupStore>, members: Arc<dyn MemberStore>) -> Self {
        Self { groups, members }
    }

    /// Check that `account` holds `right` within `group`.
    ///
    /// Missing membership and missing right are indistinguishable to the
    /// caller on purpose: both deny.
    pub async fn confirm_group_permission(
        &self,
        right: Right,
        group: &Group,
        account: &SanitizedAccount,
    ) -> Result<PermissionGrant, ServiceError> {
        let member = self
            .members
            .find_by_group_and_account(&group.id, &account.id)
            .await?;

        match member {
            Some(member) if member.has_right(right) => Ok(PermissionGrant::granted()),
            _ => {
                tracing::warn!(
                    account = %account.id,
                    group = %group.id,
                    right = %right,
                    "Permission denied"
                );
                Err(ServiceError::PermissionDenied)
            }
        }
    }

    /// Resolve a group by id ahead of a permission check against it.
    pub async fn group(&self, id: &str) -> Result<Group, ServiceError> {
        self.groups
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::GroupNotFound)
    }

    /// The singular membership lookup: resolve the one group this account
    /// belongs to.
    pub async fn group_by_member(
        &self,
        account: &SanitizedAccount,
    ) -> Result<Group, ServiceError> {
        let member = self
            .members
            .find_by_account(&account.id)
            .await?
            .ok_or(ServiceError::NoMembership)?;
        self.groups
            .find_by_id(&member.group)
            .await?
            .ok_or(ServiceError::GroupNotFound)
    }

    /// Convenience composition for single-group accounts: resolve the
    /// membership's group, then check `right` against it.
    pub async fn confirm_permission(
        &self,
        account: &SanitizedAccount,
        right: Right,
    ) -> Result<GroupPermission, ServiceError> {
        let group = self.group_by_member(account).await?;
        let grant = self.confirm_group_permission(right, &group, account).await?;
        Ok(GroupPermission { group, grant })
    }
}
