use std::sync::Arc;

use chrono::Utc;

use super::{PermissionService, ServiceError};
use crate::models::{Group, Member, Right, SanitizedAccount};
use crate::stores::{GroupStore, MemberStore};

/// Caller-supplied group fields.
#[derive(Debug, Clone)]
pub struct GroupDraft {
    pub name: String,
    pub business_code: String,
    pub address: String,
    pub domains: String,
}

/// Group lifecycle: self-service tenant creation plus rights-gated
/// update and deletion.
#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupStore>,
    members: Arc<dyn MemberStore>,
    permissions: PermissionService,
}

impl GroupService {
    pub fn new(
        groups: Arc<dyn GroupStore>,
        members: Arc<dyn MemberStore>,
        permissions: PermissionService,
    ) -> Self {
        Self {
            groups,
            members,
            permissions,
        }
    }

    /// Create a group and enroll the creator with full rights.
    ///
    /// The store gives no multi-document transaction, so a failed
    /// membership write is compensated by deleting the group again; a
    /// crash between the two writes can still leave an ownerless group.
    pub async fn create_group(
        &self,
        draft: GroupDraft,
        creator: &SanitizedAccount,
    ) -> Result<(Group, Member), ServiceError> {
        let group = Group::new(draft.name, draft.business_code, draft.address, draft.domains);
        self.groups.insert(&group).await?;

        let member = Member::new(group.id.clone(), creator.id.clone(), Right::full());
        if let Err(err) = self.members.insert(&member).await {
            if let Err(cleanup) = self.groups.delete_by_id(&group.id).await {
                tracing::error!(
                    group = %group.id,
                    error = %cleanup,
                    "Failed to remove group after membership write failed"
                );
            }
            return Err(err.into());
        }

        tracing::info!(group = %group.id, creator = %creator.id, "Group created");
        Ok((group, member))
    }

    /// Update a group's fields. Requires WRITE.
    pub async fn update_group(
        &self,
        id: &str,
        draft: GroupDraft,
        account: &SanitizedAccount,
    ) -> Result<Group, ServiceError> {
        let group = self
            .groups
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::GroupNotFound)?;
        self.permissions
            .confirm_group_permission(Right::Write, &group, account)
            .await?;

        let updated = Group {
            name: draft.name,
            business_code: draft.business_code,
            address: draft.address,
            domains: draft.domains,
            updated_at: Utc::now(),
            ..group
        };
        self.groups
            .update(&updated)
            .await?
            .ok_or(ServiceError::GroupNotFound)
    }

    /// Delete a group. Requires DELETE. Membership rows are children of
    /// the group and are cleaned up by the caller, not cascaded here.
    pub async fn delete_group(
        &self,
        id: &str,
        account: &SanitizedAccount,
    ) -> Result<Group, ServiceError> {
        let group = self
            .groups
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::GroupNotFound)?;
        self.permissions
            .confirm_group_permission(Right::Delete, &group, account)
            .await?;

        let deleted = self
            .groups
            .delete_by_id(id)
            .await?
            .ok_or(ServiceError::GroupNotFound)?;
        tracing::info!(group = %deleted.id, account = %account.id, "Group deleted");
        Ok(deleted)
    }

    /// Unrestricted directory listing for authenticated callers.
    pub async fn get_groups(&self) -> Result<Vec<Group>, ServiceError> {
        Ok(self.groups.find_all().await?)
    }

    pub async fn get_group(&self, id: &str) -> Result<Group, ServiceError> {
        self.groups
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::GroupNotFound)
    }
}
