//! Group lifecycle tests: creation seeding, rights-gated mutation and the
//! compensating delete.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use access_service::models::{Member, Right};
use access_service::services::{GroupDraft, GroupService, PermissionService, ServiceError};
use access_service::stores::{MemberStore, MemoryStore, StoreError};
use async_trait::async_trait;
use common::{create_group, register_active_account, test_context};

#[tokio::test]
async fn create_group_seeds_creator_with_full_rights() {
    let ctx = test_context();
    let creator = register_active_account(&ctx, "c@x.com", "p").await;

    let (group, member) = ctx
        .groups
        .create_group(
            GroupDraft {
                name: "tenant-one".to_string(),
                business_code: "1234567-8".to_string(),
                address: "Example Street 1".to_string(),
                domains: "example.com".to_string(),
            },
            &creator,
        )
        .await
        .expect("group creation failed");

    assert_eq!(member.group, group.id);
    assert_eq!(member.account, creator.id);
    assert!(member.has_right(Right::Read));
    assert!(member.has_right(Right::Write));
    assert!(member.has_right(Right::Delete));

    // Exactly one membership exists on the new group.
    let members = ctx
        .members
        .members_of_group(&group.id, &creator)
        .await
        .expect("listing members failed");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].account, creator.id);
}

/// Member store whose insert can be made to fail, for the rollback path.
struct FlakyMembers {
    inner: Arc<MemoryStore>,
    fail_insert: AtomicBool,
}

#[async_trait]
impl MemberStore for FlakyMembers {
    async fn insert(&self, member: &Member) -> Result<(), StoreError> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        self.inner.insert(member).await
    }

    async fn find_by_account(&self, account_id: &str) -> Result<Option<Member>, StoreError> {
        self.inner.find_by_account(account_id).await
    }

    async fn find_by_group_and_account(
        &self,
        group_id: &str,
        account_id: &str,
    ) -> Result<Option<Member>, StoreError> {
        self.inner.find_by_group_and_account(group_id, account_id).await
    }

    async fn find_by_group(&self, group_id: &str) -> Result<Vec<Member>, StoreError> {
        self.inner.find_by_group(group_id).await
    }

    async fn update_rights(
        &self,
        group_id: &str,
        account_id: &str,
        rights: &[Right],
    ) -> Result<Option<Member>, StoreError> {
        self.inner.update_rights(group_id, account_id, rights).await
    }

    async fn delete(
        &self,
        group_id: &str,
        account_id: &str,
    ) -> Result<Option<Member>, StoreError> {
        self.inner.delete(group_id, account_id).await
    }
}

#[tokio::test]
async fn create_group_rolls_back_when_the_membership_write_fails() {
    let ctx = test_context();
    let creator = register_active_account(&ctx, "c@x.com", "p").await;

    let flaky = Arc::new(FlakyMembers {
        inner: ctx.store.clone(),
        fail_insert: AtomicBool::new(true),
    });
    let permissions = PermissionService::new(ctx.store.clone(), flaky.clone());
    let groups = GroupService::new(ctx.store.clone(), flaky.clone(), permissions);

    let err = groups
        .create_group(
            GroupDraft {
                name: "doomed".to_string(),
                business_code: "1234567-8".to_string(),
                address: "Example Street 1".to_string(),
                domains: "example.com".to_string(),
            },
            &creator,
        )
        .await
        .expect_err("membership failure must fail group creation");

    assert!(matches!(err, ServiceError::Store(_)));
    // The compensating delete removed the group: nothing is left ownerless.
    assert_eq!(ctx.store.group_count(), 0);
}

#[tokio::test]
async fn update_group_requires_write() {
    let ctx = test_context();
    let creator = register_active_account(&ctx, "c@x.com", "p").await;
    let outsider = register_active_account(&ctx, "d@x.com", "p").await;
    let group = create_group(&ctx, &creator, "tenant-one").await;

    let draft = GroupDraft {
        name: "renamed".to_string(),
        business_code: group.business_code.clone(),
        address: group.address.clone(),
        domains: group.domains.clone(),
    };

    let err = ctx
        .groups
        .update_group(&group.id, draft.clone(), &outsider)
        .await
        .expect_err("outsider must not update the group");
    assert!(matches!(err, ServiceError::PermissionDenied));

    let updated = ctx
        .groups
        .update_group(&group.id, draft, &creator)
        .await
        .expect("creator update failed");
    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.id, group.id);
}

#[tokio::test]
async fn update_unknown_group_fails_with_not_found() {
    let ctx = test_context();
    let creator = register_active_account(&ctx, "c@x.com", "p").await;

    let err = ctx
        .groups
        .update_group(
            "no-such-group",
            GroupDraft {
                name: "x".to_string(),
                business_code: "x".to_string(),
                address: "x".to_string(),
                domains: "x".to_string(),
            },
            &creator,
        )
        .await
        .expect_err("unknown group id must not update");
    assert!(matches!(err, ServiceError::GroupNotFound));
}

#[tokio::test]
async fn delete_group_requires_delete_right() {
    let ctx = test_context();
    let creator = register_active_account(&ctx, "c@x.com", "p").await;
    let outsider = register_active_account(&ctx, "d@x.com", "p").await;
    let group = create_group(&ctx, &creator, "tenant-one").await;

    let err = ctx
        .groups
        .delete_group(&group.id, &outsider)
        .await
        .expect_err("outsider must not delete the group");
    assert!(matches!(err, ServiceError::PermissionDenied));

    let deleted = ctx
        .groups
        .delete_group(&group.id, &creator)
        .await
        .expect("creator delete failed");
    assert_eq!(deleted.id, group.id);

    let err = ctx
        .groups
        .get_group(&group.id)
        .await
        .expect_err("deleted group must not resolve");
    assert!(matches!(err, ServiceError::GroupNotFound));
}

#[tokio::test]
async fn member_with_partial_rights_cannot_exceed_them() {
    let ctx = test_context();
    let creator = register_active_account(&ctx, "c@x.com", "p").await;
    let writer = register_active_account(&ctx, "w@x.com", "p").await;
    let group = create_group(&ctx, &creator, "tenant-one").await;
    ctx.members
        .add_member(&group.id, &writer.id, vec![Right::Read, Right::Write], &creator)
        .await
        .expect("adding writer failed");

    // WRITE suffices for updates...
    let updated = ctx
        .groups
        .update_group(
            &group.id,
            GroupDraft {
                name: "written".to_string(),
                business_code: group.business_code.clone(),
                address: group.address.clone(),
                domains: group.domains.clone(),
            },
            &writer,
        )
        .await
        .expect("writer update failed");
    assert_eq!(updated.name, "written");

    // ...but not for deletion.
    let err = ctx
        .groups
        .delete_group(&group.id, &writer)
        .await
        .expect_err("writer without DELETE must not delete");
    assert!(matches!(err, ServiceError::PermissionDenied));
}

#[tokio::test]
async fn get_groups_lists_every_group() {
    let ctx = test_context();
    let first = register_active_account(&ctx, "a@x.com", "p").await;
    let second = register_active_account(&ctx, "b@x.com", "p").await;
    create_group(&ctx, &first, "tenant-one").await;
    create_group(&ctx, &second, "tenant-two").await;

    let groups = ctx.groups.get_groups().await.expect("listing groups failed");
    assert_eq!(groups.len(), 2);
}
