//! Permission resolver tests: the fail-closed membership/rights chain.

mod common;

use access_service::models::Right;
use access_service::services::ServiceError;
use access_service::stores::GroupStore;
use common::{create_group, register_active_account, test_context};

#[tokio::test]
async fn accounts_without_membership_are_denied_every_right() {
    let ctx = test_context();
    let account = register_active_account(&ctx, "a@x.com", "p").await;

    for right in [Right::Read, Right::Write, Right::Delete] {
        let err = ctx
            .permissions
            .confirm_permission(&account, right)
            .await
            .expect_err("membershipless account must be denied");
        assert!(matches!(err, ServiceError::NoMembership));
    }
}

#[tokio::test]
async fn non_members_are_denied_on_a_specific_group() {
    let ctx = test_context();
    let creator = register_active_account(&ctx, "c@x.com", "p").await;
    let outsider = register_active_account(&ctx, "d@x.com", "p").await;
    let group = create_group(&ctx, &creator, "tenant-one").await;

    let err = ctx
        .permissions
        .confirm_group_permission(Right::Delete, &group, &outsider)
        .await
        .expect_err("non-member must be denied");
    assert!(matches!(err, ServiceError::PermissionDenied));
}

#[tokio::test]
async fn membership_grants_exactly_the_contained_rights() {
    let ctx = test_context();
    let creator = register_active_account(&ctx, "c@x.com", "p").await;
    let reader = register_active_account(&ctx, "r@x.com", "p").await;
    let group = create_group(&ctx, &creator, "tenant-one").await;
    ctx.members
        .add_member(&group.id, &reader.id, vec![Right::Read], &creator)
        .await
        .expect("adding reader failed");

    let grant = ctx
        .permissions
        .confirm_group_permission(Right::Read, &group, &reader)
        .await
        .expect("contained right must be granted");
    assert!(grant.granted);

    for right in [Right::Write, Right::Delete] {
        let err = ctx
            .permissions
            .confirm_group_permission(right, &group, &reader)
            .await
            .expect_err("right not contained in the membership must be denied");
        assert!(matches!(err, ServiceError::PermissionDenied));
    }
}

#[tokio::test]
async fn creator_holds_all_three_rights_on_the_new_group() {
    let ctx = test_context();
    let creator = register_active_account(&ctx, "c@x.com", "p").await;
    let group = create_group(&ctx, &creator, "tenant-one").await;

    for right in [Right::Read, Right::Write, Right::Delete] {
        let grant = ctx
            .permissions
            .confirm_group_permission(right, &group, &creator)
            .await
            .expect("creator must hold the full rights set");
        assert!(grant.granted);
    }
}

#[tokio::test]
async fn confirm_permission_resolves_the_single_membership_group() {
    let ctx = test_context();
    let creator = register_active_account(&ctx, "c@x.com", "p").await;
    let group = create_group(&ctx, &creator, "tenant-one").await;

    let permission = ctx
        .permissions
        .confirm_permission(&creator, Right::Write)
        .await
        .expect("creator must pass the composed check");

    assert_eq!(permission.group.id, group.id);
    assert!(permission.grant.granted);
}

#[tokio::test]
async fn group_by_member_fails_when_membership_exists_but_group_is_gone() {
    let ctx = test_context();
    let creator = register_active_account(&ctx, "c@x.com", "p").await;
    let group = create_group(&ctx, &creator, "tenant-one").await;

    // Remove the group record underneath the membership; the resolution
    // chain must fail closed rather than grant against a phantom group.
    GroupStore::delete_by_id(ctx.store.as_ref(), &group.id)
        .await
        .expect("direct store delete failed");

    let err = ctx
        .permissions
        .group_by_member(&creator)
        .await
        .expect_err("orphaned membership must not resolve");
    assert!(matches!(err, ServiceError::GroupNotFound));
}
