//! End-to-end synchronization scenarios over the in-memory backend

use std::sync::Arc;

use warden::{
    MemoryStorage, PermissionDraft, Provider, RoleDraft, Snapshot, Storage,
};

fn provider_over(json: &str) -> Provider {
    let snapshot: Snapshot = serde_json::from_str(json).unwrap();
    Provider::with_storage(Arc::new(MemoryStorage::with_data(snapshot)))
}

#[tokio::test]
async fn snapshot_round_trip_relinks_grants_by_natural_key() {
    let provider = provider_over(
        r#"{
            "permissions": [ { "action": "read", "resource": "post" } ],
            "roles": [
                { "name": "member",
                  "permissions": [ { "action": "read", "resource": "post" } ] }
            ]
        }"#,
    );

    provider.sync().await.unwrap();

    assert!(provider.can("member", "read", "post"));
    assert!(!provider.can("member", "write", "post"));
}

#[tokio::test]
async fn sync_twice_is_idempotent() {
    let provider = provider_over(
        r#"{
            "permissions": [ { "action": "read", "resource": "post" } ],
            "roles": [
                { "name": "member",
                  "permissions": [ { "action": "read", "resource": "post" } ] }
            ]
        }"#,
    );

    provider.sync().await.unwrap();
    let permission_id = provider.permission("read", "post").unwrap().id;
    let role_id = provider.role("member").unwrap().id;

    provider.sync().await.unwrap();

    // no duplicates, identities stable
    assert_eq!(provider.permissions().len(), 1);
    assert_eq!(provider.roles().len(), 1);
    assert_eq!(provider.permission("read", "post").unwrap().id, permission_id);
    assert_eq!(provider.role("member").unwrap().id, role_id);
    assert!(provider.can("member", "read", "post"));
}

#[tokio::test]
async fn dangling_snapshot_reference_restores_role_without_grants() {
    let provider = provider_over(
        r#"{
            "permissions": [],
            "roles": [
                { "name": "member",
                  "permissions": [ { "action": "ghost", "resource": "post" } ] }
            ]
        }"#,
    );

    provider.sync().await.unwrap();

    let role = provider.role("member").unwrap();
    assert!(role.permissions.is_empty());
    assert!(!provider.can("member", "ghost", "post"));
}

#[tokio::test]
async fn new_role_grants_resolve_against_identified_permissions() {
    // the permission is already identified, the role is new
    let provider = provider_over(
        r#"{
            "permissions": [ { "_id": "p1", "action": "read", "resource": "post" } ],
            "roles": [
                { "name": "member",
                  "permissions": [ { "action": "read", "resource": "post" } ] }
            ]
        }"#,
    );

    provider.sync().await.unwrap();

    let member = provider.role("member").unwrap();
    assert_eq!(member.permissions.len(), 1);
    assert_eq!(member.permissions[0].as_str(), "p1");
    assert!(provider.can("member", "read", "post"));
}

#[tokio::test]
async fn restart_rehydrates_catalog_from_shared_storage() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

    let first = Provider::with_storage(Arc::clone(&storage));
    let read = first
        .create_permission(PermissionDraft::new("read", "post"))
        .await
        .unwrap();
    let member = first.create_role(RoleDraft::new("member")).await.unwrap();
    first.grant(&member.id, &[read.id.clone()]).await.unwrap();
    drop(first);

    // a fresh provider over the same backend sees the same catalog
    let second = Provider::with_storage(storage);
    second.sync().await.unwrap();

    assert_eq!(second.permission("read", "post").unwrap().id, read.id);
    assert_eq!(second.role("member").unwrap().id, member.id);
    assert!(second.can("member", "read", "post"));
}

#[tokio::test]
async fn destroyed_permission_stops_matching_but_role_survives() {
    let provider = Provider::new();

    let read = provider
        .create_permission(PermissionDraft::new("read", "post"))
        .await
        .unwrap();
    let member = provider.create_role(RoleDraft::new("member")).await.unwrap();
    provider.grant(&member.id, &[read.id.clone()]).await.unwrap();
    assert!(provider.can("member", "read", "post"));

    provider.remove_permission(&read.id).await.unwrap();

    let member = provider.role("member").unwrap();
    assert!(member.has_grant(&read.id));
    assert!(!provider.can("member", "read", "post"));
}

#[tokio::test]
async fn listed_roles_carry_resolved_permission_objects() {
    let provider = provider_over(
        r#"{
            "permissions": [
                { "action": "read", "resource": "post" },
                { "action": "write", "resource": "post" }
            ],
            "roles": [
                { "name": "editor",
                  "permissions": [
                      { "action": "read", "resource": "post" },
                      { "action": "write", "resource": "post" }
                  ] }
            ]
        }"#,
    );

    let listed = provider.list().await.unwrap();

    assert_eq!(listed.permissions.len(), 2);
    assert_eq!(listed.roles.len(), 1);
    let actions: Vec<&str> = listed.roles[0]
        .permissions
        .iter()
        .map(|p| p.action.as_str())
        .collect();
    assert!(actions.contains(&"read"));
    assert!(actions.contains(&"write"));
}
