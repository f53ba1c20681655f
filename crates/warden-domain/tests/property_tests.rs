//! Property-based tests for identifier validation and grant set semantics

use proptest::prelude::*;

use warden_domain::{validate_identifier, PermissionId, Role, RoleDraft};

proptest! {
    #[test]
    fn valid_identifiers_always_pass(value in "[A-Za-z0-9_-]{1,64}") {
        prop_assert!(validate_identifier("action", &value).is_ok());
    }

    #[test]
    fn identifiers_with_foreign_characters_always_fail(
        prefix in "[A-Za-z0-9_-]{0,8}",
        bad in "[^A-Za-z0-9_-]",
        suffix in "[A-Za-z0-9_-]{0,8}",
    ) {
        let value = format!("{prefix}{bad}{suffix}");
        prop_assert!(validate_identifier("resource", &value).is_err());
    }

    #[test]
    fn grant_then_revoke_leaves_no_reference(tags in proptest::collection::vec("[a-z0-9]{1,8}", 1..8)) {
        let ids: Vec<PermissionId> = tags
            .iter()
            .map(|tag| PermissionId::from_string(tag.clone()))
            .collect();

        let mut role = Role::new(RoleDraft::new("subject"));
        role.grant(&ids);
        role.grant(&ids);
        role.revoke(&ids);

        prop_assert!(role.permissions.is_empty());
    }

    #[test]
    fn grant_suppresses_duplicates(tags in proptest::collection::vec("[a-z]{1,4}", 1..16)) {
        let ids: Vec<PermissionId> = tags
            .iter()
            .map(|tag| PermissionId::from_string(tag.clone()))
            .collect();

        let mut role = Role::new(RoleDraft::new("subject"));
        role.grant(&ids);

        let mut seen = std::collections::HashSet::new();
        for id in &role.permissions {
            prop_assert!(seen.insert(id.clone()), "duplicate reference {id}");
        }
    }
}
