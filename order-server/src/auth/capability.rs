//! Capability policy
//!
//! One table decides what every capability requires: the minimum staff role
//! and whether anonymous table sessions may hold it. Staff may also receive a
//! capability through an explicit permission entry, regardless of role.

use shared::models::StaffRole;

pub const MENU_READ: &str = "menu:read";
pub const MENU_UPDATE: &str = "menu:update";
pub const ORDER_CREATE: &str = "order:create";
pub const ORDER_READ_OWN_TABLE: &str = "order:read-own-table";
pub const ORDER_READ: &str = "order:read";
pub const ORDER_CONFIRM: &str = "order:confirm";
pub const ORDER_PREPARE: &str = "order:prepare";
pub const ORDER_READY: &str = "order:ready";
pub const ORDER_COMPLETE: &str = "order:complete";
pub const ORDER_CANCEL: &str = "order:cancel";
pub const ORDER_ANNOTATE: &str = "order:annotate";
pub const TABLE_UPDATE: &str = "table:update";
pub const TENANT_UPDATE: &str = "tenant:update";
pub const TENANT_DEACTIVATE: &str = "tenant:deactivate";
pub const STAFF_MANAGE: &str = "staff:manage";

/// Requirements of one capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityRule {
    pub capability: &'static str,
    /// Minimum role granting the capability without an explicit permission
    pub role_threshold: StaffRole,
    /// Whether anonymous table sessions hold it
    pub anonymous: bool,
}

const fn rule(capability: &'static str, role_threshold: StaffRole, anonymous: bool) -> CapabilityRule {
    CapabilityRule {
        capability,
        role_threshold,
        anonymous,
    }
}

/// The capability policy
pub const POLICY: &[CapabilityRule] = &[
    rule(MENU_READ, StaffRole::Service, true),
    rule(ORDER_CREATE, StaffRole::Service, true),
    rule(ORDER_READ_OWN_TABLE, StaffRole::Service, true),
    rule(ORDER_READ, StaffRole::Service, false),
    rule(ORDER_CONFIRM, StaffRole::Kitchen, false),
    rule(ORDER_PREPARE, StaffRole::Kitchen, false),
    rule(ORDER_READY, StaffRole::Kitchen, false),
    rule(ORDER_COMPLETE, StaffRole::Service, false),
    rule(ORDER_CANCEL, StaffRole::Manager, false),
    rule(ORDER_ANNOTATE, StaffRole::Service, false),
    rule(TABLE_UPDATE, StaffRole::Service, false),
    rule(MENU_UPDATE, StaffRole::Manager, false),
    rule(TENANT_UPDATE, StaffRole::Manager, false),
    rule(TENANT_DEACTIVATE, StaffRole::Owner, false),
    rule(STAFF_MANAGE, StaffRole::Owner, false),
];

/// The only capabilities an anonymous table session can ever hold
pub const ANONYMOUS_CAPABILITIES: [&str; 3] = [MENU_READ, ORDER_CREATE, ORDER_READ_OWN_TABLE];

/// Look up the rule of a capability (None for unknown capabilities)
pub fn rule_for(capability: &str) -> Option<&'static CapabilityRule> {
    POLICY.iter().find(|r| r.capability == capability)
}

/// Whether an anonymous table session holds `capability`
pub fn anonymous_allows(capability: &str) -> bool {
    ANONYMOUS_CAPABILITIES.contains(&capability)
        && rule_for(capability).is_some_and(|r| r.anonymous)
}

/// Whether a staff member holds `capability`
///
/// Granted by an explicit permission entry, or else by the role threshold of
/// the policy. Unknown capabilities have no threshold.
pub fn staff_allows(role: StaffRole, permissions: &[String], capability: &str) -> bool {
    if has_permission(permissions, capability) {
        return true;
    }
    rule_for(capability).is_some_and(|r| role.at_least(r.role_threshold))
}

/// Match a capability against a permission list
///
/// Supports wildcards:
/// - `"order:*"` matches `"order:confirm"`, `"order:read-own-table"`, ...
/// - `"all"` matches everything
pub fn has_permission(permissions: &[String], capability: &str) -> bool {
    permissions.iter().any(|p| {
        if p == "all" || p == capability {
            return true;
        }
        match p.strip_suffix(":*") {
            Some(prefix) => capability
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with(':')),
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_policy_has_no_duplicates() {
        for (i, a) in POLICY.iter().enumerate() {
            for b in &POLICY[i + 1..] {
                assert_ne!(a.capability, b.capability);
            }
        }
    }

    #[test]
    fn test_anonymous_set_matches_policy_flags() {
        let flagged: Vec<_> = POLICY
            .iter()
            .filter(|r| r.anonymous)
            .map(|r| r.capability)
            .collect();
        assert_eq!(flagged, ANONYMOUS_CAPABILITIES.to_vec());
        assert!(anonymous_allows(ORDER_CREATE));
        assert!(!anonymous_allows(ORDER_READ));
        assert!(!anonymous_allows("made:up"));
    }

    #[test]
    fn test_role_thresholds() {
        assert!(!staff_allows(StaffRole::Service, &[], ORDER_PREPARE));
        assert!(staff_allows(StaffRole::Kitchen, &[], ORDER_PREPARE));
        assert!(staff_allows(StaffRole::Service, &[], ORDER_COMPLETE));
        assert!(!staff_allows(StaffRole::Kitchen, &[], ORDER_CANCEL));
        assert!(staff_allows(StaffRole::Manager, &[], ORDER_CANCEL));
        assert!(!staff_allows(StaffRole::Manager, &[], TENANT_DEACTIVATE));
        assert!(staff_allows(StaffRole::Owner, &[], TENANT_DEACTIVATE));
    }

    #[test]
    fn test_permission_exception_without_promotion() {
        let grants = perms(&[MENU_UPDATE]);
        assert!(staff_allows(StaffRole::Service, &grants, MENU_UPDATE));
        assert!(!staff_allows(StaffRole::Service, &grants, TENANT_UPDATE));
    }

    #[test]
    fn test_unknown_capability_needs_explicit_grant() {
        assert!(!staff_allows(StaffRole::Owner, &[], "reports:export"));
        assert!(staff_allows(
            StaffRole::Service,
            &perms(&["reports:export"]),
            "reports:export"
        ));
    }

    #[test]
    fn test_wildcards() {
        let grants = perms(&["order:*"]);
        assert!(has_permission(&grants, ORDER_CANCEL));
        assert!(has_permission(&grants, ORDER_READ_OWN_TABLE));
        assert!(!has_permission(&grants, MENU_UPDATE));
        assert!(!has_permission(&perms(&["ord:*"]), ORDER_CANCEL));
        assert!(has_permission(&perms(&["all"]), STAFF_MANAGE));
    }
}
