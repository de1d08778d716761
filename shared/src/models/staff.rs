//! Staff identity model

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Staff role
///
/// Variant order is the role hierarchy: `Service < Kitchen < Manager < Owner`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Service,
    Kitchen,
    Manager,
    Owner,
}

impl StaffRole {
    pub const ALL: [StaffRole; 4] = [
        StaffRole::Service,
        StaffRole::Kitchen,
        StaffRole::Manager,
        StaffRole::Owner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Service => "service",
            StaffRole::Kitchen => "kitchen",
            StaffRole::Manager => "manager",
            StaffRole::Owner => "owner",
        }
    }

    /// Whether this role meets the given threshold
    pub fn at_least(&self, threshold: StaffRole) -> bool {
        *self >= threshold
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" => Ok(StaffRole::Service),
            "kitchen" => Ok(StaffRole::Kitchen),
            "manager" => Ok(StaffRole::Manager),
            "owner" => Ok(StaffRole::Owner),
            other => Err(format!("unknown staff role: {other}")),
        }
    }
}

/// Staff identity as persisted (includes the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffIdentity {
    pub id: String,
    pub tenant_id: String,
    pub username: String,
    pub display_name: String,
    pub role: StaffRole,
    /// Explicit capability grants on top of the role (e.g. `menu:update`)
    #[serde(default)]
    pub permissions: Vec<String>,
    pub active: bool,
    /// argon2 PHC string
    pub password_hash: String,
}

/// Staff identity without credentials, safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffInfo {
    pub id: String,
    pub tenant_id: String,
    pub username: String,
    pub display_name: String,
    pub role: StaffRole,
    pub permissions: Vec<String>,
}

impl From<&StaffIdentity> for StaffInfo {
    fn from(s: &StaffIdentity) -> Self {
        Self {
            id: s.id.clone(),
            tenant_id: s.tenant_id.clone(),
            username: s.username.clone(),
            display_name: s.display_name.clone(),
            role: s.role,
            permissions: s.permissions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(StaffRole::Service < StaffRole::Kitchen);
        assert!(StaffRole::Kitchen < StaffRole::Manager);
        assert!(StaffRole::Manager < StaffRole::Owner);
        assert!(StaffRole::Owner.at_least(StaffRole::Kitchen));
        assert!(!StaffRole::Service.at_least(StaffRole::Kitchen));
    }

    #[test]
    fn test_role_parse_roundtrip() {
        for role in StaffRole::ALL {
            assert_eq!(role.as_str().parse::<StaffRole>().unwrap(), role);
        }
        assert!("chef".parse::<StaffRole>().is_err());
    }
}
