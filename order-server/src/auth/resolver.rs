//! Authorization resolver
//!
//! Turns verified claims into an [`AccessContext`] and checks capabilities
//! against the policy in [`super::capability`]. Resolution is a pure function
//! of the token: resource ownership is checked by callers through
//! [`AccessContext::ensure_tenant`].

use shared::models::StaffRole;
use shared::order::ActorRef;

use super::capability;
use super::error::AuthError;
use super::jwt::{Claims, TokenKind};
use super::tokens::TokenService;
use crate::security_log;

/// Who is acting
#[derive(Debug, Clone, PartialEq)]
pub enum Actor {
    /// Diner holding an anonymous table token
    AnonymousTable { table_id: String, session_id: String },
    /// Employee holding a staff token
    Staff {
        staff_id: String,
        role: StaffRole,
        permissions: Vec<String>,
    },
    /// Payment gateway callback (authenticated by signature, not by token)
    PaymentGateway,
}

/// Request-scoped authorization result
///
/// Built per request from a token and never cached. `tenant_id` is the
/// tenant encoded in the token and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessContext {
    tenant_id: String,
    pub actor: Actor,
}

impl AccessContext {
    /// Build a context from verified claims
    pub fn from_claims(claims: &Claims) -> Result<Self, AuthError> {
        let actor = match claims.kind {
            TokenKind::Table => Actor::AnonymousTable {
                table_id: claims.sub.clone(),
                session_id: claims.sid.clone(),
            },
            TokenKind::Staff => {
                let role = claims
                    .role
                    .ok_or_else(|| AuthError::InvalidToken("staff token without role".into()))?;
                Actor::Staff {
                    staff_id: claims.sub.clone(),
                    role,
                    permissions: claims.permission_list(),
                }
            }
            TokenKind::Refresh => return Err(AuthError::WrongTokenKind),
        };
        Ok(Self {
            tenant_id: claims.tid.clone(),
            actor,
        })
    }

    /// Context of a payment gateway callback for an order of `tenant_id`
    pub fn payment_gateway(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            actor: Actor::PaymentGateway,
        }
    }

    #[cfg(test)]
    pub fn staff(tenant_id: &str, staff_id: &str, role: StaffRole, permissions: &[&str]) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            actor: Actor::Staff {
                staff_id: staff_id.to_string(),
                role,
                permissions: permissions.iter().map(|p| p.to_string()).collect(),
            },
        }
    }

    #[cfg(test)]
    pub fn guest(tenant_id: &str, table_id: &str, session_id: &str) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            actor: Actor::AnonymousTable {
                table_id: table_id.to_string(),
                session_id: session_id.to_string(),
            },
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self.actor, Actor::AnonymousTable { .. })
    }

    /// Table of an anonymous session
    pub fn table_id(&self) -> Option<&str> {
        match &self.actor {
            Actor::AnonymousTable { table_id, .. } => Some(table_id),
            _ => None,
        }
    }

    /// Session id of an anonymous session
    pub fn session_id(&self) -> Option<&str> {
        match &self.actor {
            Actor::AnonymousTable { session_id, .. } => Some(session_id),
            _ => None,
        }
    }

    pub fn staff_id(&self) -> Option<&str> {
        match &self.actor {
            Actor::Staff { staff_id, .. } => Some(staff_id),
            _ => None,
        }
    }

    /// Snapshot of the actor for timelines and events
    pub fn actor_ref(&self) -> ActorRef {
        match &self.actor {
            Actor::AnonymousTable {
                table_id,
                session_id,
            } => ActorRef::Guest {
                table_id: table_id.clone(),
                session_id: session_id.clone(),
            },
            Actor::Staff { staff_id, role, .. } => ActorRef::Staff {
                staff_id: staff_id.clone(),
                role: *role,
            },
            Actor::PaymentGateway => ActorRef::PaymentGateway,
        }
    }

    /// Whether the actor holds `capability`
    pub fn can(&self, capability: &str) -> bool {
        match &self.actor {
            Actor::AnonymousTable { .. } => capability::anonymous_allows(capability),
            Actor::Staff {
                role, permissions, ..
            } => capability::staff_allows(*role, permissions, capability),
            Actor::PaymentGateway => capability == capability::ORDER_CONFIRM,
        }
    }

    /// Fail with `Denied` unless the actor holds `capability`
    pub fn require(&self, capability: &str) -> Result<(), AuthError> {
        if self.can(capability) {
            return Ok(());
        }
        let actor = self.actor_ref().to_string();
        security_log!(
            "WARN",
            "capability_denied",
            tenant_id = self.tenant_id.clone(),
            actor = actor.clone(),
            capability = capability.to_string()
        );
        Err(AuthError::Denied {
            actor,
            capability: capability.to_string(),
        })
    }

    /// Fail unless `resource_tenant_id` is the context's tenant
    ///
    /// A mismatch is a security event and is never corrected silently.
    pub fn ensure_tenant(&self, resource_tenant_id: &str, resource: &str) -> Result<(), AuthError> {
        if self.tenant_id == resource_tenant_id {
            return Ok(());
        }
        security_log!(
            "ERROR",
            "tenant_isolation_violation",
            tenant_id = self.tenant_id.clone(),
            resource_tenant_id = resource_tenant_id.to_string(),
            resource = resource.to_string(),
            actor = self.actor_ref().to_string()
        );
        Err(AuthError::TenantMismatch {
            resource: resource.to_string(),
        })
    }
}

/// Resolve verified claims for one capability
pub fn resolve_claims(claims: &Claims, capability: &str) -> Result<AccessContext, AuthError> {
    let ctx = AccessContext::from_claims(claims)?;
    ctx.require(capability)?;
    Ok(ctx)
}

/// `resolve(token, capability)`: verification plus capability check
#[derive(Debug, Clone)]
pub struct AuthorizationResolver {
    tokens: TokenService,
}

impl AuthorizationResolver {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }

    /// Build a context without checking a capability (handlers check per operation)
    pub fn authenticate(&self, token: &str) -> Result<AccessContext, AuthError> {
        let claims = self.tokens.verify(token)?;
        AccessContext::from_claims(&claims)
    }

    pub fn resolve(&self, token: &str, capability: &str) -> Result<AccessContext, AuthError> {
        let claims = self.tokens.verify(token)?;
        resolve_claims(&claims, capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::capability::*;
    use proptest::prelude::*;

    fn claims(kind: TokenKind, tenant: &str, role: Option<StaffRole>, permissions: &str) -> Claims {
        Claims {
            sub: "subject".into(),
            kind,
            tid: tenant.into(),
            role,
            permissions: permissions.into(),
            sid: "sid-1".into(),
            exp: i64::MAX,
            iat: 0,
            iss: "order-server".into(),
            aud: "order-clients".into(),
        }
    }

    #[test]
    fn test_guest_context() {
        let ctx = resolve_claims(&claims(TokenKind::Table, "t1", None, ""), ORDER_CREATE).unwrap();
        assert!(ctx.is_anonymous());
        assert_eq!(ctx.table_id(), Some("subject"));
        assert_eq!(ctx.session_id(), Some("sid-1"));
        assert!(matches!(
            resolve_claims(&claims(TokenKind::Table, "t1", None, ""), ORDER_CANCEL),
            Err(AuthError::Denied { .. })
        ));
    }

    #[test]
    fn test_guest_ignores_permission_claims() {
        // A table token never gains capabilities from a forged permission list
        let forged = claims(TokenKind::Table, "t1", Some(StaffRole::Owner), "all");
        assert!(matches!(
            resolve_claims(&forged, ORDER_CANCEL),
            Err(AuthError::Denied { .. })
        ));
    }

    #[test]
    fn test_service_role_cannot_prepare() {
        let c = claims(TokenKind::Staff, "t1", Some(StaffRole::Service), "");
        assert!(matches!(
            resolve_claims(&c, ORDER_PREPARE),
            Err(AuthError::Denied { ref capability, .. }) if capability == ORDER_PREPARE
        ));
        assert!(resolve_claims(&c, ORDER_COMPLETE).is_ok());
    }

    #[test]
    fn test_staff_token_without_role_rejected() {
        let c = claims(TokenKind::Staff, "t1", None, "");
        assert!(matches!(
            AccessContext::from_claims(&c),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let c = claims(TokenKind::Refresh, "t1", Some(StaffRole::Owner), "");
        assert!(matches!(
            resolve_claims(&c, MENU_READ),
            Err(AuthError::WrongTokenKind)
        ));
    }

    #[test]
    fn test_payment_gateway_only_confirms() {
        let ctx = AccessContext::payment_gateway("t1");
        assert!(ctx.can(ORDER_CONFIRM));
        assert!(!ctx.can(ORDER_CANCEL));
        assert!(!ctx.can(ORDER_READ));
        assert_eq!(ctx.actor_ref(), ActorRef::PaymentGateway);
    }

    fn any_role() -> impl Strategy<Value = StaffRole> {
        prop::sample::select(StaffRole::ALL.to_vec())
    }

    fn any_capability() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(POLICY.iter().map(|r| r.capability.to_string()).collect::<Vec<_>>()),
            "[a-z]{1,8}:[a-z*-]{1,12}",
        ]
    }

    proptest! {
        #[test]
        fn prop_anonymous_capabilities_are_closed(
            cap in any_capability(),
            perms in "[a-z:*,]{0,24}",
            role in prop::option::of(any_role()),
        ) {
            let c = claims(TokenKind::Table, "t1", role, &perms);
            if let Ok(ctx) = resolve_claims(&c, &cap) {
                prop_assert!(ANONYMOUS_CAPABILITIES.contains(&cap.as_str()));
                prop_assert!(ctx.is_anonymous());
            }
        }

        #[test]
        fn prop_context_tenant_is_token_tenant(
            tenant in "[a-z0-9]{1,12}",
            other in "[a-z0-9]{1,12}",
            role in any_role(),
            anonymous in any::<bool>(),
        ) {
            let c = if anonymous {
                claims(TokenKind::Table, &tenant, None, "")
            } else {
                claims(TokenKind::Staff, &tenant, Some(role), "all")
            };
            let ctx = AccessContext::from_claims(&c).unwrap();
            prop_assert_eq!(ctx.tenant_id(), tenant.as_str());

            let check = ctx.ensure_tenant(&other, "order");
            if other == tenant {
                prop_assert!(check.is_ok());
            } else {
                let is_mismatch = matches!(check, Err(AuthError::TenantMismatch { .. }));
                prop_assert!(is_mismatch);
            }
            // Checking never rebinds the context
            prop_assert_eq!(ctx.tenant_id(), tenant.as_str());
        }

        #[test]
        fn prop_role_threshold_is_monotonic(cap in any_capability(), role in any_role()) {
            let ctx = AccessContext::staff("t1", "s1", role, &[]);
            if ctx.can(&cap) {
                for higher in StaffRole::ALL.iter().filter(|r| **r >= role) {
                    let h = AccessContext::staff("t1", "s1", *higher, &[]);
                    prop_assert!(h.can(&cap));
                }
            }
        }
    }
}
