//! Check descriptors and the validation request builder.
//!
//! A [`ValidationRequest`] only records what must be checked. Nothing is
//! evaluated until the request is handed to
//! [`CaseAccessClient::verify`](crate::CaseAccessClient::verify).
//!
//! Checks in the same phase are OR-ed; constraints inside one check are AND-ed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CaseStatus, RoleKind};

/// Options for [`CallerCheck::Admin`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCheck {
    /// When set, the caller must hold at least one assignment (active or
    /// not, current or not) with one of these kinds.
    pub any_of_roles: Option<Vec<RoleKind>>,
}

impl AdminCheck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn any_of_roles(mut self, roles: impl IntoIterator<Item = RoleKind>) -> Self {
        self.any_of_roles = Some(roles.into_iter().collect());
        self
    }
}

/// Options for [`CallerCheck::Accessor`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorCheck {
    pub org_roles: Option<Vec<RoleKind>>,
    pub organisation_id: Option<Uuid>,
    pub organisation_unit_id: Option<Uuid>,
}

impl AccessorCheck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to these accessor kinds.
    #[must_use]
    pub fn org_roles(mut self, roles: impl IntoIterator<Item = RoleKind>) -> Self {
        self.org_roles = Some(roles.into_iter().collect());
        self
    }

    #[must_use]
    pub fn organisation(mut self, id: Uuid) -> Self {
        self.organisation_id = Some(id);
        self
    }

    #[must_use]
    pub fn organisation_unit(mut self, id: Uuid) -> Self {
        self.organisation_unit_id = Some(id);
        self
    }
}

/// Options for [`CallerCheck::Owner`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerCheck {
    pub organisation_id: Option<Uuid>,
}

impl OwnerCheck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn organisation(mut self, id: Uuid) -> Self {
        self.organisation_id = Some(id);
        self
    }
}

/// Caller-level predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CallerCheck {
    /// Caller id must equal `target_id`.
    SelfOnly { target_id: Uuid },
    Admin(AdminCheck),
    Assessor,
    Accessor(AccessorCheck),
    Owner(OwnerCheck),
}

impl CallerCheck {
    /// Registration key. One check per name per request.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelfOnly { .. } => "self",
            Self::Admin(_) => "admin",
            Self::Assessor => "assessor",
            Self::Accessor(_) => "accessor",
            Self::Owner(_) => "owner",
        }
    }
}

/// Allowed case statuses for [`ResourceStateCheck`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusRule {
    /// Same list for every role.
    Any(Vec<CaseStatus>),
    /// List chosen by the current role kind. A role without an entry is denied.
    PerRole(HashMap<RoleKind, Vec<CaseStatus>>),
}

impl StatusRule {
    /// Allowed statuses for `kind`, `None` when the rule has no entry for it.
    #[must_use]
    pub fn allowed_for(&self, kind: RoleKind) -> Option<&[CaseStatus]> {
        match self {
            Self::Any(statuses) => Some(statuses),
            Self::PerRole(map) => map.get(&kind).map(Vec::as_slice),
        }
    }
}

/// Options for [`ResourceCheck::State`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStateCheck {
    pub status: Option<StatusRule>,
    /// Resource owner must be the caller.
    pub is_owner: bool,
}

impl ResourceStateCheck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(mut self, statuses: impl IntoIterator<Item = CaseStatus>) -> Self {
        self.status = Some(StatusRule::Any(statuses.into_iter().collect()));
        self
    }

    #[must_use]
    pub fn status_per_role(
        mut self,
        rules: impl IntoIterator<Item = (RoleKind, Vec<CaseStatus>)>,
    ) -> Self {
        self.status = Some(StatusRule::PerRole(rules.into_iter().collect()));
        self
    }

    #[must_use]
    pub fn is_owner(mut self, is_owner: bool) -> Self {
        self.is_owner = is_owner;
        self
    }
}

/// Resource-level predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum ResourceCheck {
    State(ResourceStateCheck),
}

impl ResourceCheck {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::State(_) => "resource_state",
        }
    }
}

/// Identity, role selector, target and registered checks for one
/// verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    identity: String,
    role_id: Option<Uuid>,
    target_resource_id: Option<Uuid>,
    caller_checks: Vec<CallerCheck>,
    resource_checks: Vec<ResourceCheck>,
}

impl ValidationRequest {
    /// Start a request for the caller behind `identity`.
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            role_id: None,
            target_resource_id: None,
            caller_checks: Vec::new(),
            resource_checks: Vec::new(),
        }
    }

    /// Operate under this role assignment instead of the default one.
    #[must_use]
    pub fn role(mut self, role_id: Uuid) -> Self {
        self.role_id = Some(role_id);
        self
    }

    #[must_use]
    pub fn target_resource(mut self, resource_id: Uuid) -> Self {
        self.target_resource_id = Some(resource_id);
        self
    }

    #[must_use]
    pub fn require_self(self, target_id: Uuid) -> Self {
        self.with_caller_check(CallerCheck::SelfOnly { target_id })
    }

    #[must_use]
    pub fn require_admin(self, check: AdminCheck) -> Self {
        self.with_caller_check(CallerCheck::Admin(check))
    }

    #[must_use]
    pub fn require_assessor(self) -> Self {
        self.with_caller_check(CallerCheck::Assessor)
    }

    #[must_use]
    pub fn require_accessor(self, check: AccessorCheck) -> Self {
        self.with_caller_check(CallerCheck::Accessor(check))
    }

    #[must_use]
    pub fn require_owner_role(self, check: OwnerCheck) -> Self {
        self.with_caller_check(CallerCheck::Owner(check))
    }

    #[must_use]
    pub fn require_resource_state(self, check: ResourceStateCheck) -> Self {
        self.with_resource_check(ResourceCheck::State(check))
    }

    /// Register a caller-level check. A check with the same name replaces
    /// the earlier one and keeps its position.
    #[must_use]
    pub fn with_caller_check(mut self, check: CallerCheck) -> Self {
        upsert_by_name(&mut self.caller_checks, check, CallerCheck::name);
        self
    }

    /// Register a resource-level check, replacing one with the same name.
    #[must_use]
    pub fn with_resource_check(mut self, check: ResourceCheck) -> Self {
        upsert_by_name(&mut self.resource_checks, check, ResourceCheck::name);
        self
    }

    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    #[must_use]
    pub fn role_id(&self) -> Option<Uuid> {
        self.role_id
    }

    #[must_use]
    pub fn target_resource_id(&self) -> Option<Uuid> {
        self.target_resource_id
    }

    /// Caller-level checks in registration order.
    #[must_use]
    pub fn caller_checks(&self) -> &[CallerCheck] {
        &self.caller_checks
    }

    /// Resource-level checks in registration order.
    #[must_use]
    pub fn resource_checks(&self) -> &[ResourceCheck] {
        &self.resource_checks
    }
}

fn upsert_by_name<T>(checks: &mut Vec<T>, check: T, name: fn(&T) -> &'static str) {
    let key = name(&check);
    if let Some(slot) = checks.iter_mut().find(|c| name(c) == key) {
        *slot = check;
    } else {
        checks.push(check);
    }
}
