//! Domain models for the `case_access` module.
//!
//! Everything here is constructed fresh per verification and is read-only
//! once resolved.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CaseAccessError, DenialCode};

/// Capacity a caller operates under for a single request.
///
/// The set is closed. Role kinds read from storage that are not in this set
/// fail to parse with [`UnknownRoleKindError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleKind {
    /// Record owner (innovator-equivalent), scoped to an organisation.
    Owner,
    /// Accessor scoped to an organisation and one of its units.
    Accessor,
    /// Qualifying accessor scoped to an organisation and one of its units.
    QualifyingAccessor,
    /// Independent assessor, no organisation scoping.
    Assessor,
    /// Administrator, no organisation scoping.
    Admin,
}

impl RoleKind {
    /// Stable wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Accessor => "ACCESSOR",
            Self::QualifyingAccessor => "QUALIFYING_ACCESSOR",
            Self::Assessor => "ASSESSOR",
            Self::Admin => "ADMIN",
        }
    }

    /// `true` for [`RoleKind::Accessor`] and [`RoleKind::QualifyingAccessor`].
    #[must_use]
    pub fn is_accessor(self) -> bool {
        matches!(self, Self::Accessor | Self::QualifyingAccessor)
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role kind string outside the closed [`RoleKind`] set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role kind '{0}'")]
pub struct UnknownRoleKindError(pub String);

impl From<UnknownRoleKindError> for CaseAccessError {
    fn from(_: UnknownRoleKindError) -> Self {
        Self::Unprocessable(DenialCode::UnknownRoleKind)
    }
}

impl FromStr for RoleKind {
    type Err = UnknownRoleKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OWNER" => Ok(Self::Owner),
            "ACCESSOR" => Ok(Self::Accessor),
            "QUALIFYING_ACCESSOR" => Ok(Self::QualifyingAccessor),
            "ASSESSOR" => Ok(Self::Assessor),
            "ADMIN" => Ok(Self::Admin),
            other => Err(UnknownRoleKindError(other.to_owned())),
        }
    }
}

/// Reference to an organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganisationRef {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
}

/// Reference to an organisation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganisationUnitRef {
    pub id: Uuid,
    pub organisation_id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
}

/// One capacity held by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub id: Uuid,
    pub kind: RoleKind,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation: Option<OrganisationRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_unit: Option<OrganisationUnitRef>,
}

/// The authenticated account behind a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerAccount {
    pub id: Uuid,
    /// Identity asserted by the external identity provider.
    pub external_identity: String,
    pub display_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_active: bool,
    /// Every assignment held, active or not.
    #[serde(default)]
    pub role_assignments: Vec<RoleAssignment>,
}

impl CallerAccount {
    /// `true` if any held assignment has one of the given kinds.
    #[must_use]
    pub fn holds_any_role(&self, kinds: &[RoleKind]) -> bool {
        self.role_assignments.iter().any(|r| kinds.contains(&r.kind))
    }

    /// `true` if at least one held assignment is attached to an organisation.
    #[must_use]
    pub fn holds_organisation_role(&self) -> bool {
        self.role_assignments
            .iter()
            .any(|r| r.organisation.is_some())
    }
}

/// The role a request operates under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentRole {
    pub id: Uuid,
    pub kind: RoleKind,
}

/// Organisational shape of a [`DomainContext`].
///
/// Owner contexts always carry an organisation, accessor contexts always
/// carry an organisation and a unit, assessor and admin contexts carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContextScope {
    Owner {
        organisation: OrganisationRef,
    },
    Accessor {
        organisation: OrganisationRef,
        organisation_unit: OrganisationUnitRef,
    },
    Unscoped,
}

/// Resolved, role-shaped view of who is calling, in what capacity, within
/// which organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainContext {
    pub caller_id: Uuid,
    pub caller_identity: String,
    pub current_role: CurrentRole,
    pub scope: ContextScope,
}

impl DomainContext {
    #[must_use]
    pub fn organisation(&self) -> Option<&OrganisationRef> {
        match &self.scope {
            ContextScope::Owner { organisation } | ContextScope::Accessor { organisation, .. } => {
                Some(organisation)
            }
            ContextScope::Unscoped => None,
        }
    }

    #[must_use]
    pub fn organisation_unit(&self) -> Option<&OrganisationUnitRef> {
        match &self.scope {
            ContextScope::Accessor {
                organisation_unit, ..
            } => Some(organisation_unit),
            ContextScope::Owner { .. } | ContextScope::Unscoped => None,
        }
    }

    #[must_use]
    pub fn role_kind(&self) -> RoleKind {
        self.current_role.kind
    }
}

/// Lifecycle status of a case record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    Created,
    PendingIntake,
    UnderAssessment,
    InProgress,
    Complete,
    Withdrawn,
    Archived,
}

impl CaseStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::PendingIntake => "PENDING_INTAKE",
            Self::UnderAssessment => "UNDER_ASSESSMENT",
            Self::InProgress => "IN_PROGRESS",
            Self::Complete => "COMPLETE",
            Self::Withdrawn => "WITHDRAWN",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl FromStr for CaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(Self::Created),
            "PENDING_INTAKE" => Ok(Self::PendingIntake),
            "UNDER_ASSESSMENT" => Ok(Self::UnderAssessment),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETE" => Ok(Self::Complete),
            "WITHDRAWN" => Ok(Self::Withdrawn),
            "ARCHIVED" => Ok(Self::Archived),
            other => Err(format!("unknown case status '{other}'")),
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of an organisation unit's support assignment on a case record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupportStatus {
    Active,
    Waiting,
    Closed,
    Unassigned,
}

impl SupportStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Waiting => "WAITING",
            Self::Closed => "CLOSED",
            Self::Unassigned => "UNASSIGNED",
        }
    }
}

impl FromStr for SupportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "WAITING" => Ok(Self::Waiting),
            "CLOSED" => Ok(Self::Closed),
            "UNASSIGNED" => Ok(Self::Unassigned),
            other => Err(format!("unknown support status '{other}'")),
        }
    }
}

/// Status of a collaborator invitation on a case record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollaboratorStatus {
    Pending,
    Active,
    Declined,
    Removed,
    Left,
}

impl CollaboratorStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Declined => "DECLINED",
            Self::Removed => "REMOVED",
            Self::Left => "LEFT",
        }
    }
}

impl FromStr for CollaboratorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ACTIVE" => Ok(Self::Active),
            "DECLINED" => Ok(Self::Declined),
            "REMOVED" => Ok(Self::Removed),
            "LEFT" => Ok(Self::Left),
            other => Err(format!("unknown collaborator status '{other}'")),
        }
    }
}

/// Minimal projection of a case record needed by resource-level checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub id: Uuid,
    pub name: String,
    pub status: CaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
}

/// Outcome of a successful verification.
#[derive(Debug, Clone)]
pub struct VerifiedAccess {
    caller: CallerAccount,
    context: DomainContext,
    resource: Option<ResourceSummary>,
}

impl VerifiedAccess {
    #[must_use]
    pub fn new(
        caller: CallerAccount,
        context: DomainContext,
        resource: Option<ResourceSummary>,
    ) -> Self {
        Self {
            caller,
            context,
            resource,
        }
    }

    /// The resolved caller account.
    #[must_use]
    pub fn caller(&self) -> &CallerAccount {
        &self.caller
    }

    /// The resolved domain context.
    #[must_use]
    pub fn context(&self) -> &DomainContext {
        &self.context
    }

    /// Summary of the target case record.
    ///
    /// # Errors
    ///
    /// `Forbidden(ResourceNotLoaded)` when the verification did not run a
    /// resource stage (no resource checks registered or no target set).
    pub fn resource_info(&self) -> Result<&ResourceSummary, CaseAccessError> {
        self.resource
            .as_ref()
            .ok_or(CaseAccessError::Forbidden(DenialCode::ResourceNotLoaded))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn org(id: Uuid) -> OrganisationRef {
        OrganisationRef {
            id,
            name: "Org".to_owned(),
            acronym: None,
        }
    }

    #[test]
    fn role_kind_parses_wire_names() {
        assert_eq!("OWNER".parse::<RoleKind>(), Ok(RoleKind::Owner));
        assert_eq!(
            "QUALIFYING_ACCESSOR".parse::<RoleKind>(),
            Ok(RoleKind::QualifyingAccessor)
        );
        assert_eq!(
            RoleKind::QualifyingAccessor.as_str().parse::<RoleKind>(),
            Ok(RoleKind::QualifyingAccessor)
        );
    }

    #[test]
    fn role_kind_rejects_unknown_kind() {
        let err = "SUPER_USER".parse::<RoleKind>().unwrap_err();
        assert_eq!(err, UnknownRoleKindError("SUPER_USER".to_owned()));

        let converted: CaseAccessError = err.into();
        assert_eq!(converted.denial_code(), Some(DenialCode::UnknownRoleKind));
        assert!(matches!(converted, CaseAccessError::Unprocessable(_)));
    }

    #[test]
    fn role_kind_serde_matches_as_str() {
        let json = serde_json::to_string(&RoleKind::QualifyingAccessor).unwrap();
        assert_eq!(json, "\"QUALIFYING_ACCESSOR\"");
    }

    #[test]
    fn context_accessors_follow_scope() {
        let org_id = Uuid::new_v4();
        let unit = OrganisationUnitRef {
            id: Uuid::new_v4(),
            organisation_id: org_id,
            name: "Unit".to_owned(),
            acronym: Some("U".to_owned()),
        };
        let ctx = DomainContext {
            caller_id: Uuid::new_v4(),
            caller_identity: "ext".to_owned(),
            current_role: CurrentRole {
                id: Uuid::new_v4(),
                kind: RoleKind::Accessor,
            },
            scope: ContextScope::Accessor {
                organisation: org(org_id),
                organisation_unit: unit.clone(),
            },
        };
        assert_eq!(ctx.organisation().map(|o| o.id), Some(org_id));
        assert_eq!(ctx.organisation_unit(), Some(&unit));

        let unscoped = DomainContext {
            scope: ContextScope::Unscoped,
            ..ctx
        };
        assert!(unscoped.organisation().is_none());
        assert!(unscoped.organisation_unit().is_none());
    }

    #[test]
    fn caller_account_role_helpers() {
        let account = CallerAccount {
            id: Uuid::new_v4(),
            external_identity: "ext".to_owned(),
            display_name: "Jo".to_owned(),
            email: "jo@example.com".to_owned(),
            phone: None,
            is_active: true,
            role_assignments: vec![
                RoleAssignment {
                    id: Uuid::new_v4(),
                    kind: RoleKind::Assessor,
                    is_active: true,
                    organisation: None,
                    organisation_unit: None,
                },
                RoleAssignment {
                    id: Uuid::new_v4(),
                    kind: RoleKind::Owner,
                    is_active: false,
                    organisation: Some(org(Uuid::new_v4())),
                    organisation_unit: None,
                },
            ],
        };

        assert!(account.holds_any_role(&[RoleKind::Admin, RoleKind::Owner]));
        assert!(!account.holds_any_role(&[RoleKind::Admin]));
        assert!(account.holds_organisation_role());
    }

    #[test]
    fn resource_info_without_resource_is_not_loaded() {
        let access = VerifiedAccess::new(
            CallerAccount {
                id: Uuid::new_v4(),
                external_identity: "ext".to_owned(),
                display_name: "Jo".to_owned(),
                email: "jo@example.com".to_owned(),
                phone: None,
                is_active: true,
                role_assignments: vec![],
            },
            DomainContext {
                caller_id: Uuid::new_v4(),
                caller_identity: "ext".to_owned(),
                current_role: CurrentRole {
                    id: Uuid::new_v4(),
                    kind: RoleKind::Admin,
                },
                scope: ContextScope::Unscoped,
            },
            None,
        );

        let err = access.resource_info().unwrap_err();
        assert_eq!(err.denial_code(), Some(DenialCode::ResourceNotLoaded));
    }

    #[test]
    fn case_status_round_trips_through_str() {
        for status in [
            CaseStatus::Created,
            CaseStatus::PendingIntake,
            CaseStatus::UnderAssessment,
            CaseStatus::InProgress,
            CaseStatus::Complete,
            CaseStatus::Withdrawn,
            CaseStatus::Archived,
        ] {
            assert_eq!(status.as_str().parse::<CaseStatus>(), Ok(status));
        }
        assert!("OPEN".parse::<CaseStatus>().is_err());
    }
}
