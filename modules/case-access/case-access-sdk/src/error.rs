//! Error types for the `case_access` module.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable reason attached to every refusal.
///
/// The set is closed; callers may match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenialCode {
    // Resolution
    CallerNotLoaded,
    MissingCurrentRole,
    UnknownRoleKind,
    CallerNotActive,
    MissingOrganisationContext,
    MissingOrganisationUnitContext,
    MissingDomainContext,

    // Caller-level checks
    CallerNotSelf,
    RoleKindNotAllowed,
    OrgRoleNotAllowed,
    OrganisationNotAllowed,
    OrganisationUnitNotAllowed,
    CallerWithoutOrganisation,

    // Resource-level checks
    ResourceNotLoaded,
    ResourceUnauthorized,
    ResourceStatusNotAllowed,
    ResourceNotOwner,

    /// Fallback when a phase fails without a more specific reason.
    Unauthorized,
}

impl DenialCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CallerNotLoaded => "CALLER_NOT_LOADED",
            Self::MissingCurrentRole => "MISSING_CURRENT_ROLE",
            Self::UnknownRoleKind => "UNKNOWN_ROLE_KIND",
            Self::CallerNotActive => "CALLER_NOT_ACTIVE",
            Self::MissingOrganisationContext => "MISSING_ORGANISATION_CONTEXT",
            Self::MissingOrganisationUnitContext => "MISSING_ORGANISATION_UNIT_CONTEXT",
            Self::MissingDomainContext => "MISSING_DOMAIN_CONTEXT",
            Self::CallerNotSelf => "CALLER_NOT_SELF",
            Self::RoleKindNotAllowed => "ROLE_KIND_NOT_ALLOWED",
            Self::OrgRoleNotAllowed => "ORG_ROLE_NOT_ALLOWED",
            Self::OrganisationNotAllowed => "ORGANISATION_NOT_ALLOWED",
            Self::OrganisationUnitNotAllowed => "ORGANISATION_UNIT_NOT_ALLOWED",
            Self::CallerWithoutOrganisation => "CALLER_WITHOUT_ORGANISATION",
            Self::ResourceNotLoaded => "RESOURCE_NOT_LOADED",
            Self::ResourceUnauthorized => "RESOURCE_UNAUTHORIZED",
            Self::ResourceStatusNotAllowed => "RESOURCE_STATUS_NOT_ALLOWED",
            Self::ResourceNotOwner => "RESOURCE_NOT_OWNER",
            Self::Unauthorized => "UNAUTHORIZED",
        }
    }
}

impl fmt::Display for DenialCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`CaseAccessClient::verify`](crate::CaseAccessClient::verify).
#[derive(Debug, Clone, Error)]
pub enum CaseAccessError {
    /// The caller may not perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(DenialCode),

    /// The caller's data is structurally unusable (unknown role kind,
    /// accessor role without organisation/unit).
    #[error("unprocessable: {0}")]
    Unprocessable(DenialCode),

    /// No account matches the asserted identity.
    #[error("not found: {0}")]
    NotFound(String),

    /// A collaborator (directory or record store) is unreachable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CaseAccessError {
    /// The denial code for `Forbidden` and `Unprocessable` refusals.
    #[must_use]
    pub fn denial_code(&self) -> Option<DenialCode> {
        match self {
            Self::Forbidden(code) | Self::Unprocessable(code) => Some(*code),
            Self::NotFound(_) | Self::ServiceUnavailable(_) | Self::Internal(_) => None,
        }
    }
}

/// Errors from an [`AccountDirectoryClient`](crate::AccountDirectoryClient).
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// A stored role kind is outside the closed set.
    #[error("unknown role kind '{0}'")]
    UnknownRoleKind(String),

    #[error("account directory unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors from a [`CaseRecordLookupClient`](crate::CaseRecordLookupClient).
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("case record store unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}
