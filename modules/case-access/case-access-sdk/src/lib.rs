#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Case Access SDK
//!
//! This crate provides the public contract of the `case_access` module:
//!
//! - [`CaseAccessClient`] - Public API trait for request handlers
//! - [`AccountDirectoryClient`], [`CaseRecordLookupClient`] - Collaborator traits
//!   implemented by storage backends
//! - [`ValidationRequest`] - Fluent registration of caller- and resource-level checks
//! - [`VerifiedAccess`] - Successful verification outcome
//! - [`VisibilityScope`] - Role-scoped lookup predicate for case records
//! - [`CaseAccessError`], [`DenialCode`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use case_access_sdk::{
//!     AccessorCheck, CaseAccessClient, OwnerCheck, ResourceStateCheck, RoleKind, ValidationRequest,
//! };
//!
//! let access = client
//!     .verify(
//!         ValidationRequest::new(identity)
//!             .role(role_id)
//!             .target_resource(case_id)
//!             .require_assessor()
//!             .require_accessor(AccessorCheck::new().org_roles([RoleKind::QualifyingAccessor]))
//!             .require_owner_role(OwnerCheck::new())
//!             .require_resource_state(ResourceStateCheck::new().is_owner(true)),
//!     )
//!     .await?;
//!
//! let case = access.resource_info()?;
//! ```
//!
//! Checks registered in the same phase are OR-ed: the call above passes for an
//! assessor, a qualifying accessor, or an owner. Constraints inside a single
//! check are AND-ed.

pub mod api;
pub mod backend_api;
pub mod checks;
pub mod error;
pub mod models;
pub mod visibility;

// Re-export main types at crate root
pub use api::CaseAccessClient;
pub use backend_api::{AccountDirectoryClient, CaseRecordLookupClient};
pub use checks::{
    AccessorCheck, AdminCheck, CallerCheck, OwnerCheck, ResourceCheck, ResourceStateCheck,
    StatusRule, ValidationRequest,
};
pub use error::{CaseAccessError, DenialCode, DirectoryError, LookupError};
pub use models::{
    CallerAccount, CaseStatus, CollaboratorStatus, ContextScope, CurrentRole, DomainContext,
    OrganisationRef, OrganisationUnitRef, ResourceSummary, RoleAssignment, RoleKind,
    SupportStatus, UnknownRoleKindError, VerifiedAccess,
};
pub use visibility::{VisibilityConstraint, VisibilityFilter, VisibilityScope};
