//! Role-scoped lookup predicate for case records.
//!
//! A [`VisibilityScope`] is built by the engine from the caller's context and
//! compiled by each [`CaseRecordLookupClient`](crate::CaseRecordLookupClient)
//! into its own query language.
//!
//! ## Structure
//!
//! - Constraints are OR-ed: a record is visible if any constraint matches.
//! - Filters inside a constraint are AND-ed.
//! - The resource id predicate is always applied on top.
//! - An empty, constrained scope matches nothing (deny-all).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CaseStatus, SupportStatus};

/// Single predicate over a case record and its relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum VisibilityFilter {
    /// `record.owner_id == account_id`
    OwnedBy { account_id: Uuid },
    /// An `ACTIVE` collaborator entry links `account_id` to the record.
    ActiveCollaborator { account_id: Uuid },
    /// `record.status IN statuses`
    StatusIn { statuses: Vec<CaseStatus> },
    /// The record is shared with `organisation_id`.
    SharedWithOrganisation { organisation_id: Uuid },
    /// The record has a support assignment for the unit in one of `statuses`.
    SupportedByUnit {
        organisation_unit_id: Uuid,
        statuses: Vec<SupportStatus>,
    },
}

/// Conjunction of filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityConstraint {
    filters: Vec<VisibilityFilter>,
}

impl VisibilityConstraint {
    #[must_use]
    pub fn new(filters: Vec<VisibilityFilter>) -> Self {
        Self { filters }
    }

    #[must_use]
    pub fn filters(&self) -> &[VisibilityFilter] {
        &self.filters
    }

    #[must_use]
    pub fn and(mut self, filter: VisibilityFilter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// Lookup predicate for one case record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityScope {
    resource_id: Uuid,
    constraints: Vec<VisibilityConstraint>,
    unconstrained: bool,
}

impl VisibilityScope {
    /// Matches nothing.
    #[must_use]
    pub fn deny_all(resource_id: Uuid) -> Self {
        Self {
            resource_id,
            constraints: Vec::new(),
            unconstrained: false,
        }
    }

    /// Matches the record with this id, whatever its relations.
    #[must_use]
    pub fn allow_all(resource_id: Uuid) -> Self {
        Self {
            resource_id,
            constraints: Vec::new(),
            unconstrained: true,
        }
    }

    #[must_use]
    pub fn from_constraints(resource_id: Uuid, constraints: Vec<VisibilityConstraint>) -> Self {
        Self {
            resource_id,
            constraints,
            unconstrained: false,
        }
    }

    #[must_use]
    pub fn single(resource_id: Uuid, constraint: VisibilityConstraint) -> Self {
        Self::from_constraints(resource_id, vec![constraint])
    }

    #[must_use]
    pub fn resource_id(&self) -> Uuid {
        self.resource_id
    }

    #[must_use]
    pub fn constraints(&self) -> &[VisibilityConstraint] {
        &self.constraints
    }

    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.unconstrained
    }

    /// `true` if no record can match.
    #[must_use]
    pub fn is_deny_all(&self) -> bool {
        !self.unconstrained && self.constraints.is_empty()
    }
}
