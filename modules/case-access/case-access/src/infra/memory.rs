//! In-memory account directory and case record store.
//!
//! Holds a fixed data set seeded through the builder-style methods and
//! evaluates [`VisibilityScope`]s directly over it. Used by tests and local
//! runs without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use case_access_sdk::{
    AccountDirectoryClient, CallerAccount, CaseRecordLookupClient, CollaboratorStatus,
    DirectoryError, LookupError, ResourceSummary, RoleAssignment, SupportStatus, VisibilityFilter,
    VisibilityScope,
};
use parking_lot::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredRecord {
    summary: ResourceSummary,
    shared_with: Vec<Uuid>,
    collaborators: Vec<(Uuid, CollaboratorStatus)>,
    supports: Vec<(Uuid, SupportStatus)>,
}

impl StoredRecord {
    fn matches(&self, filter: &VisibilityFilter) -> bool {
        match filter {
            VisibilityFilter::OwnedBy { account_id } => {
                self.summary.owner_id == Some(*account_id)
            }
            VisibilityFilter::ActiveCollaborator { account_id } => self
                .collaborators
                .iter()
                .any(|(id, status)| id == account_id && *status == CollaboratorStatus::Active),
            VisibilityFilter::StatusIn { statuses } => statuses.contains(&self.summary.status),
            VisibilityFilter::SharedWithOrganisation { organisation_id } => {
                self.shared_with.contains(organisation_id)
            }
            VisibilityFilter::SupportedByUnit {
                organisation_unit_id,
                statuses,
            } => self
                .supports
                .iter()
                .any(|(unit, status)| unit == organisation_unit_id && statuses.contains(status)),
        }
    }

    fn visible_under(&self, scope: &VisibilityScope) -> bool {
        if scope.is_unconstrained() {
            return true;
        }
        scope
            .constraints()
            .iter()
            .any(|c| c.filters().iter().all(|f| self.matches(f)))
    }
}

#[derive(Default)]
struct Inner {
    // keyed by external identity
    accounts: HashMap<String, CallerAccount>,
    records: HashMap<Uuid, StoredRecord>,
}

/// In-memory implementation of both collaborator traits.
///
/// Role assignments are kept in insertion order, which stands in for
/// creation order when picking the default role.
#[derive(Default)]
pub struct StaticCaseStore {
    inner: RwLock<Inner>,
}

impl StaticCaseStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an account, keyed by its external identity.
    pub fn insert_account(&self, account: CallerAccount) {
        self.inner
            .write()
            .accounts
            .insert(account.external_identity.clone(), account);
    }

    /// Add or replace a case record. Existing relations of the record are dropped.
    pub fn insert_record(&self, summary: ResourceSummary) {
        self.inner.write().records.insert(
            summary.id,
            StoredRecord {
                summary,
                shared_with: Vec::new(),
                collaborators: Vec::new(),
                supports: Vec::new(),
            },
        );
    }

    /// Share a record with an organisation. Unknown records are ignored.
    pub fn share_with(&self, record_id: Uuid, organisation_id: Uuid) {
        if let Some(record) = self.inner.write().records.get_mut(&record_id) {
            record.shared_with.push(organisation_id);
        }
    }

    /// Add a collaborator entry. Unknown records are ignored.
    pub fn add_collaborator(&self, record_id: Uuid, account_id: Uuid, status: CollaboratorStatus) {
        if let Some(record) = self.inner.write().records.get_mut(&record_id) {
            record.collaborators.push((account_id, status));
        }
    }

    /// Add a support assignment for an organisation unit. Unknown records are ignored.
    pub fn add_support(&self, record_id: Uuid, organisation_unit_id: Uuid, status: SupportStatus) {
        if let Some(record) = self.inner.write().records.get_mut(&record_id) {
            record.supports.push((organisation_unit_id, status));
        }
    }
}

#[async_trait]
impl AccountDirectoryClient for StaticCaseStore {
    async fn get_account(&self, identity: &str) -> Result<CallerAccount, DirectoryError> {
        self.inner
            .read()
            .accounts
            .get(identity)
            .cloned()
            .ok_or_else(|| DirectoryError::AccountNotFound(identity.to_owned()))
    }

    async fn get_active_role(
        &self,
        account_id: Uuid,
        role_id: Option<Uuid>,
    ) -> Result<Option<RoleAssignment>, DirectoryError> {
        let inner = self.inner.read();
        let Some(account) = inner.accounts.values().find(|a| a.id == account_id) else {
            return Ok(None);
        };
        Ok(account
            .role_assignments
            .iter()
            .filter(|r| r.is_active)
            .find(|r| role_id.is_none_or(|id| id == r.id))
            .cloned())
    }
}

#[async_trait]
impl CaseRecordLookupClient for StaticCaseStore {
    async fn find_visible(
        &self,
        scope: &VisibilityScope,
    ) -> Result<Option<ResourceSummary>, LookupError> {
        let inner = self.inner.read();
        Ok(inner
            .records
            .get(&scope.resource_id())
            .filter(|record| record.visible_under(scope))
            .map(|record| record.summary.clone()))
    }
}
