//! Collaborator traits implemented by storage backends.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{DirectoryError, LookupError};
use crate::models::{CallerAccount, ResourceSummary, RoleAssignment};
use crate::visibility::VisibilityScope;

/// Account and role lookup.
#[async_trait]
pub trait AccountDirectoryClient: Send + Sync {
    /// Load the account behind an external identity, with every role
    /// assignment it holds.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account matches
    /// - `UnknownRoleKind` if a stored assignment has a kind outside the closed set
    /// - `Unavailable` / `Internal` on backend failure
    async fn get_account(&self, identity: &str) -> Result<CallerAccount, DirectoryError>;

    /// Load one active role assignment of `account_id`.
    ///
    /// With `role_id`, returns that assignment if it belongs to the account
    /// and is active. Without it, returns the earliest-created active
    /// assignment. `Ok(None)` when nothing matches.
    ///
    /// # Errors
    ///
    /// Same as [`AccountDirectoryClient::get_account`], minus `AccountNotFound`.
    async fn get_active_role(
        &self,
        account_id: Uuid,
        role_id: Option<Uuid>,
    ) -> Result<Option<RoleAssignment>, DirectoryError>;
}

/// Role-scoped case record lookup.
#[async_trait]
pub trait CaseRecordLookupClient: Send + Sync {
    /// Return the record matching `scope`, or `None` when it does not exist
    /// or is not visible under the scope. The two cases are not
    /// distinguished.
    ///
    /// # Errors
    ///
    /// `Unavailable` / `Internal` on backend failure.
    async fn find_visible(
        &self,
        scope: &VisibilityScope,
    ) -> Result<Option<ResourceSummary>, LookupError>;
}
