use std::collections::HashMap;

use async_trait::async_trait;
use case_access_sdk::{
    AccountDirectoryClient, CallerAccount, CaseRecordLookupClient, CaseStatus, DirectoryError,
    LookupError, OrganisationRef, OrganisationUnitRef, ResourceSummary, RoleAssignment, RoleKind,
    UnknownRoleKindError, VisibilityScope,
};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entity::{account, case_record, organisation, organisation_unit, role_assignment};
use super::visibility_cond::build_visibility_condition;

/// SQL-backed account directory and case record lookup.
#[derive(Clone)]
pub struct SeaOrmCaseAccessRepository {
    db: DatabaseConnection,
}

impl SeaOrmCaseAccessRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Attach organisation and unit references to role rows.
    async fn hydrate_roles(
        &self,
        rows: Vec<role_assignment::Model>,
    ) -> Result<Vec<RoleAssignment>, DirectoryError> {
        let org_ids: Vec<Uuid> = rows.iter().filter_map(|r| r.organisation_id).collect();
        let unit_ids: Vec<Uuid> = rows.iter().filter_map(|r| r.organisation_unit_id).collect();

        let organisations: HashMap<Uuid, OrganisationRef> = if org_ids.is_empty() {
            HashMap::new()
        } else {
            organisation::Entity::find()
                .filter(organisation::Column::Id.is_in(org_ids))
                .all(&self.db)
                .await
                .map_err(map_directory_error)?
                .into_iter()
                .map(|o| {
                    (
                        o.id,
                        OrganisationRef {
                            id: o.id,
                            name: o.name,
                            acronym: o.acronym,
                        },
                    )
                })
                .collect()
        };

        let units: HashMap<Uuid, OrganisationUnitRef> = if unit_ids.is_empty() {
            HashMap::new()
        } else {
            organisation_unit::Entity::find()
                .filter(organisation_unit::Column::Id.is_in(unit_ids))
                .all(&self.db)
                .await
                .map_err(map_directory_error)?
                .into_iter()
                .map(|u| {
                    (
                        u.id,
                        OrganisationUnitRef {
                            id: u.id,
                            organisation_id: u.organisation_id,
                            name: u.name,
                            acronym: u.acronym,
                        },
                    )
                })
                .collect()
        };

        rows.into_iter()
            .map(|row| {
                let kind: RoleKind = row
                    .role
                    .parse()
                    .map_err(|e: UnknownRoleKindError| DirectoryError::UnknownRoleKind(e.0))?;
                Ok(RoleAssignment {
                    id: row.id,
                    kind,
                    is_active: row.is_active,
                    organisation: row
                        .organisation_id
                        .and_then(|id| organisations.get(&id).cloned()),
                    organisation_unit: row
                        .organisation_unit_id
                        .and_then(|id| units.get(&id).cloned()),
                })
            })
            .collect()
    }
}

fn is_connection_error(e: &DbErr) -> bool {
    matches!(e, DbErr::ConnectionAcquire(_) | DbErr::Conn(_))
}

fn map_directory_error(e: DbErr) -> DirectoryError {
    if is_connection_error(&e) {
        DirectoryError::Unavailable(e.to_string())
    } else {
        DirectoryError::Internal(format!("database error: {e}"))
    }
}

fn map_lookup_error(e: DbErr) -> LookupError {
    if is_connection_error(&e) {
        LookupError::Unavailable(e.to_string())
    } else {
        LookupError::Internal(format!("database error: {e}"))
    }
}

#[async_trait]
impl AccountDirectoryClient for SeaOrmCaseAccessRepository {
    #[tracing::instrument(skip_all)]
    async fn get_account(&self, identity: &str) -> Result<CallerAccount, DirectoryError> {
        let row = account::Entity::find()
            .filter(account::Column::ExternalIdentity.eq(identity))
            .one(&self.db)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| DirectoryError::AccountNotFound(identity.to_owned()))?;

        let role_rows = role_assignment::Entity::find()
            .filter(role_assignment::Column::AccountId.eq(row.id))
            .order_by_asc(role_assignment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_directory_error)?;
        let role_assignments = self.hydrate_roles(role_rows).await?;

        Ok(CallerAccount {
            id: row.id,
            external_identity: row.external_identity,
            display_name: row.display_name,
            email: row.email,
            phone: row.phone,
            is_active: row.is_active,
            role_assignments,
        })
    }

    #[tracing::instrument(skip_all, fields(%account_id, role_id = ?role_id))]
    async fn get_active_role(
        &self,
        account_id: Uuid,
        role_id: Option<Uuid>,
    ) -> Result<Option<RoleAssignment>, DirectoryError> {
        let mut query = role_assignment::Entity::find()
            .filter(role_assignment::Column::AccountId.eq(account_id))
            .filter(role_assignment::Column::IsActive.eq(true));
        if let Some(role_id) = role_id {
            query = query.filter(role_assignment::Column::Id.eq(role_id));
        }

        let Some(row) = query
            .order_by_asc(role_assignment::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(map_directory_error)?
        else {
            return Ok(None);
        };

        Ok(self.hydrate_roles(vec![row]).await?.into_iter().next())
    }
}

#[async_trait]
impl CaseRecordLookupClient for SeaOrmCaseAccessRepository {
    #[tracing::instrument(skip_all, fields(resource_id = %scope.resource_id()))]
    async fn find_visible(
        &self,
        scope: &VisibilityScope,
    ) -> Result<Option<ResourceSummary>, LookupError> {
        let Some(row) = case_record::Entity::find()
            .filter(build_visibility_condition(scope))
            .one(&self.db)
            .await
            .map_err(map_lookup_error)?
        else {
            return Ok(None);
        };

        let status: CaseStatus = row.status.parse().map_err(LookupError::Internal)?;
        Ok(Some(ResourceSummary {
            id: row.id,
            name: row.name,
            status,
            owner_id: row.owner_id,
        }))
    }
}
