#![allow(clippy::unwrap_used, clippy::expect_used)]

//! `SeaORM` repository tests on in-memory `SQLite`.

use std::sync::Arc;

use case_access::infra::storage::entity::{
    account, case_collaborator, case_record, case_share, case_support, organisation,
    organisation_unit, role_assignment,
};
use case_access::infra::storage::migrations::Migrator;
use case_access::infra::SeaOrmCaseAccessRepository;
use case_access::module::connect;
use case_access::{CaseAccessConfig, CaseAccessModule, DatabaseConfig};
use case_access_sdk::{
    AccessorCheck, AccountDirectoryClient, CaseAccessClient, CaseAccessError,
    CaseRecordLookupClient, CaseStatus, CollaboratorStatus, DenialCode, DirectoryError,
    OwnerCheck, ResourceStateCheck, RoleKind, SupportStatus, ValidationRequest,
    VisibilityConstraint, VisibilityFilter, VisibilityScope,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

async fn setup() -> DatabaseConnection {
    let db = connect(&DatabaseConfig::default()).await.expect("connect");
    Migrator::up(&db, None).await.expect("migrate");
    db
}

async fn insert_org(db: &DatabaseConnection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    organisation::ActiveModel {
        id: Set(id),
        name: Set(name.to_owned()),
        acronym: Set(None),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

async fn insert_unit(db: &DatabaseConnection, organisation_id: Uuid, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    organisation_unit::ActiveModel {
        id: Set(id),
        organisation_id: Set(organisation_id),
        name: Set(name.to_owned()),
        acronym: Set(Some(name.to_uppercase())),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

async fn insert_account(db: &DatabaseConnection, identity: &str, is_active: bool) -> Uuid {
    let id = Uuid::new_v4();
    account::ActiveModel {
        id: Set(id),
        external_identity: Set(identity.to_owned()),
        display_name: Set(identity.to_owned()),
        email: Set(format!("{identity}@example.com")),
        phone: Set(None),
        is_active: Set(is_active),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

struct RoleRow<'a> {
    role: &'a str,
    is_active: bool,
    organisation_id: Option<Uuid>,
    organisation_unit_id: Option<Uuid>,
    age_minutes: i64,
}

impl<'a> RoleRow<'a> {
    fn new(role: &'a str) -> Self {
        Self {
            role,
            is_active: true,
            organisation_id: None,
            organisation_unit_id: None,
            age_minutes: 0,
        }
    }
}

async fn insert_role(db: &DatabaseConnection, account_id: Uuid, row: RoleRow<'_>) -> Uuid {
    let id = Uuid::new_v4();
    role_assignment::ActiveModel {
        id: Set(id),
        account_id: Set(account_id),
        role: Set(row.role.to_owned()),
        is_active: Set(row.is_active),
        organisation_id: Set(row.organisation_id),
        organisation_unit_id: Set(row.organisation_unit_id),
        created_at: Set(OffsetDateTime::now_utc() - Duration::minutes(row.age_minutes)),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

async fn insert_case(
    db: &DatabaseConnection,
    status: CaseStatus,
    owner_id: Option<Uuid>,
) -> Uuid {
    let id = Uuid::new_v4();
    case_record::ActiveModel {
        id: Set(id),
        name: Set("Remote monitoring kit".to_owned()),
        status: Set(status.as_str().to_owned()),
        owner_id: Set(owner_id),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

async fn share(db: &DatabaseConnection, case_id: Uuid, organisation_id: Uuid) {
    case_share::ActiveModel {
        id: Set(Uuid::new_v4()),
        case_id: Set(case_id),
        organisation_id: Set(organisation_id),
    }
    .insert(db)
    .await
    .unwrap();
}

async fn collaborate(
    db: &DatabaseConnection,
    case_id: Uuid,
    account_id: Option<Uuid>,
    status: CollaboratorStatus,
) {
    case_collaborator::ActiveModel {
        id: Set(Uuid::new_v4()),
        case_id: Set(case_id),
        account_id: Set(account_id),
        email: Set("collaborator@example.com".to_owned()),
        status: Set(status.as_str().to_owned()),
    }
    .insert(db)
    .await
    .unwrap();
}

async fn support(db: &DatabaseConnection, case_id: Uuid, unit_id: Uuid, status: SupportStatus) {
    case_support::ActiveModel {
        id: Set(Uuid::new_v4()),
        case_id: Set(case_id),
        organisation_unit_id: Set(unit_id),
        status: Set(status.as_str().to_owned()),
    }
    .insert(db)
    .await
    .unwrap();
}

fn client(db: DatabaseConnection) -> Arc<dyn CaseAccessClient> {
    let repo = Arc::new(SeaOrmCaseAccessRepository::new(db));
    CaseAccessModule::new()
        .init_with(repo.clone(), repo, &CaseAccessConfig::default())
        .unwrap()
}

#[tokio::test]
async fn get_account_hydrates_roles_in_creation_order() {
    let db = setup().await;
    let org = insert_org(&db, "Health Board").await;
    let unit = insert_unit(&db, org, "u1").await;
    let account_id = insert_account(&db, "ext-1", true).await;
    let newer = insert_role(
        &db,
        account_id,
        RoleRow {
            organisation_id: Some(org),
            organisation_unit_id: Some(unit),
            ..RoleRow::new("ACCESSOR")
        },
    )
    .await;
    let older = insert_role(
        &db,
        account_id,
        RoleRow {
            age_minutes: 10,
            ..RoleRow::new("ASSESSOR")
        },
    )
    .await;

    let repo = SeaOrmCaseAccessRepository::new(db);
    let account = repo.get_account("ext-1").await.unwrap();

    assert_eq!(account.id, account_id);
    let ids: Vec<_> = account.role_assignments.iter().map(|r| r.id).collect();
    assert_eq!(ids, [older, newer]);
    let accessor = &account.role_assignments[1];
    assert_eq!(accessor.kind, RoleKind::Accessor);
    assert_eq!(accessor.organisation.as_ref().unwrap().id, org);
    let unit_ref = accessor.organisation_unit.as_ref().unwrap();
    assert_eq!(unit_ref.id, unit);
    assert_eq!(unit_ref.organisation_id, org);
    assert_eq!(unit_ref.acronym.as_deref(), Some("U1"));
}

#[tokio::test]
async fn get_account_reports_missing_identity() {
    let repo = SeaOrmCaseAccessRepository::new(setup().await);
    let err = repo.get_account("nobody").await.unwrap_err();
    assert!(matches!(err, DirectoryError::AccountNotFound(id) if id == "nobody"));
}

#[tokio::test]
async fn get_active_role_picks_earliest_active_or_explicit() {
    let db = setup().await;
    let account_id = insert_account(&db, "ext-2", true).await;
    let other_account = insert_account(&db, "ext-3", true).await;
    let retired = insert_role(
        &db,
        account_id,
        RoleRow {
            is_active: false,
            age_minutes: 30,
            ..RoleRow::new("ADMIN")
        },
    )
    .await;
    let first = insert_role(
        &db,
        account_id,
        RoleRow {
            age_minutes: 20,
            ..RoleRow::new("ASSESSOR")
        },
    )
    .await;
    let second = insert_role(&db, account_id, RoleRow::new("ADMIN")).await;
    let foreign = insert_role(&db, other_account, RoleRow::new("ADMIN")).await;

    let repo = SeaOrmCaseAccessRepository::new(db);

    let default = repo.get_active_role(account_id, None).await.unwrap().unwrap();
    assert_eq!(default.id, first);

    let explicit = repo
        .get_active_role(account_id, Some(second))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(explicit.kind, RoleKind::Admin);

    assert!(
        repo.get_active_role(account_id, Some(retired))
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        repo.get_active_role(account_id, Some(foreign))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn unknown_role_kind_is_unprocessable() {
    let db = setup().await;
    let account_id = insert_account(&db, "ext-4", true).await;
    insert_role(&db, account_id, RoleRow::new("SUPERVISOR")).await;

    let repo = SeaOrmCaseAccessRepository::new(db.clone());
    let err = repo.get_account("ext-4").await.unwrap_err();
    assert!(matches!(err, DirectoryError::UnknownRoleKind(kind) if kind == "SUPERVISOR"));

    let err = client(db)
        .verify(ValidationRequest::new("ext-4"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CaseAccessError::Unprocessable(DenialCode::UnknownRoleKind)
    ));
}

#[tokio::test]
async fn find_visible_applies_scope() {
    let db = setup().await;
    let owner = Uuid::new_v4();
    let collaborator = Uuid::new_v4();
    let case_id = insert_case(&db, CaseStatus::InProgress, Some(owner)).await;
    collaborate(&db, case_id, Some(collaborator), CollaboratorStatus::Active).await;
    collaborate(&db, case_id, None, CollaboratorStatus::Pending).await;

    let repo = SeaOrmCaseAccessRepository::new(db);
    let owner_scope = |account_id| {
        VisibilityScope::from_constraints(
            case_id,
            vec![
                VisibilityConstraint::new(vec![VisibilityFilter::OwnedBy { account_id }]),
                VisibilityConstraint::new(vec![VisibilityFilter::ActiveCollaborator {
                    account_id,
                }]),
            ],
        )
    };

    let found = repo.find_visible(&owner_scope(owner)).await.unwrap().unwrap();
    assert_eq!(found.id, case_id);
    assert_eq!(found.status, CaseStatus::InProgress);
    assert_eq!(found.owner_id, Some(owner));

    assert!(
        repo.find_visible(&owner_scope(collaborator))
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        repo.find_visible(&owner_scope(Uuid::new_v4()))
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        repo.find_visible(&VisibilityScope::deny_all(case_id))
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        repo.find_visible(&VisibilityScope::allow_all(case_id))
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        repo.find_visible(&VisibilityScope::allow_all(Uuid::new_v4()))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn owner_verifies_own_record_end_to_end() {
    let db = setup().await;
    let org = insert_org(&db, "Innovate Ltd").await;
    let owner = insert_account(&db, "owner", true).await;
    insert_role(
        &db,
        owner,
        RoleRow {
            organisation_id: Some(org),
            ..RoleRow::new("OWNER")
        },
    )
    .await;
    let case_id = insert_case(&db, CaseStatus::Created, Some(owner)).await;

    let access = client(db)
        .verify(
            ValidationRequest::new("owner")
                .target_resource(case_id)
                .require_owner_role(OwnerCheck::new().organisation(org))
                .require_resource_state(ResourceStateCheck::new().is_owner(true)),
        )
        .await
        .unwrap();

    assert_eq!(access.resource_info().unwrap().id, case_id);
}

#[tokio::test]
async fn accessor_visibility_end_to_end() {
    let db = setup().await;
    let org = insert_org(&db, "Health Board").await;
    let other_org = insert_org(&db, "Other Board").await;
    let u1 = insert_unit(&db, org, "u1").await;
    let accessor = insert_account(&db, "accessor", true).await;
    insert_role(
        &db,
        accessor,
        RoleRow {
            organisation_id: Some(org),
            organisation_unit_id: Some(u1),
            ..RoleRow::new("ACCESSOR")
        },
    )
    .await;

    let shared_elsewhere = insert_case(&db, CaseStatus::InProgress, None).await;
    share(&db, shared_elsewhere, other_org).await;
    support(&db, shared_elsewhere, u1, SupportStatus::Active).await;

    let supported = insert_case(&db, CaseStatus::Complete, None).await;
    share(&db, supported, org).await;
    support(&db, supported, u1, SupportStatus::Closed).await;

    let unsupported = insert_case(&db, CaseStatus::InProgress, None).await;
    share(&db, unsupported, org).await;
    support(&db, unsupported, u1, SupportStatus::Unassigned).await;

    let client = client(db);
    let request = |case_id| {
        ValidationRequest::new("accessor")
            .target_resource(case_id)
            .require_accessor(AccessorCheck::new().organisation_unit(u1))
            .require_resource_state(ResourceStateCheck::new())
    };

    client.verify(request(supported)).await.unwrap();

    for hidden in [shared_elsewhere, unsupported] {
        let err = client.verify(request(hidden)).await.unwrap_err();
        assert!(matches!(
            err,
            CaseAccessError::Forbidden(DenialCode::ResourceUnauthorized)
        ));
    }
}

#[tokio::test]
async fn migrations_can_be_rolled_back() {
    let db = setup().await;
    Migrator::down(&db, None).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    insert_account(&db, "after-rollback", true).await;
}
