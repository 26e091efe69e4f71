//! Schema migrations for the case access tables.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m001_initial::Migration)]
    }
}

mod m001_initial {
    use sea_orm_migration::prelude::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[derive(DeriveIden)]
    enum Accounts {
        Table,
        Id,
        ExternalIdentity,
        DisplayName,
        Email,
        Phone,
        IsActive,
    }

    #[derive(DeriveIden)]
    enum Organisations {
        Table,
        Id,
        Name,
        Acronym,
    }

    #[derive(DeriveIden)]
    enum OrganisationUnits {
        Table,
        Id,
        OrganisationId,
        Name,
        Acronym,
    }

    #[derive(DeriveIden)]
    enum RoleAssignments {
        Table,
        Id,
        AccountId,
        Role,
        IsActive,
        OrganisationId,
        OrganisationUnitId,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum CaseRecords {
        Table,
        Id,
        Name,
        Status,
        OwnerId,
    }

    #[derive(DeriveIden)]
    enum CaseShares {
        Table,
        Id,
        CaseId,
        OrganisationId,
    }

    #[derive(DeriveIden)]
    enum CaseCollaborators {
        Table,
        Id,
        CaseId,
        AccountId,
        Email,
        Status,
    }

    #[derive(DeriveIden)]
    enum CaseSupports {
        Table,
        Id,
        CaseId,
        OrganisationUnitId,
        Status,
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Accounts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                        .col(
                            ColumnDef::new(Accounts::ExternalIdentity)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Accounts::DisplayName).string().not_null())
                        .col(ColumnDef::new(Accounts::Email).string().not_null())
                        .col(ColumnDef::new(Accounts::Phone).string().null())
                        .col(ColumnDef::new(Accounts::IsActive).boolean().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Organisations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Organisations::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Organisations::Name).string().not_null())
                        .col(ColumnDef::new(Organisations::Acronym).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrganisationUnits::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrganisationUnits::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(OrganisationUnits::OrganisationId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrganisationUnits::Name).string().not_null())
                        .col(ColumnDef::new(OrganisationUnits::Acronym).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RoleAssignments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RoleAssignments::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(RoleAssignments::AccountId).uuid().not_null())
                        .col(ColumnDef::new(RoleAssignments::Role).string().not_null())
                        .col(ColumnDef::new(RoleAssignments::IsActive).boolean().not_null())
                        .col(ColumnDef::new(RoleAssignments::OrganisationId).uuid().null())
                        .col(
                            ColumnDef::new(RoleAssignments::OrganisationUnitId)
                                .uuid()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RoleAssignments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_role_assignments_account")
                        .table(RoleAssignments::Table)
                        .col(RoleAssignments::AccountId)
                        .col(RoleAssignments::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CaseRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CaseRecords::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(CaseRecords::Name).string().not_null())
                        .col(ColumnDef::new(CaseRecords::Status).string().not_null())
                        .col(ColumnDef::new(CaseRecords::OwnerId).uuid().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CaseShares::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CaseShares::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(CaseShares::CaseId).uuid().not_null())
                        .col(ColumnDef::new(CaseShares::OrganisationId).uuid().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CaseCollaborators::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CaseCollaborators::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(CaseCollaborators::CaseId).uuid().not_null())
                        .col(ColumnDef::new(CaseCollaborators::AccountId).uuid().null())
                        .col(ColumnDef::new(CaseCollaborators::Email).string().not_null())
                        .col(ColumnDef::new(CaseCollaborators::Status).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CaseSupports::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CaseSupports::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(CaseSupports::CaseId).uuid().not_null())
                        .col(
                            ColumnDef::new(CaseSupports::OrganisationUnitId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CaseSupports::Status).string().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for table in [
                "case_supports",
                "case_collaborators",
                "case_shares",
                "case_records",
                "role_assignments",
                "organisation_units",
                "organisations",
                "accounts",
            ] {
                manager
                    .drop_table(Table::drop().table(Alias::new(table)).if_exists().to_owned())
                    .await?;
            }
            Ok(())
        }
    }
}
