use sea_orm::entity::prelude::*;
use uuid::Uuid;

/// Collaborator invitation on a case record. `account_id` stays empty until
/// the invitee signs up.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "case_collaborators")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub case_id: Uuid,
    pub account_id: Option<Uuid>,
    pub email: String,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::case_record::Entity",
        from = "Column::CaseId",
        to = "super::case_record::Column::Id"
    )]
    CaseRecord,
}

impl ActiveModelBehavior for ActiveModel {}

impl Related<super::case_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CaseRecord.def()
    }
}
