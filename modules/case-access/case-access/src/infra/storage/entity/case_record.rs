use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "case_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub owner_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::case_share::Entity")]
    Share,
    #[sea_orm(has_many = "super::case_collaborator::Entity")]
    Collaborator,
    #[sea_orm(has_many = "super::case_support::Entity")]
    Support,
}

impl ActiveModelBehavior for ActiveModel {}

impl Related<super::case_share::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Share.def()
    }
}

impl Related<super::case_collaborator::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collaborator.def()
    }
}

impl Related<super::case_support::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Support.def()
    }
}
