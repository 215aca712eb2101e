use async_graphql::{InputObject, SimpleObject};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, SimpleObject)]
#[sea_orm(table_name = "companies")]
#[graphql(concrete(name = "Company", params()))]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cow::Entity")]
    Cows,
    #[sea_orm(has_many = "super::journal_entry::Entity")]
    JournalEntries,
    #[sea_orm(has_many = "super::disposition::Entity")]
    Dispositions,
    #[sea_orm(has_one = "super::depreciation_setting::Entity")]
    DepreciationSettings,
}

impl Related<super::cow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cows.def()
    }
}

impl Related<super::journal_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl Related<super::disposition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dispositions.def()
    }
}

impl Related<super::depreciation_setting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DepreciationSettings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(InputObject, Deserialize, Serialize)]
pub struct CreateCompanyInput {
    pub name: String,
}
