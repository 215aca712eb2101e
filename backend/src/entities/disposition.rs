//! Disposition Entity
//!
//! A terminal event removing a cow from service: sale, death, or culling.
//! At most one disposition exists per cow; the disposition poster writes the
//! derived book value, gain/loss, and journal entry link back onto the row.

use async_graphql::{Enum, InputObject, SimpleObject};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::cow::CowStatus;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Enum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum DispositionType {
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "death")]
    Death,
    #[sea_orm(string_value = "culled")]
    Culled,
}

impl DispositionType {
    /// Terminal cow status this disposition type produces
    pub fn resulting_status(&self) -> CowStatus {
        match self {
            DispositionType::Sale | DispositionType::Culled => CowStatus::Sold,
            DispositionType::Death => CowStatus::Deceased,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, SimpleObject)]
#[sea_orm(table_name = "dispositions")]
#[graphql(concrete(name = "Disposition", params()))]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_id: i32,
    pub cow_id: i32,
    pub disposition_date: Date,
    pub disposition_type: DispositionType,
    pub sale_amount: Decimal,

    /// Book value at disposition, written by the poster
    pub final_book_value: Option<Decimal>,

    /// Sale amount minus final book value, written by the poster
    pub gain_loss: Option<Decimal>,

    /// The disposition journal entry, once posted
    pub journal_entry_id: Option<i32>,

    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,

    #[sea_orm(
        belongs_to = "super::cow::Entity",
        from = "Column::CowId",
        to = "super::cow::Column::Id"
    )]
    Cow,

    #[sea_orm(
        belongs_to = "super::journal_entry::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entry::Column::Id"
    )]
    JournalEntry,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::cow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cow.def()
    }
}

impl Related<super::journal_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// Input types for GraphQL mutations
#[derive(InputObject, Deserialize, Serialize)]
pub struct CreateDispositionInput {
    pub company_id: i32,
    pub cow_id: i32,
    pub disposition_date: Date,
    pub disposition_type: DispositionType,
    pub sale_amount: Option<Decimal>,
    pub notes: Option<String>,
}
