//! Cow Entity
//!
//! A cow is a depreciable fixed asset. It enters service on its freshen date
//! and depreciates straight-line from the following month until it is fully
//! depreciated or disposed.

use async_graphql::{Enum, InputObject, SimpleObject};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Enum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CowStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "sold")]
    Sold,
    #[sea_orm(string_value = "deceased")]
    Deceased,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Enum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AcquisitionType {
    #[sea_orm(string_value = "purchased")]
    Purchased,
    #[sea_orm(string_value = "raised")]
    Raised,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, SimpleObject)]
#[sea_orm(table_name = "cows")]
#[graphql(concrete(name = "Cow", params()))]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub company_id: i32,

    /// Ear-tag identifier, unique within the company
    pub tag_number: String,

    pub name: Option<String>,

    /// Service-entry date (first calving); depreciation starts the month after
    pub freshen_date: Date,

    pub purchase_price: Decimal,

    pub salvage_value: Decimal,

    pub acquisition_type: AcquisitionType,

    pub status: CowStatus,

    /// Denormalised book value, recomputed by the posters
    pub current_value: Decimal,

    /// Denormalised accumulated depreciation, recomputed by the posters
    pub accumulated_depreciation: Decimal,

    pub disposition_id: Option<i32>,

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

    #[sea_orm(has_many = "super::journal_line::Entity")]
    JournalLines,

    #[sea_orm(has_many = "super::disposition::Entity")]
    Dispositions,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::journal_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalLines.def()
    }
}

impl Related<super::disposition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dispositions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_active(&self) -> bool {
        self.status == CowStatus::Active
    }
}

// Input types for GraphQL mutations
#[derive(InputObject, Deserialize, Serialize)]
pub struct CreateCowInput {
    pub company_id: i32,
    pub tag_number: String,
    pub name: Option<String>,
    pub freshen_date: Date,
    pub purchase_price: Decimal,
    pub salvage_value: Option<Decimal>,
    pub acquisition_type: AcquisitionType,
}
