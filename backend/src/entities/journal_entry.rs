use async_graphql::{Enum, InputObject, SimpleObject};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Enum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum EntryType {
    #[sea_orm(string_value = "acquisition")]
    Acquisition,
    #[sea_orm(string_value = "depreciation")]
    Depreciation,
    #[sea_orm(string_value = "disposition")]
    Disposition,
    #[sea_orm(string_value = "acquisition_reversal")]
    AcquisitionReversal,
    #[sea_orm(string_value = "depreciation_reversal")]
    DepreciationReversal,
    #[sea_orm(string_value = "disposition_reversal")]
    DispositionReversal,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Acquisition => "acquisition",
            EntryType::Depreciation => "depreciation",
            EntryType::Disposition => "disposition",
            EntryType::AcquisitionReversal => "acquisition_reversal",
            EntryType::DepreciationReversal => "depreciation_reversal",
            EntryType::DispositionReversal => "disposition_reversal",
        }
    }

    /// The swap-and-append reversal type for this entry type, if reversible
    pub fn reversal(&self) -> Option<EntryType> {
        match self {
            EntryType::Acquisition => Some(EntryType::AcquisitionReversal),
            EntryType::Depreciation => Some(EntryType::DepreciationReversal),
            EntryType::Disposition => Some(EntryType::DispositionReversal),
            _ => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Enum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntryStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, SimpleObject)]
#[sea_orm(table_name = "journal_entries")]
#[graphql(concrete(name = "JournalEntry", params()))]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_id: i32,
    pub entry_number: String,
    /// Economic date of the underlying event
    pub entry_date: Date,
    /// Accounting period the entry reports under
    pub month: i32,
    pub year: i32,
    pub entry_type: EntryType,
    pub description: String,
    pub total_amount: Decimal,
    pub status: EntryStatus,
    pub posted_at: Option<DateTimeUtc>,
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

impl ActiveModelBehavior for ActiveModel {}

// Response type that includes journal lines
#[derive(SimpleObject, Serialize)]
pub struct JournalEntryWithLines {
    #[graphql(flatten)]
    pub journal_entry: Model,
    pub lines: Vec<super::journal_line::Model>,
}

// Filter input for queries
#[derive(InputObject, Deserialize)]
pub struct JournalEntryFilter {
    pub entry_type: Option<EntryType>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub cow_id: Option<i32>,
    pub from_date: Option<Date>,
    pub to_date: Option<Date>,
}
