//! Depreciation Settings Entity
//!
//! One row per company. Controls the straight-line schedule parameters,
//! rounding, partial-month handling, and the scheduler's posting day.

use async_graphql::{Enum, InputObject, SimpleObject};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Enum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ProcessingMode {
    /// Entries are dated and reported in the period they economically belong to
    #[sea_orm(string_value = "historical")]
    Historical,
    /// Entries land in the current posting period; the originating period is
    /// recorded in the description
    #[sea_orm(string_value = "production")]
    Production,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, SimpleObject)]
#[sea_orm(table_name = "depreciation_settings")]
#[graphql(concrete(name = "DepreciationSettings", params()))]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_id: i32,
    /// Only "straight-line" is supported
    pub depreciation_method: String,
    /// Useful life in years, 1..=20
    pub depreciation_years: i32,
    /// Default salvage as a percentage of purchase price, 0..=50
    pub salvage_percentage: Decimal,
    pub round_to_nearest_dollar: bool,
    pub include_partial_months: bool,
    /// Affects reporting only
    pub fiscal_year_start_month: i32,
    /// Day of month (1..=28) the scheduler posts the prior month
    pub journal_processing_day: i32,
    pub processing_mode: ProcessingMode,
    pub historical_processing_completed: bool,
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
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn useful_life_months(&self) -> i32 {
        self.depreciation_years * 12
    }
}

#[derive(InputObject, Deserialize, Serialize, Validate)]
pub struct UpsertDepreciationSettingsInput {
    pub company_id: i32,
    #[validate(range(min = 1, max = 20))]
    pub depreciation_years: Option<i32>,
    #[validate(custom(function = "validate_salvage_percentage"))]
    pub salvage_percentage: Option<Decimal>,
    pub round_to_nearest_dollar: Option<bool>,
    pub include_partial_months: Option<bool>,
    #[validate(range(min = 1, max = 12))]
    pub fiscal_year_start_month: Option<i32>,
    #[validate(range(min = 1, max = 28))]
    pub journal_processing_day: Option<i32>,
    pub processing_mode: Option<ProcessingMode>,
}

fn validate_salvage_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::from(50) {
        return Err(ValidationError::new("salvage_percentage_out_of_range"));
    }
    Ok(())
}
