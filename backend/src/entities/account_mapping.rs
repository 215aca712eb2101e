//! Account Mapping Entity
//!
//! Per-company chart-of-accounts override. Each row maps a ledger role to the
//! (code, name) the company wants on its journal lines; roles without a row
//! fall back to the built-in chart in `data::chart_of_accounts`.

use async_graphql::{Enum, InputObject, SimpleObject};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Enum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum AccountRole {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "heifers")]
    Heifers,
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "accum_depr")]
    AccumulatedDepreciation,
    #[sea_orm(string_value = "depr_expense")]
    DepreciationExpense,
    #[sea_orm(string_value = "gain_on_sale")]
    GainOnSale,
    #[sea_orm(string_value = "loss_on_dead_cows")]
    LossOnDeadCows,
    #[sea_orm(string_value = "loss_on_sale_of_cows")]
    LossOnSaleOfCows,
    #[sea_orm(string_value = "loss_on_culled_cows")]
    LossOnCulledCows,
    #[sea_orm(string_value = "loss_on_sale_fallback")]
    LossOnSaleFallback,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, SimpleObject)]
#[sea_orm(table_name = "account_mappings")]
#[graphql(concrete(name = "AccountMapping", params()))]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_id: i32,
    pub role: AccountRole,
    pub account_code: String,
    pub account_name: String,
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

#[derive(InputObject, Deserialize, Serialize)]
pub struct UpsertAccountMappingInput {
    pub company_id: i32,
    pub role: AccountRole,
    pub account_code: String,
    pub account_name: String,
}
