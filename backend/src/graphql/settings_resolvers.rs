//! GraphQL Resolvers for Companies & Settings
//!
//! Company records, per-company depreciation settings, and chart-of-accounts
//! role overrides.

use async_graphql::{Context, FieldResult, Object};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use validator::Validate;

use crate::entities::{
    account_mapping, company, depreciation_setting, AccountMapping, AccountMappingActiveModel,
    Company, CompanyActiveModel, CreateCompanyInput, DepreciationSetting,
    DepreciationSettingActiveModel, UpsertAccountMappingInput, UpsertDepreciationSettingsInput,
};

#[derive(Default)]
pub struct SettingsQuery;

#[Object]
impl SettingsQuery {
    async fn companies(&self, ctx: &Context<'_>) -> FieldResult<Vec<company::Model>> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        Ok(Company::find()
            .order_by_asc(company::Column::Name)
            .all(db.as_ref())
            .await?)
    }

    async fn depreciation_settings(
        &self,
        ctx: &Context<'_>,
        company_id: i32,
    ) -> FieldResult<Option<depreciation_setting::Model>> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        Ok(DepreciationSetting::find()
            .filter(depreciation_setting::Column::CompanyId.eq(company_id))
            .one(db.as_ref())
            .await?)
    }

    /// Chart-of-accounts overrides for a company; roles without a row use
    /// the built-in chart
    async fn account_mappings(
        &self,
        ctx: &Context<'_>,
        company_id: i32,
    ) -> FieldResult<Vec<account_mapping::Model>> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        Ok(AccountMapping::find()
            .filter(account_mapping::Column::CompanyId.eq(company_id))
            .all(db.as_ref())
            .await?)
    }
}

#[derive(Default)]
pub struct SettingsMutation;

#[Object]
impl SettingsMutation {
    /// Create a company with default depreciation settings
    async fn create_company(
        &self,
        ctx: &Context<'_>,
        input: CreateCompanyInput,
    ) -> FieldResult<company::Model> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;

        let company = CompanyActiveModel {
            name: Set(input.name),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await?;

        DepreciationSettingActiveModel {
            company_id: Set(company.id),
            depreciation_method: Set("straight-line".to_string()),
            depreciation_years: Set(5),
            salvage_percentage: Set(Decimal::ZERO),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await?;

        Ok(company)
    }

    async fn upsert_depreciation_settings(
        &self,
        ctx: &Context<'_>,
        input: UpsertDepreciationSettingsInput,
    ) -> FieldResult<depreciation_setting::Model> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;

        // Validate input
        input
            .validate()
            .map_err(|e| format!("Validation error: {:?}", e))?;

        let existing = DepreciationSetting::find()
            .filter(depreciation_setting::Column::CompanyId.eq(input.company_id))
            .one(db.as_ref())
            .await?;

        let is_update = existing.is_some();
        let mut active: DepreciationSettingActiveModel = match existing {
            Some(model) => model.into(),
            None => DepreciationSettingActiveModel {
                company_id: Set(input.company_id),
                depreciation_method: Set("straight-line".to_string()),
                ..Default::default()
            },
        };

        if let Some(years) = input.depreciation_years {
            active.depreciation_years = Set(years);
        }
        if let Some(pct) = input.salvage_percentage {
            active.salvage_percentage = Set(pct);
        }
        if let Some(round) = input.round_to_nearest_dollar {
            active.round_to_nearest_dollar = Set(round);
        }
        if let Some(partial) = input.include_partial_months {
            active.include_partial_months = Set(partial);
        }
        if let Some(month) = input.fiscal_year_start_month {
            active.fiscal_year_start_month = Set(month);
        }
        if let Some(day) = input.journal_processing_day {
            active.journal_processing_day = Set(day);
        }
        if let Some(mode) = input.processing_mode {
            active.processing_mode = Set(mode);
        }

        let saved = if is_update {
            active.updated_at = Set(Utc::now());
            active.update(db.as_ref()).await?
        } else {
            active.insert(db.as_ref()).await?
        };

        Ok(saved)
    }

    /// Override the (code, name) a ledger role resolves to for one company
    async fn upsert_account_mapping(
        &self,
        ctx: &Context<'_>,
        input: UpsertAccountMappingInput,
    ) -> FieldResult<account_mapping::Model> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;

        let existing = AccountMapping::find()
            .filter(account_mapping::Column::CompanyId.eq(input.company_id))
            .filter(account_mapping::Column::Role.eq(input.role))
            .one(db.as_ref())
            .await?;

        let saved = match existing {
            Some(model) => {
                let mut active: AccountMappingActiveModel = model.into();
                active.account_code = Set(input.account_code);
                active.account_name = Set(input.account_name);
                active.updated_at = Set(Utc::now());
                active.update(db.as_ref()).await?
            }
            None => {
                AccountMappingActiveModel {
                    company_id: Set(input.company_id),
                    role: Set(input.role),
                    account_code: Set(input.account_code),
                    account_name: Set(input.account_name),
                    ..Default::default()
                }
                .insert(db.as_ref())
                .await?
            }
        };

        Ok(saved)
    }
}
