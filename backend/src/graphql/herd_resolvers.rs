//! GraphQL Resolvers for the Herd
//!
//! Cow and disposition records plus the per-cow posting operations:
//! acquisition, catch-up, disposition, and reinstatement.

use async_graphql::{Context, FieldResult, Object};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

use crate::entities::{
    cow, disposition, Cow, CowActiveModel, CowStatus, CreateCowInput, CreateDispositionInput,
    Disposition,
};
use crate::error::LedgerError;
use crate::services::acquisition::AcquisitionService;
use crate::services::depreciation::DepreciationService;
use crate::services::disposition::DispositionService;

use shared::models::{CatchUpResult, DispositionPostingResult, PostingSummary, ReinstatementResult};

#[derive(Default)]
pub struct HerdQuery;

#[Object]
impl HerdQuery {
    /// Get a cow by ID
    async fn cow(&self, ctx: &Context<'_>, id: i32) -> FieldResult<Option<cow::Model>> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        Ok(Cow::find_by_id(id).one(db.as_ref()).await?)
    }

    /// Get the cows of a company, optionally filtered by status
    async fn cows(
        &self,
        ctx: &Context<'_>,
        company_id: i32,
        status: Option<CowStatus>,
    ) -> FieldResult<Vec<cow::Model>> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;

        let mut query = Cow::find().filter(cow::Column::CompanyId.eq(company_id));
        if let Some(status) = status {
            query = query.filter(cow::Column::Status.eq(status));
        }

        Ok(query
            .order_by_asc(cow::Column::TagNumber)
            .all(db.as_ref())
            .await?)
    }

    /// Get the dispositions of a company
    async fn dispositions(
        &self,
        ctx: &Context<'_>,
        company_id: i32,
    ) -> FieldResult<Vec<disposition::Model>> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        Ok(Disposition::find()
            .filter(disposition::Column::CompanyId.eq(company_id))
            .order_by_desc(disposition::Column::DispositionDate)
            .all(db.as_ref())
            .await?)
    }
}

#[derive(Default)]
pub struct HerdMutation;

#[Object]
impl HerdMutation {
    /// Register a cow in the herd
    async fn create_cow(
        &self,
        ctx: &Context<'_>,
        input: CreateCowInput,
    ) -> FieldResult<cow::Model> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;

        if input.purchase_price < Decimal::ZERO {
            return Err(LedgerError::DataAnomaly(
                "purchase price cannot be negative".to_string(),
            )
            .into());
        }
        let salvage = input.salvage_value.unwrap_or(Decimal::ZERO);
        if salvage < Decimal::ZERO || salvage > input.purchase_price {
            return Err(LedgerError::DataAnomaly(
                "salvage value must lie between zero and the purchase price".to_string(),
            )
            .into());
        }

        let cow = CowActiveModel {
            company_id: Set(input.company_id),
            tag_number: Set(input.tag_number),
            name: Set(input.name),
            freshen_date: Set(input.freshen_date),
            purchase_price: Set(input.purchase_price),
            salvage_value: Set(salvage),
            acquisition_type: Set(input.acquisition_type),
            status: Set(CowStatus::Active),
            current_value: Set(input.purchase_price),
            accumulated_depreciation: Set(Decimal::ZERO),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await?;

        Ok(cow)
    }

    /// Record a disposition event; sweeps any depreciation already posted
    /// past the event date
    async fn create_disposition(
        &self,
        ctx: &Context<'_>,
        input: CreateDispositionInput,
    ) -> FieldResult<disposition::Model> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        let service = ctx.data::<Arc<DispositionService>>()?;
        Ok(service.create_disposition(db.as_ref(), input).await?)
    }

    /// Post the acquisition entry for a cow
    async fn post_acquisition(
        &self,
        ctx: &Context<'_>,
        cow_id: i32,
    ) -> FieldResult<PostingSummary> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        let service = ctx.data::<Arc<AcquisitionService>>()?;
        Ok(service.post_acquisition(db.as_ref(), cow_id).await?)
    }

    /// Post the disposition entry, including depreciation catch-up and the
    /// pro-rated final month
    async fn post_disposition(
        &self,
        ctx: &Context<'_>,
        disposition_id: i32,
    ) -> FieldResult<DispositionPostingResult> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        let service = ctx.data::<Arc<DispositionService>>()?;
        Ok(service.post_disposition(db.as_ref(), disposition_id).await?)
    }

    /// Create any missing monthly depreciation for a cow through a date
    async fn catch_up_cow(
        &self,
        ctx: &Context<'_>,
        cow_id: i32,
        through_date: Option<NaiveDate>,
    ) -> FieldResult<CatchUpResult> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        let service = ctx.data::<Arc<DepreciationService>>()?;
        let through = through_date.unwrap_or_else(|| Utc::now().date_naive());
        Ok(service.catch_up_cow(db.as_ref(), cow_id, through).await?)
    }

    /// Rescind a disposition: reverse its entry, reactivate the cow, and
    /// catch the ledger up over the gap
    async fn reinstate_disposition(
        &self,
        ctx: &Context<'_>,
        disposition_id: i32,
    ) -> FieldResult<ReinstatementResult> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        let service = ctx.data::<Arc<DispositionService>>()?;
        Ok(service
            .reinstate_disposition(db.as_ref(), disposition_id)
            .await?)
    }
}
