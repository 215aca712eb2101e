//! Built-in chart of accounts for the dairy herd ledger.
//!
//! Every journal line is keyed by a ledger role; a company may override the
//! (code, name) for any role through `account_mappings`, and roles without an
//! override resolve to this table.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities::{account_mapping, AccountMapping, AccountRole};
use crate::error::LedgerResult;

#[derive(Debug, Clone)]
pub struct AccountTemplate {
    pub role: AccountRole,
    pub code: &'static str,
    pub name: &'static str,
}

pub const DEFAULT_CHART: &[AccountTemplate] = &[
    AccountTemplate {
        role: AccountRole::Cash,
        code: "1000",
        name: "Cash",
    },
    AccountTemplate {
        role: AccountRole::Heifers,
        code: "1400",
        name: "Heifers",
    },
    AccountTemplate {
        role: AccountRole::Asset,
        code: "1500",
        name: "Dairy Cows",
    },
    AccountTemplate {
        role: AccountRole::AccumulatedDepreciation,
        code: "1500.1",
        name: "Accumulated Depreciation - Dairy Cows",
    },
    AccountTemplate {
        role: AccountRole::DepreciationExpense,
        code: "6100",
        name: "Depreciation Expense",
    },
    AccountTemplate {
        role: AccountRole::GainOnSale,
        code: "8000",
        name: "Gain on Sale of Cows",
    },
    AccountTemplate {
        role: AccountRole::LossOnDeadCows,
        code: "9001",
        name: "Loss on Dead Cows",
    },
    AccountTemplate {
        role: AccountRole::LossOnSaleOfCows,
        code: "9002",
        name: "Loss on Sale of Cows",
    },
    AccountTemplate {
        role: AccountRole::LossOnCulledCows,
        code: "9003",
        name: "Loss on Culled Cows",
    },
    AccountTemplate {
        role: AccountRole::LossOnSaleFallback,
        code: "9000",
        name: "Loss on Sale of Assets",
    },
];

/// An account reference as it appears on a journal line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRef {
    pub code: String,
    pub name: String,
}

/// The full role set resolved for one company
#[derive(Debug, Clone)]
pub struct ResolvedChart {
    pub cash: AccountRef,
    pub heifers: AccountRef,
    pub asset: AccountRef,
    pub accum_depr: AccountRef,
    pub depr_expense: AccountRef,
    pub gain_on_sale: AccountRef,
    pub loss_on_dead_cows: AccountRef,
    pub loss_on_sale_of_cows: AccountRef,
    pub loss_on_culled_cows: AccountRef,
    pub loss_on_sale_fallback: AccountRef,
}

impl ResolvedChart {
    pub fn account(&self, role: AccountRole) -> &AccountRef {
        match role {
            AccountRole::Cash => &self.cash,
            AccountRole::Heifers => &self.heifers,
            AccountRole::Asset => &self.asset,
            AccountRole::AccumulatedDepreciation => &self.accum_depr,
            AccountRole::DepreciationExpense => &self.depr_expense,
            AccountRole::GainOnSale => &self.gain_on_sale,
            AccountRole::LossOnDeadCows => &self.loss_on_dead_cows,
            AccountRole::LossOnSaleOfCows => &self.loss_on_sale_of_cows,
            AccountRole::LossOnCulledCows => &self.loss_on_culled_cows,
            AccountRole::LossOnSaleFallback => &self.loss_on_sale_fallback,
        }
    }
}

fn default_account(role: AccountRole) -> AccountRef {
    let template = DEFAULT_CHART
        .iter()
        .find(|t| t.role == role)
        .unwrap_or(&DEFAULT_CHART[0]);
    AccountRef {
        code: template.code.to_string(),
        name: template.name.to_string(),
    }
}

/// Resolve the company's chart: built-in defaults overlaid with any
/// `account_mappings` rows.
pub async fn resolve_chart<C: ConnectionTrait>(
    db: &C,
    company_id: i32,
) -> LedgerResult<ResolvedChart> {
    let overrides = AccountMapping::find()
        .filter(account_mapping::Column::CompanyId.eq(company_id))
        .all(db)
        .await?;

    let pick = |role: AccountRole| -> AccountRef {
        overrides
            .iter()
            .find(|m| m.role == role)
            .map(|m| AccountRef {
                code: m.account_code.clone(),
                name: m.account_name.clone(),
            })
            .unwrap_or_else(|| default_account(role))
    };

    Ok(ResolvedChart {
        cash: pick(AccountRole::Cash),
        heifers: pick(AccountRole::Heifers),
        asset: pick(AccountRole::Asset),
        accum_depr: pick(AccountRole::AccumulatedDepreciation),
        depr_expense: pick(AccountRole::DepreciationExpense),
        gain_on_sale: pick(AccountRole::GainOnSale),
        loss_on_dead_cows: pick(AccountRole::LossOnDeadCows),
        loss_on_sale_of_cows: pick(AccountRole::LossOnSaleOfCows),
        loss_on_culled_cows: pick(AccountRole::LossOnCulledCows),
        loss_on_sale_fallback: pick(AccountRole::LossOnSaleFallback),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chart_covers_every_role() {
        use sea_orm::Iterable;

        for role in AccountRole::iter() {
            assert!(
                DEFAULT_CHART.iter().any(|t| t.role == role),
                "missing default account for role {:?}",
                role
            );
        }
    }

    #[test]
    fn asset_and_contra_codes_match_reporting_queries() {
        assert_eq!(default_account(AccountRole::Asset).code, "1500");
        assert_eq!(
            default_account(AccountRole::AccumulatedDepreciation).code,
            "1500.1"
        );
    }
}
