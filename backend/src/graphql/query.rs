use super::herd_resolvers::HerdQuery;
use super::ledger_resolvers::LedgerQuery;
use super::reports_resolvers::ReportsQuery;
use super::settings_resolvers::SettingsQuery;
use async_graphql::{MergedObject, Object};

#[derive(MergedObject, Default)]
pub struct Query(AppQuery, HerdQuery, LedgerQuery, ReportsQuery, SettingsQuery);

#[derive(Default)]
pub struct AppQuery;

#[Object]
impl AppQuery {
    async fn hello(&self) -> &str {
        "Hello, Dairy Herd Asset Ledger!"
    }

    async fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    async fn status(&self) -> &str {
        "Running"
    }
}
