use super::herd_resolvers::HerdMutation;
use super::ledger_resolvers::LedgerMutation;
use super::settings_resolvers::SettingsMutation;
use async_graphql::{MergedObject, Object};

#[derive(MergedObject, Default)]
pub struct Mutation(AppMutation, HerdMutation, LedgerMutation, SettingsMutation);

#[derive(Default)]
pub struct AppMutation;

#[Object]
impl AppMutation {
    async fn ping(&self) -> &str {
        "pong"
    }
}
