pub mod herd_resolvers;
pub mod ledger_resolvers;
pub mod mutation;
pub mod query;
pub mod reports_resolvers;
pub mod settings_resolvers;

pub use mutation::Mutation;
pub use query::Query;
