pub mod chart_of_accounts;
