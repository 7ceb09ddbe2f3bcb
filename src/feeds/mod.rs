pub mod odds_api;
pub mod snapshot;
