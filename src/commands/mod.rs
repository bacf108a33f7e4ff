pub mod migrate;
pub mod purge_expired;
pub mod serve;
