pub mod coordinator;
pub mod routes;
pub mod store;
pub mod session;
pub mod config;
pub mod cors;
pub mod error;
pub mod rate_limiter;
pub mod catchers;
pub use shared::views;
pub use shared::{models::*, error::*};
pub use shared::ledger::{LedgerError, SessionLedger};

#[cfg(test)]
mod tests;
