pub mod error;
pub mod models;
pub mod ledger;
pub mod views;

pub use error::ErrorResponse;
pub use models::*;
pub use ledger::{LedgerError, SessionLedger};
pub use views::{ranked, search, quiz_pair, random_quote};
