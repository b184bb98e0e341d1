use std::sync::{Mutex, MutexGuard};

use tracing::{debug, error};

use shared::ledger::SessionLedger;
use shared::models::{Quote, SessionVotes, VoteResponse};
use crate::error::ApiError;
use crate::store::{QuoteStore, StoreError};

/// Applies votes against the quote store and the session ledger, keeping the
/// two consistent. The ledger mutex is never held across an await; lock
/// order is always ledger first, store second, with the ledger guard dropped
/// in between.
pub struct VoteCoordinator {
    store: QuoteStore,
    ledger: Mutex<SessionLedger>,
}

impl VoteCoordinator {
    pub fn new(store: QuoteStore, ledger: SessionLedger) -> Self {
        Self { store, ledger: Mutex::new(ledger) }
    }

    fn lock_ledger(&self) -> MutexGuard<'_, SessionLedger> {
        // ledger mutations are complete before a guard ever drops, so the
        // state inside a poisoned lock is still consistent
        match self.ledger.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Snapshot of the quote collection, for the read-side views.
    pub async fn quotes(&self) -> Vec<Quote> {
        self.store.list_all().await
    }

    pub fn session_state(&self, session_id: &str) -> SessionVotes {
        let mut ledger = self.lock_ledger();
        let (votes_left, voted_quotes) = ledger.state(session_id);
        SessionVotes { votes_left, total_votes: ledger.cap(), voted_quotes }
    }

    /// Casts one vote: checks the quote exists, debits the session ledger,
    /// then applies the increment to the store. A store failure after the
    /// ledger debit re-credits the vote so the session budget stays correct.
    pub async fn vote(&self, session_id: &str, quote_id: u64) -> Result<VoteResponse, ApiError> {
        match self.store.find_by_id(quote_id).await {
            Ok(_) => {}
            Err(StoreError::NotFound) => return Err(ApiError::QuoteNotFound),
            Err(other) => {
                error!("Quote lookup for {} failed: {}", quote_id, other);
                return Err(other.into());
            }
        }

        let (votes_left, total_votes) = {
            let mut ledger = self.lock_ledger();
            let remaining = ledger.record_vote(session_id, quote_id)?;
            (remaining, ledger.cap())
        };

        match self.store.increment_votes(quote_id).await {
            Ok(votes) => {
                debug!("Vote applied to quote {}, {} votes left in session", quote_id, votes_left);
                Ok(VoteResponse { success: true, votes, votes_left, total_votes })
            }
            Err(err) => {
                error!("Vote write for quote {} failed: {}", quote_id, err);
                if self.lock_ledger().credit_vote(session_id, quote_id).is_none() {
                    error!(
                        "Compensation found no ledger debit for quote {} after failed write",
                        quote_id
                    );
                }
                Err(err.into())
            }
        }
    }
}
