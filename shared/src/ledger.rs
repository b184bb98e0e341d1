use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Session already voted for quote {0}")] AlreadyVoted(u64),
    #[error("No votes remaining")] LimitReached,
}

#[derive(Debug, Clone)]
struct LedgerEntry {
    voted: BTreeSet<u64>,
    remaining: u32,
    last_seen: OffsetDateTime,
}

impl LedgerEntry {
    fn new(cap: u32, now: OffsetDateTime) -> Self {
        Self { voted: BTreeSet::new(), remaining: cap, last_seen: now }
    }
}

/// Per-session vote accounting. Each session gets `cap` votes, at most one
/// per quote. Entries expire `ttl` after their last activity and are pruned
/// lazily on access.
///
/// Invariant: `remaining + voted.len() == cap` for every live entry. The
/// ledger itself is not synchronized; callers wrap it in a mutex so each
/// read-modify-write is atomic per process.
#[derive(Debug)]
pub struct SessionLedger {
    entries: HashMap<String, LedgerEntry>,
    cap: u32,
    ttl: Duration,
}

impl SessionLedger {
    pub fn new(cap: u32, ttl: Duration) -> Self {
        Self { entries: HashMap::new(), cap, ttl }
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    /// Drops entries whose last activity is older than the ledger TTL.
    pub fn prune_expired(&mut self, now: OffsetDateTime) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| now - entry.last_seen <= ttl);
    }

    fn entry_mut(&mut self, session_id: &str, now: OffsetDateTime) -> &mut LedgerEntry {
        let cap = self.cap;
        let entry = self
            .entries
            .entry(session_id.to_string())
            .or_insert_with(|| LedgerEntry::new(cap, now));
        entry.last_seen = now;
        entry
    }

    /// Remaining votes and voted quote ids for a session, initializing a
    /// fresh entry at the full cap on first contact.
    pub fn state(&mut self, session_id: &str) -> (u32, Vec<u64>) {
        let now = OffsetDateTime::now_utc();
        self.prune_expired(now);
        let entry = self.entry_mut(session_id, now);
        (entry.remaining, entry.voted.iter().copied().collect())
    }

    /// Spends one vote on `quote_id`, returning the new remaining count.
    pub fn record_vote(&mut self, session_id: &str, quote_id: u64) -> Result<u32, LedgerError> {
        let now = OffsetDateTime::now_utc();
        let cap = self.cap as usize;
        self.prune_expired(now);
        let entry = self.entry_mut(session_id, now);

        if entry.voted.contains(&quote_id) {
            return Err(LedgerError::AlreadyVoted(quote_id));
        }
        if entry.remaining == 0 {
            return Err(LedgerError::LimitReached);
        }

        entry.voted.insert(quote_id);
        entry.remaining -= 1;
        debug_assert_eq!(entry.remaining as usize + entry.voted.len(), cap);
        Ok(entry.remaining)
    }

    /// Compensation for a vote whose downstream write failed: removes the
    /// quote from the session's set and re-credits the vote. Returns `None`
    /// when there is nothing to credit, which callers treat as an
    /// accounting inconsistency.
    pub fn credit_vote(&mut self, session_id: &str, quote_id: u64) -> Option<u32> {
        let entry = self.entries.get_mut(session_id)?;
        if !entry.voted.remove(&quote_id) {
            return None;
        }
        entry.remaining = (entry.remaining + 1).min(self.cap);
        Some(entry.remaining)
    }
}
