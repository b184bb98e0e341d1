use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

use shared::models::Quote;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Quote not found")]
    NotFound,
    #[error("Quote store I/O failure: {0}")]
    Io(#[from] io::Error),
    #[error("Quote store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable quote collection backed by a JSON file. All access goes through
/// one async mutex, so every read-modify-write (including the persist) is
/// serialized across concurrent requests.
pub struct QuoteStore {
    path: PathBuf,
    quotes: Mutex<Vec<Quote>>,
}

impl QuoteStore {
    /// Opens the store at `path`, writing `seed_json` there first when the
    /// file does not yet exist.
    pub async fn open(path: impl Into<PathBuf>, seed_json: &str) -> Result<Self, StoreError> {
        let path = path.into();

        if !fs::try_exists(&path).await? {
            if let Some(dir) = path.parent() {
                if !dir.as_os_str().is_empty() {
                    fs::create_dir_all(dir).await?;
                }
            }
            fs::write(&path, seed_json).await?;
            info!("Seeded quote store at {}", path.display());
        }

        let data = fs::read_to_string(&path).await?;
        let quotes: Vec<Quote> = serde_json::from_str(&data)?;

        Ok(Self { path, quotes: Mutex::new(quotes) })
    }

    /// Snapshot of all quotes in insertion order.
    pub async fn list_all(&self) -> Vec<Quote> {
        self.quotes.lock().await.clone()
    }

    pub async fn find_by_id(&self, id: u64) -> Result<Quote, StoreError> {
        self.quotes
            .lock()
            .await
            .iter()
            .find(|quote| quote.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    /// Increments the vote count for `id` and persists the collection. The
    /// lock is held across the write, so concurrent increments cannot lose
    /// updates; if the write fails the in-memory increment is rolled back
    /// before the guard is released.
    pub async fn increment_votes(&self, id: u64) -> Result<u64, StoreError> {
        let mut quotes = self.quotes.lock().await;
        let idx = quotes
            .iter()
            .position(|quote| quote.id == id)
            .ok_or(StoreError::NotFound)?;

        quotes[idx].votes += 1;

        match Self::persist(&self.path, &quotes).await {
            Ok(()) => Ok(quotes[idx].votes),
            Err(err) => {
                quotes[idx].votes -= 1;
                Err(err)
            }
        }
    }

    async fn persist(path: &Path, quotes: &[Quote]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(quotes)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }
}
