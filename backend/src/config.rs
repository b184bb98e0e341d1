use std::path::PathBuf;

use rocket::figment::Figment;
use serde::Deserialize;
use tracing::debug;

/// Application settings, read from the `[default.quotes]` table of Rocket's
/// figment (`Rocket.toml` or `ROCKET_QUOTES` in the environment). Port,
/// address, and the session `secret_key` are Rocket's own configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the durable quote store, seeded from the bundled template on
    /// first run.
    pub file: PathBuf,
    /// Distinct quotes a single session may vote for.
    pub max_votes: u32,
    /// Vote attempts allowed per session within one rate-limit window.
    pub rate_limit_attempts: u32,
    pub rate_limit_window_minutes: i64,
    /// Idle time after which a session's ledger entry expires.
    pub session_ttl_hours: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("quotes.json"),
            max_votes: 25,
            rate_limit_attempts: 30,
            rate_limit_window_minutes: 1,
            session_ttl_hours: 24,
        }
    }
}

impl AppConfig {
    pub fn from_figment(figment: &Figment) -> Self {
        figment.extract_inner("quotes").unwrap_or_else(|e| {
            debug!("No [quotes] configuration found ({e}); using defaults");
            AppConfig::default()
        })
    }
}
