/// Generation history entries
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of history entries a station keeps
pub const HISTORY_LIMIT: usize = 5;

/// A record of one committed generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,

    pub playlist_name: String,

    pub episode_count: usize,

    /// Shows that contributed at least one episode
    pub shows: Vec<String>,

    #[serde(default)]
    pub runtime_secs: f64,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time
    pub fn new(
        playlist_name: impl Into<String>,
        episode_count: usize,
        shows: Vec<String>,
        runtime_secs: f64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            playlist_name: playlist_name.into(),
            episode_count,
            shows,
            runtime_secs,
        }
    }
}
