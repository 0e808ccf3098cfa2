mod clip;
mod cursor;
mod history;
mod ids;
mod item;
mod playlist;
mod show;
mod state;
mod station;

/// Serde helpers for durations stored as seconds
pub mod seconds;

pub use clip::{validate_categories, Category, Clip};
pub use cursor::{CursorKey, CursorTable, ShowCursor};
pub use history::{HistoryEntry, HISTORY_LIMIT};
pub use ids::{ClipId, PlaylistId, RemotePlaylistId, ShowId};
pub use item::{EpisodeItem, PlaylistItem};
pub use playlist::{
    BlockDuration, BreakConfig, Playlist, SortBy, DEFAULT_EPISODES_PER_GENERATION,
    DEFAULT_MIN_GAP,
};
pub use show::{Episode, EpisodeNumber, Show, DEFAULT_LIBRARY};
pub use state::PlaylistState;
pub use station::Station;
