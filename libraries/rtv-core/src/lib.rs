//! Real TV Core
//!
//! Domain types, collaborator traits, and persisted state for Real TV, a
//! generator of broadcast-style playlists from serialized shows and short
//! interstitial clips.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Show`, `Episode`, `Clip`, `Playlist`, `ShowCursor`
//! - **Station State**: the show pool, playlists, and per-playlist cursors
//! - **Collaborator Traits**: `EpisodeCatalog`, `ClipLibrary`, `ShowResolver`,
//!   `PlaylistPublisher`
//! - **Persistence**: the JSON state file and its schema migration
//!
//! # Example
//!
//! ```rust
//! use rtv_core::types::{Playlist, Show, Station};
//!
//! let mut station = Station::new();
//! station.add_show(Show::new("Seinfeld").with_year(1989)).unwrap();
//! station.create_playlist(Playlist::new("Real TV")).unwrap();
//! station.add_to_playlist("Real TV", "seinfeld").unwrap();
//!
//! let state = station.snapshot(None).unwrap();
//! assert_eq!(state.playlist.members.len(), 1);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod persist;
pub mod resolver;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, RtvError};
pub use resolver::FuzzyResolver;
pub use traits::{ClipLibrary, EpisodeCatalog, PlaylistPublisher, ShowMatch, ShowResolver};

pub use types::{
    BlockDuration, BreakConfig, Category, Clip, ClipId, Episode, EpisodeItem, EpisodeNumber,
    HistoryEntry, Playlist, PlaylistId, PlaylistItem, PlaylistState, RemotePlaylistId, Show,
    ShowCursor, ShowId, SortBy, Station,
};
