//! Per-playlist show cursors
//!
//! A cursor belongs to exactly one (playlist, show) pair. The station keeps
//! them in a table keyed by that pair so two playlists rotating the same show
//! never share position state.

use super::ids::{PlaylistId, ShowId};
use super::show::EpisodeNumber;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Position of one show within one playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowCursor {
    pub season: u32,
    pub episode: u32,

    /// Set when the cursor moved past the last episode listed at the time.
    /// Informational only; availability is decided from the position.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exhausted: bool,
}

impl ShowCursor {
    /// Cursor at season 1, episode 1
    pub fn new() -> Self {
        Self::at(EpisodeNumber::PILOT)
    }

    pub fn at(position: EpisodeNumber) -> Self {
        Self {
            season: position.season,
            episode: position.episode,
            exhausted: false,
        }
    }

    pub fn position(&self) -> EpisodeNumber {
        EpisodeNumber::new(self.season, self.episode)
    }

    /// Move back to S01E01 and clear exhaustion
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ShowCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Key of the cursor table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CursorKey {
    pub playlist: PlaylistId,
    pub show: ShowId,
}

impl CursorKey {
    pub fn new(playlist: PlaylistId, show: ShowId) -> Self {
        Self { playlist, show }
    }
}

/// All cursors of a station, keyed by (playlist, show)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorTable {
    cursors: HashMap<CursorKey, ShowCursor>,
}

impl CursorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, playlist: &PlaylistId, show: &ShowId) -> Option<&ShowCursor> {
        self.cursors
            .get(&CursorKey::new(playlist.clone(), show.clone()))
    }

    pub fn set(&mut self, playlist: PlaylistId, show: ShowId, cursor: ShowCursor) {
        self.cursors.insert(CursorKey::new(playlist, show), cursor);
    }

    pub fn remove(&mut self, playlist: &PlaylistId, show: &ShowId) -> Option<ShowCursor> {
        self.cursors
            .remove(&CursorKey::new(playlist.clone(), show.clone()))
    }

    /// Drop every cursor belonging to a playlist
    pub fn remove_playlist(&mut self, playlist: &PlaylistId) {
        self.cursors.retain(|key, _| &key.playlist != playlist);
    }

    /// Drop a show's cursors in every playlist
    pub fn remove_show(&mut self, show: &ShowId) {
        self.cursors.retain(|key, _| &key.show != show);
    }

    /// Copy out one playlist's cursors for the given members
    ///
    /// Members without a stored cursor start at S01E01.
    pub fn for_playlist<'a>(
        &self,
        playlist: &PlaylistId,
        members: impl IntoIterator<Item = &'a ShowId>,
    ) -> BTreeMap<ShowId, ShowCursor> {
        members
            .into_iter()
            .map(|show| {
                let cursor = self.get(playlist, show).copied().unwrap_or_default();
                (show.clone(), cursor)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}
