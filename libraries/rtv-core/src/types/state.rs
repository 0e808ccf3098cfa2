//! Playlist snapshot handed to and returned from generation

use super::cursor::ShowCursor;
use super::ids::{ClipId, ShowId};
use super::playlist::Playlist;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything a generation run reads about one playlist
///
/// This is an owned copy: the engine never sees the station, and nothing is
/// written back until the caller commits a returned state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistState {
    pub playlist: Playlist,

    /// Cursor per member show
    pub cursors: BTreeMap<ShowId, ShowCursor>,

    /// Repeat window, most recent last
    #[serde(default)]
    pub recent_clips: Vec<ClipId>,
}

impl PlaylistState {
    /// Fresh state: every member at S01E01, empty repeat window
    pub fn new(playlist: Playlist) -> Self {
        let cursors = playlist
            .members
            .iter()
            .map(|show| (show.clone(), ShowCursor::new()))
            .collect();

        Self {
            playlist,
            cursors,
            recent_clips: Vec::new(),
        }
    }

    /// Cursor for a member; members without one are at S01E01
    pub fn cursor(&self, show: &ShowId) -> ShowCursor {
        self.cursors.get(show).copied().unwrap_or_default()
    }
}
