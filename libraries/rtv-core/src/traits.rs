/// Collaborator traits for Real TV
///
/// The generation engine performs no I/O. Everything that talks to a media
/// catalog, a clip library, or a remote playlist service is reached through
/// these traits, and only before or after a run.
use crate::error::Result;
use crate::types::{Clip, Episode, PlaylistItem, RemotePlaylistId, Show};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Best match for a user-entered show name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowMatch {
    /// Catalog name that matched
    pub name: String,

    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

/// Resolves human-entered show names to catalog entries
///
/// Used during show-pool maintenance, never during generation.
pub trait ShowResolver {
    /// Return the best candidate, or `None` when nothing is close enough
    fn resolve_show(&self, query: &str, candidates: &[String]) -> Option<ShowMatch>;
}

/// Enumerates the episodes a catalog currently has for a show
pub trait EpisodeCatalog {
    /// Available episodes in airing order
    ///
    /// # Errors
    /// Returns an error if the catalog cannot be reached or the show is unknown
    fn list_available_episodes(&self, show: &Show) -> Result<Vec<Episode>>;
}

/// Enumerates interstitial clips by category
pub trait ClipLibrary {
    /// Snapshot of every clip, grouped by category name
    ///
    /// # Errors
    /// Returns an error if the library cannot be read
    fn list_clips(&self) -> Result<BTreeMap<String, Vec<Clip>>>;
}

/// Hands a finished sequence to the media system
pub trait PlaylistPublisher {
    /// Create or replace the named playlist
    ///
    /// # Errors
    /// Returns an error if the playlist could not be written
    fn publish(&self, name: &str, items: &[PlaylistItem]) -> Result<RemotePlaylistId>;
}
