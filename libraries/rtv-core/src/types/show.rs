//! Show and episode types
//!
//! Shows live in the station-wide pool and are referenced by id from
//! playlists. Episodes are what a catalog reports as available for a show.

use super::ids::ShowId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Library a show is looked up in when none is given
pub const DEFAULT_LIBRARY: &str = "TV Shows";

/// A serialized show in the global pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,

    /// Display name, as resolved against the catalog
    pub name: String,

    /// Source library the catalog enumerates the show from
    #[serde(default = "default_library")]
    pub library: String,

    /// Premiere year, used by year-based playlist ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Disabled shows never take a rotation turn in any playlist
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Show {
    /// Create an enabled show in the default library
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: ShowId::new(name.clone()),
            name,
            library: default_library(),
            year: None,
            enabled: true,
        }
    }

    /// Set the source library
    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = library.into();
        self
    }

    /// Set the premiere year
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

fn default_library() -> String {
    DEFAULT_LIBRARY.to_string()
}

fn default_enabled() -> bool {
    true
}

/// A (season, episode) position
///
/// Ordering is airing order: season first, then episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EpisodeNumber {
    pub season: u32,
    pub episode: u32,
}

impl EpisodeNumber {
    /// Season 1, episode 1
    pub const PILOT: Self = Self {
        season: 1,
        episode: 1,
    };

    pub fn new(season: u32, episode: u32) -> Self {
        Self { season, episode }
    }
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}E{:02}", self.season, self.episode)
    }
}

/// An episode the catalog reports as available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(flatten)]
    pub number: EpisodeNumber,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Running time, when the catalog knows it
    #[serde(default, with = "super::seconds::option", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
}

impl Episode {
    /// Create an untitled episode of unknown length
    pub fn new(season: u32, episode: u32) -> Self {
        Self {
            number: EpisodeNumber::new(season, episode),
            title: None,
            duration: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn season(&self) -> u32 {
        self.number.season
    }

    pub fn episode(&self) -> u32 {
        self.number.episode
    }
}
