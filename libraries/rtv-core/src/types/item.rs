//! Generated playlist items

use super::clip::Clip;
use super::ids::ShowId;
use super::show::Episode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One scheduled episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeItem {
    pub show: ShowId,

    /// Show display name at generation time
    pub show_name: String,

    pub episode: Episode,
}

impl EpisodeItem {
    /// Guide-style title, e.g. `Friends S01E02: The One with the Sonogram`
    pub fn display_title(&self) -> String {
        match &self.episode.title {
            Some(title) => format!("{} {}: {}", self.show_name, self.episode.number, title),
            None => format!("{} {}", self.show_name, self.episode.number),
        }
    }
}

/// An element of a generated playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlaylistItem {
    Episode(EpisodeItem),

    /// One or more interstitial clips between two episodes
    Break { clips: Vec<Clip> },
}

impl PlaylistItem {
    pub fn is_episode(&self) -> bool {
        matches!(self, Self::Episode(_))
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Self::Break { .. })
    }

    pub fn as_episode(&self) -> Option<&EpisodeItem> {
        match self {
            Self::Episode(item) => Some(item),
            Self::Break { .. } => None,
        }
    }

    pub fn clips(&self) -> &[Clip] {
        match self {
            Self::Episode(_) => &[],
            Self::Break { clips } => clips,
        }
    }

    /// Known running time; episodes of unknown length count as zero
    pub fn duration(&self) -> Duration {
        match self {
            Self::Episode(item) => item.episode.duration.unwrap_or_default(),
            Self::Break { clips } => clips.iter().map(|clip| clip.duration).sum(),
        }
    }
}
