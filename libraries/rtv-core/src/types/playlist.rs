//! Playlist definition and break configuration

use super::ids::{PlaylistId, ShowId};
use crate::error::{Result, RtvError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of episodes per generation run
pub const DEFAULT_EPISODES_PER_GENERATION: usize = 30;

/// Default repeat window length for interstitial clips
pub const DEFAULT_MIN_GAP: usize = 50;

/// Target duration range for block-style breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDuration {
    #[serde(with = "super::seconds")]
    pub min: Duration,

    #[serde(with = "super::seconds")]
    pub max: Duration,
}

impl BlockDuration {
    pub fn from_secs(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_secs(min),
            max: Duration::from_secs(max),
        }
    }

    /// Whether a running block total already satisfies the range
    pub fn contains(&self, total: Duration) -> bool {
        total >= self.min && total <= self.max
    }
}

impl Default for BlockDuration {
    fn default() -> Self {
        Self::from_secs(30, 120)
    }
}

/// How interstitials are inserted between episodes
///
/// Each style carries only the fields it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum BreakConfig {
    /// One clip per break
    Single { frequency: u32, min_gap: usize },

    /// Several clips filling a duration range per break
    Block {
        frequency: u32,
        min_gap: usize,
        duration: BlockDuration,
    },

    /// No breaks at all
    Disabled,
}

impl BreakConfig {
    /// Episodes between breaks, or `None` when breaks are disabled
    pub fn frequency(&self) -> Option<u32> {
        match self {
            Self::Single { frequency, .. } | Self::Block { frequency, .. } => Some(*frequency),
            Self::Disabled => None,
        }
    }

    /// Repeat window length; zero when breaks are disabled
    pub fn min_gap(&self) -> usize {
        match self {
            Self::Single { min_gap, .. } | Self::Block { min_gap, .. } => *min_gap,
            Self::Disabled => 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    pub fn style_name(&self) -> &'static str {
        match self {
            Self::Single { .. } => "single",
            Self::Block { .. } => "block",
            Self::Disabled => "disabled",
        }
    }

    /// Reject configurations that cannot drive a generation run
    pub fn validate(&self) -> Result<()> {
        if let Some(0) = self.frequency() {
            return Err(RtvError::invalid_configuration(
                "break frequency must be at least 1",
            ));
        }

        if let Self::Block { duration, .. } = self {
            if duration.min > duration.max {
                return Err(RtvError::invalid_configuration(format!(
                    "block_duration.min ({}s) must be <= max ({}s)",
                    duration.min.as_secs_f64(),
                    duration.max.as_secs_f64()
                )));
            }
        }

        Ok(())
    }
}

impl Default for BreakConfig {
    fn default() -> Self {
        Self::Single {
            frequency: 1,
            min_gap: DEFAULT_MIN_GAP,
        }
    }
}

/// Order in which a playlist's shows take their turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Order the shows were added in
    ConfigOrder,

    /// Oldest premiere first; unknown years last
    #[default]
    PremiereYear,

    /// Newest premiere first; unknown years last
    PremiereYearDesc,

    /// Case-insensitive by name
    Alphabetical,
}

impl SortBy {
    /// Convert to the string used in state files
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::ConfigOrder => "config_order",
            SortBy::PremiereYear => "premiere_year",
            SortBy::PremiereYearDesc => "premiere_year_desc",
            SortBy::Alphabetical => "alphabetical",
        }
    }

    /// Parse from the string used in state files
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "config_order" => Some(SortBy::ConfigOrder),
            "premiere_year" => Some(SortBy::PremiereYear),
            "premiere_year_desc" => Some(SortBy::PremiereYearDesc),
            "alphabetical" => Some(SortBy::Alphabetical),
            _ => None,
        }
    }
}

/// A named playlist: which shows rotate, and how breaks are inserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,

    /// Member shows in the order they were added
    pub members: Vec<ShowId>,

    pub breaks: BreakConfig,

    pub episodes_per_generation: usize,

    pub sort_by: SortBy,
}

impl Playlist {
    /// Create an empty playlist with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PlaylistId::new(name),
            members: Vec::new(),
            breaks: BreakConfig::default(),
            episodes_per_generation: DEFAULT_EPISODES_PER_GENERATION,
            sort_by: SortBy::default(),
        }
    }

    pub fn with_breaks(mut self, breaks: BreakConfig) -> Self {
        self.breaks = breaks;
        self
    }

    pub fn with_episodes_per_generation(mut self, episodes: usize) -> Self {
        self.episodes_per_generation = episodes;
        self
    }

    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    pub fn has_member(&self, show: &ShowId) -> bool {
        self.members.contains(show)
    }

    pub fn validate(&self) -> Result<()> {
        if self.episodes_per_generation == 0 {
            return Err(RtvError::invalid_configuration(format!(
                "playlist '{}' must generate at least 1 episode",
                self.id
            )));
        }
        self.breaks.validate()
    }
}
