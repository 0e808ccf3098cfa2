//! Episode listings and cursor movement
//!
//! A cursor names the next episode a show will air in one playlist. It is
//! checked against the catalog's listing at the start of a run and advanced
//! eagerly after every turn.

use rtv_core::types::{Episode, EpisodeNumber, Show, ShowCursor, ShowId};
use rtv_core::EpisodeCatalog;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Available episodes of one show in airing order
///
/// Season 0 (specials) is left out; rotation starts at S01E01.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeListing {
    episodes: Vec<Episode>,
}

impl EpisodeListing {
    /// Sort, drop specials, and drop repeated numbers (first one wins)
    pub fn new(mut episodes: Vec<Episode>) -> Self {
        episodes.retain(|episode| episode.season() > 0);
        episodes.sort_by_key(|episode| episode.number);
        episodes.dedup_by_key(|episode| episode.number);
        Self { episodes }
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn get(&self, index: usize) -> Option<&Episode> {
        self.episodes.get(index)
    }

    pub fn first(&self) -> Option<&Episode> {
        self.episodes.first()
    }

    pub fn last(&self) -> Option<&Episode> {
        self.episodes.last()
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Where a cursor stands relative to this listing
    ///
    /// Only the position counts. A cursor left past the end of an older
    /// listing is ready again once the catalog lists a later episode.
    pub fn check(&self, cursor: &ShowCursor) -> CursorCheck {
        if self.episodes.is_empty() {
            return CursorCheck::Exhausted;
        }

        match self
            .episodes
            .binary_search_by_key(&cursor.position(), |episode| episode.number)
        {
            Ok(index) => CursorCheck::Ready(index),
            // Before the first listed episode, e.g. a show whose catalog starts at S01E02
            Err(0) => CursorCheck::Ready(0),
            Err(index) if index == self.episodes.len() => CursorCheck::Exhausted,
            // Past the end of its season: roll over to the next listed season
            Err(index) if self.episodes[index].season() > cursor.season => {
                CursorCheck::Ready(index)
            }
            Err(_) => CursorCheck::Invalid,
        }
    }

    /// Cursor after airing the episode at `index`
    ///
    /// Moves to the next listed episode: next in the season, else the first
    /// of the next season. After the last episode the cursor is marked
    /// exhausted and left one past it.
    pub fn advance(&self, index: usize) -> ShowCursor {
        if let Some(next) = self.episodes.get(index + 1) {
            return ShowCursor::at(next.number);
        }

        let last = self
            .episodes
            .get(index)
            .or_else(|| self.episodes.last())
            .map_or(EpisodeNumber::PILOT, |episode| episode.number);
        ShowCursor {
            season: last.season,
            episode: last.episode.saturating_add(1),
            exhausted: true,
        }
    }
}

/// Result of checking a cursor against a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorCheck {
    /// Points at the listing entry with this index
    Ready(usize),

    /// Past the last available episode
    Exhausted,

    /// Names an episode inside a listed season that the catalog does not
    /// report
    Invalid,
}

/// Episode listings for every show a run may touch
#[derive(Debug, Clone, Default)]
pub struct EpisodeIndex {
    listings: HashMap<ShowId, EpisodeListing>,
}

impl EpisodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, show: ShowId, episodes: Vec<Episode>) {
        self.listings.insert(show, EpisodeListing::new(episodes));
    }

    pub fn get(&self, show: &ShowId) -> Option<&EpisodeListing> {
        self.listings.get(show)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Snapshot the catalog for the given shows
    ///
    /// A show the catalog fails on is logged and left out; a run reports it
    /// as not found.
    pub fn load(catalog: &dyn EpisodeCatalog, shows: &[&Show]) -> Self {
        let mut index = Self::new();
        for show in shows {
            match catalog.list_available_episodes(show) {
                Ok(episodes) => {
                    debug!("'{}': {} episodes available", show.name, episodes.len());
                    index.insert(show.id.clone(), episodes);
                }
                Err(err) => warn!("Could not list episodes for '{}': {}", show.name, err),
            }
        }
        index
    }
}
