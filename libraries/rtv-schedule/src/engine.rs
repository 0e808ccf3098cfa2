//! Playlist generation
//!
//! A run takes a playlist snapshot and produces an ordered item sequence
//! plus the state to persist. Nothing outside the returned values changes;
//! committing the new state is the caller's job.

use crate::cursor::{CursorCheck, EpisodeIndex};
use crate::error::Result;
use crate::pool::ClipPool;
use crate::report::{GenerationReport, Notice, ShowTally};
use crate::rotation::{sort_members, RoundRobin, RotationSlot};
use crate::selector::CommercialSelector;
use crate::window::RepeatWindow;
use rand::Rng;
use rtv_core::types::{
    EpisodeItem, Playlist, PlaylistItem, PlaylistState, Show, ShowCursor, ShowId,
};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use tracing::{debug, info, warn};

/// What a run should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Upper bound on episodes; breaks do not count
    pub target_episodes: usize,

    /// Reset every cursor to S01E01 before the run
    pub from_start: bool,
}

impl GenerationRequest {
    pub fn new(target_episodes: usize) -> Self {
        Self {
            target_episodes,
            from_start: false,
        }
    }

    /// Use the playlist's configured episode count
    pub fn for_playlist(playlist: &Playlist) -> Self {
        Self::new(playlist.episodes_per_generation)
    }

    pub fn from_start(mut self, from_start: bool) -> Self {
        self.from_start = from_start;
        self
    }
}

/// Result of a run: items plus the state to commit
#[derive(Debug, Clone)]
pub struct Generation {
    pub items: Vec<PlaylistItem>,
    pub state: PlaylistState,
    pub report: GenerationReport,
}

/// Result of a dry run; there is nothing to commit
#[derive(Debug, Clone)]
pub struct Preview {
    pub items: Vec<PlaylistItem>,
    pub report: GenerationReport,
}

/// Runs generation over immutable snapshots of the pool and catalog
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    shows: &'a [Show],
    episodes: &'a EpisodeIndex,
    clips: &'a ClipPool,
}

impl<'a> Generator<'a> {
    pub fn new(shows: &'a [Show], episodes: &'a EpisodeIndex, clips: &'a ClipPool) -> Self {
        Self {
            shows,
            episodes,
            clips,
        }
    }

    /// Generate a playlist and the state that follows it
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if the playlist's break settings are
    /// malformed. Every other problem is absorbed into the report.
    pub fn generate<R>(
        &self,
        state: &PlaylistState,
        request: GenerationRequest,
        rng: &mut R,
    ) -> Result<Generation>
    where
        R: Rng + ?Sized,
    {
        state.playlist.validate()?;
        let playlist = &state.playlist;
        let breaks = playlist.breaks;

        let mut cursors: BTreeMap<ShowId, ShowCursor> = playlist
            .members
            .iter()
            .map(|show| {
                let cursor = if request.from_start {
                    ShowCursor::new()
                } else {
                    state.cursor(show)
                };
                (show.clone(), cursor)
            })
            .collect();

        let mut report = GenerationReport {
            playlist: playlist.name().to_string(),
            ..GenerationReport::default()
        };

        // Resolve members to pool shows that have a listing
        let mut members: Vec<&Show> = Vec::with_capacity(playlist.members.len());
        for id in &playlist.members {
            let show = self.shows.iter().find(|show| &show.id == id);
            match show {
                Some(show) if self.episodes.get(id).is_some() => members.push(show),
                _ => {
                    warn!("'{}' is in playlist '{}' but could not be found", id, playlist.id);
                    report.notices.push(Notice::ShowNotFound { show: id.clone() });
                }
            }
        }
        sort_members(&mut members, playlist.sort_by);

        let mut slots = Vec::with_capacity(members.len());
        let mut tallied = Vec::with_capacity(members.len());
        for show in members {
            if !show.enabled {
                debug!("'{}' is disabled, skipping", show.name);
                continue;
            }
            let Some(listing) = self.episodes.get(&show.id) else {
                continue;
            };
            tallied.push(show);

            let cursor = cursors.get(&show.id).copied().unwrap_or_default();
            match listing.check(&cursor) {
                CursorCheck::Ready(next) => slots.push(RotationSlot {
                    show: show.id.clone(),
                    show_name: show.name.clone(),
                    listing,
                    next,
                }),
                CursorCheck::Exhausted => debug!("'{}' is exhausted", show.name),
                CursorCheck::Invalid => {
                    warn!(
                        "'{}' cursor {} is not in the catalog; skipping for this run",
                        show.name,
                        cursor.position()
                    );
                    report.notices.push(Notice::InvalidCursor {
                        show: show.id.clone(),
                        season: cursor.season,
                        episode: cursor.episode,
                    });
                }
            }
        }

        let mut rotation = RoundRobin::new(slots);
        if rotation.is_empty() {
            warn!("Playlist '{}' has no active shows", playlist.id);
            report.notices.push(Notice::NoActiveShows);
        }

        let window = RepeatWindow::from_recent(state.recent_clips.iter().cloned(), breaks.min_gap());
        let mut selector = CommercialSelector::new(self.clips, window);

        let mut items = Vec::new();
        let mut added: BTreeMap<ShowId, usize> = BTreeMap::new();
        let mut exhausted_now: HashSet<ShowId> = HashSet::new();
        let mut turns_since_break: u32 = 0;

        while report.episodes < request.target_episodes {
            let Some(turn) = rotation.next() else {
                break;
            };

            debug!("{} {}", turn.show_name, turn.episode.number);
            cursors.insert(turn.show.clone(), turn.cursor);
            *added.entry(turn.show.clone()).or_default() += 1;
            report.total_runtime += turn.episode.duration.unwrap_or_default();
            report.episodes += 1;
            turns_since_break += 1;

            if turn.exhausted {
                info!("'{}' has no more episodes", turn.show_name);
                report.dropped_shows.push(turn.show_name.clone());
                report.notices.push(Notice::ShowExhausted {
                    show: turn.show.clone(),
                });
                exhausted_now.insert(turn.show.clone());
            }

            items.push(PlaylistItem::Episode(EpisodeItem {
                show: turn.show,
                show_name: turn.show_name,
                episode: turn.episode,
            }));

            let Some(frequency) = breaks.frequency() else {
                continue;
            };
            let another_episode_follows =
                report.episodes < request.target_episodes && !rotation.is_empty();
            if turns_since_break < frequency || !another_episode_follows {
                continue;
            }
            turns_since_break = 0;

            if self.clips.is_empty() {
                if !report.notices.contains(&Notice::NoClipsAvailable) {
                    warn!("No clips available; generating without breaks");
                    report.notices.push(Notice::NoClipsAvailable);
                }
                continue;
            }

            let clips = selector.select_break(&breaks, rng);
            if !clips.is_empty() {
                report.break_count += 1;
                let runtime: Duration = clips.iter().map(|clip| clip.duration).sum();
                report.break_runtime += runtime;
                report.total_runtime += runtime;
                items.push(PlaylistItem::Break { clips });
            }
        }

        report.shows = tallied
            .iter()
            .map(|show| ShowTally {
                show: show.id.clone(),
                show_name: show.name.clone(),
                episodes_added: added.get(&show.id).copied().unwrap_or(0),
                position: cursors
                    .get(&show.id)
                    .map(|cursor| cursor.position().to_string())
                    .unwrap_or_default(),
                exhausted: exhausted_now.contains(&show.id),
            })
            .collect();

        // A disabled style leaves the persisted window alone
        let recent_clips = if breaks.is_enabled() {
            selector.into_window().into_vec()
        } else {
            state.recent_clips.clone()
        };

        info!(
            "Generated {} episodes and {} breaks for '{}'",
            report.episodes, report.break_count, playlist.id
        );

        Ok(Generation {
            items,
            state: PlaylistState {
                playlist: playlist.clone(),
                cursors,
                recent_clips,
            },
            report,
        })
    }

    /// Run the same algorithm without producing state to commit
    pub fn preview<R>(
        &self,
        state: &PlaylistState,
        request: GenerationRequest,
        rng: &mut R,
    ) -> Result<Preview>
    where
        R: Rng + ?Sized,
    {
        let Generation { items, report, .. } = self.generate(state, request, rng)?;
        Ok(Preview { items, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rtv_core::types::{BreakConfig, Episode, EpisodeNumber};

    fn fixture(episodes: &[(&str, u32)]) -> (Vec<Show>, EpisodeIndex, Playlist) {
        let mut index = EpisodeIndex::new();
        let mut shows = Vec::new();
        let mut playlist = Playlist::new("Test").with_breaks(BreakConfig::Disabled);
        for &(name, count) in episodes {
            let show = Show::new(name);
            index.insert(
                show.id.clone(),
                (1..=count).map(|episode| Episode::new(1, episode)).collect(),
            );
            playlist.members.push(show.id.clone());
            shows.push(show);
        }
        (shows, index, playlist)
    }

    #[test]
    fn zero_frequency_aborts_before_the_run() {
        let (shows, index, playlist) = fixture(&[("A", 3)]);
        let playlist = playlist.with_breaks(BreakConfig::Single {
            frequency: 0,
            min_gap: 5,
        });
        let pool = ClipPool::empty();

        let err = Generator::new(&shows, &index, &pool)
            .generate(
                &PlaylistState::new(playlist),
                GenerationRequest::new(5),
                &mut StdRng::seed_from_u64(0),
            )
            .unwrap_err();
        assert!(matches!(err, crate::ScheduleError::InvalidConfiguration(_)));
    }

    #[test]
    fn empty_playlist_reports_no_active_shows() {
        let (shows, index, playlist) = fixture(&[]);
        let pool = ClipPool::empty();

        let generation = Generator::new(&shows, &index, &pool)
            .generate(
                &PlaylistState::new(playlist),
                GenerationRequest::new(5),
                &mut StdRng::seed_from_u64(0),
            )
            .unwrap();
        assert!(generation.items.is_empty());
        assert_eq!(generation.report.notices, vec![Notice::NoActiveShows]);
    }

    #[test]
    fn invalid_cursor_skips_show_and_leaves_cursor() {
        let (shows, mut index, playlist) = fixture(&[("A", 3), ("B", 3)]);
        index.insert(
            ShowId::new("B"),
            vec![Episode::new(1, 1), Episode::new(1, 2), Episode::new(1, 4)],
        );
        let mut state = PlaylistState::new(playlist);
        state
            .cursors
            .insert(ShowId::new("B"), ShowCursor::at(EpisodeNumber::new(1, 3)));
        let pool = ClipPool::empty();

        let generation = Generator::new(&shows, &index, &pool)
            .generate(&state, GenerationRequest::new(2), &mut StdRng::seed_from_u64(0))
            .unwrap();

        assert!(generation
            .items
            .iter()
            .all(|item| item.as_episode().unwrap().show == ShowId::new("A")));
        assert!(generation.report.notices.contains(&Notice::InvalidCursor {
            show: ShowId::new("B"),
            season: 1,
            episode: 3
        }));
        assert_eq!(
            generation.state.cursor(&ShowId::new("B")).position(),
            EpisodeNumber::new(1, 3)
        );
    }

    #[test]
    fn members_missing_from_pool_are_reported() {
        let (shows, index, mut playlist) = fixture(&[("A", 2)]);
        playlist.members.push(ShowId::new("Ghost"));
        let pool = ClipPool::empty();

        let generation = Generator::new(&shows, &index, &pool)
            .generate(
                &PlaylistState::new(playlist),
                GenerationRequest::new(2),
                &mut StdRng::seed_from_u64(0),
            )
            .unwrap();

        assert_eq!(generation.report.episodes, 2);
        assert!(generation.report.notices.contains(&Notice::ShowNotFound {
            show: ShowId::new("Ghost")
        }));
    }

    #[test]
    fn preview_matches_generate_for_same_seed() {
        let (shows, index, playlist) = fixture(&[("A", 4), ("B", 4)]);
        let state = PlaylistState::new(playlist);
        let pool = ClipPool::empty();
        let generator = Generator::new(&shows, &index, &pool);

        let preview = generator
            .preview(&state, GenerationRequest::new(6), &mut StdRng::seed_from_u64(7))
            .unwrap();
        let generation = generator
            .generate(&state, GenerationRequest::new(6), &mut StdRng::seed_from_u64(7))
            .unwrap();

        assert_eq!(preview.items, generation.items);
        assert_eq!(preview.report, generation.report);
    }
}
