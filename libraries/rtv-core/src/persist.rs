//! Persisted station shape and schema migration
//!
//! State files are JSON. Version 2 stores playlists with their own cursors;
//! version 1 files had a single global rotation and are reshaped on load.

use crate::error::{Result, RtvError};
use crate::types::{
    BreakConfig, Category, ClipId, HistoryEntry, Playlist, PlaylistId, Show, ShowCursor, ShowId,
    SortBy, Station, DEFAULT_EPISODES_PER_GENERATION, DEFAULT_LIBRARY, DEFAULT_MIN_GAP,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Schema version written by this crate
pub const SCHEMA_VERSION: u32 = 2;

/// On-disk station state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationFile {
    pub schema_version: u32,

    #[serde(default)]
    pub shows: Vec<Show>,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub playlists: Vec<PlaylistRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_playlist: Option<PlaylistId>,

    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// One playlist with its members' cursors and repeat window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub name: PlaylistId,

    #[serde(default)]
    pub shows: Vec<MemberRecord>,

    #[serde(default)]
    pub breaks: BreakConfig,

    #[serde(default = "default_episodes_per_generation")]
    pub episodes_per_generation: usize,

    #[serde(default)]
    pub sort_by: SortBy,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recent_clips: Vec<ClipId>,
}

/// A playlist member and its position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub show: ShowId,

    #[serde(flatten)]
    pub cursor: ShowCursor,
}

fn default_episodes_per_generation() -> usize {
    DEFAULT_EPISODES_PER_GENERATION
}

impl StationFile {
    /// Capture a station in its persisted shape
    pub fn from_station(station: &Station) -> Self {
        let playlists = station
            .playlists()
            .iter()
            .map(|playlist| PlaylistRecord {
                name: playlist.id.clone(),
                shows: playlist
                    .members
                    .iter()
                    .map(|show| MemberRecord {
                        show: show.clone(),
                        cursor: station
                            .cursors()
                            .get(&playlist.id, show)
                            .copied()
                            .unwrap_or_default(),
                    })
                    .collect(),
                breaks: playlist.breaks,
                episodes_per_generation: playlist.episodes_per_generation,
                sort_by: playlist.sort_by,
                recent_clips: station
                    .recent_clips
                    .get(&playlist.id)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION,
            shows: station.shows().to_vec(),
            categories: station.categories().to_vec(),
            playlists,
            default_playlist: station.default_playlist().cloned(),
            history: station.history().to_vec(),
        }
    }

    /// Rebuild a station, validating names, members, and configuration
    pub fn into_station(self) -> Result<Station> {
        let mut station = Station::new();

        for show in self.shows {
            station.add_show(show)?;
        }
        station.set_categories(self.categories)?;

        for record in self.playlists {
            let playlist = Playlist {
                id: record.name.clone(),
                members: record.shows.iter().map(|m| m.show.clone()).collect(),
                breaks: record.breaks,
                episodes_per_generation: record.episodes_per_generation,
                sort_by: record.sort_by,
            };
            station.create_playlist(playlist)?;

            for member in record.shows {
                station
                    .cursors
                    .set(record.name.clone(), member.show, member.cursor);
            }
            if !record.recent_clips.is_empty() {
                station.recent_clips.insert(record.name, record.recent_clips);
            }
        }

        if let Some(default) = self.default_playlist {
            station.set_default_playlist(default.as_str())?;
        }
        for entry in self.history {
            station.record_history(entry);
        }

        Ok(station)
    }
}

/// A loaded station and the schema version it was read from
#[derive(Debug, Clone)]
pub struct Loaded {
    pub station: Station,
    pub source_version: u32,
}

impl Loaded {
    /// Whether the file should be rewritten in the current schema
    pub fn was_migrated(&self) -> bool {
        self.source_version != SCHEMA_VERSION
    }
}

/// Parse a state file of any supported schema version
///
/// # Errors
/// Returns `UnsupportedSchema` for versions newer than [`SCHEMA_VERSION`]
pub fn load_from_str(json: &str) -> Result<Loaded> {
    let value: Value = serde_json::from_str(json)?;
    let source_version = detect_version(&value);

    let file = match source_version {
        1 => migrate_v1(value)?,
        SCHEMA_VERSION => serde_json::from_value(value)?,
        other => return Err(RtvError::UnsupportedSchema(other)),
    };

    Ok(Loaded {
        station: file.into_station()?,
        source_version,
    })
}

/// Serialize a station in the current schema
pub fn to_string_pretty(station: &Station) -> Result<String> {
    Ok(serde_json::to_string_pretty(&StationFile::from_station(
        station,
    ))?)
}

/// Schema version of a raw state document
///
/// Files without a version field predate versioning and are version 1.
pub fn detect_version(value: &Value) -> u32 {
    value
        .get("schema_version")
        .or_else(|| value.get("config_version"))
        .and_then(Value::as_u64)
        .and_then(|version| u32::try_from(version).ok())
        .unwrap_or(1)
}

// ===== Version 1 =====

#[derive(Debug, Deserialize)]
struct LegacyStation {
    #[serde(default)]
    shows: Vec<LegacyShow>,

    #[serde(default)]
    commercials: LegacyCommercials,

    #[serde(default)]
    playlist: LegacyPlaylistSettings,

    #[serde(default)]
    history: Vec<LegacyHistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct LegacyShow {
    name: String,

    #[serde(default = "legacy_library")]
    library: String,

    #[serde(default = "legacy_position")]
    current_season: u32,

    #[serde(default = "legacy_position")]
    current_episode: u32,

    #[serde(default)]
    year: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyCommercials {
    #[serde(default)]
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct LegacyPlaylistSettings {
    #[serde(default = "legacy_default_name")]
    default_name: String,

    #[serde(default = "default_episodes_per_generation")]
    episodes_per_generation: usize,

    #[serde(default = "legacy_position")]
    commercial_frequency: u32,

    #[serde(default = "legacy_min_gap")]
    commercial_min_gap: usize,

    #[serde(default)]
    sort_by: SortBy,
}

impl Default for LegacyPlaylistSettings {
    fn default() -> Self {
        Self {
            default_name: legacy_default_name(),
            episodes_per_generation: DEFAULT_EPISODES_PER_GENERATION,
            commercial_frequency: 1,
            commercial_min_gap: DEFAULT_MIN_GAP,
            sort_by: SortBy::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LegacyHistoryEntry {
    timestamp: String,
    playlist_name: String,
    episode_count: usize,
    #[serde(default)]
    shows: Vec<String>,
    #[serde(default)]
    runtime_secs: f64,
}

fn legacy_library() -> String {
    DEFAULT_LIBRARY.to_string()
}

fn legacy_position() -> u32 {
    1
}

fn legacy_min_gap() -> usize {
    DEFAULT_MIN_GAP
}

fn legacy_default_name() -> String {
    "Real TV".to_string()
}

/// Reshape a version 1 document into the current schema
///
/// The global rotation becomes one playlist named after the old default
/// playlist name, with single-clip breaks.
pub fn migrate_v1(value: Value) -> Result<StationFile> {
    let legacy: LegacyStation = serde_json::from_value(value)?;
    let settings = legacy.playlist;

    let mut shows = Vec::with_capacity(legacy.shows.len());
    let mut members = Vec::with_capacity(legacy.shows.len());
    for old in legacy.shows {
        let mut show = Show::new(old.name).with_library(old.library);
        show.year = old.year;

        members.push(MemberRecord {
            show: show.id.clone(),
            cursor: ShowCursor {
                season: old.current_season.max(1),
                episode: old.current_episode.max(1),
                exhausted: false,
            },
        });
        shows.push(show);
    }

    let playlist_name = PlaylistId::new(settings.default_name);
    let playlist = PlaylistRecord {
        name: playlist_name.clone(),
        shows: members,
        breaks: BreakConfig::Single {
            frequency: settings.commercial_frequency,
            min_gap: settings.commercial_min_gap,
        },
        episodes_per_generation: settings.episodes_per_generation,
        sort_by: settings.sort_by,
        recent_clips: Vec::new(),
    };

    let history = legacy
        .history
        .into_iter()
        .filter_map(|entry| {
            let Some(timestamp) = parse_legacy_timestamp(&entry.timestamp) else {
                warn!("Dropping history entry with unreadable timestamp '{}'", entry.timestamp);
                return None;
            };
            Some(HistoryEntry {
                timestamp,
                playlist_name: entry.playlist_name,
                episode_count: entry.episode_count,
                shows: entry.shows,
                runtime_secs: entry.runtime_secs,
            })
        })
        .collect();

    info!(
        "Migrated version 1 state into playlist '{}' with {} shows",
        playlist_name,
        shows.len()
    );

    Ok(StationFile {
        schema_version: SCHEMA_VERSION,
        shows,
        categories: legacy.commercials.categories,
        playlists: vec![playlist],
        default_playlist: Some(playlist_name),
        history,
    })
}

/// Old files stored ISO timestamps with or without an offset
fn parse_legacy_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockDuration, EpisodeNumber};

    const V1_STATE: &str = r#"{
        "shows": [
            {"name": "Seinfeld", "current_season": 4, "current_episode": 11, "year": 1989},
            {"name": "Friends", "library": "Sitcoms"}
        ],
        "commercials": {
            "library_name": "RealTV Commercials",
            "block_duration": {"min": 30, "max": 120},
            "categories": [{"name": "toys", "weight": 2.0}]
        },
        "playlist": {
            "default_name": "Weeknights",
            "episodes_per_generation": 12,
            "commercial_frequency": 2,
            "commercial_min_gap": 20,
            "sort_by": "alphabetical"
        },
        "history": [
            {"timestamp": "2024-03-01T20:15:00", "playlist_name": "Weeknights",
             "episode_count": 12, "shows": ["Seinfeld"], "runtime_secs": 16000.0},
            {"timestamp": "last tuesday", "playlist_name": "Weeknights",
             "episode_count": 3, "shows": []}
        ]
    }"#;

    fn sample_station() -> Station {
        let mut station = Station::new();
        station.add_show(Show::new("Scrubs").with_year(2001)).unwrap();
        station.add_show(Show::new("Psych")).unwrap();
        station
            .create_playlist(Playlist::new("Late Night").with_breaks(BreakConfig::Block {
                frequency: 2,
                min_gap: 10,
                duration: BlockDuration::from_secs(60, 120),
            }))
            .unwrap();
        station.add_to_playlist("Late Night", "Scrubs").unwrap();
        station.add_to_playlist("Late Night", "Psych").unwrap();
        station
    }

    #[test]
    fn current_schema_survives_save_and_load() {
        let mut station = sample_station();
        let mut state = station.snapshot(None).unwrap();
        let mut exhausted = ShowCursor::at(EpisodeNumber::new(8, 19));
        exhausted.exhausted = true;
        state.cursors.insert(ShowId::new("Psych"), exhausted);
        state.recent_clips = vec![ClipId::new("bumper-1")];
        station.commit(state).unwrap();

        let json = to_string_pretty(&station).unwrap();
        let loaded = load_from_str(&json).unwrap();

        assert!(!loaded.was_migrated());
        assert_eq!(loaded.station.shows(), station.shows());
        assert_eq!(loaded.station.playlists(), station.playlists());
        let snapshot = loaded.station.snapshot(Some("late night")).unwrap();
        assert!(snapshot.cursor(&ShowId::new("Psych")).exhausted);
        assert_eq!(snapshot.recent_clips, vec![ClipId::new("bumper-1")]);
    }

    #[test]
    fn version_one_becomes_single_playlist() {
        let loaded = load_from_str(V1_STATE).unwrap();
        assert_eq!(loaded.source_version, 1);
        assert!(loaded.was_migrated());

        let station = loaded.station;
        assert_eq!(station.default_playlist(), Some(&PlaylistId::new("Weeknights")));
        let playlist = station.playlist("Weeknights").unwrap();
        assert_eq!(
            playlist.breaks,
            BreakConfig::Single {
                frequency: 2,
                min_gap: 20
            }
        );
        assert_eq!(playlist.episodes_per_generation, 12);
        assert_eq!(playlist.sort_by, SortBy::Alphabetical);

        let state = station.snapshot(None).unwrap();
        assert_eq!(
            state.cursor(&ShowId::new("Seinfeld")).position(),
            EpisodeNumber::new(4, 11)
        );
        assert_eq!(
            state.cursor(&ShowId::new("Friends")).position(),
            EpisodeNumber::PILOT
        );
        assert_eq!(station.show("Friends").unwrap().library, "Sitcoms");
        assert_eq!(station.categories()[0].weight, 2.0);
    }

    #[test]
    fn version_one_history_keeps_readable_timestamps() {
        let station = load_from_str(V1_STATE).unwrap().station;
        assert_eq!(station.history().len(), 1);
        assert_eq!(
            station.history()[0].timestamp.to_rfc3339(),
            "2024-03-01T20:15:00+00:00"
        );
    }

    #[test]
    fn future_schema_is_rejected() {
        let err = load_from_str(r#"{"schema_version": 7}"#).unwrap_err();
        assert!(matches!(err, RtvError::UnsupportedSchema(7)));
    }

    #[test]
    fn empty_document_is_an_empty_version_one_station() {
        let loaded = load_from_str("{}").unwrap();
        assert_eq!(loaded.source_version, 1);
        assert!(loaded.station.shows().is_empty());
        assert_eq!(loaded.station.playlists().len(), 1);
    }

    #[test]
    fn members_missing_from_pool_are_rejected() {
        let json = r#"{
            "schema_version": 2,
            "playlists": [{"name": "A", "shows": [{"show": "Ghost", "season": 1, "episode": 1}]}]
        }"#;
        assert!(matches!(
            load_from_str(json),
            Err(RtvError::NotFound { .. })
        ));
    }

    #[test]
    fn invalid_break_configuration_is_rejected_on_load() {
        let json = r#"{
            "schema_version": 2,
            "playlists": [{"name": "A", "breaks": {"style": "single", "frequency": 0, "min_gap": 5}}]
        }"#;
        assert!(matches!(
            load_from_str(json),
            Err(RtvError::InvalidConfiguration(_))
        ));
    }
}
