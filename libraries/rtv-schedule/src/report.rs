//! Generation statistics and playlist export

use rtv_core::types::{HistoryEntry, PlaylistItem, ShowId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

/// A condition a run absorbed instead of failing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// No show could take a turn when the run started
    NoActiveShows,

    /// A break was due but the clip pool is empty
    NoClipsAvailable,

    /// Cursor names an episode the catalog no longer reports
    InvalidCursor {
        show: ShowId,
        season: u32,
        episode: u32,
    },

    /// The show aired its last available episode during this run
    ShowExhausted { show: ShowId },

    /// Member missing from the show pool or the episode snapshot
    ShowNotFound { show: ShowId },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveShows => write!(f, "no active shows in rotation"),
            Self::NoClipsAvailable => write!(f, "no clips available, breaks skipped"),
            Self::InvalidCursor {
                show,
                season,
                episode,
            } => write!(
                f,
                "'{show}' is at S{season:02}E{episode:02}, which the catalog does not list"
            ),
            Self::ShowExhausted { show } => write!(f, "'{show}' has no more episodes"),
            Self::ShowNotFound { show } => write!(f, "'{show}' could not be found"),
        }
    }
}

/// Per-show result of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowTally {
    pub show: ShowId,
    pub show_name: String,
    pub episodes_added: usize,

    /// Cursor after the run, e.g. `S02E05`
    pub position: String,

    /// Ran out of episodes during this run
    pub exhausted: bool,
}

/// Statistics of one generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub playlist: String,

    pub episodes: usize,

    /// Shows in rotation order
    pub shows: Vec<ShowTally>,

    /// Episodes of unknown length count as zero
    #[serde(with = "rtv_core::types::seconds")]
    pub total_runtime: Duration,

    pub break_count: usize,

    #[serde(with = "rtv_core::types::seconds")]
    pub break_runtime: Duration,

    /// Shows that ran out of episodes during the run
    pub dropped_shows: Vec<String>,

    pub notices: Vec<Notice>,
}

impl GenerationReport {
    /// Names of shows that aired at least one episode
    pub fn shows_used(&self) -> Vec<String> {
        self.shows
            .iter()
            .filter(|tally| tally.episodes_added > 0)
            .map(|tally| tally.show_name.clone())
            .collect()
    }

    /// History record for a committed run
    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry::new(
            self.playlist.clone(),
            self.episodes,
            self.shows_used(),
            self.total_runtime.as_secs_f64(),
        )
    }
}

/// Kind of an exported row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Episode,
    Commercial,
}

impl RowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Episode => "episode",
            Self::Commercial => "commercial",
        }
    }
}

/// One line of an exported playlist; each clip of a break gets its own row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "#")]
    pub number: usize,

    #[serde(rename = "Type")]
    pub kind: RowKind,

    #[serde(rename = "Title")]
    pub title: String,

    /// `m:ss`
    #[serde(rename = "Duration")]
    pub duration: String,

    #[serde(rename = "Show/Category")]
    pub source: String,
}

const CSV_HEADER: [&str; 5] = ["#", "Type", "Title", "Duration", "Show/Category"];

/// Flatten items into numbered export rows
pub fn export_rows(items: &[PlaylistItem]) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    for item in items {
        match item {
            PlaylistItem::Episode(episode) => rows.push(ExportRow {
                number: rows.len() + 1,
                kind: RowKind::Episode,
                title: episode.display_title(),
                duration: format_duration(episode.episode.duration.unwrap_or_default()),
                source: episode.show_name.clone(),
            }),
            PlaylistItem::Break { clips } => {
                for clip in clips {
                    rows.push(ExportRow {
                        number: rows.len() + 1,
                        kind: RowKind::Commercial,
                        title: clip.display_title().to_string(),
                        duration: format_duration(clip.duration),
                        source: clip.category.clone(),
                    });
                }
            }
        }
    }
    rows
}

/// Whole minutes and seconds, e.g. `22:05`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Write rows as CSV with a header line
pub fn write_csv<W: Write>(rows: &[ExportRow], mut out: W) -> io::Result<()> {
    writeln!(out, "{}", CSV_HEADER.join(","))?;
    for row in rows {
        writeln!(
            out,
            "{},{},{},{},{}",
            row.number,
            row.kind.as_str(),
            csv_field(&row.title),
            csv_field(&row.duration),
            csv_field(&row.source)
        )?;
    }
    Ok(())
}

/// Write rows as a pretty-printed JSON array
pub fn write_json<W: Write>(rows: &[ExportRow], out: W) -> io::Result<()> {
    serde_json::to_writer_pretty(out, rows).map_err(io::Error::from)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
