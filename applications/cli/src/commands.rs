//! Command implementations
//!
//! Each command loads the station, does its work, and saves the station
//! back only when something changed. Printing is left to the binary.

use crate::config::CliConfig;
use crate::error::Result;
use crate::library::LibrarySnapshot;
use crate::publish::{ExportFormat, ExportPublisher};
use crate::store::StateStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rtv_core::traits::{PlaylistPublisher, ShowMatch};
use rtv_core::types::{
    BlockDuration, BreakConfig, Category, Playlist, PlaylistState, RemotePlaylistId, Show, SortBy,
    Station, DEFAULT_MIN_GAP,
};
use rtv_core::{FuzzyResolver, RtvError};
use rtv_schedule::{
    ClipPool, EpisodeIndex, Generation, GenerationReport, GenerationRequest, Generator, Preview,
};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{info, warn};

/// Options shared by `preview` and `generate`
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Playlist name; the default playlist when `None`
    pub playlist: Option<String>,

    /// Episode count; the playlist's own setting when `None`
    pub episodes: Option<usize>,

    pub from_start: bool,

    /// Overrides the configured seed
    pub seed: Option<u64>,
}

/// Break settings for a new playlist
#[derive(Debug, Clone)]
pub struct BreakOptions {
    pub style: String,
    pub frequency: u32,
    pub min_gap: usize,
    pub block_min: u64,
    pub block_max: u64,
}

impl Default for BreakOptions {
    fn default() -> Self {
        let block = BlockDuration::default();
        Self {
            style: "single".to_string(),
            frequency: 1,
            min_gap: DEFAULT_MIN_GAP,
            block_min: block.min.as_secs(),
            block_max: block.max.as_secs(),
        }
    }
}

impl BreakOptions {
    pub fn to_config(&self) -> Result<BreakConfig> {
        let config = match self.style.to_lowercase().as_str() {
            "single" => BreakConfig::Single {
                frequency: self.frequency,
                min_gap: self.min_gap,
            },
            "block" => BreakConfig::Block {
                frequency: self.frequency,
                min_gap: self.min_gap,
                duration: BlockDuration::from_secs(self.block_min, self.block_max),
            },
            "disabled" | "none" => BreakConfig::Disabled,
            other => {
                return Err(RtvError::invalid_input(format!(
                    "unknown break style '{other}' (expected single, block or disabled)"
                ))
                .into())
            }
        };
        config.validate()?;
        Ok(config)
    }
}

/// Outcome of a committed generation
#[derive(Debug, Clone)]
pub struct Published {
    pub report: GenerationReport,
    pub remote: RemotePlaylistId,
    pub items: usize,
}

/// Outcome of `migrate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Migration {
    /// Nothing on disk yet
    NoState,

    /// Already in the current schema
    UpToDate,

    Migrated { from: u32, backup: PathBuf },
}

// ===== Station maintenance =====

/// Load the station for display
pub fn status(config: &CliConfig) -> Result<Station> {
    open(config)
}

/// Resolve a name against the library and add the matched show
pub fn add_show(config: &CliConfig, query: &str, year: Option<i32>) -> Result<ShowMatch> {
    let library = LibrarySnapshot::load(&config.paths.library_file)?;
    let resolver = FuzzyResolver::with_threshold(config.generation.match_threshold);
    let mut station = open_for_update(config)?;

    let found = station.resolve_and_add_show(
        &resolver,
        query,
        &library.show_names(),
        rtv_core::types::DEFAULT_LIBRARY,
    )?;
    if let Some(year) = year {
        station.set_year(&found.name, Some(year))?;
    }

    save(config, &station)?;
    info!("Added show '{}'", found.name);
    Ok(found)
}

pub fn remove_show(config: &CliConfig, name: &str) -> Result<Show> {
    let mut station = open_for_update(config)?;
    let show = station.remove_show(name)?;
    save(config, &station)?;
    info!("Removed show '{}'", show.name);
    Ok(show)
}

pub fn set_enabled(config: &CliConfig, name: &str, enabled: bool) -> Result<()> {
    let mut station = open_for_update(config)?;
    station.set_enabled(name, enabled)?;
    save(config, &station)
}

/// Create a playlist from existing pool shows
pub fn create_playlist(
    config: &CliConfig,
    name: &str,
    members: &[String],
    breaks: &BreakOptions,
    episodes: Option<usize>,
    sort_by: Option<&str>,
) -> Result<()> {
    let mut station = open_for_update(config)?;

    let mut playlist = Playlist::new(name).with_breaks(breaks.to_config()?);
    if let Some(episodes) = episodes {
        playlist = playlist.with_episodes_per_generation(episodes);
    }
    if let Some(sort_by) = sort_by {
        let sort_by = SortBy::from_str(sort_by)
            .ok_or_else(|| RtvError::invalid_input(format!("unknown sort order '{sort_by}'")))?;
        playlist = playlist.with_sort_by(sort_by);
    }

    for member in members {
        let show = station
            .show(member)
            .ok_or_else(|| RtvError::not_found("Show", member.as_str()))?;
        playlist.members.push(show.id.clone());
    }

    station.create_playlist(playlist)?;
    save(config, &station)?;
    info!("Created playlist '{}' with {} shows", name, members.len());
    Ok(())
}

pub fn delete_playlist(config: &CliConfig, name: &str) -> Result<Playlist> {
    let mut station = open_for_update(config)?;
    let playlist = station.delete_playlist(name)?;
    save(config, &station)?;
    info!("Deleted playlist '{}'", playlist.name());
    Ok(playlist)
}

pub fn add_to_playlist(config: &CliConfig, playlist: &str, show: &str) -> Result<()> {
    let mut station = open_for_update(config)?;
    station.add_to_playlist(playlist, show)?;
    save(config, &station)
}

pub fn remove_from_playlist(config: &CliConfig, playlist: &str, show: &str) -> Result<()> {
    let mut station = open_for_update(config)?;
    station.remove_from_playlist(playlist, show)?;
    save(config, &station)
}

/// Make a playlist the one used when no name is given
pub fn set_default(config: &CliConfig, name: &str) -> Result<()> {
    let mut station = open_for_update(config)?;
    station.set_default_playlist(name)?;
    save(config, &station)?;
    info!("Default playlist is now '{}'", name);
    Ok(())
}

/// Add a clip category, or change the weight of an existing one
///
/// Names match case-insensitively, so an existing category keeps its
/// spelling and search terms.
pub fn add_category(config: &CliConfig, name: &str, weight: f64) -> Result<Category> {
    let mut station = open_for_update(config)?;

    let mut categories = station.categories().to_vec();
    let category = match categories
        .iter_mut()
        .find(|category| category.name.eq_ignore_ascii_case(name))
    {
        Some(existing) => {
            existing.weight = weight;
            existing.clone()
        }
        None => {
            let category = Category::new(name, weight);
            categories.push(category.clone());
            category
        }
    };

    station.set_categories(categories)?;
    save(config, &station)?;
    info!("Category '{}' weighted {}", category.name, category.weight);
    Ok(category)
}

// ===== Generation =====

/// Dry run: nothing is published or saved
pub fn preview(config: &CliConfig, options: &RunOptions) -> Result<Preview> {
    let station = open(config)?;
    let library = LibrarySnapshot::load(&config.paths.library_file)?;
    let state = station.snapshot(options.playlist.as_deref())?;

    let Generation { items, report, .. } = run(config, &station, &library, &state, options)?;
    Ok(Preview { items, report })
}

/// Generate, publish, then commit cursors and history
///
/// The state file is only written after publishing succeeded.
pub fn generate(
    config: &CliConfig,
    options: &RunOptions,
    format: ExportFormat,
) -> Result<Published> {
    let mut station = open_for_update(config)?;
    let library = LibrarySnapshot::load(&config.paths.library_file)?;
    let state = station.snapshot(options.playlist.as_deref())?;

    let generation = run(config, &station, &library, &state, options)?;
    if generation.items.is_empty() {
        warn!("Generation for '{}' produced no items", state.playlist.name());
    }

    let publisher = ExportPublisher::new(&config.paths.export_dir, format);
    let remote = publisher.publish(state.playlist.name(), &generation.items)?;

    station.commit(generation.state)?;
    station.record_history(generation.report.history_entry());
    save(config, &station)?;

    Ok(Published {
        items: generation.items.len(),
        report: generation.report,
        remote,
    })
}

/// Rewrite an older state file in the current schema, keeping a backup
pub fn migrate(config: &CliConfig) -> Result<Migration> {
    let store = StateStore::new(&config.paths.state_file);
    if !store.path().exists() {
        return Ok(Migration::NoState);
    }

    let loaded = store.load()?;
    if !loaded.was_migrated() {
        return Ok(Migration::UpToDate);
    }

    let backup = store.backup(loaded.source_version)?;
    store.save(&loaded.station)?;
    Ok(Migration::Migrated {
        from: loaded.source_version,
        backup,
    })
}

// ===== Rendering =====

/// Human-readable station summary
pub fn format_status(station: &Station) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Shows ({}):", station.shows().len());
    for show in station.shows() {
        let year = show.year.map(|y| format!(" ({y})")).unwrap_or_default();
        let state = if show.enabled { "" } else { " [disabled]" };
        let _ = writeln!(out, "  {}{}{}", show.name, year, state);
    }

    let _ = writeln!(out, "\nPlaylists ({}):", station.playlists().len());
    for playlist in station.playlists() {
        let default = if station.default_playlist() == Some(&playlist.id) {
            " [default]"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  {}{} - breaks: {}, {} episodes, sorted by {}",
            playlist.name(),
            default,
            playlist.breaks.style_name(),
            playlist.episodes_per_generation,
            playlist.sort_by.as_str()
        );
        for member in &playlist.members {
            let cursor = station
                .cursors()
                .get(&playlist.id, member)
                .copied()
                .unwrap_or_default();
            let done = if cursor.exhausted { " (exhausted)" } else { "" };
            let _ = writeln!(out, "    {} @ {}{}", member, cursor.position(), done);
        }
    }

    if !station.history().is_empty() {
        let _ = writeln!(out, "\nRecent generations:");
        for entry in station.history().iter().rev() {
            let _ = writeln!(
                out,
                "  {} {} - {} episodes from {} shows",
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                entry.playlist_name,
                entry.episode_count,
                entry.shows.len()
            );
        }
    }

    out
}

/// Human-readable run summary
pub fn format_report(report: &GenerationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} episodes, {} breaks ({}), total {}",
        report.playlist,
        report.episodes,
        report.break_count,
        rtv_schedule::report::format_duration(report.break_runtime),
        rtv_schedule::report::format_duration(report.total_runtime)
    );
    for tally in &report.shows {
        let done = if tally.exhausted { " (exhausted)" } else { "" };
        let _ = writeln!(
            out,
            "  {:<30} +{:<3} next {}{}",
            tally.show_name, tally.episodes_added, tally.position, done
        );
    }
    for notice in &report.notices {
        let _ = writeln!(out, "  warning: {notice}");
    }
    out
}

// ===== Helpers =====

fn open(config: &CliConfig) -> Result<Station> {
    Ok(StateStore::new(&config.paths.state_file).load()?.station)
}

/// Open for a command that saves; an older file is backed up first
fn open_for_update(config: &CliConfig) -> Result<Station> {
    let store = StateStore::new(&config.paths.state_file);
    let loaded = store.load()?;
    if loaded.was_migrated() {
        store.backup(loaded.source_version)?;
    }
    Ok(loaded.station)
}

fn save(config: &CliConfig, station: &Station) -> Result<()> {
    StateStore::new(&config.paths.state_file).save(station)
}

fn run(
    config: &CliConfig,
    station: &Station,
    library: &LibrarySnapshot,
    state: &PlaylistState,
    options: &RunOptions,
) -> Result<Generation> {
    let members: Vec<&Show> = station
        .shows()
        .iter()
        .filter(|show| state.playlist.has_member(&show.id))
        .collect();
    let episodes = EpisodeIndex::load(library, &members);
    let clips = ClipPool::from_library(library, station.categories())?;

    let request = match options.episodes {
        Some(count) => GenerationRequest::new(count),
        None => GenerationRequest::for_playlist(&state.playlist),
    }
    .from_start(options.from_start);

    let mut rng = match options.seed.or(config.generation.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    Ok(Generator::new(station.shows(), &episodes, &clips).generate(state, request, &mut rng)?)
}
