//! Real TV - Playlist Generation
//!
//! Turns a playlist snapshot into a broadcast-style sequence: episodes in
//! airing order, one show per turn, with interstitial breaks between them.
//!
//! This crate provides:
//! - Round-robin rotation over a playlist's active shows
//! - Per-playlist cursors with exhaustion handling
//! - Commercial selection (single clip, time-boxed block, or none)
//! - A per-playlist no-repeat window for clips
//! - Generation reports and CSV/JSON export
//!
//! # Architecture
//!
//! `rtv-schedule` performs no I/O. Catalog and clip library contents are
//! snapshotted into an [`EpisodeIndex`] and a [`ClipPool`] before a run, the
//! random source is passed in, and the new state is returned to the caller
//! instead of being written anywhere.
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use rtv_core::types::{Episode, Playlist, PlaylistState, Show};
//! use rtv_schedule::{ClipPool, EpisodeIndex, GenerationRequest, Generator};
//!
//! let shows = vec![Show::new("Seinfeld"), Show::new("Friends")];
//! let mut episodes = EpisodeIndex::new();
//! for show in &shows {
//!     episodes.insert(show.id.clone(), (1..=3).map(|e| Episode::new(1, e)).collect());
//! }
//!
//! let mut playlist = Playlist::new("Real TV");
//! playlist.members = shows.iter().map(|show| show.id.clone()).collect();
//! let state = PlaylistState::new(playlist);
//!
//! let clips = ClipPool::empty();
//! let generation = Generator::new(&shows, &episodes, &clips)
//!     .generate(&state, GenerationRequest::new(4), &mut StdRng::seed_from_u64(1))
//!     .unwrap();
//!
//! assert_eq!(generation.report.episodes, 4);
//! ```

#![forbid(unsafe_code)]

pub mod cursor;
pub mod engine;
pub mod error;
pub mod pool;
pub mod report;
pub mod rotation;
pub mod selector;
pub mod window;

pub use cursor::{CursorCheck, EpisodeIndex, EpisodeListing};
pub use engine::{Generation, GenerationRequest, Generator, Preview};
pub use error::{Result, ScheduleError};
pub use pool::{ClipPool, DEFAULT_CLIP_DURATION};
pub use report::{export_rows, write_csv, write_json, ExportRow, GenerationReport, Notice};
pub use rotation::RoundRobin;
pub use selector::CommercialSelector;
pub use window::RepeatWindow;
