//! File-backed catalog and clip library
//!
//! A library snapshot is a JSON document listing the episodes available per
//! show and the clips available per category:
//!
//! ```json
//! {
//!   "shows": {
//!     "Seinfeld": [{ "season": 1, "episode": 1, "title": "The Seinfeld Chronicles", "duration": 1380 }]
//!   },
//!   "clips": {
//!     "toys": [{ "id": "/clips/toys/crossfire.mp4", "duration": 30 }]
//!   }
//! }
//! ```

use crate::error::{CliError, Result};
use rtv_core::traits::{ClipLibrary, EpisodeCatalog};
use rtv_core::types::{Clip, Episode, Show};
use rtv_core::RtvError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A clip as listed under its category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipRecord {
    pub id: String,

    /// Seconds; omitted or zero when unknown
    #[serde(default)]
    pub duration: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    #[serde(default)]
    pub shows: BTreeMap<String, Vec<Episode>>,

    #[serde(default)]
    pub clips: BTreeMap<String, Vec<ClipRecord>>,
}

impl LibrarySnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::Config(format!(
                "Library file not found: {}",
                path.display()
            )));
        }
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Catalog names, used as fuzzy-match candidates
    pub fn show_names(&self) -> Vec<String> {
        self.shows.keys().cloned().collect()
    }

    fn episodes_for(&self, name: &str) -> Option<&Vec<Episode>> {
        self.shows.get(name).or_else(|| {
            self.shows
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, episodes)| episodes)
        })
    }
}

impl EpisodeCatalog for LibrarySnapshot {
    fn list_available_episodes(&self, show: &Show) -> rtv_core::Result<Vec<Episode>> {
        self.episodes_for(&show.name)
            .cloned()
            .ok_or_else(|| RtvError::not_found("Show", &show.name))
    }
}

impl ClipLibrary for LibrarySnapshot {
    fn list_clips(&self) -> rtv_core::Result<BTreeMap<String, Vec<Clip>>> {
        Ok(self
            .clips
            .iter()
            .map(|(category, records)| {
                let clips = records
                    .iter()
                    .map(|record| {
                        let clip = Clip::new(
                            record.id.clone(),
                            category.clone(),
                            rtv_core::types::seconds::from_secs(record.duration),
                        );
                        match &record.title {
                            Some(title) => clip.with_title(title.clone()),
                            None => clip,
                        }
                    })
                    .collect();
                (category.clone(), clips)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn snapshot() -> LibrarySnapshot {
        serde_json::from_str(
            r#"{
                "shows": {
                    "Seinfeld": [
                        { "season": 1, "episode": 1, "title": "The Seinfeld Chronicles", "duration": 1380 },
                        { "season": 1, "episode": 2 }
                    ]
                },
                "clips": {
                    "toys": [{ "id": "/clips/toys/a.mp4", "duration": 30, "title": "Crossfire" }],
                    "cereal": [{ "id": "/clips/cereal/b.mp4" }]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn episodes_are_found_case_insensitively() {
        let library = snapshot();
        let episodes = library
            .list_available_episodes(&Show::new("seinfeld"))
            .unwrap();
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].duration, Some(Duration::from_secs(1380)));
        assert_eq!(episodes[1].duration, None);
    }

    #[test]
    fn unknown_show_is_not_found() {
        let result = snapshot().list_available_episodes(&Show::new("Frasier"));
        assert!(matches!(result, Err(RtvError::NotFound { .. })));
    }

    #[test]
    fn clips_take_their_category_from_the_key() {
        let clips = snapshot().list_clips().unwrap();
        let toys = &clips["toys"];
        assert_eq!(toys[0].category, "toys");
        assert_eq!(toys[0].display_title(), "Crossfire");
        assert_eq!(clips["cereal"][0].duration, Duration::ZERO);
    }
}
