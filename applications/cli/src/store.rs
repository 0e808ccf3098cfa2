/// Station state file storage
use crate::error::Result;
use rtv_core::persist::{self, Loaded, SCHEMA_VERSION};
use rtv_core::types::Station;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads and writes the station state file
///
/// Saves go through a temporary sibling file and a rename, so an
/// interrupted save leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the station, migrating older schemas in memory
    ///
    /// A missing file yields an empty station.
    pub fn load(&self) -> Result<Loaded> {
        if !self.path.exists() {
            debug!("No state file at {}, starting empty", self.path.display());
            return Ok(Loaded {
                station: Station::new(),
                source_version: SCHEMA_VERSION,
            });
        }

        let json = std::fs::read_to_string(&self.path)?;
        let loaded = persist::load_from_str(&json)?;
        if loaded.was_migrated() {
            info!(
                "Migrated {} from schema v{} to v{}",
                self.path.display(),
                loaded.source_version,
                SCHEMA_VERSION
            );
        }
        Ok(loaded)
    }

    pub fn save(&self, station: &Station) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = persist::to_string_pretty(station)?;
        let tmp = self.sibling("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!("Saved state to {}", self.path.display());
        Ok(())
    }

    /// Copy the current file aside before it is rewritten
    pub fn backup(&self, source_version: u32) -> Result<PathBuf> {
        let backup = self.sibling(&format!("v{source_version}.bak"));
        std::fs::copy(&self.path, &backup)?;
        info!("Backed up {} to {}", self.path.display(), backup.display());
        Ok(backup)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }
}
