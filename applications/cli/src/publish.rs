/// Publishes generated playlists as export files
use clap::ValueEnum;
use rtv_core::traits::PlaylistPublisher;
use rtv_core::types::{PlaylistItem, RemotePlaylistId};
use rtv_schedule::{export_rows, write_csv, write_json};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Writes one file per playlist into an export directory
///
/// Publishing the same playlist again replaces its file.
#[derive(Debug, Clone)]
pub struct ExportPublisher {
    dir: PathBuf,
    format: ExportFormat,
}

impl ExportPublisher {
    pub fn new(dir: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Export path for a playlist name
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", file_stem(name), self.format.extension()))
    }
}

impl PlaylistPublisher for ExportPublisher {
    fn publish(&self, name: &str, items: &[PlaylistItem]) -> rtv_core::Result<RemotePlaylistId> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(name);
        let rows = export_rows(items);

        let mut out = BufWriter::new(File::create(&path)?);
        match self.format {
            ExportFormat::Csv => write_csv(&rows, &mut out)?,
            ExportFormat::Json => write_json(&rows, &mut out)?,
        }
        out.flush()?;

        info!("Exported {} rows to {}", rows.len(), path.display());
        Ok(RemotePlaylistId::new(path.display().to_string()))
    }
}

/// Lowercase, with anything outside `[a-z0-9-_]` collapsed to `_`
fn file_stem(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            stem.push(c);
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "playlist".to_string()
    } else {
        stem.to_string()
    }
}
