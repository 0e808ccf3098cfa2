//! Real TV CLI Library
//!
//! File-backed harness around the generation engine: a JSON state file, a
//! JSON library snapshot standing in for the media catalog, and CSV/JSON
//! exports standing in for a remote playlist service.
//!
//! This library exposes the core components for testing purposes.

pub mod commands;
pub mod config;
pub mod error;
pub mod library;
pub mod publish;
pub mod store;

// Re-export commonly used types for convenience
pub use commands::{BreakOptions, Migration, Published, RunOptions};
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use library::LibrarySnapshot;
pub use publish::{ExportFormat, ExportPublisher};
pub use store::StateStore;
