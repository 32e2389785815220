//! Fatal error taxonomy.
//!
//! Two classes are allowed to escape the core: catalog (configuration)
//! errors at load time and map-generation failures when the bounded retry
//! budget is exhausted. Everything else is recovered locally with a status
//! message.

use std::path::PathBuf;
use thiserror::Error;

/// Static catalog loading/validation failures. Fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("catalog {name} is empty")]
    Empty { name: &'static str },
    #[error("invalid {catalog} entry {entry:?}: {reason}")]
    InvalidEntry {
        catalog: &'static str,
        entry: String,
        reason: String,
    },
    #[error("skills catalog is missing class {class:?}")]
    MissingClass { class: String },
}

/// Dungeon generation failures. The stochastic placement loops are bounded;
/// exhausting a retry budget raises one of these instead of spinning.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    #[error("map dimensions {width}x{height} are too small to place a room")]
    GridTooSmall { width: usize, height: usize },
    #[error("could not place the seed room after {attempts} attempts")]
    SeedPlacement { attempts: u32 },
}

/// Top-level application error for the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
