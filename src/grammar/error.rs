//! Defines the error types for loading rule tables.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulesError {
    #[error("Failed to read rule table {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed {table} table: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Duplicate composition rule for '{child}' into '{parent}'")]
    DuplicateComposition { child: String, parent: String },
}
