use std::{fs::File, io::{self, BufReader, Read}, path::Path};
use serde_json::Value;
use thiserror::Error;
use crate::error::SearchError;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read input: {0}")]
    Io(#[from] io::Error),

    #[error("Input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Parse a whole JSON document from any reader.
pub fn read_json<R: Read>(reader: R) -> Result<Value, LoadError> {
    let reader = BufReader::new(reader);
    Ok(serde_json::from_reader(reader)?)
}

pub fn read_json_file(path: impl AsRef<Path>) -> Result<Value, LoadError> {
    let path = path.as_ref();
    let f = File::open(path)?;
    let total_bytes = f.metadata().map(|m| m.len()).unwrap_or(0);
    tracing::debug!(path = %path.display(), total_bytes, "reading JSON document");
    read_json(f)
}

/// Read from `path`, or from stdin when `path` is `-`.
pub fn read_json_input(path: &str) -> Result<Value, LoadError> {
    if path == "-" {
        read_json(io::stdin().lock())
    } else {
        read_json_file(path)
    }
}
