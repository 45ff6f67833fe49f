// File Operations for key and message records
// Reading and writing pretty-printed JSON documents

use crate::rsa::RsaError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while persisting or exchanging records
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} does not exist. Generate with key-gen <keysize>")]
    MissingKey(String),

    #[error("key does not exist for {0}")]
    MissingContact(String),

    #[error("no {kind} found for {identity}")]
    NotFound { kind: &'static str, identity: String },

    #[error("invalid identity {0:?}: must be a plain name that is not public or private")]
    InvalidIdentity(String),

    #[error("message for {0} cannot be decoded with the local private key")]
    NotAuthorized(String),

    #[error(transparent)]
    Rsa(#[from] RsaError),
}

/// Result type for file operations
pub type StoreResult<T> = Result<T, StoreError>;

fn io_error(path: &Path, source: io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Check that `identity` can name a file of its own next to the local keys:
/// non-empty, no path separators or `..`, and not `public`/`private`
pub fn validate_identity(identity: &str) -> StoreResult<()> {
    let reserved = ["public", "private"]
        .iter()
        .any(|name| identity.eq_ignore_ascii_case(name));
    if identity.trim().is_empty()
        || identity.contains(['/', '\\', '\0'])
        || identity.contains("..")
        || reserved
    {
        return Err(StoreError::InvalidIdentity(identity.to_string()));
    }
    Ok(())
}

/// Read a JSON document from `path`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Write `value` to `path` as indented JSON, creating parent directories
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    let text = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, text).map_err(|e| io_error(path, e))
}
