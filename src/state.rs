//! State file persistence.
//!
//! Holds the shadow of at most one managed template version, so the next
//! plan can tell whether the remote object still matches the local files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use crate::resource::ResourceState;

pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("I/O error on state file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid state file '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("unsupported state version {0}, expected {expected}", expected = STATE_VERSION)]
    UnsupportedVersion(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    pub resource: Option<ResourceState>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            resource: None,
        }
    }
}

impl StateFile {
    /// A missing file is an empty state.
    pub async fn load(path: &Path) -> Result<Self, StateError> {
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no state file, starting empty");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(StateError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let state: StateFile = serde_json::from_str(&raw).map_err(|source| StateError::Json {
            path: path.display().to_string(),
            source,
        })?;

        if state.version != STATE_VERSION {
            return Err(StateError::UnsupportedVersion(state.version));
        }

        Ok(state)
    }

    pub async fn save(&self, path: &Path) -> Result<(), StateError> {
        let raw = serde_json::to_string_pretty(self).map_err(|source| StateError::Json {
            path: path.display().to_string(),
            source,
        })?;

        fs::write(path, raw + "\n")
            .await
            .map_err(|source| StateError::Io {
                path: path.display().to_string(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "state saved");
        Ok(())
    }
}
