use std::path::{MAIN_SEPARATOR, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;

/// Errors raised while resolving or reading local template files.
///
/// All of them are fatal for the operation that hit them: a plan cannot be
/// decided without the declared content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("file '{path}' can't be expanded: {reason}")]
    Expand { path: String, reason: String },

    #[error("file '{path}' can't be read: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("file '{path}' is missing: {source}")]
    Missing {
        path: String,
        source: std::io::Error,
    },
}

/// Base64 (standard, padded) SHA-256 of the content's UTF-8 bytes.
pub fn digest(content: &str) -> String {
    STANDARD.encode(Sha256::digest(content.as_bytes()))
}

// NOTE: Only the current user's home is supported, `~other/...` is rejected
pub fn expand_path(path: &str) -> Result<PathBuf, ContentError> {
    let Some(rest) = path.strip_prefix('~') else {
        return Ok(PathBuf::from(path));
    };

    if !rest.is_empty() && !rest.starts_with('/') && !rest.starts_with(MAIN_SEPARATOR) {
        return Err(ContentError::Expand {
            path: path.to_string(),
            reason: "cannot expand user-specific home dir".to_string(),
        });
    }

    let home = dirs::home_dir().ok_or_else(|| ContentError::Expand {
        path: path.to_string(),
        reason: "home directory could not be determined".to_string(),
    })?;

    let rest = rest.trim_start_matches(['/', MAIN_SEPARATOR]);
    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}

pub async fn load_file_content(path: &str) -> Result<String, ContentError> {
    let filename = expand_path(path)?;
    fs::read_to_string(&filename)
        .await
        .map_err(|source| ContentError::Read {
            path: filename.display().to_string(),
            source,
        })
}

pub async fn ensure_file_exists(path: &str) -> Result<(), ContentError> {
    let filename = expand_path(path)?;
    fs::metadata(&filename)
        .await
        .map(|_| ())
        .map_err(|source| ContentError::Missing {
            path: filename.display().to_string(),
            source,
        })
}

/// Decides whether a content hash diff is a no-op.
///
/// A stored digest that is empty never suppresses, so a resource with no
/// remote counterpart always plans a write.
pub fn should_suppress(stored_digest: &str, local_content: &str) -> bool {
    !stored_digest.is_empty() && stored_digest == digest(local_content)
}

/// Outcome of comparing a stored digest with the current local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentCheck {
    pub local_digest: String,
    pub suppressed: bool,
}

/// Reads the declared file and applies [`should_suppress`] to it.
pub async fn check_content(stored_digest: &str, path: &str) -> Result<ContentCheck, ContentError> {
    let local_content = load_file_content(path).await?;
    let suppressed = should_suppress(stored_digest, &local_content);
    let local_digest = digest(&local_content);

    tracing::debug!(
        path,
        stored = stored_digest,
        local = %local_digest,
        suppressed,
        "content diff checked"
    );

    Ok(ContentCheck {
        local_digest,
        suppressed,
    })
}
