//! Lifecycle operations for one template version.
//!
//! Every operation receives the store explicitly and returns the shadow
//! digests the caller should persist. Only digests of the remote content are
//! kept in state; the local files stay the source of truth.

use std::fmt;

use thiserror::Error;

use crate::content::{ContentError, ensure_file_exists, load_file_content};
use crate::remote::{StoreError, TemplateVersionStore};
use crate::resource::{
    ContentFiles, ContentHashes, ResourceState, TemplateVersion, TemplateVersionConfig,
    active_flag,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Check,
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Operation::Check => "checking",
            Operation::Create => "creating",
            Operation::Read => "reading",
            Operation::Update => "updating",
            Operation::Delete => "deleting",
        };
        write!(f, "{}", verb)
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("error {operation} template_version: {source}")]
    Remote {
        operation: Operation,
        source: StoreError,
    },

    /// The update was accepted but the follow-up read failed. `submitted`
    /// holds the digests of what was sent, for the caller to persist.
    #[error("template version '{id}' updated, resync failed: {source}")]
    Resync {
        id: String,
        submitted: ContentHashes,
        source: Box<ReconcileError>,
    },
}

impl ReconcileError {
    fn remote(operation: Operation) -> impl FnOnce(StoreError) -> Self {
        move |source| ReconcileError::Remote { operation, source }
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedVersion {
    pub id: String,
    pub hashes: ContentHashes,
}

pub async fn build_desired_state(
    config: &TemplateVersionConfig,
) -> Result<TemplateVersion, ContentError> {
    let html_content = load_file_content(&config.html_content_file).await?;
    let plain_content = load_file_content(&config.plain_content_file).await?;

    Ok(TemplateVersion {
        id: String::new(),
        template_id: config.template_id.clone(),
        name: config.name.clone(),
        subject: config.subject.clone(),
        html_content,
        plain_content,
        active: active_flag(config.active),
    })
}

pub async fn exists<S>(store: &S, template_id: &str, id: &str) -> Result<bool, ReconcileError>
where
    S: TemplateVersionStore + ?Sized,
{
    match store.get(template_id, id).await {
        Ok(_) => Ok(true),
        Err(err) if err.is_not_found() => {
            tracing::info!(template_id, id, "template version no longer exists");
            Ok(false)
        }
        Err(err) => Err(ReconcileError::remote(Operation::Check)(err)),
    }
}

pub async fn create<S>(
    store: &S,
    config: &TemplateVersionConfig,
) -> Result<CreatedVersion, ReconcileError>
where
    S: TemplateVersionStore + ?Sized,
{
    let desired = build_desired_state(config).await?;

    let created = store
        .create(&desired)
        .await
        .map_err(ReconcileError::remote(Operation::Create))?;

    // NOTE: Digest the echoed content, the store may have normalized it
    let hashes = created.content_hashes();

    tracing::info!(
        template_id = %config.template_id,
        id = %created.id,
        "template version created"
    );

    Ok(CreatedVersion {
        id: created.id,
        hashes,
    })
}

/// Fails with [`ContentError::Missing`] before any remote call when a
/// declared file has disappeared.
pub async fn read<S>(
    store: &S,
    template_id: &str,
    id: &str,
    files: ContentFiles<'_>,
) -> Result<ContentHashes, ReconcileError>
where
    S: TemplateVersionStore + ?Sized,
{
    ensure_file_exists(files.html).await?;
    ensure_file_exists(files.plain).await?;

    let remote = store
        .get(template_id, id)
        .await
        .map_err(ReconcileError::remote(Operation::Read))?;

    let hashes = remote.content_hashes();

    tracing::debug!(
        template_id,
        id,
        html_content_hash = %hashes.html_content_hash,
        plain_content_hash = %hashes.plain_content_hash,
        "template version read"
    );

    Ok(hashes)
}

pub async fn update<S>(
    store: &S,
    id: &str,
    config: &TemplateVersionConfig,
) -> Result<ContentHashes, ReconcileError>
where
    S: TemplateVersionStore + ?Sized,
{
    let desired = build_desired_state(config).await?;

    store
        .update(id, &desired)
        .await
        .map_err(ReconcileError::remote(Operation::Update))?;

    let submitted = desired.content_hashes();
    tracing::debug!(
        id,
        html_content_hash = %submitted.html_content_hash,
        plain_content_hash = %submitted.plain_content_hash,
        "template version submitted"
    );

    let hashes = read(store, &config.template_id, id, config.content_files())
        .await
        .map_err(|source| ReconcileError::Resync {
            id: id.to_string(),
            submitted,
            source: Box::new(source),
        })?;

    tracing::info!(template_id = %config.template_id, id, "template version updated");

    Ok(hashes)
}

pub async fn delete<S>(store: &S, template_id: &str, id: &str) -> Result<ContentHashes, ReconcileError>
where
    S: TemplateVersionStore + ?Sized,
{
    store
        .delete(template_id, id)
        .await
        .map_err(ReconcileError::remote(Operation::Delete))?;

    tracing::info!(template_id, id, "template version deleted");

    Ok(ContentHashes::cleared())
}

/// Adopts an existing remote version. The file paths stay empty until a
/// declaration supplies them.
pub async fn import<S>(store: &S, template_id: &str, id: &str) -> Result<ResourceState, ReconcileError>
where
    S: TemplateVersionStore + ?Sized,
{
    let remote = store
        .get(template_id, id)
        .await
        .map_err(ReconcileError::remote(Operation::Read))?;

    let hashes = remote.content_hashes();

    tracing::info!(template_id, id, name = %remote.name, "template version imported");

    Ok(ResourceState {
        id: id.to_string(),
        template_id: template_id.to_string(),
        name: remote.name,
        subject: remote.subject,
        html_content_file: String::new(),
        plain_content_file: String::new(),
        active: remote.active == 1,
        hashes,
    })
}

/// Brings a persisted state up to date with the remote store.
///
/// Returns `None` when the remote object has vanished.
pub async fn refresh<S>(
    store: &S,
    state: ResourceState,
    files: ContentFiles<'_>,
) -> Result<Option<ResourceState>, ReconcileError>
where
    S: TemplateVersionStore + ?Sized,
{
    if !exists(store, &state.template_id, &state.id).await? {
        return Ok(None);
    }

    let hashes = read(store, &state.template_id, &state.id, files).await?;

    Ok(Some(ResourceState { hashes, ..state }))
}
