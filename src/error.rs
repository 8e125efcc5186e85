use thiserror::Error;

use sgtv::content::ContentError;
use sgtv::reconcile::ReconcileError;
use sgtv::remote::StoreError;
use sgtv::state::StateError;

#[derive(Debug, Error)]
pub enum SgtvError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
