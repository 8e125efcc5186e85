//! sgtv - SendGrid template versions driven by local files
//!
//! Keeps a remote template version in line with local HTML and plain-text
//! bodies, persisting only content digests as state.

pub mod content;
pub mod plan;
pub mod reconcile;
pub mod remote;
pub mod resource;
pub mod state;

pub use content::{ContentError, digest, should_suppress};
pub use plan::{Plan, PlanAction, apply_plan};
pub use reconcile::ReconcileError;
pub use remote::sendgrid::{SendgridClient, SendgridError};
pub use remote::{StoreError, TemplateVersionStore};
pub use resource::{ContentHashes, ResourceState, TemplateVersion, TemplateVersionConfig};
