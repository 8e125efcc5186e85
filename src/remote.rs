pub mod sendgrid;

use async_trait::async_trait;
use thiserror::Error;

use crate::resource::TemplateVersion;

/// Textual not-found marker some store errors only carry in their message.
pub const NOT_FOUND_INDICATOR: &str = "404 Not Found";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("404 Not Found: template version '{id}' of template '{template_id}'")]
    NotFound { template_id: String, id: String },
    #[error("authentication error: {0}")]
    Auth(String),
    #[error("sendgrid error: {0}")]
    Sendgrid(String),
}

impl StoreError {
    // NOTE: Falls back to the message text for errors that lost their variant
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. }) || self.to_string().contains(NOT_FOUND_INDICATOR)
    }
}

/// Remote storage of template versions, keyed by `(template_id, id)`.
#[async_trait]
pub trait TemplateVersionStore: Send + Sync {
    fn name(&self) -> &str;
    async fn get(&self, template_id: &str, id: &str) -> Result<TemplateVersion, StoreError>;
    /// Returns the version as stored, including its assigned id.
    async fn create(&self, version: &TemplateVersion) -> Result<TemplateVersion, StoreError>;
    async fn update(&self, id: &str, version: &TemplateVersion) -> Result<(), StoreError>;
    async fn delete(&self, template_id: &str, id: &str) -> Result<(), StoreError>;
}
