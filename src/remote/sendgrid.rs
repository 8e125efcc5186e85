mod client;
mod error;
mod types;

pub use client::SendgridClient;
pub use error::SendgridError;

use async_trait::async_trait;

use super::{StoreError, TemplateVersionStore};
use crate::resource::TemplateVersion;

#[async_trait]
impl TemplateVersionStore for SendgridClient {
    fn name(&self) -> &str {
        "sendgrid"
    }

    async fn get(&self, template_id: &str, id: &str) -> Result<TemplateVersion, StoreError> {
        tracing::debug!(template_id, id, "fetching template version");
        Ok(self.get_template_version(template_id, id).await?)
    }

    async fn create(&self, version: &TemplateVersion) -> Result<TemplateVersion, StoreError> {
        tracing::debug!(template_id = %version.template_id, name = %version.name, "creating template version");
        Ok(self.create_template_version(version).await?)
    }

    async fn update(&self, id: &str, version: &TemplateVersion) -> Result<(), StoreError> {
        tracing::debug!(template_id = %version.template_id, id, "updating template version");
        self.update_template_version(id, version).await?;
        Ok(())
    }

    async fn delete(&self, template_id: &str, id: &str) -> Result<(), StoreError> {
        tracing::debug!(template_id, id, "deleting template version");
        Ok(self.delete_template_version(template_id, id).await?)
    }
}
