use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::Response;

use super::SendgridError;
use super::types::{ErrorResponse, VersionPayload};
use crate::resource::TemplateVersion;

const SENDGRID_API_BASE: &str = "https://api.sendgrid.com/v3";

#[derive(Clone)]
pub struct SendgridClient {
    client: reqwest::Client,
    base_url: String,
}

impl SendgridClient {
    pub fn new(api_key: String) -> Result<Self, SendgridError> {
        Self::with_base_url(api_key, SENDGRID_API_BASE.to_string())
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, SendgridError> {
        Self::create_client(api_key, base_url)
    }

    fn create_client(api_key: String, base_url: String) -> Result<Self, SendgridError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", api_key);
        let mut header_value =
            HeaderValue::from_str(&auth_value).map_err(|_| SendgridError::Auth {
                message: "Invalid API key format".to_string(),
            })?;
        header_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(SendgridError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.base_url
    }

    fn versions_url(&self, template_id: &str) -> String {
        format!(
            "{}/templates/{}/versions",
            self.base_url,
            urlencoding::encode(template_id)
        )
    }

    fn version_url(&self, template_id: &str, id: &str) -> String {
        format!(
            "{}/{}",
            self.versions_url(template_id),
            urlencoding::encode(id)
        )
    }

    pub async fn get_template_version(
        &self,
        template_id: &str,
        id: &str,
    ) -> Result<TemplateVersion, SendgridError> {
        let url = self.version_url(template_id, id);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, Some((template_id, id))).await?;

        parse_version(response).await
    }

    pub async fn create_template_version(
        &self,
        version: &TemplateVersion,
    ) -> Result<TemplateVersion, SendgridError> {
        let url = self.versions_url(&version.template_id);

        let response = self
            .client
            .post(&url)
            .json(&VersionPayload::from(version))
            .send()
            .await?;
        let response = check_status(response, None).await?;

        parse_version(response).await
    }

    pub async fn update_template_version(
        &self,
        id: &str,
        version: &TemplateVersion,
    ) -> Result<TemplateVersion, SendgridError> {
        let url = self.version_url(&version.template_id, id);

        let response = self
            .client
            .patch(&url)
            .json(&VersionPayload::from(version))
            .send()
            .await?;
        let response = check_status(response, Some((version.template_id.as_str(), id))).await?;

        parse_version(response).await
    }

    pub async fn delete_template_version(
        &self,
        template_id: &str,
        id: &str,
    ) -> Result<(), SendgridError> {
        let url = self.version_url(template_id, id);

        let response = self.client.delete(&url).send().await?;
        check_status(response, Some((template_id, id))).await?;

        Ok(())
    }
}

// NOTE: `key` is the compound key of an existing version; a 404 without one is a plain API error
async fn check_status(
    response: Response,
    key: Option<(&str, &str)>,
) -> Result<Response, SendgridError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .ok()
        .and_then(|r| r.first_message())
        .or_else(|| status.canonical_reason().map(|r| r.to_string()))
        .unwrap_or_else(|| "Unknown error".to_string());

    match (status.as_u16(), key) {
        (404, Some((template_id, id))) => Err(SendgridError::NotFound {
            template_id: template_id.to_string(),
            id: id.to_string(),
        }),
        (401 | 403, _) => Err(SendgridError::Auth { message }),
        (code, _) => Err(SendgridError::Api {
            status: code,
            message,
        }),
    }
}

async fn parse_version(response: Response) -> Result<TemplateVersion, SendgridError> {
    response
        .json::<TemplateVersion>()
        .await
        .map_err(|e| SendgridError::Decode {
            message: e.to_string(),
        })
}

impl std::fmt::Debug for SendgridClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendgridClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
