use serde::{Deserialize, Serialize};

use crate::resource::TemplateVersion;

/// Request body for creating or patching a version.
///
/// SendGrid assigns the id itself, so it is never sent.
#[derive(Debug, Serialize)]
pub struct VersionPayload<'a> {
    pub template_id: &'a str,
    pub name: &'a str,
    pub subject: &'a str,
    pub html_content: &'a str,
    pub plain_content: &'a str,
    pub active: u8,
}

impl<'a> From<&'a TemplateVersion> for VersionPayload<'a> {
    fn from(version: &'a TemplateVersion) -> Self {
        Self {
            template_id: &version.template_id,
            name: &version.name,
            subject: &version.subject,
            html_content: &version.html_content,
            plain_content: &version.plain_content,
            active: version.active,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub field: Option<String>,
    pub message: String,
}

impl ErrorResponse {
    pub fn first_message(&self) -> Option<String> {
        self.errors.first().map(|e| match &e.field {
            Some(field) if !field.is_empty() => format!("{}: {}", field, e.message),
            _ => e.message.clone(),
        })
    }
}
