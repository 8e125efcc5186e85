use serde::{Deserialize, Serialize};

use crate::content::digest;

pub const RESOURCE_TYPE: &str = "sendgrid_template_version";

/// Placeholder hashes for a declaration that has never been applied.
///
/// They can never equal a real digest, so the first plan always writes.
pub const UNSYNCED_HTML_HASH: &str = "different hash - html";
pub const UNSYNCED_PLAIN_HASH: &str = "different hash - plain";

/// A template version as held by SendGrid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TemplateVersion {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub template_id: String,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub html_content: String,
    #[serde(default)]
    pub plain_content: String,
    #[serde(default)]
    pub active: u8,
}

impl TemplateVersion {
    pub fn content_hashes(&self) -> ContentHashes {
        ContentHashes {
            html_content_hash: digest(&self.html_content),
            plain_content_hash: digest(&self.plain_content),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active == 1
    }
}

pub fn active_flag(active: bool) -> u8 {
    if active { 1 } else { 0 }
}

fn default_active() -> bool {
    true
}

/// The locally declared configuration of one template version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TemplateVersionConfig {
    pub template_id: String,
    pub name: String,
    pub subject: String,
    pub html_content_file: String,
    pub plain_content_file: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl TemplateVersionConfig {
    pub fn content_files(&self) -> ContentFiles<'_> {
        ContentFiles {
            html: &self.html_content_file,
            plain: &self.plain_content_file,
        }
    }
}

/// Paths of the two declared template bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentFiles<'a> {
    pub html: &'a str,
    pub plain: &'a str,
}

/// Last digests observed from the remote object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContentHashes {
    pub html_content_hash: String,
    pub plain_content_hash: String,
}

impl ContentHashes {
    pub fn unsynced() -> Self {
        Self {
            html_content_hash: UNSYNCED_HTML_HASH.to_string(),
            plain_content_hash: UNSYNCED_PLAIN_HASH.to_string(),
        }
    }

    /// Both digests empty: the remote counterpart is gone.
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn is_cleared(&self) -> bool {
        self.html_content_hash.is_empty() && self.plain_content_hash.is_empty()
    }
}

/// Persisted shadow of one managed template version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResourceState {
    pub id: String,
    pub template_id: String,
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub html_content_file: String,
    #[serde(default)]
    pub plain_content_file: String,
    pub active: bool,
    #[serde(flatten)]
    pub hashes: ContentHashes,
}

impl ResourceState {
    pub fn from_config(id: String, config: &TemplateVersionConfig, hashes: ContentHashes) -> Self {
        Self {
            id,
            template_id: config.template_id.clone(),
            name: config.name.clone(),
            subject: config.subject.clone(),
            html_content_file: config.html_content_file.clone(),
            plain_content_file: config.plain_content_file.clone(),
            active: config.active,
            hashes,
        }
    }

    /// `<template_id>/<id>`, the key accepted by import.
    pub fn import_id(&self) -> String {
        format!("{}/{}", self.template_id, self.id)
    }
}

/// Splits an import key of the form `<template_id>/<id>`.
pub fn parse_import_id(input: &str) -> Option<(&str, &str)> {
    let (template_id, id) = input.split_once('/')?;
    if template_id.is_empty() || id.is_empty() || id.contains('/') {
        return None;
    }
    Some((template_id, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> TemplateVersionConfig {
        TemplateVersionConfig {
            template_id: "d-123".to_string(),
            name: "welcome".to_string(),
            subject: "Welcome {{name}}".to_string(),
            html_content_file: "welcome.html".to_string(),
            plain_content_file: "welcome.txt".to_string(),
            active: true,
        }
    }

    #[test]
    fn test_config_active_defaults_to_true() {
        let json = r#"{
            "template_id": "d-123",
            "name": "welcome",
            "subject": "Hi",
            "html_content_file": "~/mail/welcome.html",
            "plain_content_file": "~/mail/welcome.txt"
        }"#;
        let config: TemplateVersionConfig = serde_json::from_str(json).unwrap();
        assert!(config.active);
        assert_eq!(config.html_content_file, "~/mail/welcome.html");
    }

    #[test]
    fn test_config_requires_content_files() {
        let json = r#"{"template_id": "d-123", "name": "welcome", "subject": "Hi"}"#;
        let result: Result<TemplateVersionConfig, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_template_version_wire_format() {
        let json = r#"{
            "id": "ver-1",
            "template_id": "d-123",
            "active": 1,
            "name": "welcome",
            "html_content": "<p>Hello</p>",
            "plain_content": "Hello",
            "subject": "Hi",
            "updated_at": "2024-01-01 00:00:00"
        }"#;
        let version: TemplateVersion = serde_json::from_str(json).unwrap();
        assert_eq!(version.id, "ver-1");
        assert!(version.is_active());
        assert_eq!(version.html_content, "<p>Hello</p>");
    }

    #[test]
    fn test_template_version_omits_empty_id() {
        let version = TemplateVersion {
            template_id: "d-123".to_string(),
            name: "welcome".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&version).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["active"], 0);
    }

    #[test]
    fn test_active_flag_encoding() {
        assert_eq!(active_flag(true), 1);
        assert_eq!(active_flag(false), 0);
    }

    #[test]
    fn test_content_hashes_from_version() {
        let version = TemplateVersion {
            html_content: "Hello".to_string(),
            plain_content: "Hello".to_string(),
            ..Default::default()
        };
        let hashes = version.content_hashes();
        assert_eq!(hashes.html_content_hash, digest("Hello"));
        assert_eq!(hashes.html_content_hash, hashes.plain_content_hash);
    }

    #[test]
    fn test_unsynced_and_cleared_hashes() {
        let unsynced = ContentHashes::unsynced();
        assert_eq!(unsynced.html_content_hash, "different hash - html");
        assert_eq!(unsynced.plain_content_hash, "different hash - plain");
        assert!(!unsynced.is_cleared());
        assert!(ContentHashes::cleared().is_cleared());
    }

    #[test]
    fn test_resource_state_flattens_hashes() {
        let state = ResourceState::from_config(
            "ver-1".to_string(),
            &sample_config(),
            ContentHashes {
                html_content_hash: "h".to_string(),
                plain_content_hash: "p".to_string(),
            },
        );
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["html_content_hash"], "h");
        assert_eq!(json["plain_content_hash"], "p");
        assert_eq!(json["template_id"], "d-123");

        let back: ResourceState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
        assert_eq!(back.import_id(), "d-123/ver-1");
    }

    #[test]
    fn test_parse_import_id() {
        assert_eq!(parse_import_id("d-123/ver-1"), Some(("d-123", "ver-1")));
        assert_eq!(parse_import_id("d-123"), None);
        assert_eq!(parse_import_id("/ver-1"), None);
        assert_eq!(parse_import_id("d-123/"), None);
        assert_eq!(parse_import_id("a/b/c"), None);
    }
}
