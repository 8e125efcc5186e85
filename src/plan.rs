use crate::content::{ContentError, check_content, digest, load_file_content};
use crate::reconcile::{self, ReconcileError};
use crate::remote::TemplateVersionStore;
use crate::resource::{ResourceState, TemplateVersionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    Create,
    Update,
    /// Delete the current version, then create a new one.
    Replace,
    NoOp,
}

impl std::fmt::Display for PlanAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlanAction::Create => "create",
            PlanAction::Update => "update",
            PlanAction::Replace => "replace",
            PlanAction::NoOp => "no-op",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange {
    pub attribute: &'static str,
    pub old: String,
    pub new: String,
    pub forces_replacement: bool,
}

impl AttributeChange {
    fn new(attribute: &'static str, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            attribute,
            old: old.into(),
            new: new.into(),
            forces_replacement: false,
        }
    }

    fn forcing_replacement(mut self) -> Self {
        self.forces_replacement = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub action: PlanAction,
    pub changes: Vec<AttributeChange>,
}

impl Plan {
    pub fn has_changes(&self) -> bool {
        self.action != PlanAction::NoOp
    }

    pub fn change(&self, attribute: &str) -> Option<&AttributeChange> {
        self.changes.iter().find(|c| c.attribute == attribute)
    }
}

/// Computes what applying `config` on top of `prior` would do.
///
/// Content hashes are compared through diff suppression, so an unchanged
/// local file never plans a write. A changed content hash or template id
/// forces a replacement.
pub async fn plan(
    prior: Option<&ResourceState>,
    config: &TemplateVersionConfig,
) -> Result<Plan, ContentError> {
    let Some(prior) = prior else {
        return plan_create(config).await;
    };

    let mut changes = Vec::new();

    if prior.template_id != config.template_id {
        changes.push(
            AttributeChange::new("template_id", &prior.template_id, &config.template_id)
                .forcing_replacement(),
        );
    }

    let html = check_content(&prior.hashes.html_content_hash, &config.html_content_file).await?;
    if !html.suppressed {
        changes.push(
            AttributeChange::new(
                "html_content_hash",
                &prior.hashes.html_content_hash,
                html.local_digest,
            )
            .forcing_replacement(),
        );
    }

    let plain =
        check_content(&prior.hashes.plain_content_hash, &config.plain_content_file).await?;
    if !plain.suppressed {
        changes.push(
            AttributeChange::new(
                "plain_content_hash",
                &prior.hashes.plain_content_hash,
                plain.local_digest,
            )
            .forcing_replacement(),
        );
    }

    if prior.name != config.name {
        changes.push(AttributeChange::new("name", &prior.name, &config.name));
    }
    if prior.subject != config.subject {
        changes.push(AttributeChange::new("subject", &prior.subject, &config.subject));
    }
    if prior.active != config.active {
        changes.push(AttributeChange::new(
            "active",
            prior.active.to_string(),
            config.active.to_string(),
        ));
    }

    let action = if changes.iter().any(|c| c.forces_replacement) {
        PlanAction::Replace
    } else if changes.is_empty() {
        PlanAction::NoOp
    } else {
        PlanAction::Update
    };

    tracing::debug!(%action, changes = changes.len(), "plan computed");

    Ok(Plan { action, changes })
}

async fn plan_create(config: &TemplateVersionConfig) -> Result<Plan, ContentError> {
    let html = load_file_content(&config.html_content_file).await?;
    let plain = load_file_content(&config.plain_content_file).await?;

    let changes = vec![
        AttributeChange::new("template_id", "", &config.template_id),
        AttributeChange::new("name", "", &config.name),
        AttributeChange::new("subject", "", &config.subject),
        AttributeChange::new("active", "", config.active.to_string()),
        AttributeChange::new("html_content_hash", "", digest(&html)),
        AttributeChange::new("plain_content_hash", "", digest(&plain)),
    ];

    Ok(Plan {
        action: PlanAction::Create,
        changes,
    })
}

/// Carries out `plan` and returns the state to persist.
pub async fn apply_plan<S>(
    store: &S,
    prior: Option<ResourceState>,
    config: &TemplateVersionConfig,
    plan: &Plan,
) -> Result<ResourceState, ReconcileError>
where
    S: TemplateVersionStore + ?Sized,
{
    let prior = match (plan.action, prior) {
        (PlanAction::Create, _) | (_, None) => {
            let created = reconcile::create(store, config).await?;
            return Ok(ResourceState::from_config(created.id, config, created.hashes));
        }
        (_, Some(prior)) => prior,
    };

    match plan.action {
        PlanAction::Update => {
            let hashes = reconcile::update(store, &prior.id, config).await?;
            Ok(ResourceState::from_config(prior.id, config, hashes))
        }
        PlanAction::Replace => {
            reconcile::delete(store, &prior.template_id, &prior.id).await?;
            let created = reconcile::create(store, config).await?;
            Ok(ResourceState::from_config(created.id, config, created.hashes))
        }
        PlanAction::NoOp | PlanAction::Create => {
            Ok(ResourceState::from_config(prior.id, config, prior.hashes))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::reconcile::testing::MemoryStore;
    use crate::resource::ContentHashes;

    fn write_files(dir: &Path, html: &str, plain: &str) -> TemplateVersionConfig {
        let html_path = dir.join("html.txt");
        let plain_path = dir.join("plain.txt");
        std::fs::write(&html_path, html).unwrap();
        std::fs::write(&plain_path, plain).unwrap();

        TemplateVersionConfig {
            template_id: "d-123".to_string(),
            name: "welcome".to_string(),
            subject: "Welcome".to_string(),
            html_content_file: html_path.display().to_string(),
            plain_content_file: plain_path.display().to_string(),
            active: true,
        }
    }

    fn synced_state(config: &TemplateVersionConfig, html: &str, plain: &str) -> ResourceState {
        ResourceState::from_config(
            "ver-1".to_string(),
            config,
            ContentHashes {
                html_content_hash: digest(html),
                plain_content_hash: digest(plain),
            },
        )
    }

    #[tokio::test]
    async fn test_plan_without_prior_creates() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_files(dir.path(), "Hello", "Hello");

        let plan = plan(None, &config).await.unwrap();

        assert_eq!(plan.action, PlanAction::Create);
        assert_eq!(plan.change("html_content_hash").unwrap().new, digest("Hello"));
    }

    #[tokio::test]
    async fn test_plan_unchanged_files_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_files(dir.path(), "Hello", "Hello");
        let prior = synced_state(&config, "Hello", "Hello");

        let plan = plan(Some(&prior), &config).await.unwrap();

        assert_eq!(plan.action, PlanAction::NoOp);
        assert!(plan.changes.is_empty());
        assert!(!plan.has_changes());
    }

    #[tokio::test]
    async fn test_plan_edited_html_only_replaces_html() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_files(dir.path(), "Hello", "Hello");
        let prior = synced_state(&config, "Hello", "Hello");

        std::fs::write(&config.html_content_file, "Hello!").unwrap();
        let plan = plan(Some(&prior), &config).await.unwrap();

        assert_eq!(plan.action, PlanAction::Replace);
        let html = plan.change("html_content_hash").unwrap();
        assert_eq!(html.old, digest("Hello"));
        assert_eq!(html.new, digest("Hello!"));
        assert!(html.forces_replacement);
        assert!(plan.change("plain_content_hash").is_none());
    }

    #[tokio::test]
    async fn test_plan_unsynced_hashes_always_write() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_files(dir.path(), "Hello", "Hello");
        let prior = ResourceState::from_config("ver-1".to_string(), &config, ContentHashes::unsynced());

        let plan = plan(Some(&prior), &config).await.unwrap();

        assert_eq!(plan.action, PlanAction::Replace);
        assert!(plan.change("html_content_hash").is_some());
        assert!(plan.change("plain_content_hash").is_some());
    }

    #[tokio::test]
    async fn test_plan_cleared_hashes_always_write() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_files(dir.path(), "", "");
        let prior = ResourceState::from_config("ver-1".to_string(), &config, ContentHashes::cleared());

        let plan = plan(Some(&prior), &config).await.unwrap();

        assert_eq!(plan.action, PlanAction::Replace);
    }

    #[tokio::test]
    async fn test_plan_metadata_change_updates() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_files(dir.path(), "Hello", "Hello");
        let prior = synced_state(&config, "Hello", "Hello");

        config.subject = "New subject".to_string();
        config.active = false;
        let plan = plan(Some(&prior), &config).await.unwrap();

        assert_eq!(plan.action, PlanAction::Update);
        assert_eq!(plan.change("subject").unwrap().new, "New subject");
        assert_eq!(plan.change("active").unwrap().new, "false");
    }

    #[tokio::test]
    async fn test_plan_template_change_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_files(dir.path(), "Hello", "Hello");
        let prior = synced_state(&config, "Hello", "Hello");

        config.template_id = "d-456".to_string();
        let plan = plan(Some(&prior), &config).await.unwrap();

        assert_eq!(plan.action, PlanAction::Replace);
    }

    #[tokio::test]
    async fn test_plan_unreadable_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_files(dir.path(), "Hello", "Hello");
        let prior = synced_state(&config, "Hello", "Hello");

        std::fs::remove_file(&config.plain_content_file).unwrap();
        let result = plan(Some(&prior), &config).await;

        assert!(matches!(result, Err(ContentError::Read { .. })));
    }

    #[tokio::test]
    async fn test_apply_create_then_plan_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_files(dir.path(), "Hello", "Hello");
        let store = MemoryStore::default();

        let first = plan(None, &config).await.unwrap();
        let state = apply_plan(&store, None, &config, &first).await.unwrap();

        assert!(!state.id.is_empty());
        assert_eq!(state.hashes.html_content_hash, digest("Hello"));
        assert_eq!(state.hashes.plain_content_hash, digest("Hello"));

        let second = plan(Some(&state), &config).await.unwrap();
        assert_eq!(second.action, PlanAction::NoOp);
    }

    #[tokio::test]
    async fn test_apply_replace_swaps_remote_version() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_files(dir.path(), "Hello", "Hello");
        let store = MemoryStore::default();
        let state = apply_plan(&store, None, &config, &plan(None, &config).await.unwrap())
            .await
            .unwrap();

        std::fs::write(&config.html_content_file, "Hello!").unwrap();
        let replace = plan(Some(&state), &config).await.unwrap();
        let next = apply_plan(&store, Some(state.clone()), &config, &replace)
            .await
            .unwrap();

        assert_ne!(next.id, state.id);
        assert!(store.stored("d-123", &state.id).is_none());
        assert_eq!(next.hashes.html_content_hash, digest("Hello!"));
    }

    #[tokio::test]
    async fn test_apply_update_keeps_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_files(dir.path(), "Hello", "Hello");
        let store = MemoryStore::default();
        let state = apply_plan(&store, None, &config, &plan(None, &config).await.unwrap())
            .await
            .unwrap();

        config.name = "welcome-v2".to_string();
        let update = plan(Some(&state), &config).await.unwrap();
        let next = apply_plan(&store, Some(state.clone()), &config, &update)
            .await
            .unwrap();

        assert_eq!(next.id, state.id);
        assert_eq!(next.name, "welcome-v2");
        assert_eq!(store.stored("d-123", &state.id).unwrap().name, "welcome-v2");
    }

    #[tokio::test]
    async fn test_plan_compares_remote_digest_with_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_files(dir.path(), "a\nb", "c");
        let store = MemoryStore::normalizing();
        let state = apply_plan(&store, None, &config, &plan(None, &config).await.unwrap())
            .await
            .unwrap();

        // Remote holds "a\r\nb", so the html digest cannot match the local file
        let next = plan(Some(&state), &config).await.unwrap();
        assert!(next.change("html_content_hash").is_some());
        assert!(next.change("plain_content_hash").is_none());
    }
}
