use std::path::Path;

use sgtv::SendgridClient;
use sgtv::plan::{self, Plan};
use sgtv::reconcile::{self, ReconcileError};
use sgtv::remote::{StoreError, TemplateVersionStore};
use sgtv::resource::{ResourceState, TemplateVersionConfig, parse_import_id};
use sgtv::state::StateFile;

use crate::cli::{ApiArgs, DestroyArgs, ImportArgs, PlanArgs};
use crate::error::SgtvError;
use crate::output;

fn connect(api: &ApiArgs) -> Result<Box<dyn TemplateVersionStore>, SgtvError> {
    let api_key = api.api_key.clone().ok_or_else(|| {
        SgtvError::Auth("No API key provided. Set SENDGRID_API_KEY or use --api-key flag".to_string())
    })?;

    let client = match api.api_url.clone() {
        Some(url) => SendgridClient::with_base_url(api_key, url),
        None => SendgridClient::new(api_key),
    }
    .map_err(StoreError::from)?;

    Ok(Box::new(client))
}

async fn load_config(path: &Path) -> Result<TemplateVersionConfig, SgtvError> {
    let raw = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&raw)
        .map_err(|e| SgtvError::Config(format!("{}: {}", path.display(), e)))
}

async fn refreshed_plan(
    store: &dyn TemplateVersionStore,
    args: &PlanArgs,
) -> Result<(StateFile, TemplateVersionConfig, Plan), SgtvError> {
    let config = load_config(&args.config).await?;
    let mut state = StateFile::load(&args.api.state).await?;

    if let Some(prior) = state.resource.take() {
        state.resource = reconcile::refresh(store, prior, config.content_files()).await?;
    }

    let plan = plan::plan(state.resource.as_ref(), &config).await?;
    Ok((state, config, plan))
}

pub async fn run_plan(args: PlanArgs) -> Result<(), SgtvError> {
    let store = connect(&args.api)?;
    let (_, _, plan) = refreshed_plan(store.as_ref(), &args).await?;

    println!("{}", output::render_plan(&plan));
    Ok(())
}

pub async fn run_apply(args: PlanArgs) -> Result<(), SgtvError> {
    let store = connect(&args.api)?;
    let (mut state, config, plan) = refreshed_plan(store.as_ref(), &args).await?;

    println!("{}", output::render_plan(&plan));

    let applied = match plan::apply_plan(store.as_ref(), state.resource.take(), &config, &plan).await {
        Ok(applied) => applied,
        Err(err) => {
            // NOTE: The remote already holds the update; keep what was sent
            if let ReconcileError::Resync { id, submitted, .. } = &err {
                state.resource = Some(ResourceState::from_config(
                    id.clone(),
                    &config,
                    submitted.clone(),
                ));
                state.save(&args.api.state).await?;
            }
            return Err(err.into());
        }
    };
    tracing::info!(id = %applied.id, action = %plan.action, "apply complete");

    state.resource = Some(applied);
    state.save(&args.api.state).await?;
    Ok(())
}

pub async fn run_import(args: ImportArgs) -> Result<(), SgtvError> {
    let (template_id, id) = parse_import_id(&args.import_id).ok_or_else(|| {
        SgtvError::Config(format!(
            "invalid import id '{}', expected TEMPLATE_ID/ID",
            args.import_id
        ))
    })?;

    let mut state = StateFile::load(&args.api.state).await?;
    if let Some(existing) = &state.resource {
        return Err(SgtvError::Config(format!(
            "state already manages template version '{}'",
            existing.import_id()
        )));
    }

    let store = connect(&args.api)?;
    let imported = reconcile::import(store.as_ref(), template_id, id).await?;

    state.resource = Some(imported);
    state.save(&args.api.state).await?;
    Ok(())
}

pub async fn run_destroy(args: DestroyArgs) -> Result<(), SgtvError> {
    let mut state = StateFile::load(&args.api.state).await?;

    let Some(resource) = state.resource.take() else {
        tracing::info!("state is empty, nothing to destroy");
        return Ok(());
    };

    let store = connect(&args.api)?;
    if reconcile::exists(store.as_ref(), &resource.template_id, &resource.id).await? {
        reconcile::delete(store.as_ref(), &resource.template_id, &resource.id).await?;
    } else {
        tracing::info!(
            template_id = %resource.template_id,
            id = %resource.id,
            "template version already gone, dropping it from state"
        );
    }

    state.save(&args.api.state).await?;
    Ok(())
}
