use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub const DEFAULT_STATE_FILE: &str = "sgtv.state.json";

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Subcommand, Debug)]
pub enum ResourceCommand {
    TemplateVersion {
        #[command(subcommand)]
        command: TemplateVersionCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum TemplateVersionCommand {
    /// Show what apply would change
    Plan(PlanArgs),
    Apply(PlanArgs),
    /// Adopt an existing version, given as TEMPLATE_ID/ID
    Import(ImportArgs),
    Destroy(DestroyArgs),
}

#[derive(clap::Args, Debug)]
pub struct ApiArgs {
    #[arg(long, env = "SENDGRID_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "SENDGRID_API_URL")]
    pub api_url: Option<String>,

    #[arg(long, default_value = DEFAULT_STATE_FILE)]
    pub state: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// JSON declaration of the template version
    #[arg(long)]
    pub config: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    #[arg(value_name = "TEMPLATE_ID/ID")]
    pub import_id: String,
}

#[derive(clap::Args, Debug)]
pub struct DestroyArgs {
    #[command(flatten)]
    pub api: ApiArgs,
}
