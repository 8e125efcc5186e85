mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::{Cli, ResourceCommand, TemplateVersionCommand};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        ResourceCommand::TemplateVersion { command } => match command {
            TemplateVersionCommand::Plan(args) => commands::run_plan(args).await?,
            TemplateVersionCommand::Apply(args) => commands::run_apply(args).await?,
            TemplateVersionCommand::Import(args) => commands::run_import(args).await?,
            TemplateVersionCommand::Destroy(args) => commands::run_destroy(args).await?,
        },
    }

    Ok(())
}
