mod args;

pub use args::{ApiArgs, Cli, DestroyArgs, ImportArgs, PlanArgs, ResourceCommand, TemplateVersionCommand};
